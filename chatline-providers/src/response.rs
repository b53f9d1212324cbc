//! Sealed completion results

use chatline_tools::FunctionCall;

use crate::request::Payload;

/// The immutable outcome of one completion attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    request: Option<Payload>,
    success: bool,
    error: Option<String>,
    completion: Option<String>,
    function_call: Option<FunctionCall>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Failure description; set only on failed responses
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Completion text, already newline-terminated and fence-trimmed
    pub fn completion(&self) -> Option<&str> {
        self.completion.as_deref()
    }

    pub fn function_call(&self) -> Option<&FunctionCall> {
        self.function_call.as_ref()
    }

    /// The payload that was sent; `None` when the request was never prepared.
    /// Informational only.
    pub fn request(&self) -> Option<&Payload> {
        self.request.as_ref()
    }
}

/// Two-phase construction of a [`Response`].
///
/// The outcome is fixed when the builder is created: a success never
/// carries an error and a failure always does.
///
/// The draft can be sealed once. [`ResponseBuilder::seal`] hands it out
/// and leaves the builder empty, so a second seal returns `None`;
/// [`ResponseBuilder::build`] consumes the builder instead.
#[derive(Debug)]
pub struct ResponseBuilder {
    draft: Option<Response>,
}

impl ResponseBuilder {
    fn with_outcome(request: Option<Payload>, error: Option<String>) -> Self {
        Self {
            draft: Some(Response {
                request,
                success: error.is_none(),
                error,
                completion: None,
                function_call: None,
            }),
        }
    }

    /// A builder for a successful response
    pub fn success(request: Option<Payload>) -> Self {
        Self::with_outcome(request, None)
    }

    /// A builder for a failed response carrying `error`
    pub fn fail(request: Option<Payload>, error: impl Into<String>) -> Self {
        Self::with_outcome(request, Some(error.into()))
    }

    pub fn completion(mut self, completion: impl Into<Option<String>>) -> Self {
        if let Some(draft) = self.draft.as_mut() {
            draft.completion = completion.into();
        }
        self
    }

    pub fn function_call(mut self, call: impl Into<Option<FunctionCall>>) -> Self {
        if let Some(draft) = self.draft.as_mut() {
            draft.function_call = call.into();
        }
        self
    }

    /// Take the response out; `None` once it has already been taken
    pub fn seal(&mut self) -> Option<Response> {
        self.draft.take()
    }

    pub fn is_sealed(&self) -> bool {
        self.draft.is_none()
    }

    /// Seal and consume the builder.
    ///
    /// A builder that was already sealed has nothing left to hand out and
    /// yields a failed response saying so.
    pub fn build(mut self) -> Response {
        self.seal().unwrap_or_else(|| Response {
            request: None,
            success: false,
            error: Some("response already sealed".to_string()),
            completion: None,
            function_call: None,
        })
    }
}
