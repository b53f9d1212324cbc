//! One-shot completion requests
//!
//! A request snapshots a session into a [`Payload`] on `prepare`, spends that
//! snapshot on exactly one exchange in `run`, and always answers with a
//! sealed [`Response`].

use chatline_core::{MessageRecord, Session};
use chatline_tools::{FunctionCall, Tools};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, info, warn};

use crate::base::{RequestError, RequestResult};
use crate::client::Client;
use crate::response::{Response, ResponseBuilder};

/// Fixed nucleus-sampling value sent with every request
pub const SAMPLING_TOP_P: f64 = 0.1;
/// Fixed temperature sent with every request; the configured temperature is not used here
pub const SAMPLING_TEMPERATURE: f64 = 0.2;

/// Opening line of a markdown code fence at the very start of a completion
static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A```[^\n]*\n").expect("fence pattern is valid"));

/// Request body sent to the completions endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub model: String,
    pub max_tokens: u32,
    pub n: u32,
    pub top_p: f64,
    pub temperature: f64,
    pub messages: Vec<MessageRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    function_call: Option<FunctionCall>,
}

/// A completion request bound to a [`Client`]
pub struct Request<'a> {
    client: &'a Client,
    session: Option<Cow<'a, Session>>,
    tools: Option<&'a dyn Tools>,
    prepared: Option<Payload>,
}

impl<'a> Request<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            session: None,
            tools: None,
            prepared: None,
        }
    }

    /// Use `session` as the conversation to send
    pub fn attach_session(mut self, session: &'a Session) -> Self {
        self.session = Some(Cow::Borrowed(session));
        self
    }

    /// Offer `tools` to the model and dispatch returned function calls to them
    pub fn attach_tools(mut self, tools: &'a dyn Tools) -> Self {
        self.tools = Some(tools);
        self
    }

    /// The attached session, or a fresh empty one attached on first access
    pub fn session(&mut self) -> &Session {
        self.session
            .get_or_insert_with(|| Cow::Owned(Session::new()))
    }

    /// The snapshot the next `run` will send, if any
    pub fn prepared(&self) -> Option<&Payload> {
        self.prepared.as_ref()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// Snapshot the session and sampling settings into the outbound payload.
    ///
    /// Calling it again replaces the previous snapshot.
    pub fn prepare(&mut self) -> &mut Self {
        let config = self.client.config();
        let messages = self
            .session
            .get_or_insert_with(|| Cow::Owned(Session::new()))
            .dump();

        let payload = Payload {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            n: config.n,
            top_p: SAMPLING_TOP_P,
            temperature: SAMPLING_TEMPERATURE,
            messages,
            functions: self.tools.map(|tools| tools.definitions()),
        };
        debug!(
            "Prepared request for {} with {} messages",
            payload.model,
            payload.messages.len()
        );

        self.prepared = Some(payload);
        self
    }

    /// Perform the exchange and seal the outcome.
    ///
    /// Consumes the prepared snapshot whatever happens; a second `run`
    /// without `prepare` fails with "request not prepared" and sends nothing.
    /// Failures never escape as errors, they come back as a failed response.
    pub fn run(&mut self) -> Response {
        let Some(payload) = self.prepared.take() else {
            warn!("Refusing to run a request that was not prepared");
            return ResponseBuilder::fail(None, RequestError::NotPrepared.to_string()).build();
        };

        match self.exchange(&payload) {
            Ok((completion, function_call)) => {
                info!("Completion received from {}", payload.model);
                ResponseBuilder::success(Some(payload))
                    .completion(completion)
                    .function_call(function_call)
                    .build()
            }
            Err(e) => {
                warn!("Completion request failed: {}", e);
                ResponseBuilder::fail(Some(payload), e.to_string()).build()
            }
        }
    }

    fn exchange(&self, payload: &Payload) -> RequestResult<(Option<String>, Option<FunctionCall>)> {
        let config = self.client.config();
        let reply = self
            .client
            .transport()
            .post(&config.endpoint, &config.token, payload)?;

        if !reply.is_success() {
            return Err(RequestError::Transport {
                status: reply.status,
                reason: reply.reason,
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&reply.body)?;
        let message = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RequestError::Exchange("No choices in response".to_string()))?
            .message;

        if let (Some(call), Some(tools)) = (&message.function_call, self.tools) {
            debug!("Dispatching function call {}", call.name);
            tools.try_call(call);
        }

        let completion = message.content.map(normalize_completion);
        Ok((completion, message.function_call))
    }
}

/// Terminate the completion with a newline and drop a leading code-fence
/// opening line (e.g. "```json"). Only that first line is removed.
pub fn normalize_completion(content: String) -> String {
    let mut content = content;
    content.push('\n');
    LEADING_FENCE.replace(&content, "").into_owned()
}
