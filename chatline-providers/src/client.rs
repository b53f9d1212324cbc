//! Client facade

use chatline_core::{ClientOptions, Config, Message, Session};

use crate::base::Transport;
use crate::http::HttpTransport;
use crate::request::Request;
use crate::response::Response;

/// Owns the resolved configuration and the transport, and hands out
/// sessions, messages and requests
pub struct Client {
    config: Config,
    transport: Box<dyn Transport>,
}

impl Client {
    /// Resolve `options` and build a client.
    ///
    /// Missing configuration (no `.openai.yaml`, no token, no model) is
    /// fatal: the error goes to stderr and the process exits with status 1.
    /// Use [`Client::try_new`] to handle it instead.
    pub fn new(options: ClientOptions) -> Self {
        match Self::try_new(&options) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    /// Resolve `options` and build a client, returning configuration errors
    pub fn try_new(options: &ClientOptions) -> chatline_core::Result<Self> {
        Ok(Self::with_config(options.resolve()?))
    }

    /// Build a client from an already resolved configuration
    pub fn with_config(config: Config) -> Self {
        Self::with_transport(config, HttpTransport::new())
    }

    /// Build a client that performs exchanges through `transport`
    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn token(&self) -> &str {
        &self.config.token
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn max_tokens(&self) -> u32 {
        self.config.max_tokens
    }

    pub fn n(&self) -> u32 {
        self.config.n
    }

    pub fn temperature(&self) -> f32 {
        self.config.temperature
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn new_session(&self) -> Session {
        Session::new()
    }

    /// Create a session and let `init` set it up (enable auto-sync, seed a
    /// system prompt, ...)
    pub fn new_session_with<F>(&self, init: F) -> chatline_core::Result<Session>
    where
        F: FnOnce(&mut Session) -> chatline_core::Result<()>,
    {
        let mut session = Session::new();
        init(&mut session)?;
        Ok(session)
    }

    pub fn new_message(&self, role: impl Into<String>) -> Message {
        Message::new(role)
    }

    pub fn new_message_with<F>(&self, role: impl Into<String>, build: F) -> Message
    where
        F: FnOnce(Message) -> Message,
    {
        build(Message::new(role))
    }

    pub fn new_request(&self) -> Request<'_> {
        Request::new(self)
    }

    /// Build a request with `build`, then prepare and run it
    pub fn send<'a, F>(&'a self, build: F) -> Response
    where
        F: FnOnce(Request<'a>) -> Request<'a>,
    {
        let mut request = build(self.new_request());
        request.prepare().run()
    }
}
