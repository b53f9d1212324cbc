//! Chat completion requests for chatline
//!
//! [`Client`] hands out [`Request`]s that snapshot a session, perform one
//! blocking exchange with the completions endpoint and answer with a sealed
//! [`Response`].

pub mod base;
pub mod client;
pub mod http;
pub mod request;
pub mod response;

pub use base::{HttpReply, RequestError, RequestResult, Transport};
pub use client::Client;
pub use http::HttpTransport;
pub use request::{normalize_completion, Payload, Request};
pub use response::{Response, ResponseBuilder};
