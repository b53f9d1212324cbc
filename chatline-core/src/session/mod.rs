//! Conversation sessions
//!
//! A session is an ordered log of serialized messages that can mirror
//! itself, one JSON record per line, to a history file.

pub mod message;
pub mod store;

pub use message::{
    Content, ContentPart, ImagePart, ImageUrl, Message, MessageRecord, TextPart, TypedPart,
};
pub use store::Session;
