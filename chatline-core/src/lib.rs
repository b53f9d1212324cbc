//! Core types for chatline
//!
//! This crate provides the conversation model (messages and sessions with
//! optional JSONL auto-sync), configuration discovery and resolution, and
//! logging setup shared by the other chatline crates.

pub mod attachment;
pub mod config;
pub mod error;
pub mod jsonl;
pub mod logging;
pub mod session;

pub use config::{ClientOptions, Config};
pub use error::{Error, Result};
pub use session::{Content, ContentPart, Message, MessageRecord, Session};
