//! Configuration management
//!
//! Discovers `.openai.yaml` by walking up from a start directory and
//! resolves it, together with explicit client options, into a [`Config`].

pub mod loader;
pub mod schema;
pub mod validate;

pub use loader::{load_configuration, ClientOptions, ConfigLoader, CONFIG_FILE_NAME};
pub use schema::*;
