//! Configuration validation rules.

use super::schema::Config;

/// Validate a resolved configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.max_tokens == 0 {
        errors.push("openai.params.max_tokens must be > 0".to_string());
    }
    if config.n == 0 {
        errors.push("openai.params.n must be > 0".to_string());
    }
    if !(0.0..=2.0).contains(&config.temperature) {
        errors.push("openai.params.temperature must be in [0.0, 2.0]".to_string());
    }
    if config.endpoint.trim().is_empty() {
        errors.push("openai.endpoint must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}
