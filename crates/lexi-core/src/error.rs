//! Error types for lexi-core

use thiserror::Error;

/// Error type for configuration values handed to the core primitives.
///
/// Response parsing never produces this error: malformed search responses
/// degrade to defaults or to an empty result list instead.
#[derive(Debug, Error)]
pub enum CoreError {
	/// A result schema could not be parsed
	#[error("Invalid result schema: {0}")]
	InvalidSchema(#[source] serde_json::Error),

	/// A delay attribute was not a non-negative integer
	#[error("Invalid delay: {0}")]
	InvalidDelay(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Parses a millisecond delay such as `"250"` or `" 250ms "`.
pub fn parse_delay_ms(value: &str) -> Result<u32> {
	let trimmed = crate::text::trim_str(value);
	let digits = trimmed.strip_suffix("ms").unwrap_or(trimmed);
	digits
		.parse::<u32>()
		.map_err(|_| CoreError::InvalidDelay(value.to_string()))
}
