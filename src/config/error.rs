use std::net::AddrParseError;

use thiserror::Error;

/// Errors raised while loading or validating the configuration.
///
/// All of them are fatal: the process must not start serving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "one or more Podio environment variables are not set: {}. Check your .env file",
        .0.join(", ")
    )]
    MissingVariables(Vec<&'static str>),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),

    #[error("invalid logging.{field} '{value}'. Valid values: {expected}")]
    InvalidLogging {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("invalid bind_address '{address}': {source}")]
    InvalidBindAddress {
        address: String,
        source: AddrParseError,
    },
}
