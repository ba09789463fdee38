use std::sync::Arc;

/// Represents a result type for operations in the GrowthBook SDK.
///
/// This type alias is used throughout the SDK to indicate the result of operations that may return
/// errors specific to the GrowthBook SDK.
///
/// This `Result` type is a standard Rust `Result` type where the error variant is defined by the
/// GrowthBook-specific [`Error`] enum.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing possible errors that can occur in the GrowthBook SDK.
///
/// Evaluation itself never fails. Errors only come from loading a configuration.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Error parsing configuration. The payload is not valid JSON or doesn't have the expected
    /// shape at the top level. Individual features and rules that fail to parse don't cause this
    /// error: they are skipped instead.
    #[error("error parsing configuration")]
    ConfigurationParseError(#[source] Arc<serde_json::Error>),

    /// Indicates that an I/O error occurred while reading configuration.
    // std::io::Error is not clonable, so we're wrapping it in an Arc.
    #[error(transparent)]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        if value.is_io() {
            Self::Io(Arc::new(value.into()))
        } else {
            Self::ConfigurationParseError(Arc::new(value))
        }
    }
}
