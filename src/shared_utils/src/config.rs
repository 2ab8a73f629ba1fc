use thiserror::Error;

/// Errors related to application configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but its value cannot be used.
    #[error("Invalid value for environment variable {name}: {value:?}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Value as found in the environment.
        value: String,
    },
}
