use std::str::FromStr;

use crate::config::ConfigError;

/// Reads an environment variable, returning a structured error if it's missing.
///
/// An empty value counts as missing, so `DATABASE_URL=` in a `.env` file is
/// reported the same way as an unset variable.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingEnvVar(name.to_string())),
    }
}

/// Reads and parses an optional environment variable.
///
/// Returns `Ok(None)` when the variable is unset or empty, and
/// [`ConfigError::InvalidEnvVar`] when it is set but does not parse.
pub fn parse_env_var<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    let raw = match get_env_var(name) {
        Ok(raw) => raw,
        Err(ConfigError::MissingEnvVar(_)) => return Ok(None),
        Err(e) => return Err(e),
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: raw,
        })
}
