//! CLI error handling

use std::fmt;

use tcpkg_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(tcpkg_errors::ConfigError),
    /// Error from manifest loading or package building
    Build(tcpkg_errors::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => {
                write!(f, "Configuration error: {e}")?;
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::Build(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Build(e) => Some(e),
        }
    }
}

impl From<tcpkg_errors::ConfigError> for CliError {
    fn from(e: tcpkg_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<tcpkg_errors::Error> for CliError {
    fn from(e: tcpkg_errors::Error) -> Self {
        match e {
            tcpkg_errors::Error::Config(e) => CliError::Config(e),
            other => CliError::Build(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcpkg_errors::{ConfigError, Error, ManifestError};

    #[test]
    fn test_config_errors_are_unwrapped() {
        let err: CliError = Error::from(ConfigError::InvalidValue {
            field: "compression_level".to_string(),
            value: "12".to_string(),
        })
        .into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_build_error_shows_code() {
        let err: CliError = Error::from(ManifestError::MissingField {
            field: "version".to_string(),
        })
        .into();
        let text = err.to_string();
        assert!(text.contains("version"));
        assert!(text.contains("Code: manifest."));
    }
}
