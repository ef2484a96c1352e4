//! Manifest loading and validation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ManifestError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("invalid arch '{value}', expected one of: {allowed}")]
    InvalidArch { value: String, allowed: String },

    #[error("failed to parse manifest: {message}")]
    Parse { message: String },
}

impl From<serde_json::Error> for ManifestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

impl UserFacingError for ManifestError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { .. } => {
                Some("The manifest must define `name`, `version` and `files`.")
            }
            Self::InvalidArch { .. } => Some("Set `arch` to one of the listed values or omit it."),
            Self::Parse { .. } => Some("Check that the manifest is a valid JSON object."),
            Self::InvalidField { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::MissingField { .. } => "manifest.missing_field",
            Self::InvalidField { .. } => "manifest.invalid_field",
            Self::InvalidArch { .. } => "manifest.invalid_arch",
            Self::Parse { .. } => "manifest.parse",
        };
        Some(code)
    }
}
