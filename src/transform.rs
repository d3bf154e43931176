//! Normalization of raw input text into query values.

use crate::error::Result;
use std::sync::Arc;

/// Normalized contents of the search input.
pub type QueryValue = String;

/// Caller-supplied pure normalization. An `Err` is a defect and ends the sequence.
pub type TransformFn = Arc<dyn Fn(&str) -> Result<QueryValue> + Send + Sync>;

/// Built-in transforms selectable from configuration or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum TransformKind {
    /// Pass the raw text through untouched.
    Identity,
    /// Strip leading and trailing whitespace.
    #[default]
    Trim,
}

impl TransformKind {
    pub fn into_fn(self) -> TransformFn {
        match self {
            TransformKind::Identity => Arc::new(|raw: &str| Ok(raw.to_string())),
            TransformKind::Trim => default_transform(),
        }
    }
}

impl std::str::FromStr for TransformKind {
    type Err = crate::error::QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "identity" | "none" => Ok(TransformKind::Identity),
            "trim" => Ok(TransformKind::Trim),
            other => Err(crate::error::QueryError::invalid_argument(format!(
                "unknown transform '{}', expected 'identity' or 'trim'",
                other
            ))),
        }
    }
}

/// Transform used when the caller does not supply one.
pub fn default_transform() -> TransformFn {
    Arc::new(|raw: &str| Ok(raw.trim().to_string()))
}
