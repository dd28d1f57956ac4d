//! Parsing error types for listing extraction
//!
//! Field-level absence is never an error; these cover the cases where a whole
//! page cannot be processed.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid pattern: {pattern} - {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No valid selectors for '{field}'")]
    NoSelectors { field: String },

    #[error("Empty document received for {platform}")]
    EmptyDocument { platform: String },
}

impl ParsingError {
    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Configuration problems surface at construction time and never recover
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSelector { .. } | Self::InvalidPattern { .. } | Self::NoSelectors { .. }
        )
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
