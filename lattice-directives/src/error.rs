//! Error types for directive binding.
//!
//! Binding errors are template authoring mistakes: they are raised
//! synchronously when a directive is bound, before the element is touched.
//! Failures inside user handlers are a different thing entirely and travel
//! as [`HandlerError`] to the hosting component's error sink.

use thiserror::Error;

/// Error returned by user-supplied event handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DirectiveError>;

/// Errors raised while binding a directive to an element.
#[derive(Debug, Error)]
pub enum DirectiveError {
    /// The directive is not allowed on this tag. `alternative` names the
    /// directive the template author most likely meant.
    #[error("[{directive}] cannot be used on <{tag}>, use [{alternative}]")]
    WrongTag {
        directive: &'static str,
        tag: String,
        alternative: &'static str,
    },

    /// The directive received a value of the wrong shape.
    #[error("[{directive}] expects {expected}")]
    InvalidValue {
        directive: &'static str,
        expected: &'static str,
    },

    /// No binder is registered under this attribute name.
    #[error("no directive registered as [{0}]")]
    UnknownDirective(String),

    /// The process-wide registry can only be installed once.
    #[error("a global directive registry is already installed")]
    AlreadyInstalled,

    /// Configuration could not be parsed.
    #[error("invalid directive configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl DirectiveError {
    /// True for errors caused by using a directive on the wrong element.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::WrongTag { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_tag_names_the_alternative() {
        let error = DirectiveError::WrongTag {
            directive: "ui-value",
            tag: "input".to_string(),
            alternative: "$ui-value",
        };

        assert!(error.is_usage_error());
        assert_eq!(
            error.to_string(),
            "[ui-value] cannot be used on <input>, use [$ui-value]"
        );
    }

    #[test]
    fn unknown_directive_is_not_a_usage_error() {
        let error = DirectiveError::UnknownDirective("ui-drag".to_string());
        assert!(!error.is_usage_error());
    }
}
