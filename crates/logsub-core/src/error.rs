//! Error types for the synthesis engine
//!
//! Every error is fatal to the whole synthesis call. There is no per-unit
//! isolation: a half-written template is never handed downstream.
//!
//! - [`LogGroupError`]: the pre-existing log group for a unit is missing or malformed
//! - [`UnsupportedConfigError`]: configuration the engine refuses to act on
//! - [`ReferenceError`]: a destination names a resource the template lacks
//! - [`StateQueryError`]: the deployment-state lookup failed, carried verbatim
//! - [`SynthesisError`]: all of the above plus template insertion conflicts

use logsub_template::TemplateError;

/// Validation failures for a unit's log group
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogGroupError {
    /// No resource under the expected logical id
    #[error("Could not find log group resource {logical_id}")]
    NotFound {
        /// Expected logical id
        logical_id: String,
    },

    /// Resource exists but is not a log group
    #[error("Expected {logical_id} to have a Type of {expected} but got {found}")]
    WrongType {
        /// Offending logical id
        logical_id: String,
        /// Required type
        expected: &'static str,
        /// Declared type
        found: String,
    },

    /// Log group declares no name
    #[error("{logical_id} did not have Properties.LogGroupName")]
    MissingName {
        /// Offending logical id
        logical_id: String,
    },
}

impl LogGroupError {
    /// Logical id the error is about
    #[must_use]
    pub fn logical_id(&self) -> &str {
        match self {
            Self::NotFound { logical_id }
            | Self::WrongType { logical_id, .. }
            | Self::MissingName { logical_id } => logical_id,
        }
    }
}

/// Configuration the engine will not synthesize
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedConfigError {
    /// A retired flag is still set
    #[error("{flag} is no longer supported, see README")]
    RetiredFlag {
        /// Flag name as written in configuration
        flag: &'static str,
    },

    /// Subscription enabled with nowhere to deliver
    #[error("log subscription for {unit} is enabled but has no destinationArn")]
    MissingDestination {
        /// Function name, or the gateway
        unit: String,
    },
}

/// Reference resolution failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    /// Destination references a logical id the template does not declare
    #[error("destinationArn references {logical_id}, which is not declared in the template")]
    UnresolvedReference {
        /// Referenced logical id
        logical_id: String,
    },
}

/// Failure reported by the external stack lookup
///
/// The message is carried exactly as the lookup produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StateQueryError {
    /// Message as reported
    pub message: String,
}

impl StateQueryError {
    /// Create from a message
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Whether the message reports a stack that was never created
    #[inline]
    #[must_use]
    pub fn is_stack_missing(&self) -> bool {
        self.message.contains("does not exist")
    }
}

/// Top-level synthesis error
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// Log group validation failed
    #[error(transparent)]
    LogGroup(#[from] LogGroupError),

    /// Unsupported configuration
    #[error(transparent)]
    UnsupportedConfig(#[from] UnsupportedConfigError),

    /// Destination reference could not be resolved
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Deployment-state lookup failed
    #[error(transparent)]
    ExternalState(#[from] StateQueryError),

    /// Template could not be extended
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl SynthesisError {
    /// Operator-fixable template or configuration problem
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::LogGroup(_) | Self::UnsupportedConfig(_) | Self::Reference(_) | Self::Template(_)
        )
    }

    /// Failure of an external collaborator; retrying the build may help
    #[inline]
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::ExternalState(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_group_messages() {
        let not_found = LogGroupError::NotFound {
            logical_id: "AFunctionLogGroup".to_string(),
        };
        assert_eq!(
            not_found.to_string(),
            "Could not find log group resource AFunctionLogGroup"
        );

        let wrong = LogGroupError::WrongType {
            logical_id: "AFunctionLogGroup".to_string(),
            expected: "AWS::Logs::LogGroup",
            found: "SomethingWrong".to_string(),
        };
        assert_eq!(
            wrong.to_string(),
            "Expected AFunctionLogGroup to have a Type of AWS::Logs::LogGroup but got SomethingWrong"
        );
        assert_eq!(wrong.logical_id(), "AFunctionLogGroup");
    }

    #[test]
    fn retired_flag_points_at_docs() {
        let err = UnsupportedConfigError::RetiredFlag {
            flag: "addSourceLambdaPermission",
        };
        assert_eq!(
            err.to_string(),
            "addSourceLambdaPermission is no longer supported, see README"
        );
    }

    #[test]
    fn state_error_is_verbatim() {
        let err: SynthesisError = StateQueryError::new("access denied").into();
        assert_eq!(err.to_string(), "access denied");
        assert!(err.is_external());
        assert!(!err.is_validation());
    }

    #[test]
    fn stack_missing_classification() {
        assert!(StateQueryError::new("Stack with id x does not exist").is_stack_missing());
        assert!(!StateQueryError::new("Throttling: Rate exceeded").is_stack_missing());
    }
}
