//! Error types for configuration loading

/// Errors while decoding configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Destination value has none of the recognised shapes
    #[error("invalid destinationArn: {0}")]
    InvalidDestination(String),

    /// A value had the wrong JSON kind for its key
    #[error("invalid {key}: expected {expected}, got {actual}")]
    InvalidShape {
        /// Offending key
        key: &'static str,
        /// What the key accepts
        expected: &'static str,
        /// JSON kind found
        actual: &'static str,
    },

    /// A settings object failed to decode
    #[error("invalid logSubscription: {0}")]
    InvalidSettings(#[source] serde_json::Error),

    /// Service definition is not valid YAML
    #[error("invalid service definition yaml: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Service definition is not valid JSON
    #[error("invalid service definition json: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl ConfigError {
    /// Create a shape mismatch error
    pub(crate) fn shape(key: &'static str, expected: &'static str, actual: &serde_json::Value) -> Self {
        Self::InvalidShape {
            key,
            expected,
            actual: json_kind(actual),
        }
    }
}

/// Human name of a JSON value's kind
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
