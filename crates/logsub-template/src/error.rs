//! Error types for the template model

/// Errors raised while reading or extending a template
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A writer tried to declare a logical id that is already taken
    #[error("logical id {logical_id} is already declared as {existing_type}")]
    DuplicateLogicalId {
        /// The contested logical id
        logical_id: String,
        /// Type of the resource already holding the id
        existing_type: String,
    },

    /// Properties did not serialize to a JSON object
    #[error("properties for {resource_type} must serialize to an object")]
    PropertiesNotObject {
        /// Resource type the properties were meant for
        resource_type: String,
    },

    /// Template (de)serialization failed
    #[error("template encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl TemplateError {
    /// Create duplicate logical id error
    pub fn duplicate(logical_id: impl Into<String>, existing_type: impl Into<String>) -> Self {
        Self::DuplicateLogicalId {
            logical_id: logical_id.into(),
            existing_type: existing_type.into(),
        }
    }
}
