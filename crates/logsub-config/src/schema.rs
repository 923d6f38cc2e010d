//! JSON schema for the per-function `logSubscription` property
//!
//! Hosts that validate function properties register this schema so a
//! malformed override is caught before synthesis.

use crate::settings::UnitOverride;
use schemars::schema::RootSchema;

/// Name of the function property the override lives under
pub const FUNCTION_PROPERTY: &str = "logSubscription";

/// Schema of the per-function override
#[must_use]
pub fn unit_override_schema() -> RootSchema {
    schemars::schema_for!(UnitOverride)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_accepts_boolean_or_object() {
        let schema = serde_json::to_value(unit_override_schema()).unwrap();
        let any_of = schema["anyOf"].as_array().expect("untagged schema");
        assert_eq!(any_of.len(), 2);
        assert_eq!(any_of[0]["type"], "boolean");

        let text = schema.to_string();
        assert!(text.contains("destinationArn"));
        assert!(text.contains("apiGatewayLogs"));
        assert!(!text.contains("addSourceLambdaPermission"));
    }
}
