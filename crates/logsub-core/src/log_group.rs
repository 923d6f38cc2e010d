//! Log group validation
//!
//! A unit's log group is declared by the host compiler under
//! `{name}LogGroup`. Synthesis for the unit cannot proceed without it.

use crate::error::LogGroupError;
use logsub_template::{resource_types, ResourceGraph};
use serde_json::Value;

/// Declared `LogGroupName` of a log group resource
///
/// The name is usually a string but may be an intrinsic; it is returned
/// as declared. `null`, `false` and empty strings count as unset.
///
/// # Errors
/// - `LogGroupError::NotFound` if nothing is declared under `logical_id`
/// - `LogGroupError::WrongType` if the resource is not a log group
/// - `LogGroupError::MissingName` if no name is declared
pub fn resolve_log_group_name(
    graph: &ResourceGraph,
    logical_id: &str,
) -> Result<Value, LogGroupError> {
    let resource = graph.get(logical_id).ok_or_else(|| LogGroupError::NotFound {
        logical_id: logical_id.to_string(),
    })?;

    if !resource.is_type(resource_types::LOG_GROUP) {
        return Err(LogGroupError::WrongType {
            logical_id: logical_id.to_string(),
            expected: resource_types::LOG_GROUP,
            found: resource.resource_type.clone(),
        });
    }

    match resource.property("LogGroupName") {
        None | Some(Value::Null | Value::Bool(false)) => Err(missing_name(logical_id)),
        Some(Value::String(name)) if name.is_empty() => Err(missing_name(logical_id)),
        Some(name) => Ok(name.clone()),
    }
}

fn missing_name(logical_id: &str) -> LogGroupError {
    LogGroupError::MissingName {
        logical_id: logical_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsub_template::Resource;
    use serde_json::json;

    fn with(resource: Resource) -> ResourceGraph {
        let mut graph = ResourceGraph::new();
        graph.insert_new("AFunctionLogGroup", resource).unwrap();
        graph
    }

    #[test]
    fn missing_resource() {
        let err = resolve_log_group_name(&ResourceGraph::new(), "AFunctionLogGroup").unwrap_err();
        assert_eq!(err.to_string(), "Could not find log group resource AFunctionLogGroup");
    }

    #[test]
    fn wrong_type() {
        let err = resolve_log_group_name(&with(Resource::new("SomethingWrong")), "AFunctionLogGroup")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected AFunctionLogGroup to have a Type of AWS::Logs::LogGroup but got SomethingWrong"
        );
    }

    #[test]
    fn missing_properties() {
        let err = resolve_log_group_name(
            &with(Resource::new(resource_types::LOG_GROUP)),
            "AFunctionLogGroup",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "AFunctionLogGroup did not have Properties.LogGroupName");
    }

    #[test]
    fn missing_name_property() {
        let resource = Resource::new(resource_types::LOG_GROUP).with_property("RetentionInDays", 7);
        let err = resolve_log_group_name(&with(resource), "AFunctionLogGroup").unwrap_err();
        assert!(matches!(err, LogGroupError::MissingName { .. }));

        let empty = Resource::new(resource_types::LOG_GROUP).with_property("LogGroupName", "");
        assert!(resolve_log_group_name(&with(empty), "AFunctionLogGroup").is_err());
    }

    #[test]
    fn returns_declared_name() {
        let resource =
            Resource::new(resource_types::LOG_GROUP).with_property("LogGroupName", "/aws/lambda/a");
        assert_eq!(
            resolve_log_group_name(&with(resource), "AFunctionLogGroup").unwrap(),
            json!("/aws/lambda/a")
        );
    }

    #[test]
    fn intrinsic_name_passes_through() {
        let name = json!({ "Fn::Sub": "/aws/lambda/${AWS::StackName}-a" });
        let resource =
            Resource::new(resource_types::LOG_GROUP).with_property("LogGroupName", name.clone());
        assert_eq!(
            resolve_log_group_name(&with(resource), "AFunctionLogGroup").unwrap(),
            name
        );
    }
}
