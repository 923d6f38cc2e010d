//! Destination reference resolution
//!
//! Derives the local dependency a destination implies and whether the
//! destination is a Lambda function the logs service can be allowed to
//! invoke.

use crate::error::ReferenceError;
use logsub_config::Destination;
use logsub_template::{resource_types, ResourceGraph};

/// Logical id a destination depends on, if it points into the template
///
/// Only `Fn::GetAtt` on the `Arn` attribute (any case) and `Ref` count;
/// literal ARNs and other attributes carry no local dependency.
#[must_use]
pub fn extract_dependency(destination: &Destination) -> Option<&str> {
    match destination {
        Destination::Literal(_) => None,
        Destination::GetAtt {
            logical_id,
            attribute,
        } if attribute.eq_ignore_ascii_case("arn") => Some(logical_id.as_str()),
        Destination::GetAtt { .. } => None,
        Destination::Ref(logical_id) => Some(logical_id.as_str()),
    }
}

/// Dependency list seeded from a destination
#[must_use]
pub fn dependencies_of(destination: &Destination) -> Vec<String> {
    extract_dependency(destination)
        .map(|id| vec![id.to_string()])
        .unwrap_or_default()
}

/// Whether a literal ARN names a Lambda function in any AWS partition
#[must_use]
pub fn is_lambda_arn(arn: &str) -> bool {
    let mut parts = arn.splitn(4, ':');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some("arn"), Some(partition), Some("lambda")) if partition.starts_with("aws")
    )
}

/// Whether the destination is a Lambda function
///
/// Literal ARNs are judged by prefix. References are judged by the
/// declared type of the referenced resource.
///
/// # Errors
/// - `ReferenceError::UnresolvedReference` if the destination references a
///   logical id the graph does not declare
pub fn is_directly_invocable(
    destination: &Destination,
    graph: &ResourceGraph,
) -> Result<bool, ReferenceError> {
    if let Destination::Literal(arn) = destination {
        return Ok(is_lambda_arn(arn));
    }

    let Some(logical_id) = extract_dependency(destination) else {
        return Ok(false);
    };

    graph
        .resource_type(logical_id)
        .map(|resource_type| resource_type == resource_types::LAMBDA_FUNCTION)
        .ok_or_else(|| ReferenceError::UnresolvedReference {
            logical_id: logical_id.to_string(),
        })
}
