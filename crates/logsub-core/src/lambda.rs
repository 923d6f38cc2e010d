//! Per-function subscription synthesis
//!
//! For one function and one layer, emits a subscription filter on the
//! function's log group and, when the destination is a Lambda function, the
//! permission that lets the logs service invoke it.

use crate::error::{SynthesisError, UnsupportedConfigError};
use crate::log_group::resolve_log_group_name;
use crate::naming::FunctionIds;
use crate::properties::{PermissionProperties, SubscriptionFilterProperties};
use crate::reference::{dependencies_of, is_directly_invocable};
use logsub_config::EffectiveConfig;
use logsub_template::{resource_types, Intrinsic, Resource, ResourceGraph};
use tracing::debug;

/// Flag retired in favour of `addLambdaPermission`
pub const RETIRED_SOURCE_PERMISSION_FLAG: &str = "addSourceLambdaPermission";

/// One function as seen by the synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionTarget<'a> {
    /// Function name as configured
    pub function_name: &'a str,
    /// Canonical name from the host naming service
    pub normalized_name: &'a str,
    /// Layer suffix, empty for the single form
    pub suffix: &'a str,
}

/// What was emitted for one function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSubgraph {
    /// Subscription filter logical id
    pub subscription_filter: String,
    /// Permission logical id, if one was emitted
    pub permission: Option<String>,
}

/// Synthesize the subgraph for one function
///
/// Returns `None` when the effective config is disabled.
///
/// # Errors
/// - `UnsupportedConfigError::RetiredFlag` if `addSourceLambdaPermission` is set
/// - `UnsupportedConfigError::MissingDestination` if no `destinationArn` is configured
/// - `LogGroupError` if the function's log group is missing or malformed
/// - `ReferenceError` if the destination references an undeclared resource
/// - `TemplateError::DuplicateLogicalId` if an emitted id is already taken
pub fn synthesize_function(
    graph: &mut ResourceGraph,
    target: FunctionTarget<'_>,
    config: &EffectiveConfig,
    region: &str,
) -> Result<Option<FunctionSubgraph>, SynthesisError> {
    if !config.enabled {
        debug!(function = %target.function_name, "Log subscription disabled");
        return Ok(None);
    }

    if config.add_source_lambda_permission {
        return Err(UnsupportedConfigError::RetiredFlag {
            flag: RETIRED_SOURCE_PERMISSION_FLAG,
        }
        .into());
    }

    let destination = config.destination_arn.as_ref().ok_or_else(|| {
        UnsupportedConfigError::MissingDestination {
            unit: target.function_name.to_string(),
        }
    })?;

    let mut depends_on = dependencies_of(destination);
    let ids = FunctionIds::new(target.normalized_name, target.suffix);
    let log_group_name = resolve_log_group_name(graph, &ids.log_group)?;

    let mut permission = None;
    if config.add_lambda_permission && is_directly_invocable(destination, graph)? {
        let properties = PermissionProperties::invoke(
            destination.to_value(),
            region,
            Intrinsic::get_att(&ids.log_group, "Arn").into(),
        );
        let resource =
            Resource::new(resource_types::LAMBDA_PERMISSION).with_properties(&properties)?;
        graph.insert_new(&ids.permission, resource)?;
        depends_on.push(ids.permission.clone());
        permission = Some(ids.permission);
    }

    depends_on.push(ids.log_group);
    debug!(
        function = %target.function_name,
        depends_on = ?depends_on,
        "Emitting subscription filter"
    );

    let properties = SubscriptionFilterProperties {
        destination_arn: destination.to_value(),
        filter_pattern: config.filter_pattern.clone(),
        log_group_name,
        filter_name: config.filter_name.clone(),
        role_arn: config.role_arn.clone(),
    };
    let filter = Resource::new(resource_types::SUBSCRIPTION_FILTER)
        .with_properties(&properties)?
        .with_depends_on(depends_on);
    graph.insert_new(&ids.subscription_filter, filter)?;

    Ok(Some(FunctionSubgraph {
        subscription_filter: ids.subscription_filter,
        permission,
    }))
}
