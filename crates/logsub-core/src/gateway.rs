//! API Gateway subscription synthesis
//!
//! The gateway writes two log streams: access logs into a log group the
//! host declares, and execution logs into a group AWS creates on first use
//! and never deletes. Which resources are emitted is decided up front by
//! [`GatewayPlan`]:
//!
//! | logging mode (setting ∩ layer) | deployed | execution log group | filters          |
//! |--------------------------------|----------|---------------------|------------------|
//! | none                           | -        | -                   | none             |
//! | access                         | any      | -                   | access           |
//! | execution                      | no       | declared (Retain)   | execution        |
//! | execution                      | yes      | assumed present     | execution        |
//! | access + execution             | no       | declared (Retain)   | access+execution |
//! | access + execution             | yes      | assumed present     | access+execution |
//!
//! The layer form only changes the suffix; the execution log group is
//! shared and declared at most once.

use crate::error::{SynthesisError, UnsupportedConfigError};
use crate::naming::GatewayIds;
use crate::properties::{LogGroupProperties, PermissionProperties, SubscriptionFilterProperties};
use crate::reference::{dependencies_of, is_directly_invocable};
use logsub_config::{ApiGatewayLogs, Destination, EffectiveConfig, GatewayLogsSetting};
use logsub_template::{resource_types, Intrinsic, Resource, ResourceGraph};
use serde_json::Value;
use tracing::debug;

/// Unit name used in errors about the gateway
pub const GATEWAY_UNIT: &str = "API Gateway";

/// Resources to emit for one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayPlan {
    /// Subscribe the access log group
    pub access: bool,
    /// Subscribe the execution log group
    pub execution: bool,
    /// Declare the retained execution log group
    pub declare_execution_log_group: bool,
}

impl GatewayPlan {
    /// Logging modes both the gateway setting and the layer ask for
    #[inline]
    #[must_use]
    pub fn active_modes(setting: GatewayLogsSetting, requested: ApiGatewayLogs) -> ApiGatewayLogs {
        setting.modes().intersect(requested)
    }

    /// Apply the decision table to the active modes
    #[must_use]
    pub fn decide(modes: ApiGatewayLogs, deployed: bool) -> Self {
        Self {
            access: modes.access,
            execution: modes.execution,
            declare_execution_log_group: modes.execution && !deployed,
        }
    }

    /// Nothing to emit
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.access && !self.execution
    }
}

/// Host-provided ids and deployment coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayContext<'a> {
    /// REST API logical id
    pub rest_api_id: &'a str,
    /// Access log group logical id
    pub access_log_group_id: &'a str,
    /// Deployment logical id for this build instance
    pub deployment_id: &'a str,
    /// Stage name
    pub stage: &'a str,
    /// Region, for the logs principal
    pub region: &'a str,
    /// Layer suffix
    pub suffix: &'a str,
}

impl GatewayContext<'_> {
    /// `API-Gateway-Execution-Logs_${RestApi}/stage`
    #[must_use]
    pub fn execution_log_group_name(&self) -> String {
        format!(
            "API-Gateway-Execution-Logs_${{{}}}/{}",
            self.rest_api_id, self.stage
        )
    }

    /// ARN pattern matching the execution log group's streams
    #[must_use]
    pub fn execution_log_group_arn(&self) -> String {
        format!(
            "arn:${{AWS::Partition}}:logs:${{AWS::Region}}:${{AWS::AccountId}}:log-group:{}:*",
            self.execution_log_group_name()
        )
    }
}

/// What was emitted for the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewaySubgraph {
    /// Access log filter id
    pub access_filter: Option<String>,
    /// Execution log filter id
    pub execution_filter: Option<String>,
    /// Permission ids, access first
    pub permissions: Vec<String>,
    /// The execution log group was declared by this call
    pub declared_execution_log_group: bool,
}

/// Synthesize the gateway subgraph for one layer
///
/// # Errors
/// - `UnsupportedConfigError::MissingDestination` if no `destinationArn` is configured
/// - `ReferenceError` if the destination references an undeclared resource
/// - `TemplateError::DuplicateLogicalId` if an emitted id is already taken
pub fn synthesize_gateway(
    graph: &mut ResourceGraph,
    context: &GatewayContext<'_>,
    config: &EffectiveConfig,
    plan: GatewayPlan,
) -> Result<GatewaySubgraph, SynthesisError> {
    let mut out = GatewaySubgraph::default();
    if plan.is_empty() {
        return Ok(out);
    }

    let destination =
        config
            .destination_arn
            .as_ref()
            .ok_or_else(|| UnsupportedConfigError::MissingDestination {
                unit: GATEWAY_UNIT.to_string(),
            })?;

    let dependencies = dependencies_of(destination);
    let ids = GatewayIds::new(context.suffix);

    if plan.declare_execution_log_group {
        let properties = LogGroupProperties {
            log_group_name: Intrinsic::sub(context.execution_log_group_name()).into(),
        };
        let log_group = Resource::new(resource_types::LOG_GROUP)
            .with_deletion_policy("Retain")
            .with_properties(&properties)?;
        out.declared_execution_log_group =
            graph.insert_if_absent(&ids.execution_log_group, log_group);
    }

    let invocable = config.add_lambda_permission && is_directly_invocable(destination, graph)?;
    let mut access_permission = None;
    let mut execution_permission = None;

    if invocable && plan.access {
        let properties = PermissionProperties::invoke(
            destination.to_value(),
            context.region,
            Intrinsic::get_att(context.access_log_group_id, "Arn").into(),
        );
        graph.insert_new(
            &ids.access_permission,
            Resource::new(resource_types::LAMBDA_PERMISSION).with_properties(&properties)?,
        )?;
        out.permissions.push(ids.access_permission.clone());
        access_permission = Some(ids.access_permission.clone());
    }

    if invocable && plan.execution {
        let properties = PermissionProperties::invoke(
            destination.to_value(),
            context.region,
            Intrinsic::sub(context.execution_log_group_arn()).into(),
        );
        graph.insert_new(
            &ids.execution_permission,
            Resource::new(resource_types::LAMBDA_PERMISSION).with_properties(&properties)?,
        )?;
        out.permissions.push(ids.execution_permission.clone());
        execution_permission = Some(ids.execution_permission.clone());
    }

    if plan.access {
        let mut depends_on = dependencies.clone();
        depends_on.extend(access_permission);
        debug!(depends_on = ?depends_on, "Emitting access log subscription filter");

        let filter = subscription_filter(
            destination,
            config,
            Intrinsic::reference(context.access_log_group_id).into(),
            depends_on,
        )?;
        graph.insert_new(&ids.access_filter, filter)?;
        out.access_filter = Some(ids.access_filter.clone());
    }

    if plan.execution {
        let mut depends_on = dependencies;
        depends_on.extend(execution_permission);
        if graph.contains(&ids.execution_log_group) {
            depends_on.push(ids.execution_log_group.clone());
        }
        depends_on.push(context.deployment_id.to_string());
        debug!(depends_on = ?depends_on, "Emitting execution log subscription filter");

        let filter = subscription_filter(
            destination,
            config,
            Intrinsic::sub(context.execution_log_group_name()).into(),
            depends_on,
        )?;
        graph.insert_new(&ids.execution_filter, filter)?;
        out.execution_filter = Some(ids.execution_filter);
    }

    Ok(out)
}

fn subscription_filter(
    destination: &Destination,
    config: &EffectiveConfig,
    log_group_name: Value,
    depends_on: Vec<String>,
) -> Result<Resource, SynthesisError> {
    let properties = SubscriptionFilterProperties {
        destination_arn: destination.to_value(),
        filter_pattern: config.filter_pattern.clone(),
        log_group_name,
        filter_name: config.filter_name.clone(),
        role_arn: config.role_arn.clone(),
    };
    Ok(Resource::new(resource_types::SUBSCRIPTION_FILTER)
        .with_properties(&properties)?
        .with_depends_on(depends_on))
}
