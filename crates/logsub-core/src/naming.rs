//! Logical id and stack naming
//!
//! The host template compiler owns naming; the engine only asks. Ids the
//! engine derives itself are built here from the host's answers so every
//! synthesizer agrees on them.

/// Naming service provided by the host
pub trait Naming: Send + Sync {
    /// Canonical identifier for a function name
    fn normalized_function_name(&self, function_name: &str) -> String;

    /// Name of the deployed stack
    fn stack_name(&self) -> String;

    /// Logical id of the REST API resource
    fn rest_api_logical_id(&self) -> String;

    /// Logical id of the gateway's access log group
    fn api_gateway_log_group_logical_id(&self) -> String;

    /// Logical id of the deployment resource for one build instance
    fn api_gateway_deployment_logical_id(&self, instance_id: &str) -> String;
}

/// Serverless-style AWS naming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsNaming {
    service: String,
    stage: String,
}

impl AwsNaming {
    /// Create naming for a service deployed to a stage
    #[inline]
    #[must_use]
    pub fn new(service: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            stage: stage.into(),
        }
    }
}

impl Naming for AwsNaming {
    fn normalized_function_name(&self, function_name: &str) -> String {
        let escaped = function_name.replace('-', "Dash").replace('_', "Underscore");
        capitalize(&escaped)
    }

    fn stack_name(&self) -> String {
        format!("{}-{}", self.service, self.stage)
    }

    fn rest_api_logical_id(&self) -> String {
        "ApiGatewayRestApi".to_string()
    }

    fn api_gateway_log_group_logical_id(&self) -> String {
        "ApiGatewayLogGroup".to_string()
    }

    fn api_gateway_deployment_logical_id(&self, instance_id: &str) -> String {
        format!("ApiGatewayDeployment{instance_id}")
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Logical ids for one function's subgraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionIds {
    /// `{name}SubscriptionFilter{suffix}`
    pub subscription_filter: String,
    /// `{name}LogGroup`, declared by the host
    pub log_group: String,
    /// `{name}LogLambdaPermission{suffix}`
    pub permission: String,
}

impl FunctionIds {
    /// Derive ids from a normalized function name and layer suffix
    #[must_use]
    pub fn new(normalized_name: &str, suffix: &str) -> Self {
        Self {
            subscription_filter: format!("{normalized_name}SubscriptionFilter{suffix}"),
            log_group: format!("{normalized_name}LogGroup"),
            permission: format!("{normalized_name}LogLambdaPermission{suffix}"),
        }
    }
}

/// Logical ids for the gateway subgraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayIds {
    /// Shared execution log group, never suffixed
    pub execution_log_group: String,
    /// Permission scoped to the access log group
    pub access_permission: String,
    /// Permission scoped to the execution log group
    pub execution_permission: String,
    /// Access log subscription filter
    pub access_filter: String,
    /// Execution log subscription filter
    pub execution_filter: String,
}

impl GatewayIds {
    /// Id of the shared execution log group
    pub const EXECUTION_LOG_GROUP: &'static str = "ApiGatewayExecutionLogGroup";

    /// Derive ids for a layer suffix
    #[must_use]
    pub fn new(suffix: &str) -> Self {
        Self {
            execution_log_group: Self::EXECUTION_LOG_GROUP.to_string(),
            access_permission: format!("ApiGatewayLogGroupLambdaPermission{suffix}"),
            execution_permission: format!("ApiGatewayExecutionLogGroupLambdaPermission{suffix}"),
            access_filter: format!("ApiGatewayAccessLogGroupSubscriptionFilter{suffix}"),
            execution_filter: format!("ApiGatewayExecutionLogGroupSubscriptionFilter{suffix}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn aws_naming_normalizes_like_the_host() {
        let naming = AwsNaming::new("orders", "prod");
        assert_eq!(naming.normalized_function_name("create"), "Create");
        assert_eq!(naming.normalized_function_name("get-order"), "GetDashorder");
        assert_eq!(naming.normalized_function_name("list_all"), "ListUnderscoreall");
        assert_eq!(naming.stack_name(), "orders-prod");
        assert_eq!(
            naming.api_gateway_deployment_logical_id("1234"),
            "ApiGatewayDeployment1234"
        );
    }

    #[test]
    fn function_ids() {
        let single = FunctionIds::new("A", "");
        assert_eq!(single.subscription_filter, "ASubscriptionFilter");
        assert_eq!(single.log_group, "ALogGroup");
        assert_eq!(single.permission, "ALogLambdaPermission");

        let indexed = FunctionIds::new("A", "1");
        assert_eq!(indexed.subscription_filter, "ASubscriptionFilter1");
        assert_eq!(indexed.log_group, "ALogGroup");
        assert_eq!(indexed.permission, "ALogLambdaPermission1");
    }

    #[test]
    fn gateway_ids_share_execution_group() {
        assert_eq!(
            GatewayIds::new("0").execution_log_group,
            GatewayIds::new("1").execution_log_group
        );
        assert_ne!(
            GatewayIds::new("0").execution_filter,
            GatewayIds::new("1").execution_filter
        );
    }

    proptest! {
        #[test]
        fn prop_filter_ids_never_collide(
            a in "[A-Z][A-Za-z0-9]{0,12}",
            b in "[A-Z][A-Za-z0-9]{0,12}",
            i in 0usize..50,
            j in 0usize..50,
        ) {
            prop_assume!(a != b);
            let left = FunctionIds::new(&a, &i.to_string());
            let right = FunctionIds::new(&b, &j.to_string());
            prop_assert_ne!(left.subscription_filter, right.subscription_filter);
            prop_assert_ne!(left.permission, right.permission);
        }

        #[test]
        fn prop_suffixes_separate_one_unit(
            a in "[A-Z][A-Za-z0-9]{0,12}",
            i in 0usize..50,
            j in 0usize..50,
        ) {
            prop_assume!(i != j);
            let left = FunctionIds::new(&a, &i.to_string());
            let right = FunctionIds::new(&a, &j.to_string());
            prop_assert_ne!(left.subscription_filter, right.subscription_filter);
        }
    }
}
