//! Property shapes of the emitted resources
//!
//! Field names are what downstream deployment tooling reads, so they are
//! fixed here once. Optional properties are left out entirely when unset.

use serde::Serialize;
use serde_json::Value;

/// Action granted by every invoke permission
pub const INVOKE_ACTION: &str = "lambda:InvokeFunction";

/// Logs service principal for a region
///
/// China regions live in their own partition with a distinct domain.
#[must_use]
pub fn logs_principal(region: &str) -> String {
    let domain = if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    format!("logs.{region}.{domain}")
}

/// `AWS::Logs::SubscriptionFilter` properties
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionFilterProperties {
    /// Literal ARN or intrinsic
    pub destination_arn: Value,
    /// Empty matches every event
    pub filter_pattern: String,
    /// Name string or intrinsic
    pub log_group_name: Value,
    /// Explicit filter name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_name: Option<String>,
    /// Delivery role, literal or intrinsic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<Value>,
}

/// `AWS::Lambda::Permission` properties
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PermissionProperties {
    /// Always [`INVOKE_ACTION`]
    pub action: &'static str,
    /// The destination; an ARN is accepted as a function name
    pub function_name: Value,
    /// Logs service principal
    pub principal: String,
    /// Log group allowed to invoke
    pub source_arn: Value,
}

impl PermissionProperties {
    /// Allow the logs service in `region` to invoke `function_name` for `source_arn`
    #[must_use]
    pub fn invoke(function_name: Value, region: &str, source_arn: Value) -> Self {
        Self {
            action: INVOKE_ACTION,
            function_name,
            principal: logs_principal(region),
            source_arn,
        }
    }
}

/// `AWS::Logs::LogGroup` properties
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogGroupProperties {
    /// Name string or intrinsic
    pub log_group_name: Value,
}
