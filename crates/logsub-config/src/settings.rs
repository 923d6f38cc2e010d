//! Configuration records as written by the operator
//!
//! Every key is optional here; defaults are applied only when an
//! [`EffectiveConfig`](crate::EffectiveConfig) is resolved.

use crate::destination::Destination;
use crate::error::ConfigError;
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One layer of subscription settings
///
/// Used both for a layer config (global or one element of the sequence
/// form) and for the object form of a per-unit override.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSettings {
    /// Whether subscriptions are emitted
    pub enabled: Option<bool>,

    /// Delivery target: ARN string, `Ref` or `Fn::GetAtt`
    #[schemars(with = "Option<serde_json::Value>")]
    pub destination_arn: Option<Destination>,

    /// CloudWatch Logs filter pattern
    pub filter_pattern: Option<String>,

    /// Explicit subscription filter name
    pub filter_name: Option<String>,

    /// Role CloudWatch Logs assumes to deliver to non-Lambda targets
    ///
    /// A literal ARN or any intrinsic, passed through as written.
    pub role_arn: Option<Value>,

    /// Grant the logs service permission to invoke a Lambda destination
    pub add_lambda_permission: Option<bool>,

    /// API Gateway log modes to subscribe
    #[schemars(with = "Option<ApiGatewayLogsRepr>")]
    pub api_gateway_logs: Option<ApiGatewayLogs>,

    /// Retired flag, rejected at synthesis time
    #[schemars(skip)]
    pub add_source_lambda_permission: Option<bool>,
}

/// Per-unit override attached to a function
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum UnitOverride {
    /// Boolean shorthand for `{ enabled: <bool> }`
    Toggle(bool),
    /// Object merged over the layer config
    Settings(SubscriptionSettings),
}

impl TryFrom<Value> for UnitOverride {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(enabled) => Ok(Self::Toggle(enabled)),
            // A bare key with no value merges nothing
            Value::Null => Ok(Self::Settings(SubscriptionSettings::default())),
            Value::Object(_) => serde_json::from_value(value)
                .map(Self::Settings)
                .map_err(ConfigError::InvalidSettings),
            other => Err(ConfigError::shape("logSubscription", "boolean or object", &other)),
        }
    }
}

impl From<bool> for UnitOverride {
    fn from(enabled: bool) -> Self {
        Self::Toggle(enabled)
    }
}

impl From<SubscriptionSettings> for UnitOverride {
    fn from(settings: SubscriptionSettings) -> Self {
        Self::Settings(settings)
    }
}

impl JsonSchema for UnitOverride {
    fn schema_name() -> String {
        "UnitOverride".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        UnitOverrideRepr::json_schema(gen)
    }
}

#[derive(JsonSchema)]
#[serde(untagged)]
#[allow(dead_code)]
enum UnitOverrideRepr {
    Toggle(bool),
    Settings(SubscriptionSettings),
}

/// Which API Gateway log streams a layer wants subscribed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct ApiGatewayLogs {
    /// Access logs
    pub access: bool,
    /// Execution logs
    pub execution: bool,
}

impl ApiGatewayLogs {
    /// Both modes on
    pub const ALL: Self = Self {
        access: true,
        execution: true,
    };

    /// Both modes off
    pub const NONE: Self = Self {
        access: false,
        execution: false,
    };

    /// At least one mode enabled
    #[inline]
    #[must_use]
    pub fn any(self) -> bool {
        self.access || self.execution
    }

    /// Modes enabled on both sides
    #[inline]
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        Self {
            access: self.access && other.access,
            execution: self.execution && other.execution,
        }
    }
}

impl TryFrom<Value> for ApiGatewayLogs {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(true) => Ok(Self::ALL),
            Value::Bool(false) | Value::Null => Ok(Self::NONE),
            Value::Object(map) => Ok(Self {
                access: flag(&map, "access", "apiGatewayLogs.access", false)?,
                execution: flag(&map, "execution", "apiGatewayLogs.execution", false)?,
            }),
            other => Err(ConfigError::shape("apiGatewayLogs", "boolean or object", &other)),
        }
    }
}

#[derive(JsonSchema)]
#[serde(untagged)]
#[allow(dead_code)]
enum ApiGatewayLogsRepr {
    Toggle(bool),
    Modes {
        access: Option<bool>,
        execution: Option<bool>,
    },
}

/// The host's REST API logging setting (`provider.logs.restApi`)
///
/// `true` turns on both streams; the object form toggles each one and
/// leaves omitted ones on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct GatewayLogsSetting {
    /// `accessLogging`
    pub access_logging: bool,
    /// `executionLogging`
    pub execution_logging: bool,
}

impl GatewayLogsSetting {
    /// Logging fully on
    pub const ENABLED: Self = Self {
        access_logging: true,
        execution_logging: true,
    };

    /// Logging off
    pub const DISABLED: Self = Self {
        access_logging: false,
        execution_logging: false,
    };

    /// Streams the host has turned on
    #[inline]
    #[must_use]
    pub fn modes(self) -> ApiGatewayLogs {
        ApiGatewayLogs {
            access: self.access_logging,
            execution: self.execution_logging,
        }
    }
}

impl TryFrom<Value> for GatewayLogsSetting {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(true) => Ok(Self::ENABLED),
            Value::Bool(false) | Value::Null => Ok(Self::DISABLED),
            Value::Object(map) => Ok(Self {
                access_logging: flag(&map, "accessLogging", "restApi.accessLogging", true)?,
                execution_logging: flag(
                    &map,
                    "executionLogging",
                    "restApi.executionLogging",
                    true,
                )?,
            }),
            other => Err(ConfigError::shape("restApi", "boolean or object", &other)),
        }
    }
}

fn flag(
    map: &Map<String, Value>,
    key: &str,
    label: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(ConfigError::shape(label, "boolean", other)),
    }
}
