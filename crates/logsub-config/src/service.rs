//! Service definition loading
//!
//! The subset of a serverless-style service file this engine reads:
//!
//! ```yaml
//! service: orders
//! provider:
//!   stage: prod
//!   region: eu-west-1
//!   logs:
//!     restApi: true
//! functions:
//!   create:
//!     logSubscription: true
//! custom:
//!   logSubscription:
//!     destinationArn: arn:aws:lambda:eu-west-1:123456789012:function:shipper
//! ```

use crate::error::ConfigError;
use crate::layer::ConfigLayer;
use crate::settings::{GatewayLogsSetting, UnitOverride};
use indexmap::IndexMap;
use serde::Deserialize;

/// Default stage when the provider names none
pub const DEFAULT_STAGE: &str = "dev";

/// Default region when the provider names none
pub const DEFAULT_REGION: &str = "us-east-1";

/// A service definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceDefinition {
    /// Service name
    #[serde(default)]
    pub service: String,

    /// Provider block
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Functions in declaration order; `None` when the key is absent
    #[serde(default)]
    pub functions: Option<IndexMap<String, FunctionDefinition>>,

    /// `custom` block
    #[serde(default)]
    pub custom: CustomSettings,
}

/// `provider`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderSettings {
    /// Deployment stage
    #[serde(default)]
    pub stage: Option<String>,

    /// Deployment region
    #[serde(default)]
    pub region: Option<String>,

    /// Logging settings
    #[serde(default)]
    pub logs: ProviderLogs,
}

/// `provider.logs`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderLogs {
    /// `restApi`; absent means gateway logging is off
    #[serde(default)]
    pub rest_api: Option<GatewayLogsSetting>,
}

/// One function entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    /// Deployed function name, informational
    #[serde(default)]
    pub name: Option<String>,

    /// Per-function override
    #[serde(default)]
    pub log_subscription: Option<UnitOverride>,
}

/// `custom`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSettings {
    /// Layer config
    #[serde(default)]
    pub log_subscription: Option<ConfigLayer>,
}

impl ServiceDefinition {
    /// Parse from YAML text
    ///
    /// # Errors
    /// Returns error if the YAML is invalid or a recognised key is malformed
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse from JSON text
    ///
    /// # Errors
    /// Returns error if the JSON is invalid or a recognised key is malformed
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Stage, falling back to [`DEFAULT_STAGE`]
    #[must_use]
    pub fn stage(&self) -> &str {
        self.provider.stage.as_deref().unwrap_or(DEFAULT_STAGE)
    }

    /// Region, falling back to [`DEFAULT_REGION`]
    #[must_use]
    pub fn region(&self) -> &str {
        self.provider.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Layer config, `{}` when absent
    #[must_use]
    pub fn layer_config(&self) -> ConfigLayer {
        self.custom.log_subscription.clone().unwrap_or_default()
    }

    /// REST API logging setting, disabled when absent
    #[must_use]
    pub fn gateway_logs(&self) -> GatewayLogsSetting {
        self.provider
            .logs
            .rest_api
            .unwrap_or(GatewayLogsSetting::DISABLED)
    }

    /// Builder: set a function override
    #[must_use]
    pub fn with_function(mut self, name: impl Into<String>, log_subscription: Option<UnitOverride>) -> Self {
        self.functions.get_or_insert_with(IndexMap::new).insert(
            name.into(),
            FunctionDefinition {
                name: None,
                log_subscription,
            },
        );
        self
    }
}
