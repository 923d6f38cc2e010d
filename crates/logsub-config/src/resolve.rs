//! Effective policy resolution
//!
//! Precedence is defaults < layer < unit override, key by key. Nested
//! values (`apiGatewayLogs`) are replaced whole, never deep-merged.

use crate::destination::Destination;
use crate::settings::{ApiGatewayLogs, SubscriptionSettings, UnitOverride};
use serde_json::Value;

/// The policy for one (layer, unit) pair
///
/// Built fresh per pair and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    /// Emit subscriptions
    pub enabled: bool,
    /// Delivery target
    pub destination_arn: Option<Destination>,
    /// Filter pattern, empty matches everything
    pub filter_pattern: String,
    /// Explicit filter name
    pub filter_name: Option<String>,
    /// Delivery role, only emitted when set
    pub role_arn: Option<Value>,
    /// Grant invoke permission to a Lambda destination
    pub add_lambda_permission: bool,
    /// API Gateway streams requested by this layer
    pub api_gateway_logs: ApiGatewayLogs,
    /// Retired flag as written
    pub add_source_lambda_permission: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            destination_arn: None,
            filter_pattern: String::new(),
            filter_name: None,
            role_arn: None,
            add_lambda_permission: true,
            api_gateway_logs: ApiGatewayLogs::NONE,
            add_source_lambda_permission: false,
        }
    }
}

impl EffectiveConfig {
    /// Merge layer config and unit override over the defaults
    #[must_use]
    pub fn resolve(layer: Option<&SubscriptionSettings>, unit: Option<&UnitOverride>) -> Self {
        let mut config = Self::default();

        if let Some(layer) = layer {
            config.apply(layer);
        }

        match unit {
            None => {}
            Some(UnitOverride::Toggle(enabled)) => config.enabled = *enabled,
            Some(UnitOverride::Settings(settings)) => config.apply(settings),
        }

        config
    }

    /// Overwrite every key the settings set explicitly
    fn apply(&mut self, settings: &SubscriptionSettings) {
        if let Some(enabled) = settings.enabled {
            self.enabled = enabled;
        }
        if let Some(destination) = &settings.destination_arn {
            self.destination_arn = Some(destination.clone());
        }
        if let Some(pattern) = &settings.filter_pattern {
            self.filter_pattern.clone_from(pattern);
        }
        if let Some(name) = &settings.filter_name {
            self.filter_name = Some(name.clone());
        }
        if let Some(role) = &settings.role_arn {
            self.role_arn = Some(role.clone());
        }
        if let Some(add) = settings.add_lambda_permission {
            self.add_lambda_permission = add;
        }
        if let Some(logs) = settings.api_gateway_logs {
            self.api_gateway_logs = logs;
        }
        if let Some(legacy) = settings.add_source_lambda_permission {
            self.add_source_lambda_permission = legacy;
        }
    }
}

/// Shorthand for [`EffectiveConfig::resolve`]
#[inline]
#[must_use]
pub fn resolve(layer: Option<&SubscriptionSettings>, unit: Option<&UnitOverride>) -> EffectiveConfig {
    EffectiveConfig::resolve(layer, unit)
}
