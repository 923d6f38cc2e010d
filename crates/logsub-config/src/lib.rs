//! Logsub Configuration
//!
//! Three configuration tiers merged into one effective policy per unit:
//!
//! ```text
//! defaults  <  layer config (global object | sequence element)  <  unit override (bool | object)
//! ```
//!
//! # Core Concepts
//!
//! - [`SubscriptionSettings`]: One tier as written, every key optional
//! - [`ConfigLayer`]: Single object (empty suffix) or ordered sequence (index suffix)
//! - [`UnitOverride`]: Boolean shorthand or object attached to a function
//! - [`Destination`]: Literal ARN, `Fn::GetAtt` or `Ref`, decided at decode time
//! - [`EffectiveConfig`]: The resolved policy, every key defaulted
//! - [`ServiceDefinition`]: YAML/JSON service file carrying all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use logsub_config::{EffectiveConfig, ServiceDefinition};
//!
//! let service = ServiceDefinition::from_yaml(&text)?;
//! let layer = service.layer_config();
//! for entry in layer.entries() {
//!     let config = EffectiveConfig::resolve(Some(entry.settings), None);
//!     println!("layer {:?} enabled={}", entry.index, config.enabled);
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod destination;
mod error;
mod layer;
mod resolve;
mod schema;
mod service;
mod settings;

pub use destination::Destination;
pub use error::ConfigError;
pub use layer::{ConfigLayer, LayerEntry};
pub use resolve::{resolve, EffectiveConfig};
pub use schema::{unit_override_schema, FUNCTION_PROPERTY};
pub use service::{
    CustomSettings, FunctionDefinition, ProviderLogs, ProviderSettings, ServiceDefinition,
    DEFAULT_REGION, DEFAULT_STAGE,
};
pub use settings::{ApiGatewayLogs, GatewayLogsSetting, SubscriptionSettings, UnitOverride};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
