//! Logsub Core - Log Subscription Synthesis Engine
//!
//! Adds CloudWatch Logs subscriptions to a compiled deployment template:
//! - Subscription filters on each function's log group
//! - Invoke permissions when the destination is a Lambda function
//! - Access and execution log subscriptions for the API Gateway
//! - A retained execution log group on the stack's first deploy
//!
//! # Core Concepts
//!
//! - [`SynthesisEngine`]: One pass over every layer, function and the gateway
//! - [`Naming`]: Host naming service; [`AwsNaming`] mirrors the serverless conventions
//! - [`StackQuery`]: Host stack lookup behind the [`DeploymentStateOracle`]
//! - [`GatewayPlan`]: Decision table for the gateway subgraph
//!
//! # Example
//!
//! ```rust,ignore
//! use logsub_core::{AwsNaming, EngineOptions, SynthesisEngine};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = SynthesisEngine::new(Arc::new(AwsNaming::new("orders", "dev")), stack_query)
//!     .with_options(EngineOptions::new(instance_id));
//!
//! let report = engine.synthesize_template(&mut template, &service).await?;
//! println!("Added {} resources", report.resources_added);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod engine;
pub mod error;
pub mod gateway;
pub mod lambda;
pub mod log_group;
pub mod naming;
pub mod oracle;
pub mod properties;
pub mod reference;

pub use engine::{EngineOptions, SynthesisEngine, SynthesisReport};
pub use error::{
    LogGroupError, ReferenceError, StateQueryError, SynthesisError, UnsupportedConfigError,
};
pub use gateway::{synthesize_gateway, GatewayContext, GatewayPlan, GatewaySubgraph};
pub use lambda::{synthesize_function, FunctionSubgraph, FunctionTarget};
pub use log_group::resolve_log_group_name;
pub use naming::{AwsNaming, FunctionIds, GatewayIds, Naming};
pub use oracle::{
    DeploymentCheck, DeploymentStateOracle, StackQuery, StackSummary, StaticStackQuery,
};
pub use reference::{extract_dependency, is_directly_invocable, is_lambda_arn};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the engine
    pub use crate::{
        AwsNaming, EngineOptions, Naming, StackQuery, SynthesisEngine, SynthesisError,
        SynthesisReport,
    };
    pub use logsub_config::ServiceDefinition;
    pub use logsub_template::{ResourceGraph, Template};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
