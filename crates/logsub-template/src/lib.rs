//! Logsub Template Model
//!
//! The in-memory deployment template the engine writes into.
//!
//! # Core Concepts
//!
//! - [`Template`]: A compiled template document (`Resources` plus any other top-level keys)
//! - [`ResourceGraph`]: Ordered map of logical id to [`Resource`], insertion order preserved
//! - [`Resource`]: `{Type, DeletionPolicy?, Properties?, DependsOn}` record
//! - [`Intrinsic`]: `Ref`, `Fn::GetAtt` and `Fn::Sub` values
//!
//! The graph is owned by whoever compiled the template. Writers only add
//! keys through [`ResourceGraph::insert_new`] or [`ResourceGraph::insert_if_absent`],
//! so resources declared elsewhere are never replaced.
//!
//! # Example
//!
//! ```rust,ignore
//! use logsub_template::{resource_types, Intrinsic, Resource, Template};
//!
//! let mut template = Template::from_json(&compiled)?;
//! let permission = Resource::new(resource_types::LAMBDA_PERMISSION)
//!     .with_properties(props)
//!     .with_depends_on(["ALogGroup"]);
//! template.resources.insert_new("ALogLambdaPermission", permission)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod graph;
mod intrinsic;
mod resource;

pub use error::TemplateError;
pub use graph::{ResourceGraph, Template};
pub use intrinsic::Intrinsic;
pub use resource::Resource;

/// CloudFormation resource type names used by the engine
pub mod resource_types {
    /// CloudWatch Logs log group
    pub const LOG_GROUP: &str = "AWS::Logs::LogGroup";
    /// CloudWatch Logs subscription filter
    pub const SUBSCRIPTION_FILTER: &str = "AWS::Logs::SubscriptionFilter";
    /// Lambda resource-based permission
    pub const LAMBDA_PERMISSION: &str = "AWS::Lambda::Permission";
    /// Lambda function
    pub const LAMBDA_FUNCTION: &str = "AWS::Lambda::Function";
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
