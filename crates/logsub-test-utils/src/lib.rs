//! Testing utilities for the logsub workspace
//!
//! Shared fixtures: compiled-template builders, service definitions and a
//! scripted stack lookup that counts its calls.

#![allow(missing_docs)]

use async_trait::async_trait;
use logsub_config::ServiceDefinition;
use logsub_core::{AwsNaming, EngineOptions, StackQuery, StackSummary, StateQueryError, SynthesisEngine};
use logsub_template::{resource_types, Resource, ResourceGraph};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const SERVICE: &str = "orders";
pub const STAGE: &str = "dev";
pub const STACK_NAME: &str = "orders-dev";
pub const INSTANCE_ID: &str = "1234";
pub const SHIPPER_ARN: &str = "arn:aws:lambda:us-east-1:123456789012:function:ship";

pub fn log_group(name: &str) -> Resource {
    Resource::new(resource_types::LOG_GROUP).with_property("LogGroupName", name)
}

/// Compiled-template builder
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: ResourceGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{normalized}LogGroup` named `/aws/lambda/{service}-{stage}-{function}`
    pub fn function(mut self, normalized: &str, function: &str) -> Self {
        let name = format!("/aws/lambda/{SERVICE}-{STAGE}-{function}");
        self.graph
            .insert_new(format!("{normalized}LogGroup"), log_group(&name))
            .unwrap();
        self
    }

    pub fn log_group(mut self, logical_id: &str, name: &str) -> Self {
        self.graph.insert_new(logical_id, log_group(name)).unwrap();
        self
    }

    pub fn lambda(mut self, logical_id: &str) -> Self {
        self.graph
            .insert_new(logical_id, Resource::new(resource_types::LAMBDA_FUNCTION))
            .unwrap();
        self
    }

    pub fn resource(mut self, logical_id: &str, resource_type: &str) -> Self {
        self.graph
            .insert_new(logical_id, Resource::new(resource_type))
            .unwrap();
        self
    }

    /// REST API plus its access log group
    pub fn rest_api(self) -> Self {
        self.resource("ApiGatewayRestApi", "AWS::ApiGateway::RestApi")
            .log_group("ApiGatewayLogGroup", "/aws/api-gateway/orders-dev")
    }

    pub fn build(self) -> ResourceGraph {
        self.graph
    }
}

pub fn service(yaml: &str) -> ServiceDefinition {
    ServiceDefinition::from_yaml(yaml).unwrap()
}

/// Stack lookup with a fixed outcome
#[derive(Debug)]
pub struct ScriptedStackQuery {
    outcome: Result<Vec<StackSummary>, StateQueryError>,
    calls: AtomicUsize,
}

impl ScriptedStackQuery {
    pub fn deployed() -> Arc<Self> {
        Self::with(Ok(vec![StackSummary::new(STACK_NAME, "UPDATE_COMPLETE")]))
    }

    pub fn not_deployed() -> Arc<Self> {
        Self::failing(&format!("Stack with id {STACK_NAME} does not exist"))
    }

    pub fn empty() -> Arc<Self> {
        Self::with(Ok(Vec::new()))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::with(Err(StateQueryError::new(message)))
    }

    pub fn with(outcome: Result<Vec<StackSummary>, StateQueryError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StackQuery for ScriptedStackQuery {
    async fn describe_stacks(
        &self,
        _stack_name: &str,
    ) -> Result<Vec<StackSummary>, StateQueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

pub fn engine(query: Arc<ScriptedStackQuery>) -> SynthesisEngine {
    SynthesisEngine::new(Arc::new(AwsNaming::new(SERVICE, STAGE)), query)
        .with_options(EngineOptions::new(INSTANCE_ID))
}
