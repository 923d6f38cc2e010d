//! Synthesis engine
//!
//! Drives one synthesis pass: for every configuration layer, every function
//! gets its subgraph, then the gateway gets its own when the template has a
//! REST API. All writes go to the graph passed in; a failure anywhere aborts
//! the pass.

use crate::error::SynthesisError;
use crate::gateway::{synthesize_gateway, GatewayContext, GatewayPlan, GatewaySubgraph};
use crate::lambda::{synthesize_function, FunctionSubgraph, FunctionTarget};
use crate::naming::Naming;
use crate::oracle::{DeploymentCheck, DeploymentStateOracle, StackQuery};
use logsub_config::{EffectiveConfig, LayerEntry, ServiceDefinition};
use logsub_template::{ResourceGraph, Template};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-build engine options
///
/// Stage and region fall back to the service definition when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Stage override
    pub stage: Option<String>,
    /// Region override
    pub region: Option<String>,
    /// Build instance id, names the gateway deployment resource
    pub instance_id: String,
}

impl EngineOptions {
    /// Options for one build instance
    #[inline]
    #[must_use]
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            ..Self::default()
        }
    }

    /// Set stage
    #[inline]
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Set region
    #[inline]
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set build instance id
    #[inline]
    #[must_use]
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            stage: None,
            region: None,
            instance_id: "0".to_string(),
        }
    }
}

/// Summary of one synthesis pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    /// Layers processed
    pub layers: usize,
    /// Function subgraphs, in emission order
    pub functions: Vec<FunctionSubgraph>,
    /// Gateway subgraphs, one per layer that reached the gateway path
    pub gateway: Vec<GatewaySubgraph>,
    /// Deployment state, if it was needed
    pub deployed: Option<bool>,
    /// Resources added to the graph
    pub resources_added: usize,
}

/// Orchestrates the synthesizers over a service definition
pub struct SynthesisEngine {
    naming: Arc<dyn Naming>,
    oracle: DeploymentStateOracle,
    options: EngineOptions,
}

impl SynthesisEngine {
    /// Create an engine with default options
    #[must_use]
    pub fn new(naming: Arc<dyn Naming>, query: Arc<dyn StackQuery>) -> Self {
        Self {
            naming,
            oracle: DeploymentStateOracle::new(query),
            options: EngineOptions::default(),
        }
    }

    /// Replace options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options
    #[inline]
    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Synthesize into a compiled template's resources
    ///
    /// # Errors
    /// See [`SynthesisEngine::synthesize`].
    pub async fn synthesize_template(
        &self,
        template: &mut Template,
        service: &ServiceDefinition,
    ) -> Result<SynthesisReport, SynthesisError> {
        self.synthesize(&mut template.resources, service).await
    }

    /// Run one synthesis pass over `graph`
    ///
    /// The deployment state is looked up at most once, and only if some
    /// layer reaches the gateway path.
    ///
    /// # Errors
    /// The first error from any synthesizer or the state lookup. Layers
    /// after the failing one are not processed.
    pub async fn synthesize(
        &self,
        graph: &mut ResourceGraph,
        service: &ServiceDefinition,
    ) -> Result<SynthesisReport, SynthesisError> {
        let stage = self.options.stage.as_deref().unwrap_or(service.stage());
        let region = self.options.region.as_deref().unwrap_or(service.region());
        let layer = service.layer_config();
        let initial_len = graph.len();

        info!(
            service = %service.service,
            stage = %stage,
            region = %region,
            layers = layer.len(),
            sequence = layer.is_sequence(),
            "Synthesizing log subscriptions"
        );

        let mut report = SynthesisReport {
            layers: layer.len(),
            ..SynthesisReport::default()
        };
        let mut check = DeploymentCheck::new();

        for entry in layer.entries() {
            self.synthesize_functions(graph, service, &entry, region, &mut report)?;
            self.synthesize_gateway_layer(graph, service, &entry, stage, region, &mut check, &mut report)
                .await?;
        }

        report.deployed = check.resolved();
        report.resources_added = graph.len() - initial_len;
        info!(
            resources_added = report.resources_added,
            filters = report.functions.len(),
            "Log subscription synthesis complete"
        );
        Ok(report)
    }

    fn synthesize_functions(
        &self,
        graph: &mut ResourceGraph,
        service: &ServiceDefinition,
        entry: &LayerEntry<'_>,
        region: &str,
        report: &mut SynthesisReport,
    ) -> Result<(), SynthesisError> {
        let Some(functions) = &service.functions else {
            debug!("No functions defined");
            return Ok(());
        };

        for (function_name, function) in functions {
            let config =
                EffectiveConfig::resolve(Some(entry.settings), function.log_subscription.as_ref());
            let normalized_name = self.naming.normalized_function_name(function_name);
            let target = FunctionTarget {
                function_name,
                normalized_name: &normalized_name,
                suffix: &entry.suffix,
            };

            if let Some(subgraph) = synthesize_function(graph, target, &config, region)? {
                info!(
                    function = %function_name,
                    logical_id = %subgraph.subscription_filter,
                    "Added subscription filter"
                );
                report.functions.push(subgraph);
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn synthesize_gateway_layer(
        &self,
        graph: &mut ResourceGraph,
        service: &ServiceDefinition,
        entry: &LayerEntry<'_>,
        stage: &str,
        region: &str,
        check: &mut DeploymentCheck,
        report: &mut SynthesisReport,
    ) -> Result<(), SynthesisError> {
        let rest_api_id = self.naming.rest_api_logical_id();
        if !graph.contains(&rest_api_id) {
            return Ok(());
        }

        let config = EffectiveConfig::resolve(Some(entry.settings), None);
        let modes = GatewayPlan::active_modes(service.gateway_logs(), config.api_gateway_logs);
        if !modes.any() {
            if config.api_gateway_logs.any() {
                warn!(
                    layer = ?entry.index,
                    "apiGatewayLogs requested but REST API logging is disabled; skipping gateway"
                );
            }
            return Ok(());
        }

        let stack_name = self.naming.stack_name();
        let deployed = check.get(&self.oracle, &stack_name).await?;
        let plan = GatewayPlan::decide(modes, deployed);

        let access_log_group_id = self.naming.api_gateway_log_group_logical_id();
        let deployment_id = self
            .naming
            .api_gateway_deployment_logical_id(&self.options.instance_id);
        let context = GatewayContext {
            rest_api_id: &rest_api_id,
            access_log_group_id: &access_log_group_id,
            deployment_id: &deployment_id,
            stage,
            region,
            suffix: &entry.suffix,
        };

        let subgraph = synthesize_gateway(graph, &context, &config, plan)?;
        info!(
            layer = ?entry.index,
            deployed,
            access = plan.access,
            execution = plan.execution,
            "Added API Gateway log subscriptions"
        );
        report.gateway.push(subgraph);
        Ok(())
    }
}

impl std::fmt::Debug for SynthesisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisEngine")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
