//! Deployment state oracle
//!
//! Answers whether the stack has been deployed before. The answer splits
//! the gateway path into first-deploy and update behaviour, so it is asked
//! at most once per synthesis call.
//!
//! # Core Concepts
//!
//! - [`StackQuery`]: the external describe-stacks lookup, implemented by the host
//! - [`DeploymentStateOracle`]: classifies lookup outcomes into `bool` or a fatal error
//! - [`DeploymentCheck`]: per-call memo so the lookup runs lazily and once

use crate::error::StateQueryError;
use std::sync::Arc;
use tracing::debug;

/// One stack record returned by the lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    /// Stack name
    pub stack_name: String,
    /// Status as reported, e.g. `UPDATE_COMPLETE`
    pub stack_status: String,
}

impl StackSummary {
    /// Create a record
    #[inline]
    #[must_use]
    pub fn new(stack_name: impl Into<String>, stack_status: impl Into<String>) -> Self {
        Self {
            stack_name: stack_name.into(),
            stack_status: stack_status.into(),
        }
    }
}

/// External describe-stacks lookup
///
/// A stack that was never created is reported as an error whose message
/// contains `does not exist`, mirroring the provider API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StackQuery: Send + Sync {
    /// Describe stacks matching `stack_name`
    async fn describe_stacks(&self, stack_name: &str)
        -> Result<Vec<StackSummary>, StateQueryError>;
}

/// Classifies stack lookups
#[derive(Clone)]
pub struct DeploymentStateOracle {
    query: Arc<dyn StackQuery>,
}

impl DeploymentStateOracle {
    /// Create an oracle over a lookup
    #[inline]
    #[must_use]
    pub fn new(query: Arc<dyn StackQuery>) -> Self {
        Self { query }
    }

    /// Whether `stack_name` has been deployed
    ///
    /// # Errors
    /// Any lookup failure other than "does not exist", unchanged.
    pub async fn is_deployed(&self, stack_name: &str) -> Result<bool, StateQueryError> {
        match self.query.describe_stacks(stack_name).await {
            Ok(stacks) => {
                debug!(stack = %stack_name, count = stacks.len(), "Stack lookup returned");
                Ok(!stacks.is_empty())
            }
            Err(err) if err.is_stack_missing() => {
                debug!(stack = %stack_name, "Stack not deployed yet");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for DeploymentStateOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentStateOracle").finish_non_exhaustive()
    }
}

/// Deployment state resolved at most once
#[derive(Debug, Default)]
pub struct DeploymentCheck {
    resolved: Option<bool>,
}

impl DeploymentCheck {
    /// Fresh, unresolved check
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer from a previous call, if any
    #[inline]
    #[must_use]
    pub fn resolved(&self) -> Option<bool> {
        self.resolved
    }

    /// Resolve through the oracle on first use
    ///
    /// # Errors
    /// Propagates the oracle's error; nothing is cached on failure.
    pub async fn get(
        &mut self,
        oracle: &DeploymentStateOracle,
        stack_name: &str,
    ) -> Result<bool, StateQueryError> {
        if let Some(deployed) = self.resolved {
            return Ok(deployed);
        }
        let deployed = oracle.is_deployed(stack_name).await?;
        self.resolved = Some(deployed);
        Ok(deployed)
    }
}

/// Lookup with a fixed answer
///
/// Used when the deployment state is known up front, e.g. from the
/// command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticStackQuery {
    deployed: bool,
}

impl StaticStackQuery {
    /// Every stack exists
    #[inline]
    #[must_use]
    pub fn deployed() -> Self {
        Self { deployed: true }
    }

    /// No stack exists
    #[inline]
    #[must_use]
    pub fn first_deploy() -> Self {
        Self { deployed: false }
    }
}

#[async_trait::async_trait]
impl StackQuery for StaticStackQuery {
    async fn describe_stacks(
        &self,
        stack_name: &str,
    ) -> Result<Vec<StackSummary>, StateQueryError> {
        if self.deployed {
            Ok(vec![StackSummary::new(stack_name, "UPDATE_COMPLETE")])
        } else {
            Err(StateQueryError::new(format!(
                "Stack with id {stack_name} does not exist"
            )))
        }
    }
}
