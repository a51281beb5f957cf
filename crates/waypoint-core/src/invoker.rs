//! Tool dispatch and result classification.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::{Value, json};

use crate::{
    error::Result,
    models::{ExtractionVerdict, ToolConfig},
    services::{ResultVerifier, ToolCaller, Verification},
};

/// Outcome of one tool invocation after verification.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// Verified result payload
    Success(Value),

    /// The call did not verify. `raw` keeps what the tool returned for
    /// diagnostics; callers only ever see [`Invocation::failure_marker`].
    Failure { raw: Value },
}

impl Invocation {
    /// The single marker every unverified result collapses to.
    pub fn failure_marker() -> Value {
        json!({"status": "failure"})
    }
}

/// Calls tools through the caller and classifies the raw result.
#[derive(Clone)]
pub struct ToolInvoker {
    caller: Arc<dyn ToolCaller>,
    verifier: Arc<dyn ResultVerifier>,
}

impl ToolInvoker {
    pub fn new(caller: Arc<dyn ToolCaller>, verifier: Arc<dyn ResultVerifier>) -> Self {
        Self { caller, verifier }
    }

    /// Invokes `config.tool`/`config.method` with the verdict's arguments.
    pub async fn invoke(
        &self,
        config: &ToolConfig,
        verdict: &ExtractionVerdict,
    ) -> Result<Invocation> {
        let arguments = verdict.call_arguments();
        debug!(
            "calling {}.{} with {} argument(s)",
            config.tool,
            config.method,
            arguments.len()
        );

        let call = self
            .caller
            .call(&config.tool, &config.method, arguments)
            .await?;
        if let Some(auxiliary) = &call.auxiliary {
            debug!("{}.{} auxiliary: {auxiliary}", config.tool, config.method);
        }

        match self.verifier.verify(config, &call.output).await? {
            Verification::Success => Ok(Invocation::Success(call.output)),
            Verification::Failure => {
                warn!(
                    "{}.{} did not verify: {}",
                    config.tool, config.method, call.output
                );
                Ok(Invocation::Failure { raw: call.output })
            }
        }
    }
}
