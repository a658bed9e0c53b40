//! The execute operation: normalize, send, package.

use crate::config::ExecutorConfig;
use crate::execute::envelope::{build_success, ResponseEnvelope};
use crate::execute::error::{ExecuteError, ExecuteResult};
use crate::execute::executor::HttpExecutor;
use crate::execute::normalize::normalize;
use crate::execute::spec::OutboundRequestSpec;
use crate::observability::metrics;

/// Stateless between calls; safe to share across concurrent requests.
#[derive(Debug, Clone)]
pub struct ExecuteService {
    executor: HttpExecutor,
}

impl ExecuteService {
    pub fn new(config: &ExecutorConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            executor: HttpExecutor::new(config)?,
        })
    }

    /// Run one spec to completion. Never fails: every error becomes an error envelope.
    pub async fn execute(&self, spec: OutboundRequestSpec) -> ResponseEnvelope {
        match self.try_execute(spec).await {
            Ok(envelope) => envelope,
            Err(ExecuteError::Validation(e)) => {
                tracing::warn!(error = %e, "Rejected request spec");
                metrics::record_failure("validation");
                ExecuteError::Validation(e).into()
            }
            Err(ExecuteError::Transport(e)) => {
                tracing::error!(error = %e, kind = e.kind.as_str(), "Outbound request failed");
                metrics::record_failure(e.kind.as_str());
                ExecuteError::Transport(e).into()
            }
        }
    }

    pub async fn try_execute(&self, spec: OutboundRequestSpec) -> ExecuteResult<ResponseEnvelope> {
        let resolved = normalize(spec)?;
        let (response, elapsed) = self.executor.execute(&resolved).await?;

        metrics::record_execution(resolved.method.as_str(), response.status, elapsed);
        tracing::info!(
            method = %resolved.method,
            url = %resolved.url,
            status = response.status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request executed"
        );

        Ok(build_success(response, &resolved, elapsed.as_millis() as u64))
    }
}
