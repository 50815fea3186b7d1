//! HTTP implementation of [`Executor`] on top of `ureq`.

use crate::config::TransportConfig;
use crate::executor::Executor;
use crate::response::ExecuteResponse;
use anyhow::{anyhow, Result};
use std::fmt;
use tracing::trace;

/// Posts scripts to the `execute` method.
///
/// The request is blocking; its only deadline is the agent timeout from
/// [`TransportConfig`], and a timeout surfaces as an ordinary `Err`.
#[derive(Clone)]
pub struct HttpExecutor {
    config: TransportConfig,
    agent: ureq::Agent,
}

impl HttpExecutor {
    pub fn new(config: TransportConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .timeout_connect(config.connect_timeout)
            .build();
        Self { config, agent }
    }

    /// Executor configured from `PACKER_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(TransportConfig::from_env())
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Executor for HttpExecutor {
    fn execute(&self, code: &str) -> Result<ExecuteResponse> {
        let url = self.config.execute_url();
        trace!(url = %url, code_len = code.len(), "posting execute request");

        let result = self.agent.post(&url).send_form(&[
            ("code", code),
            ("access_token", self.config.access_token.as_str()),
            ("v", self.config.version.as_str()),
        ]);

        let body = match result {
            Ok(response) => response
                .into_string()
                .map_err(|e| anyhow!("Failed to read execute response: {}", e))?,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(anyhow!(
                    "execute request failed with HTTP {}: {}",
                    status,
                    body.trim()
                ));
            }
            Err(e) => return Err(anyhow!("execute request failed: {}", e)),
        };

        ExecuteResponse::from_json(&body)
    }
}

impl fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
