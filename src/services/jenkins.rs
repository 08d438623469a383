//! Jenkins build trigger.
//!
//! The Jenkins server is an external collaborator; this client only
//! enqueues a parameterized build carrying the execution id, and the
//! runner reports back through the execution callback endpoint.

use secrecy::ExposeSecret;
use tracing::info;

use crate::config::JenkinsConfig;
use crate::error::{AppError, AppResult};

/// HTTP connect timeout for Jenkins calls.
const HTTP_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
/// HTTP total timeout for Jenkins calls.
const HTTP_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Shared trigger handle. Holds no client when the Jenkins integration
/// is not configured; triggering then fails with a validation error
/// instead of a connection error.
#[derive(Clone)]
pub struct JenkinsTrigger {
    inner: Option<JenkinsClient>,
}

#[derive(Clone)]
struct JenkinsClient {
    http: reqwest::Client,
    config: JenkinsConfig,
}

impl JenkinsTrigger {
    /// Build from optional configuration.
    pub fn new(config: Option<JenkinsConfig>) -> Self {
        let inner = config.map(|config| JenkinsClient {
            http: reqwest::Client::builder()
                .connect_timeout(HTTP_CONNECT_TIMEOUT)
                .timeout(HTTP_REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client for Jenkins"),
            config,
        });

        JenkinsTrigger { inner }
    }

    /// Whether the integration is configured.
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    /// Enqueue a parameterized build for an execution.
    pub async fn trigger_build(&self, execution_id: i32, task_id: i32) -> AppResult<()> {
        let client = self.inner.as_ref().ok_or_else(|| {
            AppError::Validation("Jenkins integration is not configured".to_string())
        })?;

        let url = format!(
            "{}/job/{}/buildWithParameters",
            client.config.base_url.trim_end_matches('/'),
            client.config.job
        );

        let response = client
            .http
            .post(&url)
            .basic_auth(
                &client.config.user,
                Some(client.config.token.expose_secret()),
            )
            .query(&[
                ("EXECUTION_ID", execution_id.to_string()),
                ("TASK_ID", task_id.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Jenkins request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Jenkins returned {} for build trigger",
                response.status()
            )));
        }

        info!(
            "Jenkins build enqueued: job={}, execution_id={}",
            client.config.job, execution_id
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_unconfigured_trigger_rejects() {
        let trigger = JenkinsTrigger::new(None);
        assert!(!trigger.is_configured());

        let err = tokio_test::block_on(trigger.trigger_build(1, 2)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_configured_flag() {
        let trigger = JenkinsTrigger::new(Some(JenkinsConfig {
            base_url: "http://jenkins.local".to_string(),
            job: "autotest".to_string(),
            user: "ci".to_string(),
            token: SecretString::from("token"),
        }));
        assert!(trigger.is_configured());
    }
}
