// Upstream classifier client - relays classification requests to the remote inference service

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ClassifierConfig;
use crate::error::{AppError, AppResult};
use crate::infrastructure::traits::ClassifierInterface;

/// HTTPS client for the inference endpoint. No timeout, no retry: a slow
/// upstream is waited on, a failed one fails the request.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(endpoint: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &ClassifierConfig) -> AppResult<Self> {
        Self::new(config.url.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ClassifierInterface for HttpClassifier {
    #[instrument(skip(self, body), fields(endpoint = %self.endpoint))]
    async fn forward(&self, body: &Value) -> AppResult<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(status.as_u16()));
        }

        let answer = response.json::<Value>().await?;
        debug!("Upstream answered {}", status);
        Ok(answer)
    }
}
