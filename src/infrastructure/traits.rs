use crate::error::AppResult;
use crate::models::{ClassificationRequest, ClassificationResult};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait ClassifierInterface: Send + Sync {
    /// Send `body` to the inference service and return its JSON answer untouched.
    async fn forward(&self, body: &Value) -> AppResult<Value>;

    async fn classify(&self, request: &ClassificationRequest) -> AppResult<ClassificationResult> {
        let body = serde_json::to_value(request)?;
        let answer = self.forward(&body).await?;
        Ok(serde_json::from_value(answer)?)
    }
}
