use async_trait::async_trait;
use serde_json::Value;

use crate::error::{JustBeginError, Result};
use crate::interfaces::plan_api::{PlanApi, PlanForm};

/// Talks to a running server's `/api` routes.
#[derive(Clone)]
pub struct PlanApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlanApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| JustBeginError::Request(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| JustBeginError::Request(e.to_string()))?;
        let value = serde_json::from_str::<Value>(&text).ok();

        if status != reqwest::StatusCode::OK {
            let message = value
                .as_ref()
                .and_then(|value| value.pointer("/error/message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            return Err(JustBeginError::Request(message));
        }

        value
            .as_ref()
            .and_then(|value| value.get("result"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| JustBeginError::Request("Response did not include a result".to_string()))
    }
}

#[async_trait]
impl PlanApi for PlanApiClient {
    async fn generate(&self, form: &PlanForm) -> Result<String> {
        self.post("/api/generate", form.to_body(None)).await
    }

    async fn create_prompt(&self, form: &PlanForm) -> Result<String> {
        self.post("/api/createPrompt", form.to_body(None)).await
    }

    async fn generate_plan(&self, form: &PlanForm, wildcard: &str) -> Result<String> {
        self.post("/api/generatePlan", form.to_body(Some(wildcard)))
            .await
    }
}
