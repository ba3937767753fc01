use async_trait::async_trait;
use serde_json::{json, Number, Value};

use crate::error::Result;

/// Inputs as typed into the form, before any server-side checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanForm {
    pub capital: String,
    pub description: String,
    pub steps: String,
}

impl PlanForm {
    pub fn new(
        capital: impl Into<String>,
        description: impl Into<String>,
        steps: impl Into<String>,
    ) -> Self {
        Self {
            capital: capital.into(),
            description: description.into(),
            steps: steps.into(),
        }
    }

    /// JSON body for the plan API. Numeric capital is sent as a number, the
    /// way the browser's number input does.
    pub fn to_body(&self, wildcard: Option<&str>) -> Value {
        let mut body = json!({
            "capital": capital_value(&self.capital),
            "description": self.description,
            "steps": self.steps,
        });
        if let Some(wildcard) = wildcard {
            body["wildCard"] = Value::String(wildcard.to_string());
        }
        body
    }
}

fn capital_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

#[async_trait]
pub trait PlanApi: Send + Sync {
    /// `/api/generate`
    async fn generate(&self, form: &PlanForm) -> Result<String>;
    /// `/api/createPrompt`
    async fn create_prompt(&self, form: &PlanForm) -> Result<String>;
    /// `/api/generatePlan`
    async fn generate_plan(&self, form: &PlanForm, wildcard: &str) -> Result<String>;
}
