//! Request body parsing and field checks shared by every `/api` route.
//!
//! Fields are checked in a fixed order (capital, description, steps,
//! wildcard) and the first failure is reported. String fields are trimmed
//! before use; a field of the wrong JSON type counts as missing.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{JustBeginError, Result};

pub const INVALID_CAPITAL: &str = "Please enter a valid capital amount";
pub const INVALID_DESCRIPTION: &str = "Please enter a valid business description";
pub const MISSING_STEPS: &str = "Please enter steps taken";
pub const MISSING_WILDCARD: &str = "Please complete form";

/// Raw body as posted by the browser. Every field is optional here so that
/// absence is reported with a field message instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlanRequestBody {
    #[serde(default)]
    pub capital: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub steps: Option<Value>,
    #[serde(default, rename = "wildCard", alias = "wildcard")]
    pub wild_card: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanInputs {
    /// Capital rendered the way it is embedded in prompts.
    pub capital: String,
    pub description: String,
    pub steps: String,
}

pub fn validate_inputs(body: &PlanRequestBody) -> Result<PlanInputs> {
    let capital = capital_text(body.capital.as_ref())
        .ok_or_else(|| JustBeginError::Validation(INVALID_CAPITAL.to_string()))?;
    let description = required_text(body.description.as_ref(), INVALID_DESCRIPTION)?;
    let steps = required_text(body.steps.as_ref(), MISSING_STEPS)?;
    Ok(PlanInputs {
        capital,
        description,
        steps,
    })
}

/// Checks the base inputs and then the follow-up answer.
pub fn validate_with_wildcard(body: &PlanRequestBody) -> Result<(PlanInputs, String)> {
    let inputs = validate_inputs(body)?;
    let wildcard = required_text(body.wild_card.as_ref(), MISSING_WILDCARD)?;
    Ok((inputs, wildcard))
}

fn required_text(value: Option<&Value>, message: &str) -> Result<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| JustBeginError::Validation(message.to_string()))
}

/// Accepts any non-zero number or non-blank string; `null`, booleans,
/// arrays and objects are rejected.
fn capital_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(number) => number_text(number),
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

fn number_text(number: &Number) -> Option<String> {
    if let Some(int) = number.as_i64() {
        return (int != 0).then(|| int.to_string());
    }
    if let Some(int) = number.as_u64() {
        return Some(int.to_string());
    }
    let float = number.as_f64()?;
    if !float.is_finite() || float == 0.0 {
        return None;
    }
    if float.fract() == 0.0 && float.abs() < 1e15 {
        Some(format!("{float:.0}"))
    } else {
        Some(float.to_string())
    }
}
