use crate::interfaces::providers::{ChatMessage, CompletionRequest};
use crate::validation::PlanInputs;

pub const TEMPERATURE: f32 = 0.7;
pub const SINGLE_SHOT_MAX_TOKENS: u32 = 4000;

const ADVISOR_ROLE: &str = "You are a business advisor.";
const ASK_QUESTION: &str =
    "Ask me a single relevant question which requires a long answer and that can assist you the advisor.";
const WRITE_PLAN: &str = "Create a business plan. The business will be based in France";

pub fn single_shot_prompt(inputs: &PlanInputs) -> String {
    format!(
        "Please provide a business plan with the following description: {}.\n\
         The amount of capital I currently have in Euros is {}.\n\
         The steps I have already taken are as follows: {}",
        inputs.description, inputs.capital, inputs.steps
    )
}

pub fn clarifying_prompt(inputs: &PlanInputs) -> String {
    format!(
        "{}.\nI have {} euros.\nI have taken these steps: {}.",
        inputs.description, inputs.capital, inputs.steps
    )
}

pub fn plan_prompt(inputs: &PlanInputs, wildcard: &str) -> String {
    format!(
        "Create a business plan:\n{}.\nI have {} euro in capital.\nI have taken these steps: {}.\n{}",
        inputs.description, inputs.capital, inputs.steps, wildcard
    )
}

pub fn clarifying_messages(inputs: &PlanInputs) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(ADVISOR_ROLE),
        ChatMessage::user(clarifying_prompt(inputs)),
        ChatMessage::assistant(ASK_QUESTION),
    ]
}

pub fn plan_messages(inputs: &PlanInputs, wildcard: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(ADVISOR_ROLE),
        ChatMessage::user(plan_prompt(inputs, wildcard)),
        ChatMessage::assistant(WRITE_PLAN),
    ]
}

/// `/api/generate`: one user message, long output.
pub fn single_shot_request(inputs: &PlanInputs) -> CompletionRequest {
    CompletionRequest {
        messages: vec![ChatMessage::user(single_shot_prompt(inputs))],
        temperature: TEMPERATURE,
        max_tokens: Some(SINGLE_SHOT_MAX_TOKENS),
    }
}

/// `/api/createPrompt`: ask the model for one follow-up question.
pub fn clarifying_request(inputs: &PlanInputs) -> CompletionRequest {
    CompletionRequest {
        messages: clarifying_messages(inputs),
        temperature: TEMPERATURE,
        max_tokens: None,
    }
}

/// `/api/generatePlan`: full plan including the follow-up answer.
pub fn plan_request(inputs: &PlanInputs, wildcard: &str) -> CompletionRequest {
    CompletionRequest {
        messages: plan_messages(inputs, wildcard),
        temperature: TEMPERATURE,
        max_tokens: None,
    }
}
