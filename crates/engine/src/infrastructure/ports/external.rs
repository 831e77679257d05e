//! External service port traits (generation gateway).

use async_trait::async_trait;

use super::error::LlmError;

/// One fully-assembled generation request.
///
/// The context assembler produces the complete payload; the adapter only
/// transports it. `contents` is the single user-role message carrying the
/// serialized story state and current command.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// System instruction establishing author behavior and the action.
    pub system_instruction: String,
    /// The serialized story context plus current command.
    pub contents: String,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Thinking-token budget for reasoning models.
    pub thinking_budget: Option<u32>,
}

impl LlmRequest {
    pub fn new(system_instruction: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            contents: contents.into(),
            temperature: None,
            thinking_budget: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }
}

/// Response from the generator.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The generated narrative text. May be empty, which callers treat the
    /// same as a failed request.
    pub text: String,
}

/// The generation gateway: a stateless text-in, text-out call.
///
/// Failures are uniform; implementations must not retry on their own
/// (recovery is writer-initiated).
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}
