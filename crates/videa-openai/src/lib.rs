//! Hosted-LLM client.
//!
//! Two call shapes: a stateless chat completion ([`OpenAiClient::chat_completion`])
//! and the stateful assistant-thread protocol
//! ([`OpenAiClient::ensure_assistant`] + [`OpenAiClient::run_assistant_with_prompt`]).
//! The run-poll loop is driven by a pure decision function so tests can
//! exercise slow and failed runs without wall-clock delays.

mod assistant;
mod client;
mod error;
mod types;

pub use assistant::{poll_decision, PollDecision};
pub use client::OpenAiClient;
pub use error::OpenAiError;
pub use types::RunStatus;
