//! HTTP client for the hosted-LLM API.
//!
//! Requests go through the shared [`RetryPolicy`] (429s only); API-level
//! errors surface as [`OpenAiError::Api`] with the provider's message.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde_json::json;
use tokio::time::Instant;

use videa_core::RetryPolicy;

use crate::assistant::{poll_decision, PollDecision};
use crate::error::{is_rate_limited, OpenAiError};
use crate::types::{
    AssistantObject, ChatCompletionResponse, MessageListResponse, RunObject, ThreadObject,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Placeholder value shipped in `.env` templates; treated as unset.
const PLACEHOLDER_ASSISTANT_ID: &str = "asst_YourAssistantID";

const ASSISTANT_NAME: &str = "Videa Video Idea Generator";
const ASSISTANT_DESCRIPTION: &str =
    "An assistant that generates viral video ideas based on YouTube trends and user preferences";
const ASSISTANT_MODEL: &str = "gpt-4-turbo-preview";
const ASSISTANT_INSTRUCTIONS: &str = "You are an AI assistant for Videa, an application that helps content creators generate viral video ideas based on trending topics and data analysis.\n\nYour role is to create original, engaging video concepts that have viral potential. You should:\n1. Analyze trending topics and data\n2. Generate creative ideas that leverage current trends\n3. Provide specific, actionable video concepts\n4. Format your responses as clean JSON only\n5. Always respond with a well-structured idea that includes title, concept, hashtags, and other required fields\n6. Never include text outside the JSON response\n\nWhen improving ideas, focus on the user's specific feedback while maintaining the strengths of the original concept.";

const COMPLETION_TEMPERATURE: f32 = 0.7;
const COMPLETION_MAX_TOKENS: u32 = 1500;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the hosted-LLM API (completions + assistants).
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
    retry: RetryPolicy,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl OpenAiClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`OpenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, OpenAiError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OpenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`OpenAiError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, OpenAiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("videa/0.1 (idea-synthesis)")
            .build()?;

        // Normalise: the base URL must end with exactly one slash so that
        // Url::join appends paths instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| OpenAiError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            model: model.to_owned(),
            retry: RetryPolicy::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        })
    }

    /// Overrides the retry policy (tests use a zero-delay policy).
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Overrides the run-poll interval and ceiling (tests shrink both to
    /// milliseconds).
    #[must_use]
    pub fn with_poll_timing(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    /// One stateless text generation: sends `prompt` as a single user
    /// message and returns the model's reply text.
    ///
    /// # Errors
    ///
    /// Returns [`OpenAiError::EmptyResponse`] when the model returns no
    /// usable text, or [`OpenAiError`] on transport/API/parse failure.
    pub async fn chat_completion(&self, prompt: &str) -> Result<String, OpenAiError> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": COMPLETION_TEMPERATURE,
            "max_tokens": COMPLETION_MAX_TOKENS,
        });

        let response: ChatCompletionResponse = self
            .request_json(
                Method::POST,
                "chat/completions",
                Some(&body),
                false,
                "chat.completions",
            )
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(OpenAiError::EmptyResponse)
    }

    /// Resolves a usable assistant id, idempotently.
    ///
    /// If `configured` names a real assistant it is reused; otherwise a new
    /// assistant is created with the fixed instructions. The created id is
    /// not persisted anywhere; callers cache it in-process.
    ///
    /// # Errors
    ///
    /// Returns [`OpenAiError`] if the create call fails. A failed retrieve
    /// of the configured id is tolerated and falls through to creation.
    pub async fn ensure_assistant(&self, configured: Option<&str>) -> Result<String, OpenAiError> {
        if let Some(id) = configured.filter(|id| !id.is_empty() && *id != PLACEHOLDER_ASSISTANT_ID)
        {
            match self
                .request_json::<AssistantObject>(
                    Method::GET,
                    &format!("assistants/{id}"),
                    None,
                    true,
                    "assistants.retrieve",
                )
                .await
            {
                Ok(assistant) => return Ok(assistant.id),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "could not find existing assistant, will create a new one"
                    );
                }
            }
        }

        tracing::info!("creating new assistant");
        let body = json!({
            "name": ASSISTANT_NAME,
            "description": ASSISTANT_DESCRIPTION,
            "model": ASSISTANT_MODEL,
            "instructions": ASSISTANT_INSTRUCTIONS,
        });
        let assistant: AssistantObject = self
            .request_json(
                Method::POST,
                "assistants",
                Some(&body),
                true,
                "assistants.create",
            )
            .await?;

        tracing::info!(assistant_id = %assistant.id, "created assistant");
        Ok(assistant.id)
    }

    /// Runs `prompt` on a fresh thread of `assistant_id` and returns the
    /// assistant's reply text.
    ///
    /// Creates a thread, posts the prompt, starts a run, then polls at the
    /// configured interval until [`poll_decision`] reports a terminal state
    /// or the timeout ceiling.
    ///
    /// # Errors
    ///
    /// - [`OpenAiError::RunFailed`] if the run ends failed/cancelled/expired.
    /// - [`OpenAiError::RunTimeout`] if the ceiling elapses first.
    /// - [`OpenAiError::EmptyResponse`] if the completed thread has no
    ///   assistant text.
    pub async fn run_assistant_with_prompt(
        &self,
        assistant_id: &str,
        prompt: &str,
    ) -> Result<String, OpenAiError> {
        let thread: ThreadObject = self
            .request_json(
                Method::POST,
                "threads",
                Some(&json!({})),
                true,
                "threads.create",
            )
            .await?;

        let _: serde_json::Value = self
            .request_json(
                Method::POST,
                &format!("threads/{}/messages", thread.id),
                Some(&json!({ "role": "user", "content": prompt })),
                true,
                "threads.messages.create",
            )
            .await?;

        let run: RunObject = self
            .request_json(
                Method::POST,
                &format!("threads/{}/runs", thread.id),
                Some(&json!({ "assistant_id": assistant_id })),
                true,
                "threads.runs.create",
            )
            .await?;

        let started = Instant::now();
        let mut status = run.status;
        loop {
            match poll_decision(status, started.elapsed(), self.poll_timeout) {
                PollDecision::Complete => break,
                PollDecision::Fail(terminal) => {
                    return Err(OpenAiError::RunFailed(terminal.to_string()));
                }
                PollDecision::TimedOut => return Err(OpenAiError::RunTimeout),
                PollDecision::Continue => {
                    tokio::time::sleep(self.poll_interval).await;
                    let polled: RunObject = self
                        .request_json(
                            Method::GET,
                            &format!("threads/{}/runs/{}", thread.id, run.id),
                            None,
                            true,
                            "threads.runs.retrieve",
                        )
                        .await?;
                    status = polled.status;
                }
            }
        }

        let messages: MessageListResponse = self
            .request_json(
                Method::GET,
                &format!("threads/{}/messages", thread.id),
                None,
                true,
                "threads.messages.list",
            )
            .await?;

        // Messages arrive newest-first; take the latest assistant reply.
        messages
            .data
            .into_iter()
            .find(|message| message.role == "assistant")
            .and_then(|message| {
                message
                    .content
                    .into_iter()
                    .find(|content| content.kind == "text")
                    .and_then(|content| content.text)
            })
            .map(|text| text.value)
            .filter(|value| !value.trim().is_empty())
            .ok_or(OpenAiError::EmptyResponse)
    }

    /// Sends one request through the retry policy, asserts a 2xx status,
    /// and parses the body into `T`. `beta` attaches the assistants opt-in
    /// header.
    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        beta: bool,
        context: &str,
    ) -> Result<T, OpenAiError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|_| OpenAiError::InvalidBaseUrl(path.to_owned()))?;

        let text = self
            .retry
            .run(is_rate_limited, || async {
                let mut request = self
                    .client
                    .request(method.clone(), url.clone())
                    .bearer_auth(&self.api_key);
                if beta {
                    request = request.header("OpenAI-Beta", "assistants=v2");
                }
                if let Some(body) = body {
                    request = request.json(body);
                }

                let response = request.send().await?;
                let status = response.status();
                let text = response.text().await?;
                if !status.is_success() {
                    return Err(OpenAiError::Api {
                        status: status.as_u16(),
                        message: api_error_message(&text),
                    });
                }
                Ok(text)
            })
            .await?;

        serde_json::from_str(&text).map_err(|e| OpenAiError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Extracts `error.message` from an API error body, falling back to the raw
/// body (truncated) when the shape is unexpected.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}
