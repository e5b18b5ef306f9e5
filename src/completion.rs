//! Completion client: forwards the augmented prompt to the remote completion
//! endpoint, retrying bounded on rate limiting, and extracts the answer text
//! or an error description.

use std::time::Duration;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::{json, Value};

use crate::config::CompletionConfig;

/// Fixed system instruction sent with every request.
pub const SYSTEM_PROMPT: &str = "you are a data analysis expert. You help users analyze their data files and answer questions based on the data provided.";

/// Total attempts per invocation: one initial request plus up to four retries.
pub const MAX_ATTEMPTS: u32 = 5;

/// Placeholder answer when a 200 response lacks the expected structure.
pub const UNEXPECTED_FORMAT: &str = "Unexpected response format.";

const STATUS_OK: u16 = 200;
const STATUS_RATE_LIMITED: u16 = 429;

/// Transport-level response. Wall-clock timeouts belong to the transport;
/// the client only owns the retry-count ceiling.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The HTTP boundary. Production uses `UreqTransport`; tests script
/// responses to drive the retry loop.
pub trait CompletionTransport {
    fn post_json(&self, url: &str, bearer_token: &str, payload: &Value) -> Result<HttpResponse>;
}

/// Blocking transport on ureq with a fixed request timeout.
pub struct UreqTransport {
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CompletionTransport for UreqTransport {
    fn post_json(&self, url: &str, bearer_token: &str, payload: &Value) -> Result<HttpResponse> {
        let request = ureq::post(url)
            .timeout(self.timeout)
            .set("Authorization", &format!("Bearer {}", bearer_token));
        match request.send_json(payload.clone()) {
            Ok(response) => {
                let status = response.status();
                let body = response.into_string()?;
                Ok(HttpResponse { status, body })
            }
            // Non-2xx still carries a response; surface it to the retry loop.
            Err(ureq::Error::Status(status, response)) => Ok(HttpResponse {
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(t)) => Err(eyre!("Request failed: {}", t)),
        }
    }
}

/// Result of one invocation: the extracted answer, or the error text that
/// becomes the assistant message instead. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Answer(String),
    Failed(String),
}

impl CompletionOutcome {
    /// The text appended to the conversation either way.
    pub fn into_text(self) -> String {
        match self {
            Self::Answer(text) | Self::Failed(text) => text,
        }
    }
}

/// How a response status steers the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    RetryableRateLimited,
    Terminal,
}

fn classify(status: u16) -> Disposition {
    if status == STATUS_RATE_LIMITED {
        Disposition::RetryableRateLimited
    } else {
        Disposition::Terminal
    }
}

pub struct CompletionClient {
    transport: Box<dyn CompletionTransport>,
    endpoint: String,
    model: String,
    bearer_token: String,
    retry_delay: Duration,
}

impl CompletionClient {
    /// Client with the production transport. The bearer credential is read
    /// from the environment variable named in the config; a missing variable
    /// yields an empty credential and the endpoint's authentication error.
    pub fn from_config(config: &CompletionConfig) -> Self {
        let bearer_token = std::env::var(&config.api_key_env).unwrap_or_default();
        let transport = UreqTransport::new(Duration::from_secs(config.timeout_seconds));
        Self::with_transport(Box::new(transport), config, bearer_token)
    }

    pub fn with_transport(
        transport: Box<dyn CompletionTransport>,
        config: &CompletionConfig,
        bearer_token: String,
    ) -> Self {
        Self {
            transport,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            bearer_token,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Sends the system instruction plus `user_prompt` and resolves to a
    /// terminal outcome. Rate-limited responses are retried up to
    /// `MAX_ATTEMPTS` total attempts with a fixed pause between them; the
    /// first non-rate-limit response exits the loop. The loop blocks the
    /// calling thread for its duration; there is no mid-retry cancellation.
    pub fn complete(&self, user_prompt: &str) -> CompletionOutcome {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt},
            ],
        });

        let mut response = match self.post(&payload) {
            Ok(response) => response,
            Err(e) => return CompletionOutcome::Failed(format!("{}", e)),
        };
        let mut attempts = 1;
        while classify(response.status) == Disposition::RetryableRateLimited
            && attempts < MAX_ATTEMPTS
        {
            if !self.retry_delay.is_zero() {
                std::thread::sleep(self.retry_delay);
            }
            response = match self.post(&payload) {
                Ok(response) => response,
                Err(e) => return CompletionOutcome::Failed(format!("{}", e)),
            };
            attempts += 1;
        }

        if response.status != STATUS_OK {
            return CompletionOutcome::Failed(format!(
                "API request failed with status code {}",
                response.status
            ));
        }
        extract_answer(&response.body)
    }

    fn post(&self, payload: &Value) -> Result<HttpResponse> {
        self.transport
            .post_json(&self.endpoint, &self.bearer_token, payload)
    }
}

/// Pulls `choices[0].message.content` out of a success body. Unparseable
/// JSON, a missing field, or a wrong type all recover to the fixed
/// placeholder rather than failing the invocation.
fn extract_answer(body: &str) -> CompletionOutcome {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return CompletionOutcome::Failed(UNEXPECTED_FORMAT.to_string()),
    };
    match value["choices"][0]["message"]["content"].as_str() {
        Some(content) => CompletionOutcome::Answer(content.to_string()),
        None => CompletionOutcome::Failed(UNEXPECTED_FORMAT.to_string()),
    }
}
