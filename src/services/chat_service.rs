use crate::config::{Config, DEFAULT_EXIT_KEYWORDS};
use crate::services::llm_service::{ChatModel, ModelError, ModelMessage, ModelRequest};
use crate::services::prompts;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Pacing, retry and wording knobs for one chat session. Fixed at startup.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    pub min_request_delay: Duration,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    pub exit_keywords: Vec<String>,
    pub min_technical_questions: usize,
    pub max_technical_questions: usize,
}

impl SessionPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_request_delay: Duration::from_secs(config.min_request_delay_secs),
            max_attempts: config.max_retries.max(1),
            retry_backoff: Duration::from_secs(config.retry_backoff_secs),
            exit_keywords: config.exit_keywords.clone(),
            min_technical_questions: config.min_technical_questions,
            max_technical_questions: config.max_technical_questions,
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            min_request_delay: Duration::from_secs(6),
            max_attempts: 3,
            retry_backoff: Duration::from_secs(6),
            exit_keywords: DEFAULT_EXIT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            min_technical_questions: 3,
            max_technical_questions: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// System instructions not delivered yet.
    Fresh,
    Active,
    /// Terminal until `reset`.
    Ended,
}

/// The single ongoing dialogue with the remote model.
///
/// Every outbound turn waits for the minimum inter-request delay, then goes
/// through `send_with_retry`, which retries quota errors with a fixed backoff
/// and gives up immediately on anything else. Callers always get a
/// presentable string back; failures are logged and replaced by fallbacks.
pub struct ChatSession {
    model: Arc<dyn ChatModel>,
    policy: SessionPolicy,
    history: Vec<ModelMessage>,
    system_sent: bool,
    ended: bool,
    last_request: Option<Instant>,
}

impl ChatSession {
    pub fn new(model: Arc<dyn ChatModel>, policy: SessionPolicy) -> Self {
        Self {
            model,
            policy,
            history: Vec::new(),
            system_sent: false,
            ended: false,
            last_request: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.ended {
            SessionState::Ended
        } else if self.system_sent {
            SessionState::Active
        } else {
            SessionState::Fresh
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Messages the remote model has seen and answered, in order.
    pub fn history(&self) -> &[ModelMessage] {
        &self.history
    }

    pub fn is_exit_request(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.policy
            .exit_keywords
            .iter()
            .any(|k| lowered.contains(&k.to_lowercase()))
    }

    pub async fn start(&mut self) -> String {
        if self.ended {
            return prompts::ENDED_MESSAGE.to_string();
        }

        self.wait_for_slot().await;
        self.ensure_system_prompt().await;
        let reply = self
            .send_with_retry(ModelMessage::user(prompts::GREETING_PROMPT))
            .await;
        self.last_request = Some(Instant::now());

        reply.unwrap_or_else(|| {
            tracing::warn!("Greeting request failed, using fallback greeting");
            prompts::GREETING_FALLBACK.to_string()
        })
    }

    pub async fn respond(&mut self, user_text: &str) -> String {
        if self.ended {
            return prompts::ENDED_MESSAGE.to_string();
        }
        if self.is_exit_request(user_text) {
            tracing::info!("Exit keyword detected, wrapping up conversation");
            return self.end().await;
        }

        self.wait_for_slot().await;
        self.ensure_system_prompt().await;
        let reply = self.send_with_retry(ModelMessage::user(user_text)).await;
        self.last_request = Some(Instant::now());

        reply.unwrap_or_else(|| prompts::TROUBLE_FALLBACK.to_string())
    }

    /// Asks the model for a closing message and ends the session whatever the outcome.
    pub async fn end(&mut self) -> String {
        if self.ended {
            return prompts::ENDED_MESSAGE.to_string();
        }

        self.wait_for_slot().await;
        let reply = self
            .send_with_retry(ModelMessage::user(prompts::WRAP_UP_PROMPT))
            .await;
        self.last_request = Some(Instant::now());
        self.ended = true;

        reply.unwrap_or_else(|| prompts::GOODBYE_FALLBACK.to_string())
    }

    /// Back to `Fresh`: history and flags cleared, instructions resent on the next turn.
    /// The pacing clock is kept since it tracks the remote service, not the conversation.
    pub fn reset(&mut self) {
        self.history.clear();
        self.system_sent = false;
        self.ended = false;
    }

    async fn ensure_system_prompt(&mut self) {
        if self.system_sent {
            return;
        }
        let prompt = prompts::system_prompt(
            self.policy.min_technical_questions,
            self.policy.max_technical_questions,
            &self.policy.exit_keywords,
        );
        match self.send_with_retry(ModelMessage::system(prompt)).await {
            Some(_) => self.system_sent = true,
            None => tracing::error!("Failed to deliver system instructions; will retry next turn"),
        }
    }

    async fn wait_for_slot(&self) {
        let Some(last) = self.last_request else { return };
        let elapsed = last.elapsed();
        if elapsed < self.policy.min_request_delay {
            let wait = self.policy.min_request_delay - elapsed;
            tracing::info!(
                "Waiting {:.2} seconds to comply with model rate limits",
                wait.as_secs_f64()
            );
            sleep(wait).await;
        }
    }

    /// Sends `message` and records the exchange on success. Only the successful
    /// attempt ends up in `history`.
    async fn send_with_retry(&mut self, message: ModelMessage) -> Option<String> {
        let max_attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let request = ModelRequest {
                history: self.history.clone(),
                message: message.clone(),
            };
            match self.model.complete(request).await {
                Ok(text) => {
                    self.history.push(message);
                    self.history.push(ModelMessage::assistant(text.clone()));
                    return Some(text);
                }
                Err(ModelError::Quota(detail)) => {
                    if attempt < max_attempts {
                        tracing::warn!(
                            attempt,
                            detail = %detail,
                            "Model quota hit, retrying in {} seconds",
                            self.policy.retry_backoff.as_secs_f64()
                        );
                        sleep(self.policy.retry_backoff).await;
                    } else {
                        tracing::error!(attempt, detail = %detail, "Model quota hit, giving up");
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "Model request failed");
                    return None;
                }
            }
        }
        None
    }
}
