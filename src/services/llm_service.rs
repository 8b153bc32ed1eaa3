use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMessage {
    pub role: Role,
    pub content: String,
}

impl ModelMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One completion request: the exchange so far plus the next message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub history: Vec<ModelMessage>,
    pub message: ModelMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Usage or rate limit hit on the remote side; worth retrying after a pause.
    #[error("model quota exceeded: {0}")]
    Quota(String),

    #[error("model request failed: {0}")]
    Other(String),
}

/// Remote text-completion capability used by the chat session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ModelRequest) -> Result<String, ModelError>;
}

/// Maps a non-success HTTP status to the retry class the session cares about.
pub fn classify_status(status: StatusCode, body: &str) -> ModelError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        ModelError::Quota(body.to_string())
    } else {
        ModelError::Other(format!("HTTP {}: {}", status.as_u16(), body))
    }
}

/// `ChatModel` over an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiChatModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiChatModel {
    pub fn new(api_key: String, model: String, base_url: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, request: ModelRequest) -> Result<String, ModelError> {
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            temperature: f32,
            messages: Vec<ModelMessage>,
        }
        #[derive(Deserialize)]
        struct RespChoiceMsg {
            content: Option<String>,
        }
        #[derive(Deserialize)]
        struct RespChoice {
            message: RespChoiceMsg,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<RespChoice>,
        }

        let mut messages = request.history;
        messages.push(request.message);

        let req = Req {
            model: &self.model,
            temperature: 0.7,
            messages,
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&req)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .map_err(|e| ModelError::Other(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(classify_status(status, &text));
        }

        let body: Resp = res
            .json()
            .await
            .map_err(|e| ModelError::Other(format!("Invalid response body: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ModelError::Other("Empty completion".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_requests_is_quota() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert_eq!(err, ModelError::Quota("slow down".to_string()));
    }

    #[test]
    fn other_statuses_are_not_retried() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            let err = classify_status(status, "nope");
            assert!(
                matches!(err, ModelError::Other(_)),
                "{} classified as quota",
                status
            );
        }
    }

    #[test]
    fn messages_serialize_with_lowercase_roles() {
        let json = serde_json::to_value(ModelMessage::system("be brief")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "system", "content": "be brief"}));
    }
}
