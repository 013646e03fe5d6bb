use async_trait::async_trait;
use chat_core::error::Result;
use chat_core::{AnswerError, AnswerReply, AnswerRequest, AnswerService, Config, GradingRequest};
use log::debug;
use reqwest::{Client, Method};
use serde::Serialize;

use crate::utils::http_utils::{
    build_http_client, execute_request, generic_server_error, read_error_detail,
};

/// HTTP implementation of the answering endpoint (`POST {api_base}/chat`).
#[derive(Debug, Clone)]
pub struct HttpAnswerClient {
    client: Client,
    chat_url: String,
}

impl HttpAnswerClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(config)
            .map_err(|e| AnswerError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, &config.api_base))
    }

    pub fn with_client(client: Client, api_base: &str) -> Self {
        Self {
            client,
            chat_url: format!("{}/chat", chat_core::config::normalize_base_url(api_base)),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    async fn post_for_answer<T: Serialize + ?Sized>(&self, body: &T) -> Result<AnswerReply> {
        let response = execute_request(&self.client, Method::POST, &self.chat_url, None, Some(body))
            .await
            .map_err(AnswerError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let detail = read_error_detail(response, &generic_server_error()).await;
            return Err(AnswerError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AnswerError::Transport(format!("Failed to read reply body: {e}")))?;
        debug!("Answer body: {} bytes", text.len());
        parse_answer(&text)
    }
}

/// A reply counts only if it carries a non-blank `answer` string.
pub fn parse_answer(body: &str) -> Result<AnswerReply> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AnswerError::Protocol(format!("reply is not valid JSON: {e}")))?;

    match value.get("answer").and_then(serde_json::Value::as_str) {
        Some(answer) if !answer.trim().is_empty() => Ok(AnswerReply {
            answer: answer.to_string(),
        }),
        Some(_) => Err(AnswerError::Protocol("reply has an empty `answer`".to_string())),
        None => Err(AnswerError::Protocol(
            "reply is missing the `answer` field".to_string(),
        )),
    }
}

#[async_trait]
impl AnswerService for HttpAnswerClient {
    async fn answer(&self, request: &AnswerRequest) -> Result<AnswerReply> {
        self.post_for_answer(request).await
    }

    async fn grade(&self, request: &GradingRequest) -> Result<AnswerReply> {
        self.post_for_answer(request).await
    }
}
