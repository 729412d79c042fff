// 上游 LLM 客户端
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::ProxyError;
use crate::proxy::config::ProxyConfig;
use crate::proxy::mappers::error_classifier::transport_error;
use crate::proxy::mappers::openai::{
    extract_completion, extract_error_message, transform_chat_request, ChatMessage, UpstreamReply,
};

/// 上游 chat-completions 客户端，启动时构建一次，按值克隆到每个请求
#[derive(Clone)]
pub struct UpstreamClient {
    http_client: Client,
    chat_url: String,
    model: String,
}

impl UpstreamClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, String> {
        let mut builder =
            Client::builder().timeout(Duration::from_secs(config.request_timeout.max(1)));

        if config.upstream_proxy.enabled && !config.upstream_proxy.url.is_empty() {
            config.upstream_proxy.validate()?;
            let proxy = reqwest::Proxy::all(&config.upstream_proxy.url)
                .map_err(|e| format!("Invalid upstream proxy: {}", e))?;
            builder = builder.proxy(proxy);
            info!("Outbound upstream proxy enabled");
        }

        let http_client = builder
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            chat_url: config.chat_completions_url(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// 发送一次 chat completion 请求，不重试
    pub async fn chat_completion(
        &self,
        request_id: &str,
        api_key: &str,
        history: &[ChatMessage],
    ) -> Result<UpstreamReply, ProxyError> {
        if api_key.trim().is_empty() {
            error!("[{}] Upstream API key is empty, refusing to call upstream", request_id);
            return Err(ProxyError::Configuration);
        }

        let request = transform_chat_request(history, &self.model);
        debug!(
            "[{}] Calling upstream model {} with {} messages",
            request_id,
            request.model,
            request.messages.len()
        );

        let response = self
            .http_client
            .post(&self.chat_url)
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(request_id, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&error_text)
                .ok()
                .and_then(|body| extract_error_message(&body))
                .unwrap_or_else(|| {
                    format!(
                        "Upstream API error: {}",
                        status.canonical_reason().unwrap_or("Unknown Status")
                    )
                });
            warn!(
                "[{}] Upstream API returned an error: {} {}",
                request_id, status, error_text
            );
            return Err(ProxyError::Upstream { status, message });
        }

        let raw = response
            .bytes()
            .await
            .map_err(|e| transport_error(request_id, e))?;
        let body: Value = serde_json::from_slice(&raw).map_err(|e| {
            error!(
                "[{}] Upstream answered {} with a body that is not valid JSON: {}",
                request_id, status, e
            );
            ProxyError::Transport {
                kind: "decode_error",
                detail: e.to_string(),
            }
        })?;

        let content = match extract_completion(&body) {
            Some(text) => text.to_string(),
            None => {
                error!("[{}] Upstream response contained no choices", request_id);
                return Err(ProxyError::EmptyResponse);
            }
        };

        Ok(UpstreamReply { raw, body, content })
    }
}
