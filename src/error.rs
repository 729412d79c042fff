//! 代理错误类型
//! 所有失败分支最终都转换成 `{"error": "..."}` 返回给调用方

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const MISSING_API_KEY_MESSAGE: &str = "Server configuration error: Missing API Key.";
pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON body";
pub const UPSTREAM_UNREACHABLE_MESSAGE: &str = "Failed to contact upstream API";

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// 未配置上游凭证
    #[error("upstream API key is not configured")]
    Configuration,

    /// 请求体不是合法 JSON
    #[error("request body is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// 请求体读取失败 (如超过大小限制)
    #[error("request body rejected ({status}): {message}")]
    BodyRejected { status: StatusCode, message: String },

    /// 上游返回了非 2xx 状态
    #[error("upstream returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    /// 网络层失败 (DNS/TLS/连接重置/超时/响应体损坏)
    #[error("transport failure ({kind}): {detail}")]
    Transport { kind: &'static str, detail: String },

    /// 2xx 响应但没有可用的 choices
    #[error("upstream response contained no usable choices")]
    EmptyResponse,
}

/// Error body returned on every failure branch.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::BodyRejected { status, .. } | ProxyError::Upstream { status, .. } => {
                *status
            }
            ProxyError::Transport { .. } | ProxyError::EmptyResponse => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回给调用方的消息，不包含任何内部细节
    pub fn public_message(&self) -> String {
        match self {
            ProxyError::Configuration => MISSING_API_KEY_MESSAGE.to_string(),
            ProxyError::InvalidBody(_) => INVALID_BODY_MESSAGE.to_string(),
            ProxyError::BodyRejected { message, .. } | ProxyError::Upstream { message, .. } => {
                message.clone()
            }
            ProxyError::Transport { .. } | ProxyError::EmptyResponse => {
                UPSTREAM_UNREACHABLE_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
