// 错误分类模块 - 将底层网络错误归类，仅用于服务端日志
use reqwest::Error;

use crate::error::ProxyError;

/// 分类上游调用的网络错误
///
/// 返回值: (错误类型, 排查提示)
pub fn classify_transport_error(error: &Error) -> (&'static str, &'static str) {
    if error.is_timeout() {
        (
            "timeout_error",
            "Upstream did not answer within the request timeout",
        )
    } else if error.is_connect() {
        (
            "connection_error",
            "Connection failed, check DNS, TLS and the upstream proxy setting",
        )
    } else if error.is_decode() {
        (
            "decode_error",
            "Upstream answered 2xx with a body that is not valid JSON",
        )
    } else if error.is_body() {
        ("body_error", "Upstream response body was interrupted")
    } else if error.is_builder() {
        ("builder_error", "Outbound request could not be built")
    } else {
        ("unknown_error", "Unknown transport error")
    }
}

/// 记录完整错误并转换为对外只暴露通用消息的 [`ProxyError::Transport`]
pub fn transport_error(request_id: &str, error: Error) -> ProxyError {
    let (kind, hint) = classify_transport_error(&error);
    tracing::error!(
        "[{}] Failed to contact upstream API ({}): {}. {}",
        request_id,
        kind,
        error,
        hint
    );
    ProxyError::Transport {
        kind,
        detail: error.to_string(),
    }
}
