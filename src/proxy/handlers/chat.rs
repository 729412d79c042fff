// Chat 代理处理器
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::ProxyError;
use crate::proxy::mappers::openai::extract_history;
use crate::state::AppState;

/// `POST /api/ai`
///
/// 注入系统提示词与凭证后转发到上游，成功时原样返回上游响应体
pub async fn handle_ai_chat(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ProxyError> {
    let request_id = format!("ai-{}", uuid::Uuid::new_v4().simple());
    info!("[{}] Received request at /api/ai", request_id);

    // 凭证检查先于读取请求体
    let api_key = match state.config.credential() {
        Ok(key) => key.to_string(),
        Err(e) => {
            error!(
                "[{}] NVIDIA_API_KEY is not set, rejecting request without calling upstream",
                request_id
            );
            return Err(e);
        }
    };

    let body = body.map_err(|rejection| {
        warn!("[{}] Request body rejected: {}", request_id, rejection);
        ProxyError::BodyRejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    })?;

    let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            warn!("[{}] Rejecting non-JSON body: {}", request_id, e);
            ProxyError::from(e)
        })?
    };
    let history = extract_history(&payload);

    // 上游调用在独立任务中执行：调用方断开后任务继续跑完，结果丢弃
    let upstream = state.upstream.clone();
    let task_request_id = request_id.clone();
    let call = tokio::spawn(async move {
        upstream
            .chat_completion(&task_request_id, &api_key, &history)
            .await
    });

    let reply = match call.await {
        Ok(result) => result?,
        Err(e) => {
            error!("[{}] Upstream task failed: {}", request_id, e);
            return Err(ProxyError::Transport {
                kind: "task_error",
                detail: e.to_string(),
            });
        }
    };

    info!(
        "[{}] Upstream replied ({} chars), relaying response",
        request_id,
        reply.content.chars().count()
    );
    Ok(([(header::CONTENT_TYPE, "application/json")], reply.raw).into_response())
}
