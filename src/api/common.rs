use axum::{extract::Request, middleware::Next, response::Response};

/// 访问日志：5xx 记为 error，4xx 记为 warn，其余 info
pub async fn request_logger(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis();
    if status.is_server_error() {
        tracing::error!("{} {} - status: {}, latency: {}ms", method, path, status, latency_ms);
    } else if status.is_client_error() {
        tracing::warn!("{} {} - status: {}, latency: {}ms", method, path, status, latency_ms);
    } else {
        tracing::info!("{} {} - status: {}, latency: {}ms", method, path, status, latency_ms);
    }
    response
}
