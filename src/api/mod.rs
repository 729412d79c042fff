use crate::proxy::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

pub mod common;
mod health;

pub use health::{health_check, HealthStatus};

pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/ai", post(handlers::handle_ai_chat))
        .with_state(state)
}

/// 完整应用：API 路由 + CORS + 请求日志，可选托管前端静态文件
pub fn build_app(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let app = build_routes(state);

    let app = match static_dir {
        Some(static_dir) => {
            let index_path = static_dir.join("index.html");
            if static_dir.is_dir() && index_path.exists() {
                tracing::info!("Serving static files from {:?}", static_dir);
                // API 路由优先，未匹配的 SPA 路由回退到 index.html
                let serve_dir = ServeDir::new(static_dir)
                    .append_index_html_on_directories(true)
                    .fallback(ServeFile::new(&index_path));
                app.fallback_service(serve_dir)
            } else {
                tracing::warn!("Static directory {:?} or index.html not found", static_dir);
                app
            }
        }
        None => app,
    };

    app.layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(common::request_logger))
            .layer(CorsLayer::permissive()),
    )
}
