use anyhow::Context;
use clap::Parser;
use ocean_proxy::api::build_app;
use ocean_proxy::proxy::config::{ProxyConfig, UpstreamProxyConfig};
use ocean_proxy::state::AppState;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    port: u16,

    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Upstream provider credential
    #[arg(long, env = "NVIDIA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Outbound request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 120)]
    request_timeout: u64,

    /// Outbound proxy for upstream calls (http://, https://, socks5://)
    #[arg(long, env = "UPSTREAM_PROXY")]
    upstream_proxy: Option<String>,

    /// Directory containing static frontend files (for production)
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = ProxyConfig {
        api_key: args.api_key,
        request_timeout: args.request_timeout,
        upstream_proxy: UpstreamProxyConfig::from_url(args.upstream_proxy),
        ..Default::default()
    };

    if config.credential().is_err() {
        tracing::warn!(
            "NVIDIA_API_KEY is not set; /api/ai will answer 500 until the server is restarted with a key"
        );
    }

    let state = AppState::new(config).map_err(anyhow::Error::msg)?;
    tracing::info!(
        "Forwarding chat requests to {} (model {}, timeout {}s)",
        state.upstream.chat_url(),
        state.upstream.model(),
        state.config.request_timeout
    );

    let app = build_app(Arc::new(state), args.static_dir.as_deref());

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Backend server running on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;

    Ok(())
}
