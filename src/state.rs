use crate::proxy::config::ProxyConfig;
use crate::proxy::upstream::UpstreamClient;

/// Web 应用状态
///
/// 启动时构建一次，之后所有请求只读共享
pub struct AppState {
    pub config: ProxyConfig,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Result<Self, String> {
        let upstream = UpstreamClient::new(&config)?;
        Ok(Self { config, upstream })
    }
}
