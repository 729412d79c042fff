//! 代理服务配置
//! 启动时解析一次，之后只读

use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://integrate.api.nvidia.com";
pub const DEFAULT_MODEL: &str = "nvidia/llama-3.1-nemotron-70b-instruct";

/// 反代服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// 上游 API 密钥 (NVIDIA_API_KEY)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// 上游基础地址，不含 /v1 路径
    pub upstream_base_url: String,

    /// 固定模型 ID
    pub model: String,

    /// API 请求超时时间(秒)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// 上游代理配置
    #[serde(default)]
    pub upstream_proxy: UpstreamProxyConfig,
}

/// 上游代理配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamProxyConfig {
    /// 是否启用
    pub enabled: bool,
    /// 代理地址 (http://, https://, socks5://)
    pub url: String,
}

const SUPPORTED_PROXY_SCHEMES: [&str; 4] = ["http", "https", "socks5", "socks5h"];

impl UpstreamProxyConfig {
    pub fn from_url(url: Option<String>) -> Self {
        match url {
            Some(url) if !url.trim().is_empty() => Self { enabled: true, url },
            _ => Self::default(),
        }
    }

    /// 只接受 http/https/socks5/socks5h 代理
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        let scheme = self
            .url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .ok_or_else(|| "Upstream proxy URL must include a scheme".to_string())?;
        if SUPPORTED_PROXY_SCHEMES.contains(&scheme.as_str()) {
            Ok(())
        } else {
            Err(format!("Unsupported upstream proxy scheme: {}", scheme))
        }
    }
}

impl ProxyConfig {
    /// Credential precondition for every chat request. An empty key counts as missing.
    pub fn credential(&self) -> Result<&str, ProxyError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ProxyError::Configuration),
        }
    }

    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.upstream_base_url.trim_end_matches('/')
        )
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: default_request_timeout(),
            upstream_proxy: UpstreamProxyConfig::default(),
        }
    }
}

fn default_request_timeout() -> u64 {
    120 // 默认 120 秒
}
