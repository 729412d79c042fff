// proxy 模块 - 上游 LLM 反代

pub mod config;
pub mod handlers; // API 端点处理器
pub mod mappers; // 协议转换器
pub mod upstream; // 上游客户端

pub use config::ProxyConfig;
pub use upstream::UpstreamClient;
