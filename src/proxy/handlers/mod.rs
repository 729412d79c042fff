// Handlers 模块 - API 端点处理器

pub mod chat;

pub use chat::handle_ai_chat;
