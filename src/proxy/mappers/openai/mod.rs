// OpenAI 兼容协议映射

pub mod models;
pub mod request;
pub mod response;

pub use models::*;
pub use request::*;
pub use response::*;
