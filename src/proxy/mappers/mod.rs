// Mappers 模块 - 协议转换与错误分类

pub mod error_classifier;
pub mod openai;
