// 上游响应解析
use serde_json::Value;

/// 提取 `choices[0].message.content`
pub fn extract_completion(upstream_response: &Value) -> Option<&str> {
    upstream_response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
}

/// 从上游错误体中取出 `error` 字段
///
/// 字符串原样返回；对象优先取其 `message`，否则返回其 JSON 文本
pub fn extract_error_message(error_body: &Value) -> Option<String> {
    match error_body.get("error")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => match obj.get("message").and_then(|m| m.as_str()) {
            Some(message) if !message.is_empty() => Some(message.to_string()),
            _ => Some(Value::Object(obj.clone()).to_string()),
        },
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
