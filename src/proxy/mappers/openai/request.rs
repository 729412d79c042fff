// 调用方请求 → 上游请求转换
use super::models::*;
use serde_json::Value;

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1024;
pub const TOP_P: f32 = 1.0;

pub const SYSTEM_PROMPT: &str = "You are Shark AI, a marine data assistant. Always format your answers in a clear, structured way using Markdown.
- Use bullet points with a hyphen (-) for lists.
- Use indented plus signs (  +) for sub-bullets.
- Use numbered lists (1., 2.) when order matters.
- Use bold text ('**text**') for headings or key terms.
- When presenting tabular data, use Markdown tables, like this:
| Species         | Family      | Confidence |
| --------------- | ----------- | ---------- |
| Gadus morhua    | Gadidae     | 94%        |
| Salmo salar     | Salmonidae  | 89%        |
";

/// 从调用方 JSON 中取出对话历史
///
/// 接受 `{"messages": [...]}` 或裸数组；无法识别的条目跳过
pub fn extract_history(body: &Value) -> Vec<ChatMessage> {
    let entries: &[Value] = match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => match obj.get("messages") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => {
                tracing::warn!("Request body has no messages array, forwarding system prompt only");
                &[]
            }
        },
        _ => {
            tracing::warn!("Request body is neither an object nor an array");
            &[]
        }
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            match serde_json::from_value::<ChatMessage>(entry.clone()) {
                Ok(msg) => Some(msg),
                Err(e) => {
                    tracing::warn!("Skipping history entry #{}: {}", idx, e);
                    None
                }
            }
        })
        .collect()
}

/// 构建上游请求：系统提示词恰好出现一次，位于首位
///
/// 历史记录只读借用，重复调用不会累积系统提示词
pub fn transform_chat_request(history: &[ChatMessage], model: &str) -> UpstreamRequest {
    let system = ChatMessage::system(SYSTEM_PROMPT);
    let rest = match history.first() {
        Some(first) if *first == system => &history[1..],
        _ => history,
    };

    let mut messages = Vec::with_capacity(rest.len() + 1);
    messages.push(system);
    messages.extend_from_slice(rest);

    UpstreamRequest {
        model: model.to_string(),
        messages,
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
        top_p: TOP_P,
        stream: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn system_count(req: &UpstreamRequest) -> usize {
        req.messages
            .iter()
            .filter(|m| m.role == Role::System && m.content == SYSTEM_PROMPT)
            .count()
    }

    #[test]
    fn test_system_prompt_prepended_once() {
        let history = vec![
            ChatMessage::user("What lives at 200m?"),
            ChatMessage::assistant("Lanternfish, mostly."),
            ChatMessage::user("Show a table"),
        ];
        let req = transform_chat_request(&history, "test-model");

        assert_eq!(req.messages.len(), 4);
        assert_eq!(req.messages[0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(&req.messages[1..], history.as_slice());
        assert_eq!(system_count(&req), 1);
    }

    #[test]
    fn test_repeated_calls_do_not_duplicate_prompt() {
        let history = vec![ChatMessage::user("Identify species: striped fin")];
        let first = transform_chat_request(&history, "m");
        let second = transform_chat_request(&history, "m");

        assert_eq!(history.len(), 1);
        assert_eq!(system_count(&first), 1);
        assert_eq!(system_count(&second), 1);
        assert_eq!(first.messages, second.messages);
    }

    #[test]
    fn test_caller_supplied_prompt_is_not_doubled() {
        let history = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user("Interpret eDNA: ACGT"),
        ];
        let req = transform_chat_request(&history, "m");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(system_count(&req), 1);
    }

    #[test]
    fn test_other_system_messages_are_kept() {
        let history = vec![
            ChatMessage::system("Answer in French"),
            ChatMessage::user("Bonjour"),
        ];
        let req = transform_chat_request(&history, "m");
        assert_eq!(req.messages.len(), 3);
        assert_eq!(req.messages[1].content, "Answer in French");
    }

    #[test]
    fn test_fixed_generation_parameters_on_the_wire() {
        let req = transform_chat_request(&[ChatMessage::user("hi")], "nvidia/test");
        let wire = serde_json::to_value(&req).unwrap();

        assert_eq!(wire["model"], "nvidia/test");
        assert_eq!(wire["max_tokens"], 1024);
        assert_eq!(wire["top_p"], 1.0);
        assert_eq!(wire["stream"], false);
        assert!((wire["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(wire["messages"][0]["role"], "system");
        assert_eq!(wire["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_extract_history_from_spa_body() {
        let body = json!({
            "model": "ignored",
            "messages": [
                {"role": "user", "content": "Analyze ocean conditions: 18C"},
                {"role": "assistant", "content": "Warm."}
            ],
            "temperature": 0.1
        });
        let history = extract_history(&body);
        assert_eq!(
            history,
            vec![
                ChatMessage::user("Analyze ocean conditions: 18C"),
                ChatMessage::assistant("Warm.")
            ]
        );
    }

    #[test]
    fn test_extract_history_from_bare_array() {
        let body = json!([{"role": "user", "content": "hello"}]);
        assert_eq!(extract_history(&body), vec![ChatMessage::user("hello")]);
    }

    #[test]
    fn test_extract_history_skips_malformed_entries() {
        let body = json!({
            "messages": [
                {"role": "tool", "content": "x"},
                {"role": "user"},
                42,
                {"role": "user", "content": "kept"}
            ]
        });
        assert_eq!(extract_history(&body), vec![ChatMessage::user("kept")]);
    }

    #[test]
    fn test_extract_history_without_messages_is_empty() {
        assert!(extract_history(&json!({"model": "x"})).is_empty());
        assert!(extract_history(&json!("text")).is_empty());
        assert!(extract_history(&json!(null)).is_empty());
    }
}
