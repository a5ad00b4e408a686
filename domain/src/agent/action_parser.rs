//! Action parsing from model responses.
//!
//! Turns one backend response into a [`ParsedAction`]: a thought, a tool
//! call, a final answer, or nothing recognizable. Two input paths:
//!
//! ```text
//! Native tool use:  ToolUse { name, input }        → ToolCall (first block wins)
//! Text protocol:    Thought: / Action: / Action Input: / Answer:
//! ```
//!
//! Parsing is tolerant by construction: a malformed `Action Input:` payload
//! never fails the parse, it degrades to `{"input": <raw text>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::response::LlmResponse;
use crate::tool::entities::{ToolArguments, ToolCall};

const THOUGHT: &str = "Thought:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const OBSERVATION: &str = "Observation:";
const ANSWER: &str = "Answer:";

/// What a single model response asks the loop to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedAction {
    /// Reasoning without an action; the loop continues.
    Thought { text: String },
    /// The model wants a tool executed.
    ToolCall { call: ToolCall },
    /// Terminal answer.
    FinalAnswer { text: String },
    /// Nothing recognizable; the loop continues.
    Unparseable { raw_text: String },
}

impl ParsedAction {
    pub fn is_final(&self) -> bool {
        matches!(self, ParsedAction::FinalAnswer { .. })
    }

    pub fn tool_call(&self) -> Option<&ToolCall> {
        match self {
            ParsedAction::ToolCall { call } => Some(call),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParsedAction::Thought { .. } => "thought",
            ParsedAction::ToolCall { .. } => "tool_call",
            ParsedAction::FinalAnswer { .. } => "final_answer",
            ParsedAction::Unparseable { .. } => "unparseable",
        }
    }
}

/// Stateless parser for ReAct-style responses.
pub struct ActionParser;

impl ActionParser {
    /// Parse a backend response.
    ///
    /// Native tool-use blocks take precedence over text; only the first one
    /// is honoured since the loop executes one call per iteration.
    pub fn parse_response(response: &LlmResponse) -> ParsedAction {
        if let Some((id, name, input)) = response.tool_uses().next() {
            let name = name.trim();
            if name.is_empty() {
                return ParsedAction::Unparseable {
                    raw_text: response.text_content(),
                };
            }
            let call = ToolCall::from_native(id, name, Self::parse_native_arguments(input));
            return ParsedAction::ToolCall { call };
        }

        Self::parse_text(&response.text_content())
    }

    /// Parse a plain-text response in the ReAct format.
    pub fn parse_text(text: &str) -> ParsedAction {
        if let Some(idx) = text.rfind(ANSWER) {
            return ParsedAction::FinalAnswer {
                text: text[idx + ANSWER.len()..].trim().to_string(),
            };
        }

        let lines: Vec<&str> = text.lines().collect();

        if let Some(action_idx) = lines.iter().position(|l| l.trim_start().starts_with(ACTION)) {
            let name = lines[action_idx].trim_start()[ACTION.len()..].trim();
            if name.is_empty() {
                return ParsedAction::Unparseable {
                    raw_text: text.to_string(),
                };
            }

            let arguments = lines[action_idx + 1..]
                .iter()
                .position(|l| l.trim_start().starts_with(ACTION_INPUT))
                .map(|offset| {
                    let start = action_idx + 1 + offset;
                    Self::parse_payload(&Self::collect_payload(&lines, start))
                })
                .unwrap_or_default();

            return ParsedAction::ToolCall {
                call: ToolCall::new(name).with_arguments(arguments),
            };
        }

        if let Some(idx) = lines.iter().position(|l| l.trim_start().starts_with(THOUGHT)) {
            let thought = Self::collect_section(&lines, idx, THOUGHT);
            return ParsedAction::Thought { text: thought };
        }

        ParsedAction::Unparseable {
            raw_text: text.to_string(),
        }
    }

    /// Interpret an `Action Input:` payload.
    ///
    /// Tried in order: the first line as JSON, the whole payload as JSON,
    /// the outermost `{...}` span, then `{"input": payload}`. A JSON value
    /// that is not an object is wrapped as `{"input": value}`. An empty
    /// payload yields no arguments.
    pub fn parse_payload(payload: &str) -> ToolArguments {
        let payload = payload.trim();
        if payload.is_empty() {
            return ToolArguments::new();
        }

        let first_line = payload.lines().next().unwrap_or_default().trim();
        if let Some(arguments) = Self::parse_json(first_line) {
            return arguments;
        }
        if let Some(arguments) = Self::parse_json(payload) {
            return arguments;
        }
        if let (Some(start), Some(end)) = (payload.find('{'), payload.rfind('}'))
            && start < end
            && let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&payload[start..=end])
        {
            return ToolArguments::from(map);
        }

        ToolArguments::fallback(payload)
    }

    /// Interpret the `input` of a native tool-use block.
    pub fn parse_native_arguments(input: &Value) -> ToolArguments {
        match input {
            Value::Object(map) => ToolArguments::from(map.clone()),
            Value::String(s) => Self::parse_payload(s),
            Value::Null => ToolArguments::new(),
            other => ToolArguments::new().with("input", other.clone()),
        }
    }

    fn parse_json(candidate: &str) -> Option<ToolArguments> {
        match serde_json::from_str::<Value>(candidate).ok()? {
            Value::Object(map) => Some(ToolArguments::from(map)),
            other => Some(ToolArguments::new().with("input", other)),
        }
    }

    /// Payload of the `Action Input:` line at `start`, up to the next marker.
    fn collect_payload(lines: &[&str], start: usize) -> String {
        Self::collect_section(lines, start, ACTION_INPUT)
    }

    fn collect_section(lines: &[&str], start: usize, marker: &str) -> String {
        let head = lines[start].trim_start()[marker.len()..].trim();
        let mut parts = vec![head];
        parts.extend(
            lines[start + 1..]
                .iter()
                .take_while(|line| !Self::is_marker_line(line))
                .copied(),
        );
        parts.join("\n").trim().to_string()
    }

    fn is_marker_line(line: &str) -> bool {
        let line = line.trim_start();
        [THOUGHT, ACTION, OBSERVATION, ANSWER]
            .iter()
            .any(|marker| line.starts_with(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::response::{ContentBlock, StopReason};
    use serde_json::json;

    fn call_of(action: ParsedAction) -> ToolCall {
        match action {
            ParsedAction::ToolCall { call } => call,
            other => panic!("expected tool call, got {:?}", other),
        }
    }

    #[test]
    fn test_final_answer() {
        let action = ActionParser::parse_text("Thought: I know this.\nAnswer: 4");
        assert_eq!(action, ParsedAction::FinalAnswer { text: "4".into() });
        assert!(action.is_final());
    }

    #[test]
    fn test_answer_wins_over_action() {
        let text = "Thought: done\nAction: calculator\nAction Input: {\"expression\": \"1+1\"}\nAnswer: 2";
        assert_eq!(
            ActionParser::parse_text(text),
            ParsedAction::FinalAnswer { text: "2".into() }
        );
    }

    #[test]
    fn test_last_answer_marker_is_used() {
        let text = "Answer: draft\nFinal Answer:   the real one  ";
        assert_eq!(
            ActionParser::parse_text(text),
            ParsedAction::FinalAnswer {
                text: "the real one".into()
            }
        );
    }

    #[test]
    fn test_tool_call_with_json_input() {
        let text = "Thought: I need to compute\nAction: calculator\nAction Input: {\"expression\": \"2+2\"}";
        let call = call_of(ActionParser::parse_text(text));

        assert_eq!(call.tool_name, "calculator");
        assert_eq!(call.get_string("expression"), Some("2+2"));
        assert!(call.native_id.is_none());
    }

    #[test]
    fn test_multiline_json_input() {
        let text = "Action: get_weather\nAction Input: {\n  \"location\": \"Paris\",\n  \"unit\": \"c\"\n}\nObservation: (pending)";
        let call = call_of(ActionParser::parse_text(text));

        assert_eq!(call.get_string("location"), Some("Paris"));
        assert_eq!(call.get_string("unit"), Some("c"));
        assert_eq!(call.arguments.len(), 2);
    }

    #[test]
    fn test_embedded_json_in_fence() {
        let text = "Action: search\nAction Input: ```json\n{\"query\": \"rust\"}\n```";
        let call = call_of(ActionParser::parse_text(text));
        assert_eq!(call.get_string("query"), Some("rust"));
    }

    #[test]
    fn test_malformed_input_falls_back() {
        let text = "Action: calculator\nAction Input: 2 + 2 please";
        let call = call_of(ActionParser::parse_text(text));

        assert_eq!(call.tool_name, "calculator");
        assert!(!call.arguments.is_empty());
        assert_eq!(call.arguments.get_str("input"), Some("2 + 2 please"));
    }

    #[test]
    fn test_payload_stops_at_next_marker() {
        let text = "Action: search\nAction Input: rust\nlang\nThought: wait";
        let call = call_of(ActionParser::parse_text(text));
        assert_eq!(call.arguments.get_str("input"), Some("rust\nlang"));
    }

    #[test]
    fn test_non_object_json_is_wrapped() {
        let call = call_of(ActionParser::parse_text("Action: calculator\nAction Input: \"2+2\""));
        assert_eq!(call.arguments.get_str("input"), Some("2+2"));

        let call = call_of(ActionParser::parse_text("Action: calculator\nAction Input: 42"));
        assert_eq!(call.arguments.get("input"), Some(&json!(42)));
    }

    #[test]
    fn test_action_without_input() {
        let call = call_of(ActionParser::parse_text("Thought: list\nAction: list_files"));
        assert_eq!(call.tool_name, "list_files");
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_indented_markers() {
        let text = "  Thought: x\n  Action: search\n  Action Input: {\"query\": \"q\"}";
        let call = call_of(ActionParser::parse_text(text));
        assert_eq!(call.get_string("query"), Some("q"));
    }

    #[test]
    fn test_empty_action_name_is_unparseable() {
        let action = ActionParser::parse_text("Action:   \nAction Input: {}");
        assert_eq!(action.kind(), "unparseable");
    }

    #[test]
    fn test_thought_only() {
        let action = ActionParser::parse_text("Thought: I should think more\nabout this.");
        assert_eq!(
            action,
            ParsedAction::Thought {
                text: "I should think more\nabout this.".into()
            }
        );
    }

    #[test]
    fn test_plain_prose_is_unparseable() {
        let text = "The weather is nice today.";
        assert_eq!(
            ActionParser::parse_text(text),
            ParsedAction::Unparseable {
                raw_text: text.into()
            }
        );
        assert!(ActionParser::parse_text(text).tool_call().is_none());
    }

    #[test]
    fn test_native_tool_use_takes_precedence() {
        let response = LlmResponse {
            content: vec![
                ContentBlock::Text("Answer: ignored".into()),
                ContentBlock::ToolUse {
                    id: "call_1".into(),
                    name: "calculator".into(),
                    input: json!({"expression": "2+2"}),
                },
                ContentBlock::ToolUse {
                    id: "call_2".into(),
                    name: "search".into(),
                    input: json!({}),
                },
            ],
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        };

        let call = call_of(ActionParser::parse_response(&response));
        assert_eq!(call.tool_name, "calculator");
        assert_eq!(call.native_id.as_deref(), Some("call_1"));
        assert_eq!(call.get_string("expression"), Some("2+2"));
    }

    #[test]
    fn test_native_string_arguments() {
        let args = ActionParser::parse_native_arguments(&json!("{\"location\": \"Oslo\"}"));
        assert_eq!(args.get_str("location"), Some("Oslo"));

        let args = ActionParser::parse_native_arguments(&json!("{broken"));
        assert_eq!(args.get_str("input"), Some("{broken"));

        assert!(ActionParser::parse_native_arguments(&Value::Null).is_empty());
    }

    #[test]
    fn test_native_empty_name_is_unparseable() {
        let response = LlmResponse {
            content: vec![ContentBlock::ToolUse {
                id: "call_1".into(),
                name: " ".into(),
                input: json!({}),
            }],
            stop_reason: None,
            model: None,
        };
        assert_eq!(ActionParser::parse_response(&response).kind(), "unparseable");
    }

    #[test]
    fn test_text_response_goes_through_text_parser() {
        let response = LlmResponse::from_text("Answer: done");
        assert!(ActionParser::parse_response(&response).is_final());
    }
}
