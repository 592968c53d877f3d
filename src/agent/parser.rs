//! Parsing of model responses into loop decisions.
//!
//! A response is JSON, optionally wrapped in a code fence with a `json` tag.
//! It either requests a tool (`{"action": {"name": ..., "input": ...}}`) or
//! answers (`{"answer": ...}`).

use serde_json::Value;
use thiserror::Error;

use super::session::Action;
use crate::tools::{ToolName, UnknownToolName};

/// What the model asked the loop to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Invoke `tool` (or nothing, for [`ToolName::None`]).
    Act { tool: ToolName, action: Action },
    /// Finish with this answer.
    Answer(String),
}

#[derive(Debug, Error)]
pub enum DecideError {
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid response format")]
    InvalidFormat,

    #[error("Action is missing a tool name")]
    MissingToolName,

    #[error(transparent)]
    UnknownTool(#[from] UnknownToolName),
}

impl DecideError {
    /// Text recorded on the iteration and fed back to the model.
    pub fn recovery_message(&self) -> String {
        match self {
            DecideError::Malformed(e) => format!(
                "I encountered an error in processing. Let me try again. Error: {}",
                e
            ),
            other => format!(
                "I encountered an unexpected error. Let me try a different approach. Error: {}",
                other
            ),
        }
    }
}

/// Strip whitespace, code fences and a leading `json` tag.
pub fn clean_response(raw: &str) -> &str {
    let cleaned = raw.trim().trim_matches('`').trim();
    cleaned.strip_prefix("json").map(str::trim).unwrap_or(cleaned)
}

/// Turn a raw model response into a [`Decision`].
pub fn parse_decision(raw: &str) -> Result<Decision, DecideError> {
    let payload: Value = serde_json::from_str(clean_response(raw))?;
    let object = payload.as_object().ok_or(DecideError::InvalidFormat)?;

    if let Some(action) = object.get("action") {
        let name = action
            .get("name")
            .and_then(Value::as_str)
            .ok_or(DecideError::MissingToolName)?;
        let tool: ToolName = name.parse()?;
        let input = match action.get("input") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        return Ok(Decision::Act {
            tool,
            action: Action {
                name: name.to_string(),
                input,
            },
        });
    }

    if let Some(answer) = object.get("answer") {
        let text = match answer {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Ok(Decision::Answer(text));
    }

    Err(DecideError::InvalidFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_response_strips_fences() {
        assert_eq!(clean_response("  ```json\n{\"answer\": 1}\n```  "), "{\"answer\": 1}");
        assert_eq!(clean_response("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(clean_response("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_answer() {
        let decision = parse_decision(r#"{"thought": "done", "answer": "Brazil"}"#).unwrap();
        assert_eq!(decision, Decision::Answer("Brazil".to_string()));
    }

    #[test]
    fn test_non_string_answer_is_rendered_as_json() {
        let decision = parse_decision(r#"{"answer": 42}"#).unwrap();
        assert_eq!(decision, Decision::Answer("42".to_string()));
    }

    #[test]
    fn test_action_takes_precedence_over_answer() {
        let raw = "```json\n{\"action\": {\"name\": \"Wikipedia\", \"input\": \"Brazil\"}, \"answer\": \"x\"}\n```";
        let decision = parse_decision(raw).unwrap();
        assert_eq!(
            decision,
            Decision::Act {
                tool: ToolName::Wikipedia,
                action: Action {
                    name: "Wikipedia".to_string(),
                    input: Some("Brazil".to_string()),
                },
            }
        );
    }

    #[test]
    fn test_action_without_input() {
        let decision = parse_decision(r#"{"action": {"name": "google", "input": null}}"#).unwrap();
        match decision {
            Decision::Act { tool, action } => {
                assert_eq!(tool, ToolName::Google);
                assert_eq!(action.input, None);
            }
            other => panic!("expected action, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_decision("I think the answer is 4").unwrap_err();
        assert!(matches!(err, DecideError::Malformed(_)));
        assert!(err
            .recovery_message()
            .starts_with("I encountered an error in processing. Let me try again. Error: "));
    }

    #[test]
    fn test_missing_keys_is_invalid_format() {
        let err = parse_decision(r#"{"thought": "still thinking"}"#).unwrap_err();
        assert!(matches!(err, DecideError::InvalidFormat));
        assert_eq!(
            err.recovery_message(),
            "I encountered an unexpected error. Let me try a different approach. Error: Invalid response format"
        );
    }

    #[test]
    fn test_non_object_is_invalid_format() {
        assert!(matches!(parse_decision("[1, 2]"), Err(DecideError::InvalidFormat)));
        assert!(matches!(parse_decision("\"answer\""), Err(DecideError::InvalidFormat)));
    }

    #[test]
    fn test_unknown_and_missing_tool_names() {
        let err = parse_decision(r#"{"action": {"name": "bing"}}"#).unwrap_err();
        assert!(matches!(err, DecideError::UnknownTool(_)));
        assert!(err.recovery_message().contains("unknown tool name: bing"));

        let err = parse_decision(r#"{"action": {"input": "x"}}"#).unwrap_err();
        assert!(matches!(err, DecideError::MissingToolName));
    }
}
