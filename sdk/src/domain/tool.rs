// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Tool
//!
//! Contract for tool capability apps: a single-shot action the agent can call.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Defines the `ToolHandler` interface and its approval refinement

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Interface for tool capability apps.
/// Implement this to give Nebo's agent a new tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Tool name as shown to the agent
    fn name(&self) -> String;

    /// Human-readable description of what the tool does
    fn description(&self) -> String;

    /// JSON Schema for the tool input (see [`crate::domain::schema::ToolSchema`])
    fn schema(&self) -> Value;

    /// Run the tool. An `Err` is reported back to the agent as tool output
    /// with the error flag set, not as a transport failure. That includes
    /// input the handler cannot parse.
    async fn execute(&self, input: ToolInput) -> anyhow::Result<String>;

    /// Optional refinement: tools that need user confirmation return `Some`.
    fn approval(&self) -> Option<&dyn RequiresApproval> {
        None
    }
}

/// Refinement for tools that require user confirmation before running
pub trait RequiresApproval: Send + Sync {
    fn requires_approval(&self) -> bool;
}

/// Raw tool input exactly as the host sent it.
///
/// Usually JSON matching the tool's schema, but nothing checks that before
/// the handler runs. Use [`ToolInput::parse`] or [`ToolInput::json`] to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolInput(Vec<u8>);

impl ToolInput {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode into a typed argument struct. Empty input decodes as `null`.
    pub fn parse<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        if self.0.is_empty() {
            return serde_json::from_value(Value::Null);
        }
        serde_json::from_slice(&self.0)
    }

    /// Decode into an untyped JSON value. Empty input is `null`.
    pub fn json(&self) -> serde_json::Result<Value> {
        self.parse()
    }
}

impl From<Vec<u8>> for ToolInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for ToolInput {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl From<&Value> for ToolInput {
    fn from(value: &Value) -> Self {
        Self(value.to_string().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Args {
        a: f64,
    }

    #[test]
    fn test_parse_typed_arguments() {
        let input = ToolInput::from(r#"{"a": 2.5}"#);
        assert_eq!(input.parse::<Args>().unwrap(), Args { a: 2.5 });
    }

    #[test]
    fn test_empty_input_is_null() {
        let input = ToolInput::default();
        assert!(input.is_empty());
        assert_eq!(input.json().unwrap(), Value::Null);
        assert!(input.parse::<Option<Args>>().unwrap().is_none());
    }

    #[test]
    fn test_non_json_is_a_parse_error_not_a_panic() {
        let input = ToolInput::from("add 2 3");
        assert!(input.json().is_err());
        assert_eq!(input.as_bytes(), b"add 2 3");
    }

    #[test]
    fn test_from_value_round_trips_through_bytes() {
        let value = json!({"action": "add"});
        assert_eq!(ToolInput::from(&value).json().unwrap(), value);
    }
}
