// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Gateway
//!
//! Contract for gateway capability apps, which route LLM chat completion
//! requests to a model provider and stream the results back to Nebo.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Defines `GatewayHandler`, requests and streamed events

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::stream::EventStream;

/// LLM chat completion request from Nebo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub request_id: String,
    pub messages: Vec<GatewayMessage>,
    pub tools: Vec<GatewayToolDef>,
    pub max_tokens: i32,
    pub temperature: f64,
    pub system: String,
    pub user: GatewayUser,
}

/// Single message in a conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub role: String,
    pub content: String,
    pub tool_call_id: String,
    /// JSON-encoded array
    pub tool_calls: String,
}

/// Tool available to the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayToolDef {
    pub name: String,
    pub description: String,
    /// JSON Schema bytes
    pub input_schema: Vec<u8>,
}

/// Caller identity attached to a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayUser {
    pub user_id: String,
    pub plan: String,
    /// Only populated if the app has the "user:token" permission
    pub token: String,
}

/// Kind of streamed gateway event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayEventKind {
    Text,
    ToolCall,
    Thinking,
    Error,
    Done,
    /// Any type string not listed above, kept verbatim
    Other(String),
}

impl GatewayEventKind {
    pub fn as_str(&self) -> &str {
        match self {
            GatewayEventKind::Text => "text",
            GatewayEventKind::ToolCall => "tool_call",
            GatewayEventKind::Thinking => "thinking",
            GatewayEventKind::Error => "error",
            GatewayEventKind::Done => "done",
            GatewayEventKind::Other(s) => s,
        }
    }
}

impl From<&str> for GatewayEventKind {
    fn from(s: &str) -> Self {
        match s {
            "text" => GatewayEventKind::Text,
            "tool_call" => GatewayEventKind::ToolCall,
            "thinking" => GatewayEventKind::Thinking,
            "error" => GatewayEventKind::Error,
            "done" => GatewayEventKind::Done,
            other => GatewayEventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for GatewayEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event streamed back to Nebo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayEvent {
    pub kind: GatewayEventKind,
    pub content: String,
    pub model: String,
    pub request_id: String,
}

impl GatewayEvent {
    pub fn new(kind: GatewayEventKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            model: String::new(),
            request_id: String::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(GatewayEventKind::Text, content)
    }

    pub fn done() -> Self {
        Self::new(GatewayEventKind::Done, "")
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }
}

/// Interface for gateway capability apps.
#[async_trait]
pub trait GatewayHandler: Send + Sync {
    /// Start a completion and stream its events
    async fn stream(&self, request: GatewayRequest) -> anyhow::Result<EventStream<GatewayEvent>>;

    /// Abort an in-flight request
    async fn cancel(&self, request_id: &str) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_strings() {
        for s in ["text", "tool_call", "thinking", "error", "done", "usage"] {
            assert_eq!(GatewayEventKind::from(s).as_str(), s);
        }
        assert_eq!(GatewayEventKind::from("usage"), GatewayEventKind::Other("usage".into()));
        assert_eq!(GatewayEventKind::ToolCall.to_string(), "tool_call");
    }

    #[test]
    fn test_event_builders() {
        let event = GatewayEvent::text("hi").with_model("m1").with_request_id("r1");
        assert_eq!(event.kind, GatewayEventKind::Text);
        assert_eq!(event.content, "hi");
        assert_eq!(event.model, "m1");
        assert_eq!(event.request_id, "r1");
        assert_eq!(GatewayEvent::done().kind, GatewayEventKind::Done);
    }
}
