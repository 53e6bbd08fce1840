// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Comm Capability - inter-agent pub/sub messaging
//
// A comm app connects Nebo's agent to a message bus shared with other agents:
// it registers the agent, subscribes to topics and relays messages both ways.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::stream::EventStream;

/// Inter-agent communication message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommMessage {
    pub id: String,
    pub from: String,
    pub to: String,
    pub topic: String,
    pub conversation_id: String,
    /// "message", "mention", "proposal", "command", "info", "task"
    pub kind: String,
    pub content: String,
    pub metadata: HashMap<String, String>,
    /// Unix milliseconds
    pub timestamp: i64,
    /// True when a human wrote this message on behalf of an agent
    pub human_injected: bool,
    pub human_id: String,
}

/// Interface for comm capability apps.
#[async_trait]
pub trait CommHandler: Send + Sync {
    fn name(&self) -> String;

    fn version(&self) -> String;

    async fn connect(&self, config: HashMap<String, String>) -> anyhow::Result<()>;

    async fn disconnect(&self) -> anyhow::Result<()>;

    fn is_connected(&self) -> bool;

    async fn send(&self, message: CommMessage) -> anyhow::Result<()>;

    async fn subscribe(&self, topic: &str) -> anyhow::Result<()>;

    async fn unsubscribe(&self, topic: &str) -> anyhow::Result<()>;

    /// Announce this agent and what it can do
    async fn register(&self, agent_id: &str, capabilities: Vec<String>) -> anyhow::Result<()>;

    async fn deregister(&self) -> anyhow::Result<()>;

    async fn receive(&self) -> anyhow::Result<EventStream<CommMessage>>;
}
