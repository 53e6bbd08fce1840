// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Channel
//!
//! Contract for channel capability apps, which bridge an external messaging
//! platform (chat, email, ...) to Nebo.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Defines `ChannelHandler` and the envelope it exchanges

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::stream::EventStream;

/// Who sent a message on the external platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSender {
    pub name: String,
    pub role: String,
    /// Set when the sender is a bot account
    pub bot_id: String,
}

/// File or media attached to a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment type, e.g. "image", "file"
    pub kind: String,
    pub url: String,
    pub filename: String,
    /// Size in bytes, 0 when unknown
    pub size: i64,
}

/// Interactive action (button) offered with a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAction {
    pub label: String,
    pub callback_id: String,
}

/// Structured message exchanged with the external platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEnvelope {
    pub message_id: String,
    pub channel_id: String,
    pub sender: MessageSender,
    pub text: String,
    pub attachments: Vec<Attachment>,
    /// Message ID this one replies to, empty for top-level messages
    pub reply_to: String,
    pub actions: Vec<MessageAction>,
    /// Opaque platform-specific payload
    pub platform_data: Vec<u8>,
    /// Unix milliseconds
    pub timestamp: i64,
}

/// Interface for channel capability apps.
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    /// Stable channel identifier (e.g. "slack", "telegram")
    fn id(&self) -> String;

    async fn connect(&self, config: HashMap<String, String>) -> anyhow::Result<()>;

    async fn disconnect(&self) -> anyhow::Result<()>;

    /// Deliver an outbound message; returns the platform's message ID
    async fn send(&self, envelope: ChannelEnvelope) -> anyhow::Result<String>;

    /// Inbound messages from the platform, in arrival order
    async fn receive(&self) -> anyhow::Result<EventStream<ChannelEnvelope>>;
}
