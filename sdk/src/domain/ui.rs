// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Ui
//!
//! Structured UI capability: apps describe views as ordered lists of typed
//! blocks and react to events the user triggers on them. Apps that prefer a
//! web-style surface register an HTTP router instead (see
//! [`crate::application::registry::AppBuilder::http`]); the two modes are
//! mutually exclusive per process.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Defines views, blocks, the view builder and `UiHandler`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::stream::EventStream;

/// Block type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    Text,
    Input,
    Button,
    Select,
    Toggle,
    Divider,
    Image,
    /// Block type unknown to this SDK version, kept verbatim
    Custom(String),
}

impl BlockKind {
    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Text => "text",
            BlockKind::Input => "input",
            BlockKind::Button => "button",
            BlockKind::Select => "select",
            BlockKind::Toggle => "toggle",
            BlockKind::Divider => "divider",
            BlockKind::Image => "image",
            BlockKind::Custom(s) => s,
        }
    }
}

impl From<&str> for BlockKind {
    fn from(s: &str) -> Self {
        match s {
            "heading" => BlockKind::Heading,
            "text" => BlockKind::Text,
            "input" => BlockKind::Input,
            "button" => BlockKind::Button,
            "select" => BlockKind::Select,
            "toggle" => BlockKind::Toggle,
            "divider" => BlockKind::Divider,
            "image" => BlockKind::Image,
            other => BlockKind::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Renderable unit of a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub block_id: String,
    pub kind: BlockKind,
    pub text: String,
    pub value: String,
    pub placeholder: String,
    pub hint: String,
    pub variant: String,
    pub src: String,
    pub alt: String,
    pub disabled: bool,
    pub options: Vec<SelectOption>,
    pub style: String,
}

impl Block {
    pub fn new(kind: BlockKind, block_id: impl Into<String>) -> Self {
        Self {
            block_id: block_id.into(),
            kind,
            text: String::new(),
            value: String::new(),
            placeholder: String::new(),
            hint: String::new(),
            variant: String::new(),
            src: String::new(),
            alt: String::new(),
            disabled: false,
            options: Vec::new(),
            style: String::new(),
        }
    }
}

/// Ordered sequence of blocks under a title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub view_id: String,
    pub title: String,
    pub blocks: Vec<Block>,
}

/// Fluent builder for [`View`]
#[derive(Debug, Clone)]
pub struct ViewBuilder {
    view: View,
}

impl ViewBuilder {
    pub fn new(view_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            view: View {
                view_id: view_id.into(),
                title: title.into(),
                blocks: Vec::new(),
            },
        }
    }

    /// `variant` is the heading level, e.g. "h1"
    pub fn heading(self, block_id: &str, text: &str, variant: &str) -> Self {
        let mut block = Block::new(BlockKind::Heading, block_id);
        block.text = text.to_string();
        block.variant = variant.to_string();
        self.block(block)
    }

    pub fn text(self, block_id: &str, text: &str) -> Self {
        let mut block = Block::new(BlockKind::Text, block_id);
        block.text = text.to_string();
        self.block(block)
    }

    pub fn input(self, block_id: &str, value: &str, placeholder: &str) -> Self {
        let mut block = Block::new(BlockKind::Input, block_id);
        block.value = value.to_string();
        block.placeholder = placeholder.to_string();
        self.block(block)
    }

    pub fn button(self, block_id: &str, text: &str, variant: &str) -> Self {
        let mut block = Block::new(BlockKind::Button, block_id);
        block.text = text.to_string();
        block.variant = variant.to_string();
        self.block(block)
    }

    pub fn select(self, block_id: &str, value: &str, options: Vec<SelectOption>) -> Self {
        let mut block = Block::new(BlockKind::Select, block_id);
        block.value = value.to_string();
        block.options = options;
        self.block(block)
    }

    /// Toggle state is carried as the string "true" or "false"
    pub fn toggle(self, block_id: &str, text: &str, on: bool) -> Self {
        let mut block = Block::new(BlockKind::Toggle, block_id);
        block.text = text.to_string();
        block.value = on.to_string();
        self.block(block)
    }

    pub fn divider(self, block_id: &str) -> Self {
        self.block(Block::new(BlockKind::Divider, block_id))
    }

    pub fn image(self, block_id: &str, src: &str, alt: &str) -> Self {
        let mut block = Block::new(BlockKind::Image, block_id);
        block.src = src.to_string();
        block.alt = alt.to_string();
        self.block(block)
    }

    /// Append a fully specified block
    pub fn block(mut self, block: Block) -> Self {
        self.view.blocks.push(block);
        self
    }

    pub fn build(self) -> View {
        self.view
    }
}

/// Request for a view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub view_id: String,
    /// Caller-supplied context (user, locale, route parameters, ...)
    pub context: HashMap<String, String>,
}

/// User interaction with a block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiEvent {
    pub view_id: String,
    pub block_id: String,
    /// "click", "change", "submit", ...
    pub action: String,
    pub value: String,
}

/// Outcome of handling a [`UiEvent`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiEventResult {
    /// Replacement view, `None` when the view does not change
    pub view: Option<View>,
    /// Short notification to show the user, empty for none
    pub toast: String,
}

/// Interface for structured UI capability apps.
#[async_trait]
pub trait UiHandler: Send + Sync {
    async fn get_view(&self, request: ViewRequest) -> anyhow::Result<View>;

    async fn send_event(&self, event: UiEvent) -> anyhow::Result<UiEventResult>;

    /// Optional refinement: handlers that push view updates return `Some`.
    /// Without it, `StreamUpdates` stays open and silent until the caller
    /// goes away.
    fn live_updates(&self) -> Option<&dyn UiLiveUpdates> {
        None
    }
}

/// Refinement for UI handlers that push view updates
#[async_trait]
pub trait UiLiveUpdates: Send + Sync {
    async fn stream_updates(&self) -> anyhow::Result<EventStream<View>>;
}
