// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Nebo App SDK
//!
//! Build Nebo apps in Rust: implement one or more capability handlers, register
//! them on an [`AppBuilder`], and serve them over gRPC on the Unix socket Nebo
//! hands the app in `NEBO_APP_SOCK`.
//!
//! ```no_run
//! use nebo_app_sdk::prelude::*;
//! use serde_json::Value;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ToolHandler for Echo {
//!     fn name(&self) -> String { "echo".into() }
//!     fn description(&self) -> String { "Echoes its input".into() }
//!     fn schema(&self) -> Value { ToolSchema::new(["echo"]).string("text", "Text to echo", true).build() }
//!     async fn execute(&self, input: ToolInput) -> anyhow::Result<String> {
//!         let input = input.json()?;
//!         Ok(input["text"].as_str().unwrap_or_default().to_string())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     AppBuilder::from_env().tool(Echo).build()?.run().await
//! }
//! ```
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Implements the app-side runtime of the Nebo app protocol

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

pub use application::{App, AppBuilder, LifecycleState};
pub use domain::env::AppEnv;
pub use error::AppError;
pub use presentation::grpc::proto;

/// Everything an app usually needs
pub mod prelude {
    pub use async_trait::async_trait;

    pub use crate::application::{App, AppBuilder, LifecycleState, Settings};
    pub use crate::domain::channel::{Attachment, ChannelEnvelope, ChannelHandler, MessageAction, MessageSender};
    pub use crate::domain::comm::{CommHandler, CommMessage};
    pub use crate::domain::env::AppEnv;
    pub use crate::domain::gateway::{
        GatewayEvent, GatewayEventKind, GatewayHandler, GatewayMessage, GatewayRequest, GatewayToolDef, GatewayUser,
    };
    pub use crate::domain::schedule::{
        NewSchedule, Page, Schedule, ScheduleHandler, ScheduleQuery, ScheduleRun, ScheduleTrigger, ScheduleUpdate,
        TriggerOutcome,
    };
    pub use crate::domain::schema::ToolSchema;
    pub use crate::domain::stream::{event_stream, EventStream};
    pub use crate::domain::tool::{RequiresApproval, ToolHandler, ToolInput};
    pub use crate::domain::ui::{
        Block, BlockKind, SelectOption, UiEvent, UiEventResult, UiHandler, UiLiveUpdates, View, ViewBuilder,
        ViewRequest,
    };
    pub use crate::error::AppError;
}
