// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer (`nebo-app-sdk`)
//!
//! Capability contracts the embedding app implements, and the plain-data
//! messages they exchange. Nothing here knows about gRPC.
//!
//! | Module | Capability |
//! |--------|------------|
//! | [`tool`] | Single-shot action execution |
//! | [`channel`] | External messaging-platform bridge |
//! | [`comm`] | Inter-agent pub/sub messaging |
//! | [`gateway`] | Model-inference request streaming |
//! | [`schedule`] | Recurring-task management |
//! | [`ui`] | Structured view rendering |

pub mod channel;
pub mod comm;
pub mod env;
pub mod gateway;
pub mod schedule;
pub mod schema;
pub mod stream;
pub mod tool;
pub mod ui;
