// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! gRPC Presentation
//!
//! One bridge per capability kind translating between the `nebo.apps.v1`
//! wire contract and the domain handler traits, plus the dispatcher that
//! mounts them and the server that owns the socket lifecycle.
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Implements the app's gRPC surface

pub mod bridge;
pub mod channel;
pub mod comm;
pub mod dispatcher;
pub mod gateway;
pub mod schedule;
pub mod server;
pub mod tool;
pub mod ui;

/// Generated `nebo.apps.v1` messages, service traits and clients
pub mod proto {
    tonic::include_proto!("nebo.apps.v1");
}
