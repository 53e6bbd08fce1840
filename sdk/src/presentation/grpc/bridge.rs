// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Bridge
//!
//! State and behaviour shared by every capability bridge: the HealthCheck and
//! Configure rpcs, error rendering for handler failures, and access to the
//! stream forwarder.
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Implements the parts of the unary adapter common to all services

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::proto;
use crate::application::config_sink::ConfigSink;
use crate::application::forwarder::StreamForwarder;
use crate::application::registry::CapabilityKind;
use crate::domain::env::AppEnv;

/// Shared context handed to each capability bridge
#[derive(Debug, Clone)]
pub struct BridgeContext {
    env: Arc<AppEnv>,
    config: ConfigSink,
    force_close: CancellationToken,
}

impl BridgeContext {
    pub fn new(env: Arc<AppEnv>, config: ConfigSink, force_close: CancellationToken) -> Self {
        Self {
            env,
            config,
            force_close,
        }
    }

    /// Always healthy, always the static app identity. The handler itself is
    /// never probed; hosts rely on this staying constant.
    pub fn health(&self) -> proto::HealthCheckResponse {
        proto::HealthCheckResponse {
            healthy: true,
            name: self.env.name.clone(),
            version: self.env.version.clone(),
        }
    }

    /// Hand a settings push to the shared callback. Never fails.
    pub fn configure(&self, settings: proto::SettingsMap) -> proto::Empty {
        self.config.push(settings.values);
        proto::Empty {}
    }

    pub fn forwarder(&self, kind: CapabilityKind) -> StreamForwarder {
        StreamForwarder::new(kind.as_str(), self.force_close.clone())
    }
}

/// Render a handler failure for a response error field. The alternate format
/// keeps the whole context chain ("invalid input: expected value ...").
pub fn handler_error(kind: CapabilityKind, operation: &'static str, err: &anyhow::Error) -> String {
    debug!(service = kind.as_str(), operation, "Handler returned error: {:#}", err);
    metrics::counter!(
        "nebo_app_handler_errors_total",
        "service" => kind.as_str(),
        "operation" => operation
    )
    .increment(1);
    format!("{:#}", err)
}

/// Wire timestamps are unix seconds with 0 meaning unset
pub fn to_unix(time: Option<DateTime<Utc>>) -> i64 {
    time.map(|t| t.timestamp()).unwrap_or(0)
}

pub fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        None
    } else {
        DateTime::from_timestamp(secs, 0)
    }
}
