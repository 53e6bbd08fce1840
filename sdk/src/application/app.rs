// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! App
//!
//! A frozen app: environment, registered capabilities, configuration sink and
//! serving options. Produced by [`AppBuilder::build`] and consumed by `run`.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Implements the app entry point and lifecycle state
//!
//! [`AppBuilder::build`]: crate::application::registry::AppBuilder::build

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

use crate::application::config_sink::ConfigSink;
use crate::application::registry::{CapabilitySet, ServeOptions};
use crate::domain::env::AppEnv;
use crate::error::AppError;
use crate::infrastructure::signal::shutdown_signal;
use crate::presentation::grpc::server::AppServer;

/// Lifecycle of the serving endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not bound yet
    Unbound,
    /// Socket bound, accepting calls
    Listening,
    /// Shutdown signal received; no new calls, in-flight calls finishing
    Draining,
    /// Terminal
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Unbound => "unbound",
            LifecycleState::Listening => "listening",
            LifecycleState::Draining => "draining",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Registered, ready-to-serve app
pub struct App {
    env: Arc<AppEnv>,
    capabilities: CapabilitySet,
    config: ConfigSink,
    options: ServeOptions,
    state: watch::Sender<LifecycleState>,
}

impl App {
    pub(crate) fn new(
        env: Arc<AppEnv>,
        capabilities: CapabilitySet,
        config: ConfigSink,
        options: ServeOptions,
    ) -> Self {
        let (state, _) = watch::channel(LifecycleState::Unbound);
        Self {
            env,
            capabilities,
            config,
            options,
            state,
        }
    }

    pub fn env(&self) -> &AppEnv {
        &self.env
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    pub fn config_sink(&self) -> &ConfigSink {
        &self.config
    }

    pub fn options(&self) -> ServeOptions {
        self.options
    }

    /// Observe lifecycle transitions. Take this before calling `run`.
    pub fn lifecycle(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Serve on the app socket until SIGTERM or SIGINT, then drain.
    pub async fn run(self) -> Result<(), AppError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, then drain.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let App {
            env,
            capabilities,
            config,
            options,
            state,
        } = self;

        AppServer::new(env, capabilities, config, options, state)
            .serve(shutdown)
            .await
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("env", &self.env)
            .field("capabilities", &self.capabilities)
            .field("options", &self.options)
            .field("state", &*self.state.borrow())
            .finish()
    }
}
