// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Capability Registry
//!
//! Builder phase for an app: collect at most one handler per capability kind
//! plus the shared configuration callback, then freeze everything into an
//! [`App`]. `build()` consumes the builder, so nothing can be registered once
//! serving is possible.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Implements capability registration and validation

use axum::routing::MethodRouter;
use axum::Router;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::application::app::App;
use crate::application::config_sink::{ConfigSink, ConfigureHook, Settings};
use crate::domain::channel::ChannelHandler;
use crate::domain::comm::CommHandler;
use crate::domain::env::AppEnv;
use crate::domain::gateway::GatewayHandler;
use crate::domain::schedule::ScheduleHandler;
use crate::domain::tool::ToolHandler;
use crate::domain::ui::UiHandler;
use crate::error::AppError;

/// Default time in-flight calls get to finish after a shutdown signal
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// The six capability kinds an app can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Tool,
    Channel,
    Comm,
    Gateway,
    Schedule,
    Ui,
}

impl CapabilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Tool => "tool",
            CapabilityKind::Channel => "channel",
            CapabilityKind::Comm => "comm",
            CapabilityKind::Gateway => "gateway",
            CapabilityKind::Schedule => "schedule",
            CapabilityKind::Ui => "ui",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the UI capability is delivered
#[derive(Clone)]
pub enum UiSurface {
    /// Structured views and events through a [`UiHandler`]
    Structured(Arc<dyn UiHandler>),
    /// Proxied HTTP requests dispatched through an axum router
    Http(Router),
}

/// Frozen mapping from capability kind to handler
#[derive(Clone, Default)]
pub struct CapabilitySet {
    pub tool: Option<Arc<dyn ToolHandler>>,
    pub channel: Option<Arc<dyn ChannelHandler>>,
    pub comm: Option<Arc<dyn CommHandler>>,
    pub gateway: Option<Arc<dyn GatewayHandler>>,
    pub schedule: Option<Arc<dyn ScheduleHandler>>,
    pub ui: Option<UiSurface>,
}

impl CapabilitySet {
    /// Registered kinds in a stable order
    pub fn kinds(&self) -> Vec<CapabilityKind> {
        let mut kinds = Vec::new();
        if self.tool.is_some() {
            kinds.push(CapabilityKind::Tool);
        }
        if self.channel.is_some() {
            kinds.push(CapabilityKind::Channel);
        }
        if self.comm.is_some() {
            kinds.push(CapabilityKind::Comm);
        }
        if self.gateway.is_some() {
            kinds.push(CapabilityKind::Gateway);
        }
        if self.schedule.is_some() {
            kinds.push(CapabilityKind::Schedule);
        }
        if self.ui.is_some() {
            kinds.push(CapabilityKind::Ui);
        }
        kinds
    }

    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitySet").field("kinds", &self.kinds()).finish()
    }
}

/// Serving knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServeOptions {
    /// Time in-flight calls get to finish after the shutdown signal before
    /// open streams are force-closed
    pub grace_period: Duration,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

/// Registration phase of an app
///
/// ```no_run
/// # use nebo_app_sdk::prelude::*;
/// # async fn run(tool: impl ToolHandler + 'static) -> Result<(), AppError> {
/// AppBuilder::from_env()
///     .tool(tool)
///     .build()?
///     .run()
///     .await
/// # }
/// ```
pub struct AppBuilder {
    env: AppEnv,
    capabilities: CapabilitySet,
    http: Option<Router>,
    hook: Option<ConfigureHook>,
    options: ServeOptions,
}

impl AppBuilder {
    pub fn new(env: AppEnv) -> Self {
        Self {
            env,
            capabilities: CapabilitySet::default(),
            http: None,
            hook: None,
            options: ServeOptions::default(),
        }
    }

    /// Start from the NEBO_APP_* environment
    pub fn from_env() -> Self {
        Self::new(AppEnv::from_env())
    }

    pub fn env(&self) -> &AppEnv {
        &self.env
    }

    /// Set the callback invoked whenever Nebo pushes settings. Shared by all
    /// capabilities; it may be entered concurrently (see
    /// [`crate::application::config_sink`]).
    pub fn on_configure<F>(mut self, hook: F) -> Self
    where
        F: Fn(Settings) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn tool<H: ToolHandler + 'static>(mut self, handler: H) -> Self {
        replaced(CapabilityKind::Tool, self.capabilities.tool.replace(Arc::new(handler)).is_some());
        self
    }

    pub fn channel<H: ChannelHandler + 'static>(mut self, handler: H) -> Self {
        replaced(CapabilityKind::Channel, self.capabilities.channel.replace(Arc::new(handler)).is_some());
        self
    }

    pub fn comm<H: CommHandler + 'static>(mut self, handler: H) -> Self {
        replaced(CapabilityKind::Comm, self.capabilities.comm.replace(Arc::new(handler)).is_some());
        self
    }

    pub fn gateway<H: GatewayHandler + 'static>(mut self, handler: H) -> Self {
        replaced(CapabilityKind::Gateway, self.capabilities.gateway.replace(Arc::new(handler)).is_some());
        self
    }

    pub fn schedule<H: ScheduleHandler + 'static>(mut self, handler: H) -> Self {
        replaced(CapabilityKind::Schedule, self.capabilities.schedule.replace(Arc::new(handler)).is_some());
        self
    }

    /// Register a structured UI handler
    pub fn ui<H: UiHandler + 'static>(mut self, handler: H) -> Self {
        let previous = self.capabilities.ui.replace(UiSurface::Structured(Arc::new(handler)));
        replaced(CapabilityKind::Ui, previous.is_some());
        self
    }

    /// Serve the UI capability as proxied HTTP through `router`. Replaces
    /// routes registered so far with [`AppBuilder::route`].
    pub fn http(mut self, router: Router) -> Self {
        replaced(CapabilityKind::Ui, self.http.replace(router).is_some());
        self
    }

    /// Add one HTTP route to the UI surface
    pub fn route(mut self, path: &str, method_router: MethodRouter) -> Self {
        let router = self.http.take().unwrap_or_else(Router::new);
        self.http = Some(router.route(path, method_router));
        self
    }

    pub fn grace_period(mut self, grace_period: Duration) -> Self {
        self.options.grace_period = grace_period;
        self
    }

    /// Freeze the registration. Fails when the socket path is missing,
    /// nothing was registered, or both UI modes were requested.
    pub fn build(self) -> Result<App, AppError> {
        let AppBuilder {
            env,
            mut capabilities,
            http,
            hook,
            options,
        } = self;

        if !env.has_sock_path() {
            return Err(AppError::NoSockPath);
        }

        if let Some(router) = http {
            if capabilities.ui.is_some() {
                return Err(AppError::ConflictingUiModes);
            }
            capabilities.ui = Some(UiSurface::Http(router));
        }

        if capabilities.is_empty() {
            return Err(AppError::NoHandlers);
        }

        Ok(App::new(Arc::new(env), capabilities, ConfigSink::new(hook), options))
    }
}

fn replaced(kind: CapabilityKind, was_set: bool) {
    if was_set {
        warn!(capability = kind.as_str(), "Handler replaced; the last registration wins");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tool::{ToolHandler, ToolInput};
    use crate::domain::ui::{UiEvent, UiEventResult, View, ViewRequest};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::path::PathBuf;

    struct NamedTool(&'static str);

    #[async_trait]
    impl ToolHandler for NamedTool {
        fn name(&self) -> String {
            self.0.to_string()
        }
        fn description(&self) -> String {
            String::new()
        }
        fn schema(&self) -> Value {
            Value::Null
        }
        async fn execute(&self, _input: ToolInput) -> anyhow::Result<String> {
            Ok(String::new())
        }
    }

    struct BlankUi;

    #[async_trait]
    impl UiHandler for BlankUi {
        async fn get_view(&self, _request: ViewRequest) -> anyhow::Result<View> {
            Ok(View::default())
        }
        async fn send_event(&self, _event: UiEvent) -> anyhow::Result<UiEventResult> {
            Ok(UiEventResult::default())
        }
    }

    fn env() -> AppEnv {
        AppEnv {
            sock_path: PathBuf::from("/tmp/nebo-registry-test.sock"),
            name: "test-app".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_without_handlers_fails() {
        let err = AppBuilder::new(env()).build().unwrap_err();
        assert!(matches!(err, AppError::NoHandlers));
    }

    #[test]
    fn test_build_without_sock_path_fails() {
        let err = AppBuilder::new(AppEnv::default())
            .tool(NamedTool("t"))
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::NoSockPath));
    }

    #[test]
    fn test_second_registration_replaces_first() {
        let app = AppBuilder::new(env())
            .tool(NamedTool("first"))
            .tool(NamedTool("second"))
            .build()
            .unwrap();

        let tool = app.capabilities().tool.as_ref().unwrap();
        assert_eq!(tool.name(), "second");
        assert_eq!(app.capabilities().kinds(), vec![CapabilityKind::Tool]);
    }

    #[test]
    fn test_ui_modes_are_exclusive() {
        let err = AppBuilder::new(env())
            .ui(BlankUi)
            .route("/api/items", axum::routing::get(|| async { "[]" }))
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::ConflictingUiModes));
    }

    #[test]
    fn test_http_routes_count_as_ui_capability() {
        let app = AppBuilder::new(env())
            .route("/api/items", axum::routing::get(|| async { "[]" }))
            .build()
            .unwrap();

        assert_eq!(app.capabilities().kinds(), vec![CapabilityKind::Ui]);
        assert!(matches!(app.capabilities().ui, Some(UiSurface::Http(_))));
    }

    #[test]
    fn test_configure_hook_registered_after_handlers_is_shared() {
        let app = AppBuilder::new(env())
            .tool(NamedTool("t"))
            .on_configure(|_| {})
            .grace_period(Duration::from_secs(3))
            .build()
            .unwrap();

        assert!(app.config_sink().is_set());
        assert_eq!(app.options().grace_period, Duration::from_secs(3));
    }
}
