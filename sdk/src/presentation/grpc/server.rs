// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! App Server
//!
//! Owns the serving endpoint from bind to stop:
//!
//! 1. Bind the Unix socket (replacing a stale one) and publish `Listening`.
//! 2. On the shutdown future, stop accepting, unlink the socket and publish
//!    `Draining`. In-flight calls keep running.
//! 3. When the grace period runs out, force-close open streams and give
//!    stragglers a short window before abandoning them.
//! 4. Publish `Stopped`.
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Implements the app lifecycle manager

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::bridge::BridgeContext;
use super::dispatcher::build_router;
use crate::application::app::LifecycleState;
use crate::application::config_sink::ConfigSink;
use crate::application::registry::{CapabilitySet, ServeOptions};
use crate::domain::env::AppEnv;
use crate::error::AppError;
use crate::infrastructure::socket::SocketListener;

/// Time force-closed calls get to wind down before the server is dropped
const FORCE_CLOSE_WINDOW: Duration = Duration::from_secs(1);

/// Upper bound on waiting for the accept loop to release the socket
const SOCKET_RELEASE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct AppServer {
    env: Arc<AppEnv>,
    capabilities: CapabilitySet,
    config: ConfigSink,
    options: ServeOptions,
    state: Arc<watch::Sender<LifecycleState>>,
}

impl AppServer {
    pub fn new(
        env: Arc<AppEnv>,
        capabilities: CapabilitySet,
        config: ConfigSink,
        options: ServeOptions,
        state: watch::Sender<LifecycleState>,
    ) -> Self {
        Self {
            env,
            capabilities,
            config,
            options,
            state: Arc::new(state),
        }
    }

    /// Serve until `shutdown` resolves, then drain and stop.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let AppServer {
            env,
            capabilities,
            config,
            options,
            state,
        } = self;

        let listener = SocketListener::bind(&env.sock_path)?;

        let drain = CancellationToken::new();
        let force_close = CancellationToken::new();
        let router = build_router(&capabilities, BridgeContext::new(env.clone(), config, force_close.clone()));

        info!(
            app = %env.name,
            version = %env.version,
            socket = %listener.path().display(),
            capabilities = ?capabilities.kinds(),
            "App listening"
        );
        state.send_replace(LifecycleState::Listening);

        let (released_tx, released_rx) = oneshot::channel();
        let draining = state.clone();
        let incoming = listener.accept_until(drain.clone(), move || {
            draining.send_if_modified(|s| {
                if *s == LifecycleState::Listening {
                    *s = LifecycleState::Draining;
                    true
                } else {
                    false
                }
            });
            let _ = released_tx.send(());
        });

        let trigger = drain.clone();
        let signal_task = tokio::spawn(async move {
            shutdown.await;
            info!("Shutdown requested, draining in-flight calls");
            trigger.cancel();
        });

        let serve = router.serve_with_incoming_shutdown(incoming, drain.clone().cancelled_owned());
        tokio::pin!(serve);

        let grace = options.grace_period;
        let grace_expired = async {
            drain.cancelled().await;
            tokio::time::sleep(grace).await;
        };

        let result = tokio::select! {
            result = &mut serve => result,
            _ = grace_expired => {
                warn!(grace_period = ?grace, "Grace period expired, closing open streams");
                force_close.cancel();
                match tokio::time::timeout(FORCE_CLOSE_WINDOW, &mut serve).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("In-flight calls did not finish, abandoning them");
                        Ok(())
                    }
                }
            }
        };

        // Also reached when the server failed before any shutdown signal
        signal_task.abort();
        drain.cancel();
        if tokio::time::timeout(SOCKET_RELEASE_TIMEOUT, released_rx).await.is_err() {
            warn!(socket = %env.sock_path.display(), "Socket was not released in time");
        }

        state.send_replace(LifecycleState::Stopped);
        info!(app = %env.name, "App stopped");

        result.map_err(AppError::from)
    }
}
