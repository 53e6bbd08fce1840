// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Socket
//!
//! Unix socket plumbing for the lifecycle manager: stale-socket cleanup,
//! binding, and an accept loop that can be stopped independently of the gRPC
//! server so that draining refuses new connections immediately.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Implements the app's single listening endpoint

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::AppError;

/// Pause after a failed accept (e.g. out of file descriptors)
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accepted connections queued for the gRPC server
const INCOMING_QUEUE: usize = 32;

/// Remove whatever a previous run left at `path`. A missing file is fine.
pub fn remove_stale_socket(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed stale socket");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Bound app socket
#[derive(Debug)]
pub struct SocketListener {
    listener: UnixListener,
    path: PathBuf,
}

impl SocketListener {
    /// Clear stale state at `path` and bind. No retry: a bind failure is a
    /// configuration problem for the supervisor to fix.
    pub fn bind(path: &Path) -> Result<Self, AppError> {
        if let Err(e) = remove_stale_socket(path) {
            warn!(path = %path.display(), "Could not remove stale socket: {}", e);
        }

        let listener = UnixListener::bind(path).map_err(|source| AppError::Bind {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            listener,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accept connections on a background task until `stop` is cancelled.
    ///
    /// On stop the listener is dropped and the socket file unlinked before
    /// `on_closed` runs, so by then no new connection can reach the app.
    pub fn accept_until<F>(self, stop: CancellationToken, on_closed: F) -> ReceiverStream<io::Result<UnixStream>>
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(INCOMING_QUEUE);
        let SocketListener { listener, path } = self;

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    accepted = listener.accept() => match accepted {
                        Ok((stream, _)) => {
                            if tx.send(Ok(stream)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Accept failed: {}", e);
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                        }
                    },
                }
            }

            drop(listener);
            if let Err(e) = remove_stale_socket(&path) {
                warn!(path = %path.display(), "Could not remove socket: {}", e);
            }
            on_closed();
        });

        ReceiverStream::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_bind_replaces_stale_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.sock");
        std::fs::write(&path, b"left over from a crash").unwrap();

        let listener = SocketListener::bind(&path).unwrap();
        assert_eq!(listener.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("app.sock");

        let err = SocketListener::bind(&path).unwrap_err();
        assert!(matches!(err, AppError::Bind { .. }));
        assert!(err.to_string().contains("app.sock"));
    }

    #[tokio::test]
    async fn test_stop_closes_listener_and_unlinks_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.sock");
        let listener = SocketListener::bind(&path).unwrap();

        let stop = CancellationToken::new();
        let (closed_tx, closed_rx) = tokio::sync::oneshot::channel();
        let mut incoming = listener.accept_until(stop.clone(), move || {
            let _ = closed_tx.send(());
        });

        let _client = UnixStream::connect(&path).await.unwrap();
        assert!(incoming.next().await.unwrap().is_ok());

        stop.cancel();
        closed_rx.await.unwrap();

        assert!(incoming.next().await.is_none());
        assert!(!path.exists());
        assert!(UnixStream::connect(&path).await.is_err());
    }

    #[test]
    fn test_remove_missing_socket_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(remove_stale_socket(&dir.path().join("nothing.sock")).is_ok());
    }
}
