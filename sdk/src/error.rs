// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::path::PathBuf;

/// Startup and lifecycle failures. All of them are fatal to the app process.
///
/// Handler failures never show up here: they travel inside response messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NEBO_APP_SOCK environment variable is not set")]
    NoSockPath,

    #[error("no capability handlers registered; register at least one handler before serving")]
    NoHandlers,

    #[error("a UI handler and HTTP routes were both registered; an app serves one UI mode")]
    ConflictingUiModes,

    #[error("listen on {}: {source}", path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}
