// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod app;
pub mod config_sink;
pub mod forwarder;
pub mod registry;

pub use app::{App, LifecycleState};
pub use config_sink::{ConfigSink, Settings};
pub use forwarder::{ForwardOutcome, StreamForwarder};
pub use registry::{AppBuilder, CapabilityKind, CapabilitySet, ServeOptions, UiSurface};
