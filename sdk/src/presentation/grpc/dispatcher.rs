// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use tonic::transport::server::Router;
use tonic::transport::Server;
use tracing::debug;

use super::bridge::BridgeContext;
use super::channel::ChannelBridge;
use super::comm::CommBridge;
use super::gateway::GatewayBridge;
use super::schedule::ScheduleBridge;
use super::tool::ToolBridge;
use super::ui::UiBridge;
use crate::application::registry::CapabilitySet;

/// Mount one gRPC service per registered capability. Unregistered kinds are
/// left out, so calls to them fail with `UNIMPLEMENTED`.
pub fn build_router(capabilities: &CapabilitySet, ctx: BridgeContext) -> Router {
    debug!(capabilities = ?capabilities.kinds(), "Mounting capability services");

    let tool = capabilities
        .tool
        .clone()
        .map(|h| ToolBridge::new(h, ctx.clone()).into_server());
    let channel = capabilities
        .channel
        .clone()
        .map(|h| ChannelBridge::new(h, ctx.clone()).into_server());
    let comm = capabilities
        .comm
        .clone()
        .map(|h| CommBridge::new(h, ctx.clone()).into_server());
    let gateway = capabilities
        .gateway
        .clone()
        .map(|h| GatewayBridge::new(h, ctx.clone()).into_server());
    let schedule = capabilities
        .schedule
        .clone()
        .map(|h| ScheduleBridge::new(h, ctx.clone()).into_server());
    let ui = capabilities
        .ui
        .clone()
        .map(|surface| UiBridge::new(surface, ctx).into_server());

    let mut server = Server::builder();
    server
        .add_optional_service(tool)
        .add_optional_service(channel)
        .add_optional_service(comm)
        .add_optional_service(gateway)
        .add_optional_service(schedule)
        .add_optional_service(ui)
}
