// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Gateway Bridge
//!
//! Adapts a [`GatewayHandler`] to `nebo.apps.v1.GatewayService`. Stream
//! relays model output events until the handler finishes, the caller goes
//! away or the app is force-closed.
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Implements the gateway gRPC service over the domain contract

use std::sync::Arc;
use tonic::{Request, Response, Status};

use super::bridge::{handler_error, BridgeContext};
use super::proto;
use super::proto::gateway_service_server::{GatewayService, GatewayServiceServer};
use crate::application::forwarder::Outbound;
use crate::application::registry::CapabilityKind;
use crate::domain::gateway::{
    GatewayEvent, GatewayEventKind, GatewayHandler, GatewayMessage, GatewayRequest, GatewayToolDef, GatewayUser,
};

const KIND: CapabilityKind = CapabilityKind::Gateway;

pub struct GatewayBridge {
    handler: Arc<dyn GatewayHandler>,
    ctx: BridgeContext,
}

impl GatewayBridge {
    pub fn new(handler: Arc<dyn GatewayHandler>, ctx: BridgeContext) -> Self {
        Self { handler, ctx }
    }

    pub fn into_server(self) -> GatewayServiceServer<Self> {
        GatewayServiceServer::new(self)
    }
}

impl From<proto::GatewayMessage> for GatewayMessage {
    fn from(m: proto::GatewayMessage) -> Self {
        Self {
            role: m.role,
            content: m.content,
            tool_call_id: m.tool_call_id,
            tool_calls: m.tool_calls,
        }
    }
}

impl From<proto::GatewayToolDef> for GatewayToolDef {
    fn from(t: proto::GatewayToolDef) -> Self {
        Self {
            name: t.name,
            description: t.description,
            input_schema: t.input_schema,
        }
    }
}

impl From<proto::GatewayUser> for GatewayUser {
    fn from(u: proto::GatewayUser) -> Self {
        Self {
            user_id: u.user_id,
            plan: u.plan,
            token: u.token,
        }
    }
}

impl From<proto::GatewayRequest> for GatewayRequest {
    fn from(r: proto::GatewayRequest) -> Self {
        Self {
            request_id: r.request_id,
            messages: r.messages.into_iter().map(Into::into).collect(),
            tools: r.tools.into_iter().map(Into::into).collect(),
            max_tokens: r.max_tokens,
            temperature: r.temperature,
            system: r.system,
            user: r.user.map(Into::into).unwrap_or_default(),
        }
    }
}

impl From<GatewayEvent> for proto::GatewayEvent {
    fn from(e: GatewayEvent) -> Self {
        Self {
            r#type: e.kind.as_str().to_string(),
            content: e.content,
            model: e.model,
            request_id: e.request_id,
        }
    }
}

impl From<proto::GatewayEvent> for GatewayEvent {
    fn from(e: proto::GatewayEvent) -> Self {
        Self {
            kind: GatewayEventKind::from(e.r#type.as_str()),
            content: e.content,
            model: e.model,
            request_id: e.request_id,
        }
    }
}

#[tonic::async_trait]
impl GatewayService for GatewayBridge {
    type StreamStream = Outbound<proto::GatewayEvent>;

    async fn health_check(
        &self,
        _request: Request<proto::HealthCheckRequest>,
    ) -> Result<Response<proto::HealthCheckResponse>, Status> {
        Ok(Response::new(self.ctx.health()))
    }

    async fn stream(&self, request: Request<proto::GatewayRequest>) -> Result<Response<Self::StreamStream>, Status> {
        let request = GatewayRequest::from(request.into_inner());

        let source = self
            .handler
            .stream(request)
            .await
            .map_err(|e| Status::internal(format!("{:#}", e)))?;

        Ok(Response::new(
            self.ctx.forwarder(KIND).spawn(source, proto::GatewayEvent::from),
        ))
    }

    async fn cancel(&self, request: Request<proto::CancelRequest>) -> Result<Response<proto::CancelResponse>, Status> {
        let request_id = request.into_inner().request_id;

        let response = match self.handler.cancel(&request_id).await {
            Ok(()) => proto::CancelResponse {
                cancelled: true,
                error: String::new(),
            },
            Err(e) => proto::CancelResponse {
                cancelled: false,
                error: handler_error(KIND, "cancel", &e),
            },
        };
        Ok(Response::new(response))
    }

    /// Reserved; the host may call it and always gets an empty answer
    async fn poll(&self, _request: Request<proto::PollRequest>) -> Result<Response<proto::PollResponse>, Status> {
        Ok(Response::new(proto::PollResponse {}))
    }

    async fn configure(&self, request: Request<proto::SettingsMap>) -> Result<Response<proto::Empty>, Status> {
        Ok(Response::new(self.ctx.configure(request.into_inner())))
    }
}
