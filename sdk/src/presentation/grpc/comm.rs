// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Comm service bridge: adapts a [`CommHandler`] to `nebo.apps.v1.CommService`.
//! Every mutating rpc answers with a `CommAck` whose `error` carries the
//! handler failure, if any.

use std::sync::Arc;
use tonic::{Request, Response, Status};

use super::bridge::{handler_error, BridgeContext};
use super::proto;
use super::proto::comm_service_server::{CommService, CommServiceServer};
use crate::application::forwarder::Outbound;
use crate::application::registry::CapabilityKind;
use crate::domain::comm::{CommHandler, CommMessage};

const KIND: CapabilityKind = CapabilityKind::Comm;

pub struct CommBridge {
    handler: Arc<dyn CommHandler>,
    ctx: BridgeContext,
}

impl CommBridge {
    pub fn new(handler: Arc<dyn CommHandler>, ctx: BridgeContext) -> Self {
        Self { handler, ctx }
    }

    pub fn into_server(self) -> CommServiceServer<Self> {
        CommServiceServer::new(self)
    }
}

impl From<proto::CommMessage> for CommMessage {
    fn from(m: proto::CommMessage) -> Self {
        Self {
            id: m.id,
            from: m.from,
            to: m.to,
            topic: m.topic,
            conversation_id: m.conversation_id,
            kind: m.r#type,
            content: m.content,
            metadata: m.metadata,
            timestamp: m.timestamp,
            human_injected: m.human_injected,
            human_id: m.human_id,
        }
    }
}

impl From<CommMessage> for proto::CommMessage {
    fn from(m: CommMessage) -> Self {
        Self {
            id: m.id,
            from: m.from,
            to: m.to,
            topic: m.topic,
            conversation_id: m.conversation_id,
            r#type: m.kind,
            content: m.content,
            metadata: m.metadata,
            timestamp: m.timestamp,
            human_injected: m.human_injected,
            human_id: m.human_id,
        }
    }
}

fn ack(operation: &'static str, result: anyhow::Result<()>) -> Response<proto::CommAck> {
    let error = match result {
        Ok(()) => String::new(),
        Err(e) => handler_error(KIND, operation, &e),
    };
    Response::new(proto::CommAck { error })
}

#[tonic::async_trait]
impl CommService for CommBridge {
    type ReceiveStream = Outbound<proto::CommMessage>;

    async fn health_check(
        &self,
        _request: Request<proto::HealthCheckRequest>,
    ) -> Result<Response<proto::HealthCheckResponse>, Status> {
        Ok(Response::new(self.ctx.health()))
    }

    async fn name(&self, _request: Request<proto::Empty>) -> Result<Response<proto::CommNameResponse>, Status> {
        Ok(Response::new(proto::CommNameResponse {
            name: self.handler.name(),
        }))
    }

    async fn version(&self, _request: Request<proto::Empty>) -> Result<Response<proto::CommVersionResponse>, Status> {
        Ok(Response::new(proto::CommVersionResponse {
            version: self.handler.version(),
        }))
    }

    async fn connect(&self, request: Request<proto::CommConnectRequest>) -> Result<Response<proto::CommAck>, Status> {
        let config = request.into_inner().config;
        Ok(ack("connect", self.handler.connect(config).await))
    }

    async fn disconnect(&self, _request: Request<proto::Empty>) -> Result<Response<proto::CommAck>, Status> {
        Ok(ack("disconnect", self.handler.disconnect().await))
    }

    async fn is_connected(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::CommIsConnectedResponse>, Status> {
        Ok(Response::new(proto::CommIsConnectedResponse {
            connected: self.handler.is_connected(),
        }))
    }

    async fn send(&self, request: Request<proto::CommSendRequest>) -> Result<Response<proto::CommAck>, Status> {
        let message = request.into_inner().message.map(Into::into).unwrap_or_default();
        Ok(ack("send", self.handler.send(message).await))
    }

    async fn subscribe(&self, request: Request<proto::CommTopicRequest>) -> Result<Response<proto::CommAck>, Status> {
        let topic = request.into_inner().topic;
        Ok(ack("subscribe", self.handler.subscribe(&topic).await))
    }

    async fn unsubscribe(
        &self,
        request: Request<proto::CommTopicRequest>,
    ) -> Result<Response<proto::CommAck>, Status> {
        let topic = request.into_inner().topic;
        Ok(ack("unsubscribe", self.handler.unsubscribe(&topic).await))
    }

    async fn register(
        &self,
        request: Request<proto::CommRegisterRequest>,
    ) -> Result<Response<proto::CommAck>, Status> {
        let req = request.into_inner();
        Ok(ack(
            "register",
            self.handler.register(&req.agent_id, req.capabilities).await,
        ))
    }

    async fn deregister(&self, _request: Request<proto::Empty>) -> Result<Response<proto::CommAck>, Status> {
        Ok(ack("deregister", self.handler.deregister().await))
    }

    async fn receive(&self, _request: Request<proto::Empty>) -> Result<Response<Self::ReceiveStream>, Status> {
        let source = self
            .handler
            .receive()
            .await
            .map_err(|e| Status::internal(format!("{:#}", e)))?;

        Ok(Response::new(
            self.ctx.forwarder(KIND).spawn(source, proto::CommMessage::from),
        ))
    }

    async fn configure(&self, request: Request<proto::SettingsMap>) -> Result<Response<proto::Empty>, Status> {
        Ok(Response::new(self.ctx.configure(request.into_inner())))
    }
}
