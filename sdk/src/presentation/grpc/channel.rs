// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Channel Bridge
//!
//! Adapts a [`ChannelHandler`] to `nebo.apps.v1.ChannelService`. Connect,
//! Disconnect and Send embed handler failures in the response `error` field;
//! Receive forwards the handler's inbound envelopes.
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Implements the channel gRPC service over the domain contract

use std::sync::Arc;
use tonic::{Request, Response, Status};

use super::bridge::{handler_error, BridgeContext};
use super::proto;
use super::proto::channel_service_server::{ChannelService, ChannelServiceServer};
use crate::application::forwarder::Outbound;
use crate::application::registry::CapabilityKind;
use crate::domain::channel::{Attachment, ChannelEnvelope, ChannelHandler, MessageAction, MessageSender};

const KIND: CapabilityKind = CapabilityKind::Channel;

pub struct ChannelBridge {
    handler: Arc<dyn ChannelHandler>,
    ctx: BridgeContext,
}

impl ChannelBridge {
    pub fn new(handler: Arc<dyn ChannelHandler>, ctx: BridgeContext) -> Self {
        Self { handler, ctx }
    }

    pub fn into_server(self) -> ChannelServiceServer<Self> {
        ChannelServiceServer::new(self)
    }
}

// Wire <-> domain

impl From<proto::MessageSender> for MessageSender {
    fn from(s: proto::MessageSender) -> Self {
        Self {
            name: s.name,
            role: s.role,
            bot_id: s.bot_id,
        }
    }
}

impl From<MessageSender> for proto::MessageSender {
    fn from(s: MessageSender) -> Self {
        Self {
            name: s.name,
            role: s.role,
            bot_id: s.bot_id,
        }
    }
}

impl From<proto::Attachment> for Attachment {
    fn from(a: proto::Attachment) -> Self {
        Self {
            kind: a.r#type,
            url: a.url,
            filename: a.filename,
            size: a.size,
        }
    }
}

impl From<Attachment> for proto::Attachment {
    fn from(a: Attachment) -> Self {
        Self {
            r#type: a.kind,
            url: a.url,
            filename: a.filename,
            size: a.size,
        }
    }
}

impl From<proto::MessageAction> for MessageAction {
    fn from(a: proto::MessageAction) -> Self {
        Self {
            label: a.label,
            callback_id: a.callback_id,
        }
    }
}

impl From<MessageAction> for proto::MessageAction {
    fn from(a: MessageAction) -> Self {
        Self {
            label: a.label,
            callback_id: a.callback_id,
        }
    }
}

impl From<proto::ChannelEnvelope> for ChannelEnvelope {
    fn from(e: proto::ChannelEnvelope) -> Self {
        Self {
            message_id: e.message_id,
            channel_id: e.channel_id,
            sender: e.sender.map(Into::into).unwrap_or_default(),
            text: e.text,
            attachments: e.attachments.into_iter().map(Into::into).collect(),
            reply_to: e.reply_to,
            actions: e.actions.into_iter().map(Into::into).collect(),
            platform_data: e.platform_data,
            timestamp: e.timestamp,
        }
    }
}

impl From<ChannelEnvelope> for proto::ChannelEnvelope {
    fn from(e: ChannelEnvelope) -> Self {
        Self {
            message_id: e.message_id,
            channel_id: e.channel_id,
            sender: Some(e.sender.into()),
            text: e.text,
            attachments: e.attachments.into_iter().map(Into::into).collect(),
            reply_to: e.reply_to,
            actions: e.actions.into_iter().map(Into::into).collect(),
            platform_data: e.platform_data,
            timestamp: e.timestamp,
        }
    }
}

fn error_field(operation: &'static str, result: anyhow::Result<()>) -> String {
    match result {
        Ok(()) => String::new(),
        Err(e) => handler_error(KIND, operation, &e),
    }
}

#[tonic::async_trait]
impl ChannelService for ChannelBridge {
    type ReceiveStream = Outbound<proto::ChannelEnvelope>;

    async fn health_check(
        &self,
        _request: Request<proto::HealthCheckRequest>,
    ) -> Result<Response<proto::HealthCheckResponse>, Status> {
        Ok(Response::new(self.ctx.health()))
    }

    async fn id(&self, _request: Request<proto::Empty>) -> Result<Response<proto::IdResponse>, Status> {
        Ok(Response::new(proto::IdResponse { id: self.handler.id() }))
    }

    async fn connect(
        &self,
        request: Request<proto::ChannelConnectRequest>,
    ) -> Result<Response<proto::ChannelConnectResponse>, Status> {
        let config = request.into_inner().config;
        let error = error_field("connect", self.handler.connect(config).await);
        Ok(Response::new(proto::ChannelConnectResponse { error }))
    }

    async fn disconnect(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::ChannelDisconnectResponse>, Status> {
        let error = error_field("disconnect", self.handler.disconnect().await);
        Ok(Response::new(proto::ChannelDisconnectResponse { error }))
    }

    async fn send(
        &self,
        request: Request<proto::ChannelSendRequest>,
    ) -> Result<Response<proto::ChannelSendResponse>, Status> {
        let envelope = request.into_inner().envelope.map(Into::into).unwrap_or_default();

        let response = match self.handler.send(envelope).await {
            Ok(message_id) => proto::ChannelSendResponse {
                message_id,
                error: String::new(),
            },
            Err(e) => proto::ChannelSendResponse {
                message_id: String::new(),
                error: handler_error(KIND, "send", &e),
            },
        };
        Ok(Response::new(response))
    }

    async fn receive(&self, _request: Request<proto::Empty>) -> Result<Response<Self::ReceiveStream>, Status> {
        let source = self
            .handler
            .receive()
            .await
            .map_err(|e| Status::internal(format!("{:#}", e)))?;

        Ok(Response::new(
            self.ctx.forwarder(KIND).spawn(source, proto::ChannelEnvelope::from),
        ))
    }

    async fn configure(&self, request: Request<proto::SettingsMap>) -> Result<Response<proto::Empty>, Status> {
        Ok(Response::new(self.ctx.configure(request.into_inner())))
    }
}
