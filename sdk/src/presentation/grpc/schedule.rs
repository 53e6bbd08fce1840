// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Schedule Bridge
//!
//! Adapts a [`ScheduleHandler`] to `nebo.apps.v1.ScheduleService`. All
//! record-level rpcs embed handler failures in the response `error` field, so
//! the host can tell "no such schedule" apart from a broken connection.
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Implements the schedule gRPC service over the domain contract

use std::sync::Arc;
use tonic::{Request, Response, Status};

use super::bridge::{from_unix, handler_error, to_unix, BridgeContext};
use super::proto;
use super::proto::schedule_service_server::{ScheduleService, ScheduleServiceServer};
use crate::application::forwarder::Outbound;
use crate::application::registry::CapabilityKind;
use crate::domain::schedule::{
    NewSchedule, Schedule, ScheduleHandler, ScheduleQuery, ScheduleRun, ScheduleTrigger, ScheduleUpdate,
};

const KIND: CapabilityKind = CapabilityKind::Schedule;

pub struct ScheduleBridge {
    handler: Arc<dyn ScheduleHandler>,
    ctx: BridgeContext,
}

impl ScheduleBridge {
    pub fn new(handler: Arc<dyn ScheduleHandler>, ctx: BridgeContext) -> Self {
        Self { handler, ctx }
    }

    pub fn into_server(self) -> ScheduleServiceServer<Self> {
        ScheduleServiceServer::new(self)
    }
}

impl From<Schedule> for proto::Schedule {
    fn from(s: Schedule) -> Self {
        Self {
            id: s.id,
            name: s.name,
            expression: s.expression,
            task_type: s.task_type,
            command: s.command,
            message: s.message,
            deliver: s.deliver,
            enabled: s.enabled,
            last_run: to_unix(s.last_run),
            next_run: to_unix(s.next_run),
            run_count: s.run_count,
            last_error: s.last_error,
            created_at: to_unix(s.created_at),
            metadata: s.metadata,
        }
    }
}

impl From<proto::Schedule> for Schedule {
    fn from(s: proto::Schedule) -> Self {
        Self {
            id: s.id,
            name: s.name,
            expression: s.expression,
            task_type: s.task_type,
            command: s.command,
            message: s.message,
            deliver: s.deliver,
            enabled: s.enabled,
            last_run: from_unix(s.last_run),
            next_run: from_unix(s.next_run),
            run_count: s.run_count,
            last_error: s.last_error,
            created_at: from_unix(s.created_at),
            metadata: s.metadata,
        }
    }
}

impl From<proto::CreateScheduleRequest> for NewSchedule {
    fn from(r: proto::CreateScheduleRequest) -> Self {
        Self {
            name: r.name,
            expression: r.expression,
            task_type: r.task_type,
            command: r.command,
            message: r.message,
            deliver: r.deliver,
            metadata: r.metadata,
        }
    }
}

impl From<proto::UpdateScheduleRequest> for ScheduleUpdate {
    fn from(r: proto::UpdateScheduleRequest) -> Self {
        Self {
            name: r.name,
            expression: r.expression,
            task_type: r.task_type,
            command: r.command,
            message: r.message,
            deliver: r.deliver,
            metadata: r.metadata,
        }
    }
}

impl From<proto::ListSchedulesRequest> for ScheduleQuery {
    fn from(r: proto::ListSchedulesRequest) -> Self {
        Self {
            limit: r.limit,
            offset: r.offset,
            enabled_only: r.enabled_only,
        }
    }
}

impl From<ScheduleRun> for proto::ScheduleHistoryEntry {
    fn from(r: ScheduleRun) -> Self {
        Self {
            id: r.id,
            schedule_name: r.schedule_name,
            started_at: to_unix(r.started_at),
            finished_at: to_unix(r.finished_at),
            success: r.success,
            output: r.output,
            error: r.error,
        }
    }
}

impl From<ScheduleTrigger> for proto::ScheduleTrigger {
    fn from(t: ScheduleTrigger) -> Self {
        Self {
            schedule_id: t.schedule_id,
            name: t.name,
            task_type: t.task_type,
            command: t.command,
            message: t.message,
            metadata: t.metadata,
            fired_at: to_unix(t.fired_at),
        }
    }
}

fn schedule_response(operation: &'static str, result: anyhow::Result<Schedule>) -> Response<proto::ScheduleResponse> {
    let response = match result {
        Ok(schedule) => proto::ScheduleResponse {
            schedule: Some(schedule.into()),
            error: String::new(),
        },
        Err(e) => proto::ScheduleResponse {
            schedule: None,
            error: handler_error(KIND, operation, &e),
        },
    };
    Response::new(response)
}

#[tonic::async_trait]
impl ScheduleService for ScheduleBridge {
    type TriggersStream = Outbound<proto::ScheduleTrigger>;

    async fn health_check(
        &self,
        _request: Request<proto::HealthCheckRequest>,
    ) -> Result<Response<proto::HealthCheckResponse>, Status> {
        Ok(Response::new(self.ctx.health()))
    }

    async fn create(
        &self,
        request: Request<proto::CreateScheduleRequest>,
    ) -> Result<Response<proto::ScheduleResponse>, Status> {
        let new = NewSchedule::from(request.into_inner());
        Ok(schedule_response("create", self.handler.create(new).await))
    }

    async fn get(&self, request: Request<proto::ScheduleNameRequest>) -> Result<Response<proto::ScheduleResponse>, Status> {
        let name = request.into_inner().name;
        Ok(schedule_response("get", self.handler.get(&name).await))
    }

    async fn list(
        &self,
        request: Request<proto::ListSchedulesRequest>,
    ) -> Result<Response<proto::ListSchedulesResponse>, Status> {
        let query = ScheduleQuery::from(request.into_inner());

        let response = match self.handler.list(query).await {
            Ok(page) => proto::ListSchedulesResponse {
                schedules: page.items.into_iter().map(Into::into).collect(),
                total: page.total,
                error: String::new(),
            },
            Err(e) => proto::ListSchedulesResponse {
                schedules: Vec::new(),
                total: 0,
                error: handler_error(KIND, "list", &e),
            },
        };
        Ok(Response::new(response))
    }

    async fn update(
        &self,
        request: Request<proto::UpdateScheduleRequest>,
    ) -> Result<Response<proto::ScheduleResponse>, Status> {
        let update = ScheduleUpdate::from(request.into_inner());
        Ok(schedule_response("update", self.handler.update(update).await))
    }

    async fn delete(
        &self,
        request: Request<proto::ScheduleNameRequest>,
    ) -> Result<Response<proto::DeleteScheduleResponse>, Status> {
        let name = request.into_inner().name;

        let response = match self.handler.delete(&name).await {
            Ok(()) => proto::DeleteScheduleResponse {
                success: true,
                error: String::new(),
            },
            Err(e) => proto::DeleteScheduleResponse {
                success: false,
                error: handler_error(KIND, "delete", &e),
            },
        };
        Ok(Response::new(response))
    }

    async fn enable(
        &self,
        request: Request<proto::ScheduleNameRequest>,
    ) -> Result<Response<proto::ScheduleResponse>, Status> {
        let name = request.into_inner().name;
        Ok(schedule_response("enable", self.handler.enable(&name).await))
    }

    async fn disable(
        &self,
        request: Request<proto::ScheduleNameRequest>,
    ) -> Result<Response<proto::ScheduleResponse>, Status> {
        let name = request.into_inner().name;
        Ok(schedule_response("disable", self.handler.disable(&name).await))
    }

    async fn trigger(
        &self,
        request: Request<proto::ScheduleNameRequest>,
    ) -> Result<Response<proto::TriggerResponse>, Status> {
        let name = request.into_inner().name;

        let response = match self.handler.trigger(&name).await {
            Ok(outcome) => proto::TriggerResponse {
                success: outcome.success,
                output: outcome.output,
                error: String::new(),
            },
            Err(e) => proto::TriggerResponse {
                success: false,
                output: String::new(),
                error: handler_error(KIND, "trigger", &e),
            },
        };
        Ok(Response::new(response))
    }

    async fn history(
        &self,
        request: Request<proto::ScheduleHistoryRequest>,
    ) -> Result<Response<proto::ScheduleHistoryResponse>, Status> {
        let req = request.into_inner();

        let response = match self.handler.history(&req.name, req.limit, req.offset).await {
            Ok(page) => proto::ScheduleHistoryResponse {
                entries: page.items.into_iter().map(Into::into).collect(),
                total: page.total,
                error: String::new(),
            },
            Err(e) => proto::ScheduleHistoryResponse {
                entries: Vec::new(),
                total: 0,
                error: handler_error(KIND, "history", &e),
            },
        };
        Ok(Response::new(response))
    }

    async fn triggers(&self, _request: Request<proto::Empty>) -> Result<Response<Self::TriggersStream>, Status> {
        let source = self
            .handler
            .triggers()
            .await
            .map_err(|e| Status::internal(format!("{:#}", e)))?;

        Ok(Response::new(
            self.ctx.forwarder(KIND).spawn(source, proto::ScheduleTrigger::from),
        ))
    }

    async fn configure(&self, request: Request<proto::SettingsMap>) -> Result<Response<proto::Empty>, Status> {
        Ok(Response::new(self.ctx.configure(request.into_inner())))
    }
}
