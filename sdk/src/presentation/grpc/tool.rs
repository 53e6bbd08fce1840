// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tool service bridge: adapts a [`ToolHandler`] to `nebo.apps.v1.ToolService`.

use std::sync::Arc;
use tonic::{Request, Response, Status};

use super::bridge::{handler_error, BridgeContext};
use super::proto;
use super::proto::tool_service_server::{ToolService, ToolServiceServer};
use crate::application::registry::CapabilityKind;
use crate::domain::tool::{ToolHandler, ToolInput};

const KIND: CapabilityKind = CapabilityKind::Tool;

pub struct ToolBridge {
    handler: Arc<dyn ToolHandler>,
    ctx: BridgeContext,
}

impl ToolBridge {
    pub fn new(handler: Arc<dyn ToolHandler>, ctx: BridgeContext) -> Self {
        Self { handler, ctx }
    }

    pub fn into_server(self) -> ToolServiceServer<Self> {
        ToolServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl ToolService for ToolBridge {
    async fn health_check(
        &self,
        _request: Request<proto::HealthCheckRequest>,
    ) -> Result<Response<proto::HealthCheckResponse>, Status> {
        Ok(Response::new(self.ctx.health()))
    }

    async fn name(&self, _request: Request<proto::Empty>) -> Result<Response<proto::NameResponse>, Status> {
        Ok(Response::new(proto::NameResponse {
            name: self.handler.name(),
        }))
    }

    async fn description(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::DescriptionResponse>, Status> {
        Ok(Response::new(proto::DescriptionResponse {
            description: self.handler.description(),
        }))
    }

    async fn schema(&self, _request: Request<proto::Empty>) -> Result<Response<proto::SchemaResponse>, Status> {
        let schema = serde_json::to_vec(&self.handler.schema())
            .map_err(|e| Status::internal(format!("encode schema: {}", e)))?;
        Ok(Response::new(proto::SchemaResponse { schema }))
    }

    async fn execute(
        &self,
        request: Request<proto::ExecuteRequest>,
    ) -> Result<Response<proto::ExecuteResponse>, Status> {
        // Input goes to the handler untouched; it owns validation.
        let input = ToolInput::new(request.into_inner().input);

        let response = match self.handler.execute(input).await {
            Ok(content) => proto::ExecuteResponse {
                content,
                is_error: false,
            },
            Err(e) => proto::ExecuteResponse {
                content: handler_error(KIND, "execute", &e),
                is_error: true,
            },
        };
        Ok(Response::new(response))
    }

    async fn requires_approval(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::ApprovalResponse>, Status> {
        let requires_approval = self
            .handler
            .approval()
            .map(|a| a.requires_approval())
            .unwrap_or(false);
        Ok(Response::new(proto::ApprovalResponse { requires_approval }))
    }

    async fn configure(&self, request: Request<proto::SettingsMap>) -> Result<Response<proto::Empty>, Status> {
        Ok(Response::new(self.ctx.configure(request.into_inner())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config_sink::ConfigSink;
    use crate::domain::env::AppEnv;
    use crate::domain::tool::RequiresApproval;
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use tokio_util::sync::CancellationToken;

    #[derive(Deserialize)]
    struct DivideArgs {
        a: f64,
        b: f64,
    }

    struct Divider;

    #[async_trait]
    impl ToolHandler for Divider {
        fn name(&self) -> String {
            "divider".to_string()
        }
        fn description(&self) -> String {
            "Divides numbers".to_string()
        }
        fn schema(&self) -> Value {
            json!({ "type": "object" })
        }
        async fn execute(&self, input: ToolInput) -> anyhow::Result<String> {
            let args: DivideArgs = input
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid input: {}", e))?;
            if args.b == 0.0 {
                anyhow::bail!("division by zero");
            }
            Ok(format!("{}", args.a / args.b))
        }
    }

    struct Guarded;

    #[async_trait]
    impl ToolHandler for Guarded {
        fn name(&self) -> String {
            "guarded".to_string()
        }
        fn description(&self) -> String {
            String::new()
        }
        fn schema(&self) -> Value {
            Value::Null
        }
        async fn execute(&self, input: ToolInput) -> anyhow::Result<String> {
            Ok(String::from_utf8_lossy(input.as_bytes()).into_owned())
        }
        fn approval(&self) -> Option<&dyn RequiresApproval> {
            Some(self)
        }
    }

    impl RequiresApproval for Guarded {
        fn requires_approval(&self) -> bool {
            true
        }
    }

    fn bridge(handler: impl ToolHandler + 'static) -> ToolBridge {
        let env = AppEnv {
            name: "calc".to_string(),
            version: "0.1.0".to_string(),
            ..Default::default()
        };
        let ctx = BridgeContext::new(Arc::new(env), ConfigSink::default(), CancellationToken::new());
        ToolBridge::new(Arc::new(handler), ctx)
    }

    fn execute_request(input: &[u8]) -> Request<proto::ExecuteRequest> {
        Request::new(proto::ExecuteRequest { input: input.to_vec() })
    }

    #[tokio::test]
    async fn test_business_error_is_embedded_in_response() {
        let bridge = bridge(Divider);

        let response = bridge
            .execute(execute_request(br#"{"action":"divide","a":4,"b":0}"#))
            .await
            .unwrap()
            .into_inner();

        assert!(response.is_error);
        assert_eq!(response.content, "division by zero");
    }

    #[tokio::test]
    async fn test_success_has_no_error_flag() {
        let bridge = bridge(Divider);

        let response = bridge
            .execute(execute_request(br#"{"a":9,"b":3}"#))
            .await
            .unwrap()
            .into_inner();

        assert!(!response.is_error);
        assert_eq!(response.content, "3");
    }

    #[tokio::test]
    async fn test_non_json_input_reaches_handler() {
        let bridge = bridge(Divider);

        let response = bridge
            .execute(execute_request(b"add 2 3"))
            .await
            .unwrap()
            .into_inner();

        assert!(response.is_error);
        assert!(response.content.starts_with("invalid input: "));
    }

    #[tokio::test]
    async fn test_input_bytes_are_passed_through_unchanged() {
        let bridge = bridge(Guarded);

        let response = bridge
            .execute(execute_request(b"not json at all"))
            .await
            .unwrap()
            .into_inner();
        assert!(!response.is_error);
        assert_eq!(response.content, "not json at all");

        let empty = bridge.execute(execute_request(b"")).await.unwrap().into_inner();
        assert_eq!(empty.content, "");
    }

    #[tokio::test]
    async fn test_approval_refinement() {
        let plain = bridge(Divider)
            .requires_approval(Request::new(proto::Empty {}))
            .await
            .unwrap()
            .into_inner();
        assert!(!plain.requires_approval);

        let guarded = bridge(Guarded)
            .requires_approval(Request::new(proto::Empty {}))
            .await
            .unwrap()
            .into_inner();
        assert!(guarded.requires_approval);
    }

    #[tokio::test]
    async fn test_metadata_operations() {
        let bridge = bridge(Divider);

        let name = bridge.name(Request::new(proto::Empty {})).await.unwrap().into_inner();
        assert_eq!(name.name, "divider");

        let description = bridge.description(Request::new(proto::Empty {})).await.unwrap().into_inner();
        assert_eq!(description.description, "Divides numbers");

        let schema = bridge.schema(Request::new(proto::Empty {})).await.unwrap().into_inner();
        let decoded: Value = serde_json::from_slice(&schema.schema).unwrap();
        assert_eq!(decoded, json!({ "type": "object" }));
    }

    #[tokio::test]
    async fn test_health_check_is_stable_across_calls() {
        let bridge = bridge(Divider);

        let before = bridge
            .health_check(Request::new(proto::HealthCheckRequest {}))
            .await
            .unwrap()
            .into_inner();
        let _ = bridge.execute(execute_request(br#"{"a":1,"b":0}"#)).await.unwrap();
        let after = bridge
            .health_check(Request::new(proto::HealthCheckRequest {}))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(before, after);
        assert!(after.healthy);
        assert_eq!(after.name, "calc");
        assert_eq!(after.version, "0.1.0");
    }
}
