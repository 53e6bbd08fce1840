// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! UI Bridge
//!
//! Adapts the registered UI surface to `nebo.apps.v1.UiService`. A structured
//! surface answers GetView, SendEvent and StreamUpdates; an HTTP surface
//! answers HandleRequest by dispatching through its axum router. Calling an
//! rpc of the other delivery mode returns `UNIMPLEMENTED`.
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Implements the UI gRPC service for both delivery modes

use axum::body::Body;
use axum::http::{Method, Request as HttpRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tower::ServiceExt;

use super::bridge::{handler_error, BridgeContext};
use super::proto;
use super::proto::ui_service_server::{UiService, UiServiceServer};
use crate::application::forwarder::Outbound;
use crate::application::registry::{CapabilityKind, UiSurface};
use crate::domain::stream::{event_stream, EventStream};
use crate::domain::ui::{Block, BlockKind, SelectOption, UiEvent, UiHandler, View, ViewRequest};

const KIND: CapabilityKind = CapabilityKind::Ui;

pub struct UiBridge {
    surface: UiSurface,
    ctx: BridgeContext,
}

impl UiBridge {
    pub fn new(surface: UiSurface, ctx: BridgeContext) -> Self {
        Self { surface, ctx }
    }

    pub fn into_server(self) -> UiServiceServer<Self> {
        UiServiceServer::new(self)
    }

    fn structured(&self) -> Result<&Arc<dyn UiHandler>, Status> {
        match &self.surface {
            UiSurface::Structured(handler) => Ok(handler),
            UiSurface::Http(_) => Err(Status::unimplemented("app serves UI over HTTP, not structured views")),
        }
    }
}

impl From<SelectOption> for proto::SelectOption {
    fn from(o: SelectOption) -> Self {
        Self {
            label: o.label,
            value: o.value,
        }
    }
}

impl From<proto::SelectOption> for SelectOption {
    fn from(o: proto::SelectOption) -> Self {
        Self {
            label: o.label,
            value: o.value,
        }
    }
}

impl From<Block> for proto::UiBlock {
    fn from(b: Block) -> Self {
        Self {
            block_id: b.block_id,
            r#type: b.kind.as_str().to_string(),
            text: b.text,
            value: b.value,
            placeholder: b.placeholder,
            hint: b.hint,
            variant: b.variant,
            src: b.src,
            alt: b.alt,
            disabled: b.disabled,
            options: b.options.into_iter().map(Into::into).collect(),
            style: b.style,
        }
    }
}

impl From<proto::UiBlock> for Block {
    fn from(b: proto::UiBlock) -> Self {
        Self {
            block_id: b.block_id,
            kind: BlockKind::from(b.r#type.as_str()),
            text: b.text,
            value: b.value,
            placeholder: b.placeholder,
            hint: b.hint,
            variant: b.variant,
            src: b.src,
            alt: b.alt,
            disabled: b.disabled,
            options: b.options.into_iter().map(Into::into).collect(),
            style: b.style,
        }
    }
}

impl From<View> for proto::UiView {
    fn from(v: View) -> Self {
        Self {
            view_id: v.view_id,
            title: v.title,
            blocks: v.blocks.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<proto::UiView> for View {
    fn from(v: proto::UiView) -> Self {
        Self {
            view_id: v.view_id,
            title: v.title,
            blocks: v.blocks.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<proto::UiEvent> for UiEvent {
    fn from(e: proto::UiEvent) -> Self {
        Self {
            view_id: e.view_id,
            block_id: e.block_id,
            action: e.action,
            value: e.value,
        }
    }
}

/// Build an axum request from the proxied one. An empty method means GET.
fn to_http_request(req: proto::HttpRequest) -> Result<HttpRequest<Body>, Status> {
    let method = if req.method.is_empty() {
        Method::GET
    } else {
        Method::from_bytes(req.method.as_bytes())
            .map_err(|e| Status::invalid_argument(format!("invalid method {:?}: {}", req.method, e)))?
    };

    let path = if req.path.is_empty() { "/" } else { req.path.as_str() };
    let uri = if req.query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, req.query)
    };

    let mut builder = HttpRequest::builder().method(method).uri(uri);
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Body::from(req.body))
        .map_err(|e| Status::invalid_argument(format!("build request: {}", e)))
}

#[tonic::async_trait]
impl UiService for UiBridge {
    type StreamUpdatesStream = Outbound<proto::UiView>;

    async fn health_check(
        &self,
        _request: Request<proto::HealthCheckRequest>,
    ) -> Result<Response<proto::HealthCheckResponse>, Status> {
        Ok(Response::new(self.ctx.health()))
    }

    async fn get_view(&self, request: Request<proto::GetViewRequest>) -> Result<Response<proto::UiViewResponse>, Status> {
        let handler = self.structured()?;
        let req = request.into_inner();
        let view_request = ViewRequest {
            view_id: req.view_id,
            context: req.context,
        };

        let response = match handler.get_view(view_request).await {
            Ok(view) => proto::UiViewResponse {
                view: Some(view.into()),
                error: String::new(),
            },
            Err(e) => proto::UiViewResponse {
                view: None,
                error: handler_error(KIND, "get_view", &e),
            },
        };
        Ok(Response::new(response))
    }

    async fn send_event(&self, request: Request<proto::UiEvent>) -> Result<Response<proto::UiEventResponse>, Status> {
        let handler = self.structured()?;
        let event = UiEvent::from(request.into_inner());

        let response = match handler.send_event(event).await {
            Ok(result) => proto::UiEventResponse {
                view: result.view.map(Into::into),
                error: String::new(),
                toast: result.toast,
            },
            Err(e) => proto::UiEventResponse {
                view: None,
                error: handler_error(KIND, "send_event", &e),
                toast: String::new(),
            },
        };
        Ok(Response::new(response))
    }

    async fn stream_updates(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<Self::StreamUpdatesStream>, Status> {
        let handler = self.structured()?;

        // Without live updates the call stays open and silent until the
        // caller leaves or the app shuts down.
        let source: EventStream<View> = match handler.live_updates() {
            Some(live) => live
                .stream_updates()
                .await
                .map_err(|e| Status::internal(format!("{:#}", e)))?,
            None => event_stream(futures::stream::pending()),
        };

        Ok(Response::new(self.ctx.forwarder(KIND).spawn(source, proto::UiView::from)))
    }

    async fn handle_request(
        &self,
        request: Request<proto::HttpRequest>,
    ) -> Result<Response<proto::HttpResponse>, Status> {
        let router = match &self.surface {
            UiSurface::Http(router) => router.clone(),
            UiSurface::Structured(_) => return Err(Status::unimplemented("no HTTP handlers registered")),
        };

        let http_request = to_http_request(request.into_inner())?;
        let response = match router.oneshot(http_request).await {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        };

        let status_code = i32::from(response.status().as_u16());
        // Multi-valued headers collapse to their first value
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_insert_with(|| String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| Status::internal(format!("read response body: {}", e)))?;

        Ok(Response::new(proto::HttpResponse {
            status_code,
            headers,
            body: body.to_vec(),
        }))
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
    use crate::domain::ui::{UiEventResult, UiLiveUpdates, ViewBuilder};
    use async_trait::async_trait;
    use axum::extract::Path;
    use axum::routing::{get, post};
    use axum::Router;
    use futures::{stream, StreamExt};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    struct Counter;

    #[async_trait]
    impl UiHandler for Counter {
        async fn get_view(&self, request: ViewRequest) -> anyhow::Result<View> {
            match request.view_id.as_str() {
                "main" => Ok(ViewBuilder::new("main", "Counter")
                    .heading("title", "Count", "h1")
                    .text("value", request.context.get("count").map(String::as_str).unwrap_or("0"))
                    .button("inc", "+1", "primary")
                    .build()),
                other => anyhow::bail!("unknown view {}", other),
            }
        }

        async fn send_event(&self, event: UiEvent) -> anyhow::Result<UiEventResult> {
            Ok(UiEventResult {
                view: None,
                toast: format!("{} on {}", event.action, event.block_id),
            })
        }
    }

    struct Ticker;

    #[async_trait]
    impl UiHandler for Ticker {
        async fn get_view(&self, _request: ViewRequest) -> anyhow::Result<View> {
            Ok(View::default())
        }

        async fn send_event(&self, _event: UiEvent) -> anyhow::Result<UiEventResult> {
            Ok(UiEventResult::default())
        }

        fn live_updates(&self) -> Option<&dyn UiLiveUpdates> {
            Some(self)
        }
    }

    #[async_trait]
    impl UiLiveUpdates for Ticker {
        async fn stream_updates(&self) -> anyhow::Result<EventStream<View>> {
            let views = (1..=2).map(|n| ViewBuilder::new("tick", format!("Tick {}", n)).build());
            Ok(event_stream(stream::iter(views.collect::<Vec<_>>())))
        }
    }

    fn context() -> BridgeContext {
        BridgeContext::new(Arc::new(AppEnv::default()), ConfigSink::default(), CancellationToken::new())
    }

    fn structured(handler: impl UiHandler + 'static) -> UiBridge {
        UiBridge::new(UiSurface::Structured(Arc::new(handler)), context())
    }

    fn http() -> UiBridge {
        let router = Router::new()
            .route("/status", get(|| async { "ok" }))
            .route("/items/{id}", get(|Path(id): Path<String>| async move { format!("item {}", id) }))
            .route("/echo", post(|body: String| async move { body.to_uppercase() }));
        UiBridge::new(UiSurface::Http(router), context())
    }

    fn http_request(method: &str, path: &str, body: &[u8]) -> Request<proto::HttpRequest> {
        Request::new(proto::HttpRequest {
            method: method.to_string(),
            path: path.to_string(),
            body: body.to_vec(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_get_view_translates_blocks() {
        let bridge = structured(Counter);

        let response = bridge
            .get_view(Request::new(proto::GetViewRequest {
                view_id: "main".to_string(),
                context: HashMap::from([("count".to_string(), "7".to_string())]),
            }))
            .await
            .unwrap()
            .into_inner();

        let view = response.view.unwrap();
        assert_eq!(view.title, "Counter");
        let types: Vec<&str> = view.blocks.iter().map(|b| b.r#type.as_str()).collect();
        assert_eq!(types, vec!["heading", "text", "button"]);
        assert_eq!(view.blocks[1].text, "7");
    }

    #[tokio::test]
    async fn test_get_view_failure_is_embedded() {
        let bridge = structured(Counter);

        let response = bridge
            .get_view(Request::new(proto::GetViewRequest {
                view_id: "settings".to_string(),
                ..Default::default()
            }))
            .await
            .unwrap()
            .into_inner();

        assert!(response.view.is_none());
        assert_eq!(response.error, "unknown view settings");
    }

    #[tokio::test]
    async fn test_send_event_returns_toast() {
        let bridge = structured(Counter);

        let response = bridge
            .send_event(Request::new(proto::UiEvent {
                view_id: "main".to_string(),
                block_id: "inc".to_string(),
                action: "click".to_string(),
                value: String::new(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert!(response.view.is_none());
        assert_eq!(response.toast, "click on inc");
    }

    #[tokio::test]
    async fn test_stream_updates_with_live_refinement() {
        let bridge = structured(Ticker);

        let outbound = bridge
            .stream_updates(Request::new(proto::Empty {}))
            .await
            .unwrap()
            .into_inner();
        let titles: Vec<String> = outbound.map(|r| r.unwrap().title).collect().await;

        assert_eq!(titles, vec!["Tick 1".to_string(), "Tick 2".to_string()]);
    }

    #[tokio::test]
    async fn test_stream_updates_without_refinement_stays_silent() {
        let bridge = structured(Counter);

        let mut outbound = bridge
            .stream_updates(Request::new(proto::Empty {}))
            .await
            .unwrap()
            .into_inner();

        let next = tokio::time::timeout(Duration::from_millis(50), outbound.next()).await;
        assert!(next.is_err());
    }

    #[tokio::test]
    async fn test_http_dispatch() {
        let bridge = http();

        let response = bridge
            .handle_request(http_request("GET", "/status", b""))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, b"ok");
        assert!(response.headers["content-type"].starts_with("text/plain"));

        let response = bridge
            .handle_request(http_request("", "/items/42", b""))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.body, b"item 42");

        let response = bridge
            .handle_request(http_request("POST", "/echo", b"shout"))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.body, b"SHOUT");
    }

    #[tokio::test]
    async fn test_http_unknown_route_is_404() {
        let bridge = http();

        let response = bridge
            .handle_request(http_request("GET", "/missing", b""))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status_code, 404);
    }

    #[tokio::test]
    async fn test_http_query_is_forwarded() {
        let router = Router::new().route(
            "/search",
            get(|axum::extract::RawQuery(q): axum::extract::RawQuery| async move { q.unwrap_or_default() }),
        );
        let bridge = UiBridge::new(UiSurface::Http(router), context());

        let response = bridge
            .handle_request(Request::new(proto::HttpRequest {
                method: "GET".to_string(),
                path: "/search".to_string(),
                query: "q=rust&page=2".to_string(),
                ..Default::default()
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.body, b"q=rust&page=2");
    }

    #[tokio::test]
    async fn test_wrong_delivery_mode_is_unimplemented() {
        let status = structured(Counter)
            .handle_request(http_request("GET", "/status", b""))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unimplemented);

        let status = http()
            .get_view(Request::new(proto::GetViewRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unimplemented);
    }

    #[tokio::test]
    async fn test_invalid_method_is_rejected() {
        let status = http()
            .handle_request(http_request("NOT A METHOD", "/status", b""))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }
}
