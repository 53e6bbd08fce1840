// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Stream Forwarder
//!
//! Relays a handler's [`EventStream`] onto an outbound gRPC response stream.
//!
//! Every iteration races three things: the lifecycle manager force-closing
//! open streams, the peer going away, and the next item from the handler.
//! Items are translated and published in source order with at most one item
//! in flight (outbound channel capacity 1). There is no retry: a terminated
//! stream must be reopened by the caller.
//!
//! Cancellation is cooperative. A handler that is stuck producing its next
//! item delays nothing but itself: the race observes the peer going away as
//! soon as the forwarder is polled, but the handler only learns about it when
//! its stream is dropped.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Implements event-stream forwarding with cancellation

use futures::StreamExt;
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::Status;
use tracing::debug;

use crate::domain::stream::EventStream;

/// How long a force-closed stream waits to tell the peer why it ended
const FORCE_CLOSE_NOTICE: Duration = Duration::from_millis(250);

/// Outbound half of a forwarded stream
pub type Outbound<W> = ReceiverStream<Result<W, Status>>;

/// Why forwarding stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Source ended normally; the call completes successfully
    Exhausted,
    /// Peer went away first; unread items are discarded
    Cancelled,
    /// Publishing an item failed; nothing more is sent
    PublishFailed,
    /// Server grace period expired; the peer gets `UNAVAILABLE`
    ForceClosed,
}

impl ForwardOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardOutcome::Exhausted => "exhausted",
            ForwardOutcome::Cancelled => "cancelled",
            ForwardOutcome::PublishFailed => "publish_failed",
            ForwardOutcome::ForceClosed => "force_closed",
        }
    }

    /// Whether the caller should treat the termination as abnormal
    pub fn is_fault(&self) -> bool {
        matches!(self, ForwardOutcome::PublishFailed | ForwardOutcome::ForceClosed)
    }
}

impl fmt::Display for ForwardOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forwards handler event streams for one service
#[derive(Debug, Clone)]
pub struct StreamForwarder {
    service: &'static str,
    force_close: CancellationToken,
}

impl StreamForwarder {
    /// `force_close` is cancelled by the lifecycle manager when the shutdown
    /// grace period runs out.
    pub fn new(service: &'static str, force_close: CancellationToken) -> Self {
        Self { service, force_close }
    }

    /// Start forwarding on its own task and hand back the outbound stream
    pub fn spawn<T, W, F>(&self, source: EventStream<T>, translate: F) -> Outbound<W>
    where
        T: Send + 'static,
        W: Send + 'static,
        F: Fn(T) -> W + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let forwarder = self.clone();
        tokio::spawn(async move {
            forwarder.forward(source, translate, tx).await;
        });
        ReceiverStream::new(rx)
    }

    /// Forward until the source ends, the peer cancels, publishing fails or
    /// the server force-closes the stream.
    pub async fn forward<T, W, F>(
        &self,
        mut source: EventStream<T>,
        translate: F,
        tx: mpsc::Sender<Result<W, Status>>,
    ) -> ForwardOutcome
    where
        F: Fn(T) -> W,
    {
        let mut forwarded: u64 = 0;

        let outcome = loop {
            let event = tokio::select! {
                biased;
                _ = self.force_close.cancelled() => break ForwardOutcome::ForceClosed,
                _ = tx.closed() => break ForwardOutcome::Cancelled,
                next = source.next() => match next {
                    Some(event) => event,
                    None => break ForwardOutcome::Exhausted,
                },
            };

            let message = translate(event);
            let sent = tokio::select! {
                biased;
                _ = self.force_close.cancelled() => break ForwardOutcome::ForceClosed,
                sent = tx.send(Ok(message)) => sent,
            };
            if sent.is_err() {
                break ForwardOutcome::PublishFailed;
            }

            forwarded += 1;
            metrics::counter!("nebo_app_stream_items_total", "service" => self.service).increment(1);
        };

        if outcome == ForwardOutcome::ForceClosed {
            let notice = Err(Status::unavailable("app is shutting down"));
            let _ = tokio::time::timeout(FORCE_CLOSE_NOTICE, tx.send(notice)).await;
        }

        debug!(
            service = self.service,
            outcome = outcome.as_str(),
            forwarded,
            "Stream forwarding finished"
        );
        metrics::counter!(
            "nebo_app_streams_total",
            "service" => self.service,
            "outcome" => outcome.as_str()
        )
        .increment(1);

        outcome
    }
}
