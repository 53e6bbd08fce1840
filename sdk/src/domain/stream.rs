// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use futures::Stream;
use std::pin::Pin;

/// Lazily produced, unbounded sequence of domain events returned by a handler.
///
/// The SDK reads it until it ends or the peer cancels; once the peer is gone
/// the stream is dropped without being polled again.
pub type EventStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// Box any `Stream` into an [`EventStream`]
pub fn event_stream<S, T>(stream: S) -> EventStream<T>
where
    S: Stream<Item = T> + Send + 'static,
{
    Box::pin(stream)
}
