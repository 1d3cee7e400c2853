//! Channel-backed event stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::types::ProgressEvent;

/// Lazily produced progress feed of one review
///
/// Dropping the stream closes the channel, which stops the producer at its
/// next yield point.
pub struct EventStream {
    rx: mpsc::Receiver<ProgressEvent>,
    request_id: Uuid,
}

impl EventStream {
    pub(crate) fn new(rx: mpsc::Receiver<ProgressEvent>, request_id: Uuid) -> Self {
        Self { rx, request_id }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Server-sent event frames (`data: <json>\n\n`), one per event
    pub fn into_sse(self) -> impl Stream<Item = String> + Send + Unpin {
        self.map(|event| event.to_sse_frame())
    }
}

impl Stream for EventStream {
    type Item = ProgressEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
