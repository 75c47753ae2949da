//! # Delta Stream
//!
//! The event-to-text transform: inbound body chunks are fed through an
//! incremental server-sent-event decoder and each data event's JSON payload
//! is reduced to its text fragment. The decoder reassembles events across
//! chunk boundaries, so a multi-byte UTF-8 codepoint split between two
//! network reads still decodes correctly, and reconnection-hint or comment
//! blocks never surface as events.

use crate::{error::RelayError, schemas::CompletionChunk};
use bytes::Bytes;
use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures_util::{Stream, StreamExt};
use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

/// Literal data payload marking the end of the upstream stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Lifecycle of a [`DeltaStream`]. Terminal states never reopen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Still reading events from the upstream body
    Open,
    /// Ended on the `[DONE]` sentinel or on input exhaustion
    Closed,
    /// A payload failed to decode or the transport failed mid-stream
    Errored,
}

/// # Delta Stream
///
/// A stream of raw UTF-8 text fragments decoded from an upstream
/// server-sent-event body, in arrival order.
///
/// The stream closes normally on the `[DONE]` sentinel (without reading any
/// further input) or when the body ends, and yields a single terminal error
/// on a malformed payload, a payload with no content fragment, or a
/// transport failure. Already-yielded fragments are never retracted.
///
/// Dropping the stream drops the upstream body with it, releasing the
/// connection even when the consumer stops reading early.
pub struct DeltaStream {
    events: Pin<Box<dyn Stream<Item = Result<Event, RelayError>> + Send>>,
    state: StreamState,
}

impl DeltaStream {
    /// Wrap a stream of raw body chunks in the incremental decoder.
    pub fn new<S, B, E>(chunks: S) -> Self
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let events = chunks
            .eventsource()
            .map(|item| item.map_err(map_event_error));

        Self {
            events: Box::pin(events),
            state: StreamState::Open,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        self.state
    }
}

impl Stream for DeltaStream {
    type Item = Result<Bytes, RelayError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.state != StreamState::Open {
            return Poll::Ready(None);
        }

        match this.events.as_mut().poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(None) => {
                // Input exhausted without a sentinel: a normal close.
                this.state = StreamState::Closed;
                Poll::Ready(None)
            }
            Poll::Ready(Some(Err(err))) => {
                this.state = StreamState::Errored;
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(Some(Ok(event))) if event.data == DONE_SENTINEL => {
                this.state = StreamState::Closed;
                Poll::Ready(None)
            }
            Poll::Ready(Some(Ok(event))) => match decode_delta(&event.data) {
                Ok(fragment) => Poll::Ready(Some(Ok(fragment))),
                Err(err) => {
                    this.state = StreamState::Errored;
                    Poll::Ready(Some(Err(err)))
                }
            },
        }
    }
}

impl fmt::Debug for DeltaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeltaStream")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Extract the text fragment from a data event payload.
fn decode_delta(payload: &str) -> Result<Bytes, RelayError> {
    let chunk: CompletionChunk = serde_json::from_str(payload)?;

    let fragment = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .ok_or_else(|| {
            RelayError::StreamDecode("event payload carries no delta content".to_string())
        })?;

    Ok(Bytes::from(fragment))
}

fn map_event_error<E: fmt::Display>(err: EventStreamError<E>) -> RelayError {
    match err {
        EventStreamError::Transport(e) => RelayError::Transport(e.to_string()),
        decode => RelayError::StreamDecode(decode.to_string()),
    }
}
