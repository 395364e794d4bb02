//! Timer-driven streaming for the `/api/ai/prompt/stream` endpoint.
//!
//! Emits a fixed number of synthetic parts on an interval. Nothing here
//! talks to the chat provider.

use std::convert::Infallible;
use std::time::Duration;

use axum::body::Body;
use axum::response::sse::Event;
use futures::stream::{Stream, StreamExt};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;

/// Text of the `index`-th part (1-based).
pub fn stream_part(index: usize, question: &str) -> String {
    format!("Streamed response part {index} for: {question}")
}

/// Emit `parts` strings, one per `interval`, the first after one interval.
pub fn simulated_parts(
    question: String,
    parts: usize,
    interval: Duration,
) -> impl Stream<Item = String> {
    // tokio panics on a zero period.
    let period = interval.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    IntervalStream::new(ticker)
        .take(parts)
        .enumerate()
        .map(move |(i, _)| stream_part(i + 1, &question))
}

/// Wrap each part in its own SSE `data:` event.
pub fn parts_to_sse<S>(parts: S) -> impl Stream<Item = Result<Event, Infallible>>
where
    S: Stream<Item = String>,
{
    parts.map(|part| Ok(Event::default().data(part)))
}

/// Write the parts back to back into a chunked body, one chunk per part.
pub fn parts_to_body<S>(parts: S) -> Body
where
    S: Stream<Item = String> + Send + 'static,
{
    Body::from_stream(parts.map(Ok::<_, Infallible>))
}
