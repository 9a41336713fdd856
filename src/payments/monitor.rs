//! Server-sent event streams over the payment probes.
//!
//! Each stream emits its first event immediately, then one per poll
//! interval until the client disconnects or `stop` resolves. Dropping the
//! stream stops polling.

use axum::response::sse::Event;
use futures_util::stream::{self, Stream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::time::{self, Interval, MissedTickBehavior};

use super::feeds::PaymentFeeds;
use super::types::HealthReport;

fn ticker(feeds: &PaymentFeeds) -> Interval {
    let mut ticker = time::interval(feeds.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// `{status}` events for `/api/payment/monitor`.
pub fn health_events(
    feeds: Arc<PaymentFeeds>,
    stop: impl Future<Output = ()> + Send + 'static,
) -> impl Stream<Item = Result<Event, axum::Error>> + Send + 'static {
    let ticker = ticker(&feeds);
    stream::unfold((feeds, ticker), |(feeds, mut ticker)| async move {
        ticker.tick().await;
        let report = HealthReport {
            status: feeds.health().await,
        };
        let event = Event::default().json_data(report);
        Some((event, (feeds, ticker)))
    })
    .take_until(stop)
}

/// `{data}` or `{error: "down"}` events for `/api/payment/callbacks/monitor`.
pub fn callback_events(
    feeds: Arc<PaymentFeeds>,
    stop: impl Future<Output = ()> + Send + 'static,
) -> impl Stream<Item = Result<Event, axum::Error>> + Send + 'static {
    let ticker = ticker(&feeds);
    stream::unfold((feeds, ticker), |(feeds, mut ticker)| async move {
        ticker.tick().await;
        let event = Event::default().json_data(feeds.callbacks_snapshot().await);
        Some((event, (feeds, ticker)))
    })
    .take_until(stop)
}
