//! SSE push-event stream handler.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use tracing::debug;

use valet_core::event::EventBroadcaster;

use crate::state::AppState;

/// Removes the subscriber from the registry when the SSE stream ends,
/// whether by client disconnect or server shutdown.
struct UnsubscribeGuard {
    broadcaster: Arc<EventBroadcaster>,
    id: u64,
}

impl Drop for UnsubscribeGuard {
    fn drop(&mut self) {
        debug!(subscriber = self.id, "event subscriber disconnected");
        self.broadcaster.unsubscribe(self.id);
    }
}

/// GET /events - persistent event stream.
///
/// On connect, any events held while no subscriber was live are
/// replayed first, then live events follow as they are published.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let broadcaster = state.broadcaster();
    let mut subscription = broadcaster.subscribe();
    broadcaster.flush(&subscription);

    let guard = UnsubscribeGuard {
        broadcaster,
        id: subscription.id,
    };

    let stream = async_stream::stream! {
        let _guard = guard;
        yield Ok(Event::default().comment("connected"));
        while let Some(payload) = subscription.receiver.recv().await {
            yield Ok(Event::default().data(payload));
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
