//! Background jobs: the periodic proactive summary push.
//!
//! On every cycle the assistant is asked to summarize "my stuff" with
//! its full tool set, and the result is published as a `Summary` push
//! event. The first cycle runs immediately on startup; a failing cycle
//! is logged and the next one runs on schedule.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use valet_core::agent::assistant::Ai;
use valet_core::event::EventBroadcaster;
use valet_types::event::PushEvent;
use valet_types::message::Message;

use crate::instruction::MY_SUMMARY_PROMPT;

/// Spawn the periodic summary job.
pub fn spawn_summary_job<A: Ai + 'static>(
    ai: Arc<A>,
    broadcaster: Arc<EventBroadcaster>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            // The first tick fires immediately, so a summary goes out on
            // startup.
            ticker.tick().await;
            run_summary_cycle(ai.as_ref(), &broadcaster).await;
        }
    })
}

async fn run_summary_cycle<A: Ai>(ai: &A, broadcaster: &EventBroadcaster) {
    let prompt = Message::user(MY_SUMMARY_PROMPT);
    match ai.run(std::slice::from_ref(&prompt)).await {
        Ok((reply, _)) => match reply.text() {
            Some(text) => {
                broadcaster.publish(&PushEvent::Summary(text));
                info!("background summary published");
            }
            None => warn!("background summary produced no text"),
        },
        Err(err) => warn!(error = %err, "background summary failed"),
    }
}
