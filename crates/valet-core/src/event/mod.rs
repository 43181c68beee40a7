//! Push-event fan-out with an at-least-once hold buffer.

pub mod broadcaster;

pub use broadcaster::{EventBroadcaster, Subscription};
