//! Push-event types for the Valet event broadcaster.
//!
//! `PushEvent` is the unified event produced by background jobs and fanned
//! out to connected clients. The serde representation is adjacently tagged
//! so the wire form is exactly `{"_t":"Summary","value":"..."}`.

use serde::{Deserialize, Serialize};

/// An asynchronous notification for connected clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_t", content = "value")]
pub enum PushEvent {
    /// A proactive assistant summary.
    Summary(String),
    /// A new WhatsApp message arrived.
    NewWhatsapp(String),
    /// A new mail arrived.
    NewGmail(String),
    /// An upcoming calendar event.
    CommingGEvent(String),
}

impl PushEvent {
    /// Whether this is a proactive summary.
    ///
    /// The hold buffer keeps at most one summary: only the most recent
    /// survives, always ordered last.
    pub fn is_summary(&self) -> bool {
        matches!(self, PushEvent::Summary(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let event = PushEvent::Summary("all quiet".to_string());
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"_t":"Summary","value":"all quiet"}"#);
    }

    #[test]
    fn test_wire_format_roundtrip() {
        for event in [
            PushEvent::Summary("s".to_string()),
            PushEvent::NewWhatsapp("w".to_string()),
            PushEvent::NewGmail("g".to_string()),
            PushEvent::CommingGEvent("e".to_string()),
        ] {
            let json = serde_json::to_string(&event).unwrap();
            let parsed: PushEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, event);
        }
    }

    #[test]
    fn test_is_summary() {
        assert!(PushEvent::Summary("s".to_string()).is_summary());
        assert!(!PushEvent::NewGmail("g".to_string()).is_summary());
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let result = serde_json::from_str::<PushEvent>(r#"{"_t":"Bogus","value":"x"}"#);
        assert!(result.is_err());
    }
}
