//! The transient payload handed to the display surface each cycle

use alloc::string::String;

use crate::time::{TimeText, Timestamp};

/// Time text shown while the clock has never been synchronized
pub const UNSYNCED_TIME_TEXT: &str = "--:--";

/// Label of the boot notice shown when no time could be obtained
pub const UNSYNCED_LABEL: &str = "WiFi Error";

/// Body of the boot notice
pub const UNSYNCED_BODY: &str = "Display will not update until time is synchronized.";

/// What one refresh shows: the time, an optional label, and the body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPayload {
    pub time_text: TimeText,
    pub label: Option<String>,
    pub body: String,
}

impl DisplayPayload {
    /// Payload carrying only the formatted time
    pub fn time_only(timestamp: &Timestamp) -> Self {
        Self {
            time_text: timestamp.time_text(),
            label: None,
            body: String::new(),
        }
    }

    /// Notice shown at boot when the time source has nothing to offer
    pub fn time_unavailable() -> Self {
        let mut time_text = TimeText::new();
        let _ = time_text.push_str(UNSYNCED_TIME_TEXT);
        Self {
            time_text,
            label: Some(String::from(UNSYNCED_LABEL)),
            body: String::from(UNSYNCED_BODY),
        }
    }

    /// True when there is neither a label nor body text to show
    pub fn is_blank(&self) -> bool {
        self.label.as_deref().map_or(true, str::is_empty) && self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_only_is_blank() {
        let ts = Timestamp::new(9, 3, 0, 0).unwrap();
        let payload = DisplayPayload::time_only(&ts);
        assert_eq!(payload.time_text.as_str(), "09:03");
        assert!(payload.is_blank());
    }

    #[test]
    fn test_label_or_body_makes_payload_visible() {
        let ts = Timestamp::new(9, 3, 0, 0).unwrap();
        let mut payload = DisplayPayload::time_only(&ts);
        payload.label = Some(String::new());
        assert!(payload.is_blank());
        payload.label = Some(String::from("[John]"));
        assert!(!payload.is_blank());

        let mut payload = DisplayPayload::time_only(&ts);
        payload.body = String::from("In the beginning");
        assert!(!payload.is_blank());
    }

    #[test]
    fn test_time_unavailable_notice() {
        let payload = DisplayPayload::time_unavailable();
        assert_eq!(payload.time_text.as_str(), "--:--");
        assert_eq!(payload.label.as_deref(), Some("WiFi Error"));
        assert!(!payload.is_blank());
    }
}
