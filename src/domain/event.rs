//! Classified news events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Policy,
    Earnings,
    Geopolitical,
    Macro,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            EventType::Policy => "POLICY",
            EventType::Earnings => "EARNINGS",
            EventType::Geopolitical => "GEOPOLITICAL",
            EventType::Macro => "MACRO",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub raw_text: String,
}

impl Event {
    pub fn new(event_type: EventType, raw_text: &str) -> Self {
        Event {
            id: Uuid::new_v4(),
            event_type,
            timestamp: Utc::now(),
            raw_text: raw_text.to_string(),
        }
    }
}
