use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

use crate::keys::{ButtonId, KeyId};

pub const FORMAT_VERSION: &str = "1.0";

/// One captured input occurrence. `timestamp` is seconds since the start of
/// the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    MouseMove {
        timestamp: f64,
        x: i32,
        y: i32,
    },
    /// `x`/`y` are absent when no pointer position was known yet.
    MouseClick {
        timestamp: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<i32>,
        button: ButtonId,
        pressed: bool,
    },
    MouseScroll {
        timestamp: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<i32>,
        dx: i64,
        dy: i64,
    },
    #[serde(rename = "keyboard_press")]
    KeyPress { timestamp: f64, key: KeyId },
    #[serde(rename = "keyboard_release")]
    KeyRelease { timestamp: f64, key: KeyId },
}

impl Event {
    pub fn timestamp(&self) -> f64 {
        match self {
            Event::MouseMove { timestamp, .. }
            | Event::MouseClick { timestamp, .. }
            | Event::MouseScroll { timestamp, .. }
            | Event::KeyPress { timestamp, .. }
            | Event::KeyRelease { timestamp, .. } => *timestamp,
        }
    }

    /// Pointer position the event happened at, if one is known.
    pub fn position(&self) -> Option<(i32, i32)> {
        match self {
            Event::MouseMove { x, y, .. } => Some((*x, *y)),
            Event::MouseClick { x, y, .. } | Event::MouseScroll { x, y, .. } => x.zip(*y),
            Event::KeyPress { .. } | Event::KeyRelease { .. } => None,
        }
    }

    /// The `type` tag used in recording files.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::MouseMove { .. } => "mouse_move",
            Event::MouseClick { .. } => "mouse_click",
            Event::MouseScroll { .. } => "mouse_scroll",
            Event::KeyPress { .. } => "keyboard_press",
            Event::KeyRelease { .. } => "keyboard_release",
        }
    }
}

/// A versioned, ordered collection of events plus creation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub version: String,
    #[serde(
        rename = "timestamp",
        default,
        skip_serializing_if = "Option::is_none",
        with = "iso_timestamp"
    )]
    pub created_at: Option<DateTime<FixedOffset>>,
    pub events: Vec<Event>,
}

impl Recording {
    pub fn new(events: Vec<Event>) -> Self {
        Recording {
            version: FORMAT_VERSION.to_string(),
            created_at: Some(Local::now().fixed_offset()),
            events,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Timestamp of the last event, in seconds.
    pub fn duration(&self) -> f64 {
        self.events.last().map(Event::timestamp).unwrap_or(0.0)
    }

    /// True when timestamps start at or after zero and never decrease.
    pub fn is_time_ordered(&self) -> bool {
        let starts_ok = self.events.first().map_or(true, |e| e.timestamp() >= 0.0);
        starts_ok
            && self
                .events
                .windows(2)
                .all(|pair| pair[0].timestamp() <= pair[1].timestamp())
    }
}

// Creation time is written as RFC 3339. Older files carry a naive ISO-8601
// local time without an offset, which is read as local time.
mod iso_timestamp {
    use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw).map_err(D::Error::custom))
            .transpose()
    }

    pub fn parse(raw: &str) -> Result<DateTime<FixedOffset>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt);
        }
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| format!("invalid timestamp {:?}: {}", raw, e))?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| format!("timestamp {:?} does not exist in local time", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::NamedKey;
    use serde_json::json;

    #[test]
    fn test_event_json_shape() {
        let event = Event::MouseClick {
            timestamp: 1.25,
            x: Some(10),
            y: Some(20),
            button: ButtonId::Left,
            pressed: true,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "mouse_click",
                "timestamp": 1.25,
                "x": 10,
                "y": 20,
                "button": "Button.left",
                "pressed": true
            })
        );
    }

    #[test]
    fn test_click_without_known_position() {
        let event = Event::MouseClick {
            timestamp: 0.1,
            x: None,
            y: None,
            button: ButtonId::Right,
            pressed: false,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "mouse_click",
                "timestamp": 0.1,
                "button": "Button.right",
                "pressed": false
            })
        );
        let parsed: Event = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(parsed.position(), None);
        assert_eq!(parsed.kind(), "mouse_click");
    }

    #[test]
    fn test_keyboard_events_use_file_tags() {
        let press = Event::KeyPress {
            timestamp: 0.5,
            key: KeyId::Named(NamedKey::Enter),
        };
        let value = serde_json::to_value(&press).unwrap();
        assert_eq!(value["type"], "keyboard_press");
        assert_eq!(value["key"], "Key.enter");
        assert_eq!(press.kind(), "keyboard_press");

        let parsed: Event = serde_json::from_value(json!({
            "type": "keyboard_release",
            "timestamp": 0.75,
            "key": "'q'"
        }))
        .unwrap();
        assert_eq!(
            parsed,
            Event::KeyRelease {
                timestamp: 0.75,
                key: KeyId::Char('q')
            }
        );
    }

    #[test]
    fn test_naive_creation_time_is_accepted() {
        let recording: Recording = serde_json::from_value(json!({
            "version": "1.0",
            "timestamp": "2024-03-01T09:30:15.123456",
            "events": []
        }))
        .unwrap();
        assert!(recording.created_at.is_some());
    }

    #[test]
    fn test_missing_creation_time_is_none() {
        let recording: Recording =
            serde_json::from_value(json!({"version": "1.0", "events": []})).unwrap();
        assert_eq!(recording.created_at, None);
    }

    #[test]
    fn test_time_ordering() {
        let move_at = |timestamp| Event::MouseMove { timestamp, x: 0, y: 0 };
        assert!(Recording::new(vec![move_at(0.0), move_at(0.5), move_at(0.5)]).is_time_ordered());
        assert!(!Recording::new(vec![move_at(0.5), move_at(0.1)]).is_time_ordered());
        assert!(!Recording::new(vec![move_at(-0.1)]).is_time_ordered());
        assert_eq!(Recording::new(vec![move_at(0.2), move_at(1.5)]).duration(), 1.5);
    }
}
