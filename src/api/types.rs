//! Simplenote API request and response types.
//!
//! Notes are schema-loose on the wire. [`Note`] types the fields the client
//! relies on and keeps everything else in [`Note::extra`] so that a fetched
//! note can be sent back without losing unknown fields.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single note.
///
/// Returned by `GET /api2/data/{key}` and, without `content`, as part of the
/// index listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Server-assigned identifier. Absent for notes that were never created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// The note body. Absent in index listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// User tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Server-managed tags such as `pinned` or `markdown`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub systemtags: Vec<String>,
    /// Last modification time, seconds since the epoch.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "timestamp::deserialize"
    )]
    pub modifydate: Option<f64>,
    /// Creation time, seconds since the epoch.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "timestamp::deserialize"
    )]
    pub createdate: Option<f64>,
    /// Trash flag. Sent as `0`/`1`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "flag::serialize",
        deserialize_with = "flag::deserialize"
    )]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syncnum: Option<u64>,
    /// Fields the client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Note {
    /// Create an unsaved note with the given body.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Whether this note has not been created on the server yet.
    pub fn is_new(&self) -> bool {
        self.key.is_none()
    }

    /// Whether the note sits in the trash.
    pub fn is_deleted(&self) -> bool {
        self.deleted.unwrap_or(false)
    }

    /// Whether any of the note's tags is in `wanted`.
    pub fn has_any_tag(&self, wanted: &HashSet<&str>) -> bool {
        self.tags.iter().any(|t| wanted.contains(t.as_str()))
    }

    /// Last modification time as a UTC datetime.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modifydate.and_then(to_datetime)
    }

    /// Creation time as a UTC datetime.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.createdate.and_then(to_datetime)
    }

    /// Title line of the note, if it has content.
    pub fn title(&self) -> Option<&str> {
        self.content
            .as_deref()
            .and_then(|c| c.lines().find(|l| !l.trim().is_empty()))
            .map(str::trim)
    }
}

fn to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9) as u32;
    Utc.timestamp_opt(whole, nanos).single()
}

/// What `add_note` accepts: either a bare body or a full note.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteInput {
    Content(String),
    Note(Note),
}

impl From<&str> for NoteInput {
    fn from(content: &str) -> Self {
        NoteInput::Content(content.to_string())
    }
}

impl From<String> for NoteInput {
    fn from(content: String) -> Self {
        NoteInput::Content(content)
    }
}

impl From<Note> for NoteInput {
    fn from(note: Note) -> Self {
        NoteInput::Note(note)
    }
}

/// One page of the note index.
///
/// Returned by `GET /api2/index`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexPage {
    /// Note summaries on this page.
    #[serde(default)]
    pub data: Vec<Note>,
    /// Continuation mark. Absent or empty on the last page.
    #[serde(default)]
    pub mark: Option<String>,
    /// Number of notes on this page.
    #[serde(default)]
    pub count: Option<u64>,
}

mod timestamp {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    /// Accept `1300000000.5` as well as `"1300000000.5"`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(n)) => Ok(Some(n)),
            Some(Raw::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid timestamp '{}': {}", s, e))),
        }
    }
}

mod flag {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    pub fn serialize<S>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(flag) => serializer.serialize_u8(u8::from(*flag)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Bool(b)) => Ok(Some(b)),
            Some(Raw::Int(i)) => Ok(Some(i != 0)),
            Some(Raw::Text(s)) => match s.trim() {
                "0" | "false" | "" => Ok(Some(false)),
                "1" | "true" => Ok(Some(true)),
                other => Err(D::Error::custom(format!("invalid deleted flag '{}'", other))),
            },
        }
    }
}
