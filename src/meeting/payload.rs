use super::time::parse_timestamp;
use crate::error::RelayError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

const DEFAULT_TITLE: &str = "Meeting";

/// Treat an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

/// A `{ "text": ... }` entry (topics, action items, key questions)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<TextItem>,
}

/// A point in time as sent by the meeting service: ISO-8601 text, digits of epoch
/// milliseconds, or a bare JSON number of epoch milliseconds.
///
/// Any other JSON value is kept as `Other` so a strange timestamp never rejects the
/// whole payload; it just has no usable time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
    Other(serde_json::Value),
}

impl Timestamp {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            Timestamp::Text(raw) => parse_timestamp(raw),
            Timestamp::Other(value) => {
                // Whole-valued floats such as 1704099600000.0 are still epoch millis
                let ms = value.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0)?;
                if ms.abs() > i64::MAX as f64 {
                    return None;
                }
                Utc.timestamp_millis_opt(ms as i64).single()
            }
        }
    }

    /// The value exactly as received
    pub fn raw(&self) -> String {
        match self {
            Timestamp::Millis(ms) => ms.to_string(),
            Timestamp::Text(raw) => raw.clone(),
            Timestamp::Other(value) => value.to_string(),
        }
    }
}

/// Speakers arrive either as a bare name or as `{ "name": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Speaker {
    Name(String),
    Named {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
    },
}

impl Speaker {
    pub fn name(&self) -> &str {
        match self {
            Speaker::Name(name) | Speaker::Named { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerBlock {
    pub speaker: Speaker,
    #[serde(default, deserialize_with = "null_as_default")]
    pub words: String,
    #[serde(default)]
    pub start_time: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakerBlocks {
    #[serde(default, deserialize_with = "null_as_default")]
    pub speaker_blocks: Vec<SpeakerBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

/// The two transcript shapes the meeting service has sent over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Transcript {
    /// `{ "speaker_blocks": [...] }`, already in spoken order
    Blocks(SpeakerBlocks),
    /// `[{ "speaker", "text", "timestamp" }]`, order not guaranteed
    Entries(Vec<TranscriptEntry>),
}

/// End-of-meeting webhook body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingPayload {
    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub start_time: Option<Timestamp>,

    #[serde(default)]
    pub end_time: Option<Timestamp>,

    #[serde(default)]
    pub report_url: Option<String>,

    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: Person,

    #[serde(default, deserialize_with = "null_as_default")]
    pub participants: Vec<Person>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<TextItem>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub action_items: Vec<TextItem>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub key_questions: Vec<TextItem>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub chapter_summaries: Vec<ChapterSummary>,

    #[serde(default)]
    pub transcript: Option<Transcript>,
}

impl MeetingPayload {
    /// Decode and validate a webhook body
    pub fn from_json(body: &[u8]) -> Result<Self, RelayError> {
        let payload: MeetingPayload = serde_json::from_slice(body)
            .map_err(|e| RelayError::MalformedPayload(e.to_string()))?;

        payload.validate()?;
        Ok(payload)
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        if self.owner.email.trim().is_empty() {
            return Err(RelayError::MalformedPayload(
                "owner.email is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn owner_email(&self) -> &str {
        self.owner.email.trim()
    }

    pub fn title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
    }

    pub fn report_url(&self) -> Option<&str> {
        self.report_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_payload() {
        let payload = MeetingPayload::from_json(br#"{"owner": {"name": "Ana", "email": "ana@x.com"}}"#)
            .unwrap();

        assert_eq!(payload.owner_email(), "ana@x.com");
        assert_eq!(payload.title(), "Meeting");
        assert!(payload.participants.is_empty());
        assert!(payload.transcript.is_none());
    }

    #[test]
    fn test_missing_owner_email_is_malformed() {
        for body in [
            r#"{}"#,
            r#"{"owner": null}"#,
            r#"{"owner": {"name": "Ana"}}"#,
            r#"{"owner": {"name": "Ana", "email": "  "}}"#,
        ] {
            let result = MeetingPayload::from_json(body.as_bytes());
            assert!(
                matches!(result, Err(RelayError::MalformedPayload(_))),
                "body {} should be rejected",
                body
            );
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let result = MeetingPayload::from_json(b"not json");
        assert!(matches!(result, Err(RelayError::MalformedPayload(_))));
    }

    #[test]
    fn test_null_lists_default_to_empty() {
        let payload = MeetingPayload::from_json(
            br#"{"owner": {"email": "a@x.com"}, "topics": null, "participants": null}"#,
        )
        .unwrap();

        assert!(payload.topics.is_empty());
        assert!(payload.participants.is_empty());
    }

    #[test]
    fn test_speaker_block_transcript() {
        let payload = MeetingPayload::from_json(
            br#"{
                "owner": {"email": "a@x.com"},
                "transcript": {"speaker_blocks": [
                    {"speaker": {"name": "Ana"}, "words": "hello", "start_time": "1704103200000"},
                    {"speaker": {"name": "Bruno"}, "words": "hi"}
                ]}
            }"#,
        )
        .unwrap();

        match payload.transcript {
            Some(Transcript::Blocks(blocks)) => {
                assert_eq!(blocks.speaker_blocks.len(), 2);
                assert_eq!(blocks.speaker_blocks[0].speaker.name(), "Ana");
                assert!(blocks.speaker_blocks[1].start_time.is_none());
            }
            other => panic!("expected speaker blocks, got {:?}", other),
        }
    }

    #[test]
    fn test_flat_entry_transcript() {
        let payload = MeetingPayload::from_json(
            br#"{
                "owner": {"email": "a@x.com"},
                "transcript": [
                    {"speaker": "A", "text": "hi", "timestamp": "2024-01-01T10:00:00Z"},
                    {"speaker": {"name": "B"}, "text": "yo", "timestamp": 1704099600000}
                ]
            }"#,
        )
        .unwrap();

        match payload.transcript {
            Some(Transcript::Entries(entries)) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].speaker.name(), "A");
                assert_eq!(entries[1].speaker.name(), "B");
                assert_eq!(entries[1].timestamp, Some(Timestamp::Millis(1_704_099_600_000)));
            }
            other => panic!("expected flat entries, got {:?}", other),
        }
    }

    #[test]
    fn test_timestamp_conversion() {
        let iso = Timestamp::Text("2024-01-01T09:00:00Z".to_string());
        let millis = Timestamp::Millis(1_704_099_600_000);
        let digits = Timestamp::Text("1704099600000".to_string());

        assert_eq!(iso.to_utc(), millis.to_utc());
        assert_eq!(digits.to_utc(), millis.to_utc());
        assert!(Timestamp::Text("yesterday".to_string()).to_utc().is_none());
        assert_eq!(millis.raw(), "1704099600000");
    }

    #[test]
    fn test_unusual_timestamp_values_do_not_reject_payload() {
        let payload = MeetingPayload::from_json(
            br#"{
                "owner": {"email": "a@x.com"},
                "start_time": 1704099600000.0,
                "end_time": {"seconds": 12},
                "transcript": [{"speaker": "A", "text": "hi", "timestamp": 1.5}]
            }"#,
        )
        .unwrap();

        let start = payload.start_time.as_ref().unwrap();
        assert_eq!(start.to_utc(), Timestamp::Millis(1_704_099_600_000).to_utc());

        let end = payload.end_time.as_ref().unwrap();
        assert!(end.to_utc().is_none());
        assert_eq!(end.raw(), r#"{"seconds":12}"#);

        match payload.transcript {
            Some(Transcript::Entries(entries)) => {
                let ts = entries[0].timestamp.as_ref().unwrap();
                assert!(ts.to_utc().is_none());
                assert_eq!(ts.raw(), "1.5");
            }
            other => panic!("expected flat entries, got {:?}", other),
        }
    }
}
