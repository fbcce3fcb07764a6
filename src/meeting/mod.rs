//! Meeting webhook payload and the text rendered from it

mod format;
mod message;
mod payload;
mod time;

pub use format::{format_document, format_transcript, FormattedDocument};
pub use message::{compose_notification, lead_name, DEFAULT_REASON, DEFAULT_TEMPLATE};
pub use payload::{
    ChapterSummary, MeetingPayload, Person, Speaker, SpeakerBlock, SpeakerBlocks, TextItem,
    Timestamp, Transcript, TranscriptEntry,
};
pub use time::parse_timestamp;
