pub mod config;
pub mod error;
pub mod http;
pub mod meeting;
pub mod notify;
pub mod pipeline;
pub mod richtext;
pub mod workspace;

pub use crate::config::Config;
pub use error::{ChunkError, RelayError};
pub use http::{create_router, AppState};
pub use meeting::{format_document, format_transcript, FormattedDocument, MeetingPayload};
pub use notify::{notify_all, Notifier, ZapiClient};
pub use pipeline::{MeetingPipeline, PipelineReport, Stage};
pub use richtext::{chunk, markdown_to_blocks, DocumentBlock, TextSegment};
pub use workspace::{NotionClient, RecordUpdate, Workspace, WorkspaceRecord};
