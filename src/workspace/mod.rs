//! Document workspace access
//!
//! The pipeline only talks to the `Workspace` trait; `NotionClient` is the HTTP
//! implementation used by the service.

mod client;
pub mod messages;

pub use client::NotionClient;

use crate::error::RelayError;
use crate::richtext::{DocumentBlock, TextSegment};
use async_trait::async_trait;

/// A database row matched by email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRecord {
    pub id: String,
    /// Parent page computed server-side, when the database exposes one
    pub container_id: Option<String>,
}

/// Fields written back to a record once the meeting is processed
#[derive(Debug, Clone, PartialEq)]
pub struct RecordUpdate {
    pub status: String,
    pub transcript: Vec<TextSegment>,
    pub summary: Vec<TextSegment>,
}

#[async_trait]
pub trait Workspace: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &str;

    /// Zero or one record whose email property equals `email`
    async fn find_record(&self, email: &str) -> Result<Option<WorkspaceRecord>, RelayError>;

    /// Set status and rich-text fields of an existing record
    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<(), RelayError>;

    /// Create a child page and return its id
    async fn create_document(
        &self,
        parent_id: &str,
        title: &str,
        blocks: &[DocumentBlock],
    ) -> Result<String, RelayError>;
}
