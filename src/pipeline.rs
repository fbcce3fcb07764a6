use crate::config::Config;
use crate::error::RelayError;
use crate::meeting::{compose_notification, format_document, MeetingPayload};
use crate::notify::{notify_all, Notifier};
use crate::richtext::{chunk, markdown_to_blocks};
use crate::workspace::{RecordUpdate, Workspace};
use serde::Serialize;
use std::fmt;
use tracing::{error, info, warn};

/// Last state a webhook invocation reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Received,
    Lookup,
    Found,
    Formatted,
    DocumentWritten,
    NotificationsSent,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Lookup => "lookup",
            Stage::Found => "found",
            Stage::Formatted => "formatted",
            Stage::DocumentWritten => "document_written",
            Stage::NotificationsSent => "notifications_sent",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub record_id: String,
    pub document_id: Option<String>,
    pub notified: usize,
}

/// Runs one meeting through lookup, formatting, workspace writes and notifications.
///
/// Steps run strictly in sequence. The first failure ends the run; writes that already
/// succeeded are kept.
pub struct MeetingPipeline<'a> {
    config: &'a Config,
    workspace: &'a dyn Workspace,
    notifier: &'a dyn Notifier,
}

impl<'a> MeetingPipeline<'a> {
    pub fn new(config: &'a Config, workspace: &'a dyn Workspace, notifier: &'a dyn Notifier) -> Self {
        Self {
            config,
            workspace,
            notifier,
        }
    }

    pub async fn run(&self, payload: &MeetingPayload) -> Result<PipelineReport, RelayError> {
        let mut stage = Stage::Received;
        let result = self.execute(payload, &mut stage).await;

        if let Err(e) = &result {
            error!(stage = %stage, "Meeting pipeline failed: {}", e);
        }
        result
    }

    fn advance(stage: &mut Stage, next: Stage) {
        info!("Pipeline {} -> {}", stage, next);
        *stage = next;
    }

    async fn execute(
        &self,
        payload: &MeetingPayload,
        stage: &mut Stage,
    ) -> Result<PipelineReport, RelayError> {
        payload.validate()?;
        let email = payload.owner_email();
        Self::advance(stage, Stage::Lookup);

        let record = self
            .workspace
            .find_record(email)
            .await?
            .ok_or_else(|| RelayError::LookupNotFound {
                email: email.to_string(),
            })?;
        info!("Found record {} for {} in {}", record.id, email, self.workspace.name());
        Self::advance(stage, Stage::Found);

        let ws = &self.config.workspace;
        let document = format_document(payload, self.config.formatting.timezone);
        let update = RecordUpdate {
            status: ws.status_name.clone(),
            transcript: chunk(&document.transcript, ws.chunk_size)?,
            summary: chunk(&document.markdown, ws.chunk_size)?,
        };
        let blocks = if ws.create_document {
            markdown_to_blocks(&document.markdown, ws.chunk_size)?
        } else {
            Vec::new()
        };
        Self::advance(stage, Stage::Formatted);

        self.workspace.update_record(&record.id, &update).await?;

        let document_id = if ws.create_document {
            let parent_id = record.container_id.as_deref().unwrap_or(&record.id);
            let id = self
                .workspace
                .create_document(parent_id, &document.title, &blocks)
                .await?;
            Some(id)
        } else {
            None
        };
        Self::advance(stage, Stage::DocumentWritten);

        let admins = self.config.notifier.admins();
        if admins.is_empty() {
            warn!("No administrators configured, skipping notifications");
        }
        let message = compose_notification(
            payload,
            &self.config.notifier.template,
            &self.config.notifier.reason,
        );
        let notified = notify_all(self.notifier, &admins, &message).await?;
        Self::advance(stage, Stage::NotificationsSent);

        Self::advance(stage, Stage::Done);
        Ok(PipelineReport {
            record_id: record.id,
            document_id,
            notified,
        })
    }
}
