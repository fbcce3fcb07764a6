// Shared fakes for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use meeting_relay::richtext::DocumentBlock;
use meeting_relay::{Config, Notifier, RecordUpdate, RelayError, Workspace, WorkspaceRecord};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const OWNER_EMAIL: &str = "ana@corp.com";

/// Config with credentials filled in and three administrators
pub fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.workspace.token = "secret".to_string();
    cfg.workspace.database_id = "db-1".to_string();
    cfg.notifier.instance = "inst".to_string();
    cfg.notifier.token = "tok".to_string();
    cfg.notifier.admin_phones = "5511000000001,5511000000002,5511000000003".to_string();
    cfg.formatting.timezone = chrono_tz::UTC;
    cfg
}

pub fn meeting_json() -> Value {
    json!({
        "session_id": "sess-42",
        "title": "Discovery call",
        "start_time": "2024-03-05T13:00:00Z",
        "end_time": "2024-03-05T13:45:00Z",
        "report_url": "https://app.read.ai/reports/abc",
        "owner": {"name": "Ana", "email": OWNER_EMAIL},
        "participants": [
            {"name": "Ana", "email": OWNER_EMAIL},
            {"name": "Bruno", "email": "bruno@lead.com"}
        ],
        "topics": [{"text": "Pricing"}],
        "action_items": [{"text": "Send proposal"}],
        "transcript": {"speaker_blocks": [
            {"speaker": {"name": "Ana"}, "words": "Welcome", "start_time": "2024-03-05T13:00:05Z"},
            {"speaker": {"name": "Bruno"}, "words": "Thanks"}
        ]}
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceCall {
    Find(String),
    Update { record_id: String, update: RecordUpdate },
    Create { parent_id: String, title: String, blocks: Vec<DocumentBlock> },
}

#[derive(Default)]
pub struct FakeWorkspace {
    pub records: HashMap<String, WorkspaceRecord>,
    pub fail_update: bool,
    pub calls: Mutex<Vec<WorkspaceCall>>,
}

impl FakeWorkspace {
    pub fn with_record(email: &str, id: &str, container_id: Option<&str>) -> Self {
        let mut records = HashMap::new();
        records.insert(
            email.to_string(),
            WorkspaceRecord {
                id: id.to_string(),
                container_id: container_id.map(str::to_string),
            },
        );
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<WorkspaceCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Workspace for FakeWorkspace {
    fn name(&self) -> &str {
        "fake"
    }

    async fn find_record(&self, email: &str) -> Result<Option<WorkspaceRecord>, RelayError> {
        self.calls.lock().unwrap().push(WorkspaceCall::Find(email.to_string()));
        Ok(self.records.get(email).cloned())
    }

    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<(), RelayError> {
        self.calls.lock().unwrap().push(WorkspaceCall::Update {
            record_id: record_id.to_string(),
            update: update.clone(),
        });
        if self.fail_update {
            return Err(RelayError::UpstreamWrite("API error 500".to_string()));
        }
        Ok(())
    }

    async fn create_document(
        &self,
        parent_id: &str,
        title: &str,
        blocks: &[DocumentBlock],
    ) -> Result<String, RelayError> {
        self.calls.lock().unwrap().push(WorkspaceCall::Create {
            parent_id: parent_id.to_string(),
            title: title.to_string(),
            blocks: blocks.to_vec(),
        });
        Ok("doc-1".to_string())
    }
}

/// Records every attempted send; destinations in `failing` return an error
#[derive(Default)]
pub struct FakeNotifier {
    pub failing: HashSet<String>,
    pub attempts: Mutex<Vec<(String, String)>>,
}

impl FakeNotifier {
    pub fn failing_on(destination: &str) -> Self {
        Self {
            failing: [destination.to_string()].into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn attempted(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|(dest, _)| dest.clone())
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, msg)| msg.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    fn name(&self) -> &str {
        "fake"
    }

    async fn send_text(&self, destination: &str, message: &str) -> Result<(), RelayError> {
        self.attempts
            .lock()
            .unwrap()
            .push((destination.to_string(), message.to_string()));

        if self.failing.contains(destination) {
            return Err(RelayError::Notification {
                recipient: destination.to_string(),
                reason: "network error".to_string(),
            });
        }
        Ok(())
    }
}
