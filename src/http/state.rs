use crate::config::Config;
use crate::notify::{Notifier, ZapiClient};
use crate::workspace::{NotionClient, Workspace};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup
    pub config: Arc<Config>,

    /// Document workspace backend
    pub workspace: Arc<dyn Workspace>,

    /// Administrator notification backend
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(config: Config, workspace: Arc<dyn Workspace>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config: Arc::new(config),
            workspace,
            notifier,
        }
    }

    /// Build the HTTP-backed clients described by `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.service.http.request_timeout_secs);
        let workspace = NotionClient::new(config.workspace.clone(), timeout)?;
        let notifier = ZapiClient::new(config.notifier.clone(), timeout)?;

        Ok(Self::new(config, Arc::new(workspace), Arc::new(notifier)))
    }
}
