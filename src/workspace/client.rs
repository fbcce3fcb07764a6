use super::messages::{
    block_json, rich_text, CreatedPage, EmailEquals, EmailFilter, QueryRequest, QueryResponse,
    MAX_BLOCKS_PER_REQUEST,
};
use super::{RecordUpdate, Workspace, WorkspaceRecord};
use crate::config::WorkspaceConfig;
use crate::error::RelayError;
use crate::richtext::{chunk, DocumentBlock};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Client for the Notion REST API
pub struct NotionClient {
    client: reqwest::Client,
    config: WorkspaceConfig,
}

impl NotionClient {
    pub fn new(config: WorkspaceConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build workspace HTTP client")?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.api_version)
    }

    /// Send a request and decode the JSON reply; errors are returned as text
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> std::result::Result<T, String> {
        let response = request
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error {}: {}", status, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| format!("invalid response: {}", e))
    }

    async fn append_children(&self, block_id: &str, children: &[Value]) -> Result<(), RelayError> {
        let request = self
            .request(Method::PATCH, &format!("blocks/{}/children", block_id))
            .json(&json!({ "children": children }));

        self.send::<Value>(request)
            .await
            .map_err(RelayError::UpstreamWrite)?;
        Ok(())
    }
}

#[async_trait]
impl Workspace for NotionClient {
    fn name(&self) -> &str {
        "notion"
    }

    async fn find_record(&self, email: &str) -> Result<Option<WorkspaceRecord>, RelayError> {
        debug!("Querying database {} for {}", self.config.database_id, email);

        let body = QueryRequest {
            filter: EmailFilter {
                property: &self.config.email_property,
                email: EmailEquals { equals: email },
            },
            page_size: 1,
        };
        let request = self
            .request(Method::POST, &format!("databases/{}/query", self.config.database_id))
            .json(&body);

        let response: QueryResponse = self
            .send(request)
            .await
            .map_err(RelayError::WorkspaceQuery)?;

        Ok(response.results.into_iter().next().map(|page| {
            let container_id = self
                .config
                .container_property
                .as_deref()
                .and_then(|name| page.property_text(name));

            WorkspaceRecord {
                id: page.id,
                container_id,
            }
        }))
    }

    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<(), RelayError> {
        let mut properties = Map::new();
        properties.insert(
            self.config.status_property.clone(),
            json!({ "status": { "name": update.status } }),
        );
        properties.insert(
            self.config.transcript_property.clone(),
            json!({ "rich_text": rich_text(&update.transcript) }),
        );
        properties.insert(
            self.config.summary_property.clone(),
            json!({ "rich_text": rich_text(&update.summary) }),
        );

        let request = self
            .request(Method::PATCH, &format!("pages/{}", record_id))
            .json(&json!({ "properties": properties }));

        self.send::<Value>(request)
            .await
            .map_err(RelayError::UpstreamWrite)?;

        info!("Updated record {}", record_id);
        Ok(())
    }

    async fn create_document(
        &self,
        parent_id: &str,
        title: &str,
        blocks: &[DocumentBlock],
    ) -> Result<String, RelayError> {
        let title_segments = chunk(title, self.config.chunk_size)?;
        let children: Vec<Value> = blocks.iter().map(block_json).collect();
        let mut batches = children.chunks(MAX_BLOCKS_PER_REQUEST);
        let first_batch = batches.next().unwrap_or(&[]);

        let request = self.request(Method::POST, "pages").json(&json!({
            "parent": { "page_id": parent_id },
            "properties": {
                "title": { "title": rich_text(&title_segments) }
            },
            "children": first_batch,
        }));

        let page: CreatedPage = self
            .send(request)
            .await
            .map_err(RelayError::UpstreamWrite)?;

        for batch in batches {
            self.append_children(&page.id, batch).await?;
        }

        info!(
            "Created document {} under {} ({} blocks)",
            page.id,
            parent_id,
            children.len()
        );
        Ok(page.id)
    }
}
