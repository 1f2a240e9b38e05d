//! HTTP client for the search service's REST API.
//!
//! Speaks the cursor-based browse, batched write, and task polling endpoints
//! used by the remote source and destination implementations. Credentials
//! travel as headers on every request; reads and writes are routed to the
//! service's per-application hosts unless an endpoint override is
//! configured.

use std::time::Duration;

use indexsync_config::shared::SearchConnectionConfig;
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ErrorKind, SyncResult};
use crate::source::BrowsePage;
use crate::sync_error;
use crate::types::Record;

/// Header carrying the application identifier.
const APPLICATION_ID_HEADER: &str = "X-Algolia-Application-Id";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-Algolia-API-Key";

/// Batch action that inserts or fully replaces a record by object id.
const UPSERT_ACTION: &str = "updateObject";

/// Task status reported once a write is durable.
const TASK_STATUS_PUBLISHED: &str = "published";

/// Interval between task status polls while waiting for a write to become
/// durable.
const TASK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Client for the search service hosting the source and destination indices.
///
/// Cheap to clone; all clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    read_base: String,
    write_base: String,
    app_id: String,
    api_key: SecretString,
}

impl SearchClient {
    /// Builds a client from connection settings.
    ///
    /// The per-request timeout applies to every browse, write, and task poll
    /// individually; an exceeded timeout surfaces as a fatal
    /// [`ErrorKind::RequestTimeout`] error.
    pub fn new(config: &SearchConnectionConfig) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(
                |err| sync_error!(ErrorKind::ConfigError, "Failed to build HTTP client", source: err),
            )?;

        let (read_base, write_base) = match &config.endpoint {
            Some(endpoint) => {
                let base = endpoint.trim_end_matches('/').to_string();
                (base.clone(), base)
            }
            None => (
                format!("https://{}-dsn.algolia.net", config.app_id),
                format!("https://{}.algolia.net", config.app_id),
            ),
        };

        Ok(Self {
            client,
            read_base,
            write_base,
            app_id: config.app_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetches one page of records from an index.
    ///
    /// Pass [`None`] to start from the beginning, and the cursor of the
    /// previous page to continue. The returned page carries no cursor once
    /// the index is exhausted.
    pub async fn browse(&self, index: &str, cursor: Option<String>) -> SyncResult<BrowsePage> {
        let url = index_url(&self.read_base, index, "/browse");
        let request = BrowseRequest {
            query: "",
            cursor: cursor.as_deref(),
        };

        let response = self
            .authenticated(self.client.post(&url))
            .json(&request)
            .send()
            .await?;
        let response = check_status(response).await?;

        let browse: BrowseResponse = response.json().await?;
        debug!(index, hits = browse.hits.len(), "browsed one page");

        Ok(BrowsePage {
            records: browse.hits,
            cursor: browse.cursor,
        })
    }

    /// Submits one batch of record upserts to an index.
    ///
    /// Returns the identifier of the indexing task the service queued for
    /// the batch. The write is not durable until [`SearchClient::wait_task`]
    /// confirms the task as published.
    pub async fn save_objects(&self, index: &str, records: &[Record]) -> SyncResult<u64> {
        let url = index_url(&self.write_base, index, "/batch");
        let request = BatchWriteRequest {
            requests: records
                .iter()
                .map(|record| BatchOperation {
                    action: UPSERT_ACTION,
                    body: record,
                })
                .collect(),
        };

        let response = self
            .authenticated(self.client.post(&url))
            .json(&request)
            .send()
            .await?;
        let response = check_status(response).await?;

        let accepted: BatchWriteResponse = response.json().await?;
        debug!(
            index,
            records = records.len(),
            task_id = accepted.task_id,
            "batch accepted"
        );

        Ok(accepted.task_id)
    }

    /// Polls an indexing task until the service reports it as published.
    pub async fn wait_task(&self, index: &str, task_id: u64) -> SyncResult<()> {
        let url = index_url(&self.read_base, index, &format!("/task/{task_id}"));

        loop {
            let response = self.authenticated(self.client.get(&url)).send().await?;
            let response = check_status(response).await?;

            let task: TaskStatusResponse = response.json().await?;
            if task.status == TASK_STATUS_PUBLISHED {
                return Ok(());
            }

            tokio::time::sleep(TASK_POLL_INTERVAL).await;
        }
    }

    /// Attaches the credential headers to a request.
    fn authenticated(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(APPLICATION_ID_HEADER, &self.app_id)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
    }
}

/// Builds the URL for an index-scoped endpoint.
fn index_url(base: &str, index: &str, suffix: &str) -> String {
    format!("{base}/1/indexes/{index}{suffix}")
}

/// Maps a non-success response to an error carrying status and body detail.
async fn check_status(response: Response) -> SyncResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::AuthenticationError,
        _ => ErrorKind::RequestFailed,
    };
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unable to read body>".to_string());

    Err(sync_error!(
        kind,
        "Search service returned an error status",
        format!("status {status}: {body}")
    ))
}

#[derive(Debug, Serialize)]
struct BrowseRequest<'a> {
    /// Match-all query; the synchronizer always browses the full index.
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct BrowseResponse {
    hits: Vec<Record>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchWriteRequest<'a> {
    requests: Vec<BatchOperation<'a>>,
}

#[derive(Debug, Serialize)]
struct BatchOperation<'a> {
    action: &'static str,
    body: &'a Record,
}

#[derive(Debug, Deserialize)]
struct BatchWriteResponse {
    #[serde(rename = "taskID")]
    task_id: u64,
}

#[derive(Debug, Deserialize)]
struct TaskStatusResponse {
    status: String,
}
