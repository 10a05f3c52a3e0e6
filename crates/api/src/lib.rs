//! REST client for n8n-compatible workflow-automation instances.
//!
//! This module provides a lightweight client focused on the three calls the
//! prompt cascade needs:
//!
//! - Listing workflows (following `nextCursor` pagination)
//! - Fetching a single workflow with its nodes
//! - Replacing a workflow after one node's parameters were edited
//!
//! The primary entry point is [`InstanceClient`]. Create an instance via
//! [`InstanceClient::new`] with the session credentials, then call the typed
//! helpers or build raw requests with [`InstanceClient::request`].
//!
//! # Example
//!
//! ```ignore
//! use promptline_api::InstanceClient;
//! use promptline_types::Credentials;
//!
//! async fn run() -> anyhow::Result<()> {
//!     let client = InstanceClient::new(&Credentials::new("http://localhost:5678", "key"))?;
//!     for workflow in client.list_workflows().await? {
//!         println!("{} {}", workflow.id, workflow.name);
//!     }
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use promptline_types::{Credentials, Workflow, WorkflowDetail, WorkflowPage};
use promptline_util::{normalize_base_url, redact_sensitive, truncate_for_summary};
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde_json::{Map as JsonMap, Value};
use tracing::{debug, warn};

/// Header carrying the instance API key.
pub const API_KEY_HEADER: &str = "x-n8n-api-key";

/// Versioned prefix of the public REST API.
const API_PREFIX: &str = "/api/v1";

/// Upper bound on followed listing pages so a misbehaving cursor cannot loop forever.
const MAX_LIST_PAGES: usize = 50;

/// Page size requested from the listing endpoint.
const LIST_PAGE_LIMIT: &str = "100";

/// Top-level workflow fields accepted by the update endpoint. Anything else
/// (ids, timestamps, tags, `active`) is rejected by the server.
const UPDATABLE_WORKFLOW_FIELDS: &[&str] = &["name", "nodes", "connections", "settings"];

/// Longest server error body echoed back into a user-facing message.
const MAX_ERROR_BODY_LEN: usize = 200;

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` bound to one instance.
///
/// The client pre-configures the API key and JSON headers and resolves
/// API-relative paths against a validated base URL.
pub struct InstanceClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl InstanceClient {
    /// Construct a client for the instance described by `credentials`.
    ///
    /// The base URL must be an absolute http(s) URL; trailing slashes are
    /// dropped so API paths can be appended directly.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let base_url = normalize_base_url(&credentials.url)?;

        let mut default_headers = header::HeaderMap::new();
        let api_key =
            header::HeaderValue::from_str(credentials.api_key.trim()).context("API key contains characters not allowed in a header")?;
        default_headers.insert(API_KEY_HEADER, api_key);
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("promptline/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        debug!(url = %redact_sensitive(&url), %method, "building request");

        self.http.request(method, url).header(header::USER_AGENT, &self.user_agent)
    }

    /// Fetch one page of the workflow listing.
    pub async fn list_workflows_page(&self, cursor: Option<&str>) -> Result<WorkflowPage> {
        let mut query = vec![("limit", LIST_PAGE_LIMIT)];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }
        let payload = send_json(self.request(Method::GET, "/workflows").query(&query)).await?;
        parse_workflow_page(payload)
    }

    /// Fetch every workflow, following pagination cursors.
    pub async fn list_workflows(&self) -> Result<Vec<Workflow>> {
        let mut workflows = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let page = self.list_workflows_page(cursor.as_deref()).await?;
            workflows.extend(page.data);
            match page.next_cursor.filter(|next| !next.is_empty()) {
                Some(next) => cursor = Some(next),
                None => return Ok(workflows),
            }
        }

        warn!(pages = MAX_LIST_PAGES, "workflow listing truncated; cursor never exhausted");
        Ok(workflows)
    }

    /// Fetch the raw workflow document, preserving every field the server sent.
    pub async fn get_workflow_raw(&self, workflow_id: &str) -> Result<Value> {
        send_json(self.request(Method::GET, &workflow_path(workflow_id))).await
    }

    /// Fetch a workflow with its typed node list.
    pub async fn get_workflow(&self, workflow_id: &str) -> Result<WorkflowDetail> {
        let payload = self.get_workflow_raw(workflow_id).await?;
        serde_json::from_value(payload).with_context(|| format!("unexpected workflow payload for '{workflow_id}'"))
    }

    /// Replace a workflow with the updatable subset of `workflow`.
    pub async fn update_workflow(&self, workflow_id: &str, workflow: &Value) -> Result<Value> {
        let body = update_payload(workflow)?;
        send_json(self.request(Method::PUT, &workflow_path(workflow_id)).json(&body)).await
    }
}

fn workflow_path(workflow_id: &str) -> String {
    format!("/workflows/{}", utf8_percent_encode(workflow_id, NON_ALPHANUMERIC))
}

/// Send a request and decode a JSON body, turning non-2xx responses into
/// readable errors.
async fn send_json(builder: RequestBuilder) -> Result<Value> {
    let response = builder
        .send()
        .await
        .map_err(|e| anyhow!("Network error: {}. Hint: check the instance URL and that it is reachable", e))?;

    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if !status.is_success() {
        bail!(describe_http_error(status, &text));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).context("response body is not valid JSON")
}

/// Build a user-facing message for a failed response.
///
/// Prefers the server's `message` field when the body is JSON, and adds a
/// hint for authentication failures.
fn describe_http_error(status: StatusCode, body: &str) -> String {
    let server_message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    let detail = truncate_for_summary(&redact_sensitive(&server_message), MAX_ERROR_BODY_LEN);

    let mut message = format!("HTTP {}", status.as_u16());
    if !detail.is_empty() {
        message.push_str(": ");
        message.push_str(&detail);
    }
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        message.push_str(". Hint: check the API key");
    }
    message
}

/// Accept either the paginated `{ data, nextCursor }` envelope or a bare array.
fn parse_workflow_page(payload: Value) -> Result<WorkflowPage> {
    match payload {
        Value::Array(_) => Ok(WorkflowPage {
            data: serde_json::from_value(payload).context("unexpected workflow list payload")?,
            next_cursor: None,
        }),
        Value::Null => Ok(WorkflowPage::default()),
        other => serde_json::from_value(other).context("unexpected workflow list payload"),
    }
}

/// Copy only the fields the update endpoint accepts out of a fetched workflow.
fn update_payload(workflow: &Value) -> Result<Value> {
    let source = workflow.as_object().context("workflow payload is not a JSON object")?;
    let body: JsonMap<String, Value> = UPDATABLE_WORKFLOW_FIELDS
        .iter()
        .filter_map(|field| source.get(*field).map(|value| (field.to_string(), value.clone())))
        .collect();
    Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_rejects_invalid_base_url() {
        let error = InstanceClient::new(&Credentials::new("ftp://n8n.example.com", "key")).unwrap_err();
        assert!(error.to_string().contains("scheme must be http or https"));
    }

    #[test]
    fn request_urls_include_api_prefix() {
        let client = InstanceClient::new(&Credentials::new("https://n8n.example.com/", "key")).expect("client");
        let request = client.request(Method::GET, "/workflows").build().expect("request");
        assert_eq!(request.url().as_str(), "https://n8n.example.com/api/v1/workflows");
        let user_agent = request.headers().get(header::USER_AGENT).and_then(|v| v.to_str().ok());
        assert!(user_agent.is_some_and(|ua| ua.starts_with("promptline/")));
    }

    #[test]
    fn workflow_ids_are_percent_encoded() {
        assert_eq!(workflow_path("abc123"), "/workflows/abc123");
        assert_eq!(workflow_path("a/b"), "/workflows/a%2Fb");
    }

    #[test]
    fn parses_paginated_and_bare_listings() {
        let page = parse_workflow_page(json!({
            "data": [{ "id": "1", "name": "Wf1" }],
            "nextCursor": "abc"
        }))
        .expect("page");
        assert_eq!(page.data, vec![Workflow::new("1", "Wf1")]);
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));

        let bare = parse_workflow_page(json!([{ "id": "2", "name": "Wf2" }])).expect("bare");
        assert_eq!(bare.data, vec![Workflow::new("2", "Wf2")]);
        assert!(bare.next_cursor.is_none());
    }

    #[test]
    fn update_payload_keeps_only_accepted_fields() {
        let workflow = json!({
            "id": "1",
            "name": "Wf1",
            "active": true,
            "nodes": [],
            "connections": {},
            "settings": { "executionOrder": "v1" },
            "updatedAt": "2024-01-01T00:00:00.000Z"
        });
        let body = update_payload(&workflow).expect("payload");
        assert_eq!(
            body,
            json!({
                "name": "Wf1",
                "nodes": [],
                "connections": {},
                "settings": { "executionOrder": "v1" }
            })
        );
    }

    #[test]
    fn http_errors_prefer_server_message() {
        let message = describe_http_error(StatusCode::UNAUTHORIZED, r#"{"message":"unauthorized"}"#);
        assert_eq!(message, "HTTP 401: unauthorized. Hint: check the API key");

        let plain = describe_http_error(StatusCode::NOT_FOUND, "");
        assert_eq!(plain, "HTTP 404");
    }
}
