use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::{RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::types::{BulkOutcome, DocumentIndex};
use super::IndexError;
use crate::config::ElasticConfig;
use crate::pipeline::export::GazetteRecord;

/// Documents per `_bulk` request.
pub const BULK_CHUNK_SIZE: usize = 500;

/// Elasticsearch HTTP client (API-key auth) for bulk loading records.
pub struct ElasticsearchClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl ElasticsearchClient {
    pub fn new(config: &ElasticConfig) -> Result<Self, IndexError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IndexError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Whether the cluster answers an authenticated request.
    pub fn ping(&self) -> Result<bool, IndexError> {
        let response = self.send(self.client.get(&self.base_url))?;
        Ok(response.status().is_success())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("ApiKey {}", self.api_key))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, IndexError> {
        self.authorized(request).send().map_err(|e| {
            if e.is_connect() {
                IndexError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                IndexError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
            } else {
                IndexError::HttpClient(e.to_string())
            }
        })
    }

    fn send_checked(&self, request: RequestBuilder) -> Result<Response, IndexError> {
        let response = self.send(request)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(IndexError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn bulk_chunk(&self, index: &str, records: &[GazetteRecord]) -> Result<BulkOutcome, IndexError> {
        let url = format!("{}/_bulk", self.base_url);
        let body = bulk_body(index, records)?;

        let response = self.send_checked(
            self.client
                .post(&url)
                .header(CONTENT_TYPE, "application/x-ndjson")
                .body(body),
        )?;

        let text = response
            .text()
            .map_err(|e| IndexError::ResponseParsing(e.to_string()))?;
        parse_bulk_response(&text)
    }
}

impl DocumentIndex for ElasticsearchClient {
    fn index_bulk(&self, index: &str, records: &[GazetteRecord]) -> Result<BulkOutcome, IndexError> {
        let mut outcome = BulkOutcome::default();
        for chunk in records.chunks(BULK_CHUNK_SIZE) {
            let part = self.bulk_chunk(index, chunk)?;
            tracing::info!(
                index,
                indexed = part.indexed,
                failed = part.failed,
                "Bulk chunk sent"
            );
            outcome.merge(part);
        }
        Ok(outcome)
    }

    fn refresh(&self, index: &str) -> Result<(), IndexError> {
        let url = format!("{}/{}/_refresh", self.base_url, index);
        self.send_checked(self.client.post(&url))?;
        Ok(())
    }
}

#[derive(Serialize)]
struct BulkAction<'a> {
    index: BulkTarget<'a>,
}

#[derive(Serialize)]
struct BulkTarget<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_id")]
    id: String,
}

/// NDJSON body: one action line and one source line per record.
pub fn bulk_body(index: &str, records: &[GazetteRecord]) -> Result<String, IndexError> {
    let mut body = String::new();
    for record in records {
        let action = BulkAction {
            index: BulkTarget {
                index,
                id: record.document_key(),
            },
        };
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(record)?);
        body.push('\n');
    }
    Ok(body)
}

#[derive(Deserialize)]
struct BulkResponse {
    items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Deserialize)]
struct BulkItem {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    status: u16,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Count per-item results of a `_bulk` response.
pub fn parse_bulk_response(json: &str) -> Result<BulkOutcome, IndexError> {
    let response: BulkResponse =
        serde_json::from_str(json).map_err(|e| IndexError::ResponseParsing(e.to_string()))?;

    let mut outcome = BulkOutcome::default();
    for item in response.items.iter().flat_map(|entry| entry.values()) {
        if (200..300).contains(&item.status) && item.error.is_none() {
            outcome.indexed += 1;
            continue;
        }

        outcome.failed += 1;
        let reason = item
            .error
            .as_ref()
            .and_then(|e| e.get("reason"))
            .and_then(|r| r.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("status {}", item.status));
        outcome.errors.push(format!(
            "{}: {reason}",
            item.id.as_deref().unwrap_or("?")
        ));
    }
    Ok(outcome)
}
