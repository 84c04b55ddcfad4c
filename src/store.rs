//! Client side of the analytical-store HTTP gateway.
//!
//! Gateway contract:
//! - `GET  /ping`   - any 2xx means reachable
//! - `POST /insert` - `{"table": .., "data": [row, ..]}`, 2xx means stored
//! - `POST /select` - `{"table": .., "columns": [..], "filters": {..}, "orderBy": ..}`,
//!   answers with a JSON object holding the row array under `result`, `data` or `rows`

use crate::dlog;
use crate::error::StoreError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// One stored measurement: column name to scalar value.
pub type Row = Map<String, Value>;

/// Keys the gateway may wrap the selected rows under, in lookup order.
pub const ENVELOPE_KEYS: [&str; 3] = ["result", "data", "rows"];

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";

/// Everything the store layer needs from the rest of the program.
pub trait Store: Send + Sync {
    /// Connectivity probe. Never fails, only reports.
    fn ping(&self) -> bool;

    /// Send all `rows` to `table` in a single request.
    fn insert(&self, table: &str, rows: &[Row]) -> Result<(), StoreError>;

    /// Run `query` and return the raw elements of the row array.
    ///
    /// Elements are not guaranteed to be objects; callers decode defensively.
    fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectQuery {
    pub table: String,
    pub columns: Vec<String>,
    pub filters: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl SelectQuery {
    pub fn new(table: &str, columns: &[&str]) -> Self {
        Self {
            table: table.to_string(),
            columns: columns.iter().map(ToString::to_string).collect(),
            filters: Map::new(),
            order_by: None,
        }
    }

    /// Add an equality filter.
    #[must_use]
    pub fn filter(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.insert(column.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by = Some(order.to_string());
        self
    }
}

#[derive(Serialize)]
struct InsertRequest<'a> {
    table: &'a str,
    data: &'a [Row],
}

/// Pull the row array out of a `/select` response body.
///
/// The gateway is inconsistent about the envelope, so each known key is tried
/// in [`ENVELOPE_KEYS`] order. Anything else (a bare array, a scalar, an
/// object without a matching array) yields no rows.
pub fn normalize_envelope(body: Value) -> Vec<Value> {
    let Value::Object(mut obj) = body else {
        return Vec::new();
    };

    for key in ENVELOPE_KEYS {
        if let Some(Value::Array(rows)) = obj.remove(key) {
            return rows;
        }
    }

    Vec::new()
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout: None,
        }
    }
}

/// [`Store`] backed by the HTTP gateway.
///
/// Holds no per-request state, so one instance can be shared between threads.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, StoreError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(StoreError::Client)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn try_insert(&self, table: &str, rows: &[Row]) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.url("/insert"))
            .json(&InsertRequest { table, data: rows })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        tracing::info!(table, rows = rows.len(), %status, "insert ok");
        Ok(())
    }

    fn try_select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        let filters = Value::Object(query.filters.clone());
        dlog!(
            "select_request table={} columns={:?} filters={filters} order_by={:?}",
            query.table,
            query.columns,
            query.order_by
        );

        // The status is only logged: the body decides what comes back.
        let response = self.http.post(self.url("/select")).json(query).send()?;
        let status = response.status();
        let text = response.text()?;
        tracing::info!(table = %query.table, %status, bytes = text.len(), "select response");

        let body: Value = serde_json::from_str(&text)?;
        Ok(normalize_envelope(body))
    }
}

impl Store for GatewayClient {
    fn ping(&self) -> bool {
        match self.http.get(self.url("/ping")).send() {
            Ok(response) => {
                let status = response.status();
                tracing::info!(url = %self.base_url, %status, "ping response");
                status.is_success()
            }
            Err(e) => {
                tracing::error!(url = %self.base_url, err = %e, "ping failed");
                false
            }
        }
    }

    fn insert(&self, table: &str, rows: &[Row]) -> Result<(), StoreError> {
        self.try_insert(table, rows).inspect_err(|e| {
            tracing::error!(table, rows = rows.len(), err = %e, "insert failed");
        })
    }

    fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        self.try_select(query).inspect_err(|e| {
            tracing::error!(table = %query.table, err = %e, "select failed");
        })
    }
}
