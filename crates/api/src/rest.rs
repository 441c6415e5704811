// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! REST client for the fronting service.
//!
//! The service wraps every record in a `{ "id": ..., "content": {...} }`
//! envelope; all methods here flatten that envelope before deserializing
//! so callers only ever see the domain types. Member and custom-front
//! collections are scoped by system id, resolved once from `/me` and
//! cached for the client's lifetime.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::debug;

use sp_core::models::{CustomFront, FrontEntry, Member, Switch};

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("sp-cli/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the remote fronting service.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    system_id: OnceCell<String>,
}

impl RestClient {
    /// Build a client with the given token and per-request timeout.
    pub fn new(base_url: &str, token: &str, timeout: std::time::Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(token)
            .map_err(|_| Error::Authentication {
                message: "token contains invalid header characters".to_string(),
            })?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(RestClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            system_id: OnceCell::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Current fronters (live and recently ended history entries).
    pub async fn get_fronters(&self) -> Result<Vec<FrontEntry>> {
        let body = self.get_json("/fronters").await?;
        flatten_records(body)
    }

    /// The full member directory for this system.
    pub async fn get_members(&self) -> Result<Vec<Member>> {
        let system_id = self.system_id().await?;
        let body = self.get_json(&format!("/members/{}", system_id)).await?;
        flatten_records(body)
    }

    /// All custom fronts for this system.
    pub async fn get_custom_fronts(&self) -> Result<Vec<CustomFront>> {
        let system_id = self.system_id().await?;
        let body = self
            .get_json(&format!("/customFronts/{}", system_id))
            .await?;
        flatten_records(body)
    }

    /// Register a switch: end every live front session, then open a new
    /// session per entity in the switch. Entity ids must already be
    /// resolved; this method does no name matching.
    pub async fn register_switch(&self, switch: &Switch) -> Result<()> {
        let now_ms = Utc::now().timestamp_millis();

        let current: Vec<FrontEntry> = self.get_fronters().await?;
        for entry in current.iter().filter(|e| e.live) {
            debug!(front_id = %entry.id, "ending live front session");
            let end = json!({ "live": false, "endTime": now_ms });
            // A session that was already ended remotely is not our problem.
            if let Err(e) = self
                .patch_json(&format!("/frontHistory/{}", entry.id), &end)
                .await
            {
                debug!(front_id = %entry.id, error = %e, "failed to end front session");
            }
        }

        let entities = switch
            .members
            .iter()
            .map(|id| (id, false))
            .chain(switch.custom_fronts.iter().map(|id| (id, true)));
        for (entity_id, custom) in entities {
            let front_id = new_front_id();
            let mut start = json!({
                "member": entity_id,
                "startTime": now_ms + 1,
                "live": true,
                "custom": custom,
            });
            if let (Some(note), Some(map)) = (&switch.note, start.as_object_mut()) {
                map.insert("customStatus".to_string(), json!(note));
            }
            debug!(%front_id, %entity_id, custom, "opening front session");
            self.post_json(&format!("/frontHistory/{}", front_id), &start)
                .await?;
        }
        Ok(())
    }

    /// System id from `/me`, fetched once and reused.
    async fn system_id(&self) -> Result<&str> {
        self.system_id
            .get_or_try_init(|| async {
                let body = self.get_json("/me").await?;
                extract_system_id(&body)
            })
            .await
            .map(String::as_str)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {}", url);
        let resp = self.http.get(&url).send().await?;
        Self::parse_body(resp).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        debug!("POST {}", url);
        let resp = self.http.post(&url).json(body).send().await?;
        Self::parse_body(resp).await
    }

    async fn patch_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        debug!("PATCH {}", url);
        let resp = self.http.patch(&url).json(body).send().await?;
        Self::parse_body(resp).await
    }

    async fn parse_body(resp: reqwest::Response) -> Result<Value> {
        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(Error::RateLimited { retry_after_secs });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("HTTP {}: check the token and its permissions", status.as_u16()),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| body.chars().take(100).collect());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        // Writes can come back with an empty body.
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| Error::Protocol(format!("invalid JSON body: {}", e)))
    }
}

/// Flatten a list of `{ "id": ..., "content": {...} }` envelopes into the
/// content objects with `id` merged in, then deserialize.
fn flatten_records<T: DeserializeOwned>(body: Value) -> Result<Vec<T>> {
    let Value::Array(records) = body else {
        return Err(Error::Protocol(format!(
            "expected a record array, got {}",
            type_name(&body)
        )));
    };
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let id = record.get("id").cloned();
        let Some(Value::Object(mut content)) = record.get("content").cloned() else {
            return Err(Error::Protocol("record without content object".to_string()));
        };
        if let Some(id) = id {
            content.insert("id".to_string(), id);
        }
        let flat = Value::Object(content);
        out.push(
            serde_json::from_value(flat)
                .map_err(|e| Error::Protocol(format!("malformed record: {}", e)))?,
        );
    }
    Ok(out)
}

/// Pull the system id out of a `/me` response. The field name varies
/// across service versions, and some put it under `content`.
fn extract_system_id(body: &Value) -> Result<String> {
    const FIELDS: [&str; 4] = ["id", "uid", "systemId", "userId"];
    for field in FIELDS {
        if let Some(id) = body.get(field).and_then(Value::as_str) {
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }
    }
    if let Some(content) = body.get("content") {
        for field in FIELDS {
            if let Some(id) = content.get(field).and_then(Value::as_str) {
                if !id.is_empty() {
                    return Ok(id.to_string());
                }
            }
        }
    }
    Err(Error::Protocol(
        "no system id in /me response".to_string(),
    ))
}

/// New 24-hex-char record id in the service's ObjectId style.
fn new_front_id() -> String {
    let mut simple = uuid::Uuid::new_v4().simple().to_string();
    simple.truncate(24);
    simple
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "rest_tests.rs"]
mod tests;
