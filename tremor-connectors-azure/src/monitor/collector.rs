// Copyright 2024, The Tremor Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::rest::{extract_request_meta, extract_response_meta, RequestId};
use crate::{Error, Result};
use log::{debug, info, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

mod entry;
mod signature;

pub use entry::{
    custom_field_name, custom_table_name, validate_log_type, MAX_LOG_TYPE_LEN, MAX_PAYLOAD_BYTES,
};
use signature::SharedKey;

/// Data collector domain of the public cloud
pub const DEFAULT_ENDPOINT: &str = "ods.opinsights.azure.com";

/// Data collector API version
pub const API_VERSION: &str = "2016-04-01";

/// Collector configuration
#[derive(Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The workspace id. Required.
    pub workspace_id: String,

    /// The base64 encoded primary or secondary workspace key. Required.
    pub shared_key: String,

    /// Data collector domain. Default value is "ods.opinsights.azure.com".
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout for each request in milliseconds. Optional.
    pub timeout: Option<u64>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorConfig")
            .field("workspace_id", &self.workspace_id)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl tremor_config::Impl for Config {}

/// Optional per request settings of the data collector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Azure resource id the records are associated with, sent as `x-ms-AzureResourceId`
    pub resource_id: Option<String>,
    /// Name of a field in the records holding the time generated, sent as `time-generated-field`
    pub time_generated_field: Option<String>,
}

/// Client for the HTTP Data Collector API of a Log Analytics workspace
#[derive(Debug)]
pub struct LogAnalyticsClient {
    shared_key: SharedKey,
    base_url: Url,
    client: Client,
    timeout: Duration,
    max_payload_bytes: usize,
    request_counter: AtomicU64,
}

impl LogAnalyticsClient {
    /// Creates a client for the workspace in the public cloud
    ///
    /// # Errors
    /// if the workspace id or shared key are empty, or the key isn't base64
    pub fn new(workspace_id: &str, shared_key: &str) -> Result<Self> {
        let shared_key = SharedKey::new(workspace_id, shared_key)?;
        Ok(Self {
            base_url: collector_url(workspace_id, DEFAULT_ENDPOINT)?,
            shared_key,
            client: Client::new(),
            timeout: super::DEFAULT_TIMEOUT,
            max_payload_bytes: MAX_PAYLOAD_BYTES,
            // always start by 1
            request_counter: AtomicU64::new(1),
        })
    }

    /// Creates a client from its configuration
    ///
    /// # Errors
    /// if the configuration is invalid
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.workspace_id, &config.shared_key)?
            .with_endpoint(&config.endpoint)?
            .with_timeout(super::timeout_from_millis(config.timeout)))
    }

    /// Uses a different data collector domain, e.g. `ods.opinsights.azure.us`
    ///
    /// # Errors
    /// if the resulting URL is invalid
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.base_url = collector_url(self.shared_key.workspace_id(), endpoint)?;
        Ok(self)
    }

    /// Sends all requests to `base_url`
    ///
    /// # Errors
    /// if `base_url` isn't a valid URL
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    /// Sets the timeout for each request
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(test)]
    fn with_max_payload_bytes(mut self, max_payload_bytes: usize) -> Self {
        self.max_payload_bytes = max_payload_bytes;
        self
    }

    /// The workspace this client writes to
    #[must_use]
    pub fn workspace_id(&self) -> &str {
        self.shared_key.workspace_id()
    }

    /// Sends a single entity to the custom table of `log_type`
    ///
    /// # Errors
    /// see [`LogAnalyticsClient::send_log_entries_with`]
    pub async fn send_log_entry<T: Serialize>(&self, entity: &T, log_type: &str) -> Result<()> {
        self.send_log_entries(std::slice::from_ref(entity), log_type)
            .await
    }

    /// Sends entities to the custom table of `log_type`
    ///
    /// # Errors
    /// see [`LogAnalyticsClient::send_log_entries_with`]
    pub async fn send_log_entries<T: Serialize>(
        &self,
        entities: &[T],
        log_type: &str,
    ) -> Result<()> {
        self.send_log_entries_with(entities, log_type, &SendOptions::default())
            .await
    }

    /// Sends entities to the custom table of `log_type`. Entities must serialize to flat
    /// JSON objects. Large batches are split into requests below the data collector limit,
    /// which are sent one after another.
    ///
    /// # Errors
    /// * if the log type or any of the entities are invalid, nothing is sent then
    /// * if a request fails or is rejected, requests before it have been accepted
    pub async fn send_log_entries_with<T: Serialize>(
        &self,
        entities: &[T],
        log_type: &str,
        options: &SendOptions,
    ) -> Result<()> {
        validate_log_type(log_type)?;
        if entities.is_empty() {
            return Err(Error::NoEntities);
        }
        let records = entities
            .iter()
            .enumerate()
            .map(|(index, entity)| entry::serialize(index, entity))
            .collect::<Result<Vec<_>>>()?;
        let bodies = entry::batch(records, self.max_payload_bytes)?;
        let requests = bodies.len();
        for body in bodies {
            self.post(body, log_type, options).await?;
        }
        info!(
            "Sent {} entities to {log_type} of workspace {} in {requests} request(s)",
            entities.len(),
            self.workspace_id()
        );
        Ok(())
    }

    fn logs_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["api", "logs"]);
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }

    async fn post(&self, body: Vec<u8>, log_type: &str, options: &SendOptions) -> Result<()> {
        let id = RequestId::new(self.request_counter.fetch_add(1, Ordering::Relaxed));
        let date = tremor_common::time::http_date();
        let authorization = self.shared_key.authorization(body.len(), &date)?;

        let url = self.logs_url()?;

        let mut builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, authorization)
            .header("Log-Type", log_type)
            .header("x-ms-date", &date);
        if let Some(field) = &options.time_generated_field {
            builder = builder.header("time-generated-field", field);
        }
        if let Some(resource_id) = &options.resource_id {
            builder = builder.header("x-ms-AzureResourceId", resource_id);
        }
        let request = builder.body(body).build()?;
        debug!("[{id}] request {}", Value::from(extract_request_meta(&request)));

        let response = timeout(self.timeout, self.client.execute(request))
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        let status = response.status();
        let (meta, data) = extract_response_meta(response).await?;
        debug!("[{id}] response {}", Value::from(meta));

        if status.is_success() {
            Ok(())
        } else {
            let body = String::from_utf8_lossy(&data).to_string();
            warn!("[{id}] data collector rejected {log_type}: {status} {body}");
            Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn collector_url(workspace_id: &str, endpoint: &str) -> Result<Url> {
    Ok(Url::parse(&format!("https://{workspace_id}.{endpoint}"))?)
}
