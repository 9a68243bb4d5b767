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

use crate::auth::Config as AuthConfig;
use crate::rest::{extract_request_meta, extract_response_meta, RequestId};
use crate::{Error, Result};
use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

/// Helpers to build KQL queries
pub mod kql;

// The query API requires the following scope for workspace read access
const LOG_ANALYTICS_AUTH_SCOPE: &str = "https://api.loganalytics.io/.default";

/// Query API of the public cloud
pub const DEFAULT_BASE_URL: &str = "https://api.loganalytics.io";

/// Query client configuration
#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Client credentials of a principal with read access on the workspace. Required.
    pub auth: AuthConfig,

    /// The workspace id. Required.
    pub workspace_id: String,

    /// Timeout for each query in milliseconds. Optional.
    pub timeout: Option<u64>,
}

impl tremor_config::Impl for Config {}

/// A column of a result table
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// column name
    pub name: String,
    /// KQL data type, e.g. `string`, `datetime`, `real`
    #[serde(rename = "type")]
    pub kind: String,
}

/// A result table
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Table {
    /// table name, the first table is called `PrimaryResult`
    pub name: String,
    /// columns
    pub columns: Vec<Column>,
    /// rows, one value per column
    pub rows: Vec<Vec<Value>>,
}

/// A row of a result table, giving access to values by column name
#[derive(Debug, Clone, Copy)]
pub struct Row<'table> {
    columns: &'table [Column],
    values: &'table [Value],
}

impl<'table> Row<'table> {
    /// The value of `column`
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'table Value> {
        self.columns
            .iter()
            .position(|c| c.name == column)
            .and_then(|idx| self.values.get(idx))
    }

    /// The value of `column` if it's a string
    #[must_use]
    pub fn get_str(&self, column: &str) -> Option<&'table str> {
        self.get(column).and_then(Value::as_str)
    }

    /// The row as a JSON object keyed by column name
    #[must_use]
    pub fn to_object(&self) -> Value {
        self.columns
            .iter()
            .zip(self.values)
            .map(|(c, v)| (c.name.clone(), v.clone()))
            .collect::<serde_json::Map<_, _>>()
            .into()
    }
}

impl Table {
    /// Iterates the rows of the table
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }
}

/// The response of a query
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct QueryResults {
    /// result tables
    pub tables: Vec<Table>,
}

impl QueryResults {
    /// The primary result table
    #[must_use]
    pub fn primary(&self) -> Option<&Table> {
        self.tables.first()
    }

    /// The rows of the primary result table
    #[must_use]
    pub fn results(&self) -> Vec<Row<'_>> {
        self.primary().map(|t| t.rows().collect()).unwrap_or_default()
    }
}

/// Client for the query API of a Log Analytics workspace
#[derive(Debug)]
pub struct QueryClient {
    workspace_id: String,
    auth: AuthConfig,
    base_url: Url,
    client: Client,
    timeout: Duration,
    request_counter: u64,
}

impl QueryClient {
    /// Creates a client for the workspace, the scope of `auth` is set to the Log Analytics API
    ///
    /// # Errors
    /// if the workspace id is empty
    pub fn new(workspace_id: &str, auth: AuthConfig) -> Result<Self> {
        if workspace_id.trim().is_empty() {
            return Err(Error::MissingWorkspaceId);
        }
        Ok(Self {
            workspace_id: workspace_id.to_string(),
            // NOTE We limit the scope to the Log Analytics scope explicitly
            auth: auth.with_scope(LOG_ANALYTICS_AUTH_SCOPE),
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            client: Client::new(),
            timeout: super::DEFAULT_TIMEOUT,
            request_counter: 1,
        })
    }

    /// Creates a client from its configuration
    ///
    /// # Errors
    /// if the configuration is invalid
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.workspace_id, config.auth.clone())?
            .with_timeout(super::timeout_from_millis(config.timeout)))
    }

    /// Sends all queries to `base_url`
    ///
    /// # Errors
    /// if `base_url` isn't a valid URL
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    /// Sets the timeout for each query
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The workspace this client reads from
    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    fn query_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["v1", "workspaces", self.workspace_id.as_str(), "query"]);
        Ok(url)
    }

    /// Runs a KQL query against the workspace
    ///
    /// # Errors
    /// if no token can be acquired, the query is rejected or the response can't be read
    pub async fn query(&mut self, query: &str) -> Result<QueryResults> {
        let id = RequestId::new(self.request_counter);
        self.request_counter = self.request_counter.wrapping_add(1).max(1);

        let token = timeout(self.timeout, self.auth.get_token())
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        let request = self
            .client
            .post(self.query_url()?)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(serde_json::to_vec(&json!({ "query": query }))?)
            .build()?;
        debug!("[{id}] query `{query}` {}", Value::from(extract_request_meta(&request)));

        let response = timeout(self.timeout, self.client.execute(request))
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        let status = response.status();
        let (meta, data) = extract_response_meta(response).await?;
        debug!("[{id}] response {}", Value::from(meta));

        if status.is_success() {
            Ok(serde_json::from_slice(&data)?)
        } else {
            let body = String::from_utf8_lossy(&data).to_string();
            warn!("[{id}] query rejected: {status} {body}");
            Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test::{mock_auth_server, mock_bad_auth_server};
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    const WORKSPACE: &str = "0a1b2c3d-workspace";

    const RESPONSE: &str = r#"{
        "tables": [{
            "name": "PrimaryResult",
            "columns": [
                {"name": "TimeGenerated", "type": "datetime"},
                {"name": "Message", "type": "string"},
                {"name": "SystemSource_s", "type": "string"},
                {"name": "Criticality_s", "type": "string"}
            ],
            "rows": [
                ["2020-07-26T10:00:00Z", "test-id-1", "e2etest", "e2ecriticality"],
                ["2020-07-26T09:59:59Z", "test-id-1", "e2etest", "e2ecriticality"]
            ]
        }]
    }"#;

    fn client(auth: &mockito::ServerGuard, api: &mockito::ServerGuard) -> Result<QueryClient> {
        QueryClient::new(WORKSPACE, AuthConfig::new_mock(auth))?.with_base_url(&api.url())
    }

    #[test]
    fn deserialize_for_coverage() -> anyhow::Result<()> {
        let config = r#"{
            "auth": {
                "client_id": "client_id",
                "client_secret": "client_secret",
                "tenant_id": "tenant_id"
            },
            "workspace_id": "workspace",
            "timeout": 1000
        }"#;

        let config = serde_json::from_str::<Config>(config)?;
        let client = QueryClient::from_config(&config)?;
        assert_eq!(client.workspace_id(), "workspace");
        assert_eq!(client.auth.scope, LOG_ANALYTICS_AUTH_SCOPE);
        assert_eq!(client.timeout, Duration::from_secs(1));
        assert_eq!(
            client.query_url()?.as_str(),
            "https://api.loganalytics.io/v1/workspaces/workspace/query"
        );
        Ok(())
    }

    #[test]
    fn empty_workspace() {
        assert!(matches!(
            QueryClient::new(" ", AuthConfig::new("a", "b", "c")),
            Err(Error::MissingWorkspaceId)
        ));
    }

    #[test]
    fn rows_by_column() -> anyhow::Result<()> {
        let results: QueryResults = serde_json::from_str(RESPONSE)?;
        let rows = results.results();
        assert_eq!(rows.len(), 2);
        let first = rows[0];
        assert_eq!(first.get_str("Message"), Some("test-id-1"));
        assert_eq!(first.get_str("SystemSource_s"), Some("e2etest"));
        assert_eq!(first.get("Snot"), None);
        assert_eq!(
            results.primary().map(|t| t.columns[0].kind.as_str()),
            Some("datetime")
        );
        assert!(QueryResults::default().results().is_empty());
        let object = first.to_object();
        assert_eq!(object.get("Message"), Some(&json!("test-id-1")));
        assert_eq!(object.as_object().map(serde_json::Map::len), Some(4));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn query_roundtrip() -> anyhow::Result<()> {
        let _ = env_logger::try_init();
        let auth = mock_auth_server().await;
        let mut api = mockito::Server::new_async().await;
        let mock = api
            .mock("POST", format!("/v1/workspaces/{WORKSPACE}/query").as_str())
            .match_header("authorization", "Bearer test_access_token")
            .match_body(Matcher::Json(json!({
                "query": "endtoendlogs_CL | limit 20"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(RESPONSE)
            .create_async()
            .await;

        let mut client = client(&auth, &api)?;
        let results = client.query("endtoendlogs_CL | limit 20").await?;
        assert_eq!(results.results().len(), 2);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn query_rejected() -> anyhow::Result<()> {
        let auth = mock_auth_server().await;
        let mut api = mockito::Server::new_async().await;
        api.mock("POST", Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"code":"BadArgumentError"}}"#)
            .create_async()
            .await;

        let mut client = client(&auth, &api)?;
        let res = client.query("snot |").await;
        assert!(matches!(res, Err(Error::UnexpectedStatus { status: 400, .. })));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stalled_token_endpoint_times_out() -> anyhow::Result<()> {
        let _ = env_logger::try_init();
        // accepts connections but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let mut auth = AuthConfig::new("client", "secret", "tenant");
        auth.base_url = format!("http://{}", listener.local_addr()?);
        let api = mockito::Server::new_async().await;

        let mut client = QueryClient::new(WORKSPACE, auth)?
            .with_base_url(&api.url())?
            .with_timeout(Duration::from_millis(200));
        let res = tokio::time::timeout(Duration::from_secs(5), client.query("x")).await?;
        assert!(matches!(res, Err(Error::Timeout(t)) if t == Duration::from_millis(200)));
        drop(listener);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn query_without_token() -> anyhow::Result<()> {
        let auth = mock_bad_auth_server().await;
        let api = mockito::Server::new_async().await;

        let mut client = client(&auth, &api)?;
        assert!(matches!(
            client.query("endtoendlogs_CL").await,
            Err(Error::Auth(_))
        ));
        Ok(())
    }
}
