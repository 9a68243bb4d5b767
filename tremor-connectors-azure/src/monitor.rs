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

#![allow(clippy::doc_markdown)]

//!
//! ## Azure Monitor Log Analytics
//!
//! Two clients to talk to a [Log Analytics workspace](https://learn.microsoft.com/en-us/azure/azure-monitor/logs/log-analytics-workspace-overview):
//!
//! * [`collector::LogAnalyticsClient`] writes entities into custom tables through the
//!   [HTTP Data Collector API](https://learn.microsoft.com/en-us/azure/azure-monitor/logs/data-collector-api),
//!   signing every request with the workspace shared key.
//! * [`query::QueryClient`] reads them back through the
//!   [Log Analytics query API](https://learn.microsoft.com/en-us/rest/api/loganalytics/dataaccess/query),
//!   authenticating with a client credentials bearer token.
//!
//! ### Collector configuration
//!
//! | option          | description                                                                                   |
//! |-----------------|-----------------------------------------------------------------------------------------------|
//! | `workspace_id`  | The workspace id (a uuid)                                                                     |
//! | `shared_key`    | The primary or secondary key of the workspace, base64 encoded                                 |
//! | `endpoint`      | The data collector domain. Default is `ods.opinsights.azure.com`, sovereign clouds differ     |
//! | `timeout`       | The timeout in milliseconds for each request. Default is 60 seconds                           |
//!
//! ### Query configuration
//!
//! | option          | description                                                                                   |
//! |-----------------|-----------------------------------------------------------------------------------------------|
//! | `workspace_id`  | The workspace id (a uuid)                                                                     |
//! | `auth`          | Client credentials (`client_id`, `client_secret`, `tenant_id`) of a principal with read access |
//! | `timeout`       | The timeout in milliseconds for each query. Default is 60 seconds                             |
//!
//! #### Special considerations
//!
//! The data collector answers `200 OK` as soon as it accepted the payload. Records become
//! queryable only after the ingestion latency of the workspace, which is usually a few minutes.
//!
//! Custom tables get the `_CL` suffix and custom fields a type suffix (`_s` for strings, `_b` for
//! booleans, `_d` for numbers), see [`collector::custom_table_name`] and [`collector::custom_field_name`].
//!
//! Curl, Postman, or other REST clients can be used to test the query authentication
//! before configuring the clients. An example using a curl compatible [Hurl](https://hurl.dev/) script is shown below:
//!
//! ````hurl
//! POST https://login.microsoftonline.com/<tenant-id>/oauth2/v2.0/token
//! Content-Type: application/x-www-form-urlencoded
//! ```
//! client_id=<client-id>&scope=https%3a%2f%2fapi.loganalytics.io%2f.default&client_secret=<client-secret>&grant_type=client_credentials
//! ```
//! HTTP 200
//! [Captures]
//! token: jsonpath "$['access_token']"
//!
//! POST https://api.loganalytics.io/v1/workspaces/<workspace-id>/query
//! Content-Type: application/json
//! Authorization: Bearer {{token}}
//! ```json
//! { "query": "endtoendlogs_CL | limit 10" }
//! ```
//! HTTP 200
//! ````

/// HTTP Data Collector API client
pub mod collector;
/// Log Analytics query API client
pub mod query;

use std::time::Duration;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) fn timeout_from_millis(timeout: Option<u64>) -> Duration {
    timeout.map_or(DEFAULT_TIMEOUT, Duration::from_millis)
}
