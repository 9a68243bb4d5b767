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

// some tests don't use everything and this would generate warnings for those
// which it shouldn't
#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use tremor_loganalytics::auth::Config as AuthConfig;
use tremor_loganalytics::collector::LogAnalyticsClient;
use tremor_loganalytics::query::QueryClient;

pub const WORKSPACE: &str = "0a1b2c3d-workspace";
// base64 of `super-secret-shared-key`
pub const KEY: &str = "c3VwZXItc2VjcmV0LXNoYXJlZC1rZXk=";
const TENANT: &str = "contoso.onmicrosoft.com";

/// A stand-in for a Log Analytics workspace: identity service, data collector and query API
pub struct MockWorkspace {
    pub auth: ServerGuard,
    pub collector: ServerGuard,
    pub api: ServerGuard,
    token: Mock,
}

impl MockWorkspace {
    pub async fn new() -> Self {
        let mut auth = mockito::Server::new_async().await;
        let token = auth
            .mock("POST", format!("/{TENANT}/oauth2/v2.0/token").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "e2e_token", "expires_in": 3600}"#)
            .create_async()
            .await;
        Self {
            auth,
            token,
            collector: mockito::Server::new_async().await,
            api: mockito::Server::new_async().await,
        }
    }

    pub fn logger(&self) -> anyhow::Result<LogAnalyticsClient> {
        Ok(LogAnalyticsClient::new(WORKSPACE, KEY)?.with_base_url(&self.collector.url())?)
    }

    pub fn data(&self) -> anyhow::Result<QueryClient> {
        let mut auth = AuthConfig::new("client", "secret", TENANT);
        auth.base_url = self.auth.url();
        Ok(QueryClient::new(WORKSPACE, auth)?.with_base_url(&self.api.url())?)
    }

    /// Accepts `n` posts of the given log type
    pub async fn expect_posts(&mut self, log_type: &str, n: usize) -> Mock {
        self.collector
            .mock("POST", Matcher::Regex("^/api/logs".to_string()))
            .match_header("log-type", log_type)
            .match_header(
                "authorization",
                Matcher::Regex(format!("^SharedKey {WORKSPACE}:")),
            )
            .with_status(200)
            .expect(n)
            .create_async()
            .await
    }

    /// Answers the query with `n` copies of the row
    pub async fn answer(&mut self, query: &str, n: usize, row: [&str; 3]) -> Mock {
        let rows: Vec<_> = (0..n).map(|_| json!(row)).collect();
        let body = json!({
            "tables": [{
                "name": "PrimaryResult",
                "columns": [
                    {"name": "Message", "type": "string"},
                    {"name": "SystemSource_s", "type": "string"},
                    {"name": "Criticality_s", "type": "string"}
                ],
                "rows": rows
            }]
        });
        self.api
            .mock("POST", format!("/v1/workspaces/{WORKSPACE}/query").as_str())
            .match_header("authorization", "Bearer e2e_token")
            .match_body(Matcher::Json(json!({ "query": query })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }
}

pub fn batch_query(id: &str) -> String {
    format!("endtoendlogs_CL | where Message == '{id}' | order by TimeGenerated desc | limit 20")
}

pub fn single_query(id: &str) -> String {
    format!("endtoendlogs_CL | where Message == '{id}' | order by TimeGenerated desc | limit 10")
}
