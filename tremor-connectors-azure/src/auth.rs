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

use crate::{Error, Result};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    time::{Duration, Instant},
};

// Tokens are refreshed this long before the service would consider them expired.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

// Azure client credentials token response. Provided for any successful token request.
#[derive(Deserialize, Serialize)]
struct TokenResponse {
    access_token: String,
    expires_in: ExpiresIn,
}

// The v2 endpoint answers with a number, older v1 style endpoints with a string.
#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum ExpiresIn {
    Seconds(u64),
    Text(String),
}

impl ExpiresIn {
    fn as_duration(&self) -> Result<Duration> {
        match self {
            Self::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            Self::Text(secs) => secs
                .parse()
                .map(Duration::from_secs)
                .map_err(|e| Error::Auth(format!("invalid expires_in `{secs}`: {e}"))),
        }
    }
}

// A token once resolved from the Azure auth service.
pub(crate) struct Token {
    access_token: String,
    expires_in: Instant,
}

/// Encapsulation of an Azure authentication endpoint for client credentials flow types.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the identity service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Application (client) id of the service principal
    pub client_id: String,
    /// Secret of the service principal
    pub client_secret: String,
    /// Tenant (directory) id or domain of the service principal
    pub tenant_id: String,
    /// Scope the token is requested for, injected by the clients on construction
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(skip)]
    token: Option<Token>,
    #[serde(skip)]
    client: Client,
}

// Default scope for authentication - we default this so that deserialization
// can work without a user defined scope. Consumers of the auth mechanism
// *MUST* always provide a scope.
fn default_scope() -> String {
    "https://login.microsoftonline.com".to_string()
}

// Default base URL for Azure authentication against microsoft online.
fn default_base_url() -> String {
    "https://login.microsoftonline.com".to_string()
}

impl Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("tenant_id", &self.tenant_id)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl Clone for Config {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            tenant_id: self.tenant_id.clone(),
            scope: self.scope.clone(),
            token: None,
            client: self.client.clone(),
        }
    }
}

impl tremor_config::Impl for Config {}

impl Config {
    /// Client credentials for the given service principal against the public cloud identity service
    #[must_use]
    pub fn new(client_id: &str, client_secret: &str, tenant_id: &str) -> Self {
        Self {
            base_url: default_base_url(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            tenant_id: tenant_id.to_string(),
            scope: default_scope(),
            token: None,
            client: Client::new(),
        }
    }

    // Mock instance for testing purposes. See tests for usage.
    #[cfg(test)]
    pub(crate) fn new_mock(mock_server: &mockito::ServerGuard) -> Self {
        Self {
            base_url: mock_server.url(),
            ..Self::new(
                crate::auth::test::MOCK_CLIENT_ID,
                crate::auth::test::MOCK_CLIENT_SECRET,
                crate::auth::test::MOCK_TENANT_ID,
            )
        }
        .with_scope(crate::auth::test::MOCK_SCOPE)
    }

    /// Replaces the scope, dropping any token resolved for the previous one
    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        if self.scope != scope {
            self.token = None;
        }
        self.scope = scope.to_string();
        self
    }

    /// Resolves or refreshes a token from the Azure auth service.
    ///
    /// # Errors
    /// if the auth service can't be reached or refuses the credentials
    pub async fn get_token(&mut self) -> Result<String> {
        if self.token.is_none() || self.is_token_expired() {
            let token = self.refresh_token().await?;
            self.token = Some(token);
        }

        match self.token {
            Some(ref token) => Ok(token.access_token.clone()),
            None => Err(Error::Auth("Failed to get token".to_string())),
        }
    }

    // Refreshes a token from the Azure auth service. Used by get_token.
    async fn refresh_token(&self) -> Result<Token> {
        let url = format!("{}/{}/oauth2/v2.0/token", self.base_url, self.tenant_id);
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("scope", &self.scope),
        ];

        debug!("Requesting token for {} from {url}", self.scope);
        let res = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("Failed to reach {url}: {e}")))?;

        let status = res.status();
        let body_str = res.text().await?;
        if !status.is_success() {
            return Err(Error::Auth(format!(
                "token endpoint answered {status}: {body_str}"
            )));
        }

        let res = serde_json::from_str::<TokenResponse>(&body_str)
            .map_err(|e| Error::Auth(format!("Failed to read token response: {e}")))?;
        let lifetime = res.expires_in.as_duration()?.saturating_sub(EXPIRY_SKEW);

        Ok(Token {
            access_token: res.access_token,
            expires_in: Instant::now() + lifetime,
        })
    }

    // Checks if the token is expired. Used by get_token.
    fn is_token_expired(&self) -> bool {
        if let Some(token) = &self.token {
            token.expires_in <= Instant::now()
        } else {
            true
        }
    }
}
