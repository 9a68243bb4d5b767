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
use serde::Deserialize;
use std::path::Path;
use tremor_config::Impl;

/// Shared key access to a workspace
#[derive(Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct LawSecrets {
    /// Workspace id
    pub law_id: String,
    /// Primary or secondary workspace key, base64
    pub law_key: String,
}

/// Client credentials of a principal with read access on the workspace
#[derive(Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct LawPrincipalCredentials {
    /// Application (client) id
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Tenant id or domain, e.g. `contoso.onmicrosoft.com`
    pub domain: String,
}

/// Everything needed to write to and read from a workspace
///
/// ```yaml
/// law_secrets:
///   law_id: 00000000-0000-0000-0000-000000000000
///   law_key: c3VwZXItc2VjcmV0LXNoYXJlZC1rZXk=
/// law_principal_credentials:
///   client_id: 00000000-0000-0000-0000-000000000000
///   client_secret: not-so-secret
///   domain: contoso.onmicrosoft.com
/// ```
#[derive(Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct Secrets {
    /// Workspace access
    pub law_secrets: LawSecrets,
    /// Principal for queries
    pub law_principal_credentials: LawPrincipalCredentials,
}

impl Impl for Secrets {}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("law_id", &self.law_secrets.law_id)
            .field("client_id", &self.law_principal_credentials.client_id)
            .field("domain", &self.law_principal_credentials.domain)
            .finish_non_exhaustive()
    }
}

/// Environment variable overriding the workspace id
pub const ENV_LAW_ID: &str = "LAW_ID";
/// Environment variable overriding the workspace key
pub const ENV_LAW_KEY: &str = "LAW_KEY";
/// Environment variable overriding the principal client id
pub const ENV_CLIENT_ID: &str = "LAW_PRINCIPAL_CLIENT_ID";
/// Environment variable overriding the principal client secret
pub const ENV_CLIENT_SECRET: &str = "LAW_PRINCIPAL_CLIENT_SECRET";
/// Environment variable overriding the principal domain
pub const ENV_DOMAIN: &str = "LAW_PRINCIPAL_DOMAIN";

impl Secrets {
    /// Loads secrets from an optional yaml or json file, overridden by the environment
    ///
    /// # Errors
    /// if the file can't be read or a secret is missing
    pub fn load<P>(path: Option<&P>) -> Result<Self>
    where
        P: AsRef<Path> + ?Sized,
    {
        Self::read(path)?.validated()
    }

    /// Like `load` but leaves missing secrets empty, for callers needing only a part of them
    ///
    /// # Errors
    /// if the file can't be read
    pub fn read<P>(path: Option<&P>) -> Result<Self>
    where
        P: AsRef<Path> + ?Sized,
    {
        let secrets = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(secrets.with_env(|key| std::env::var(key).ok()))
    }

    /// Overrides values with the ones `lookup` finds for the `LAW_*` variables
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut String); 5] = [
            (ENV_LAW_ID, &mut self.law_secrets.law_id),
            (ENV_LAW_KEY, &mut self.law_secrets.law_key),
            (ENV_CLIENT_ID, &mut self.law_principal_credentials.client_id),
            (ENV_CLIENT_SECRET, &mut self.law_principal_credentials.client_secret),
            (ENV_DOMAIN, &mut self.law_principal_credentials.domain),
        ];
        for (key, target) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *target = value;
            }
        }
        self
    }

    /// Ensures all secrets are set
    ///
    /// # Errors
    /// naming the first missing secret
    pub fn validated(self) -> Result<Self> {
        let required = [
            ("law_id", ENV_LAW_ID, &self.law_secrets.law_id),
            ("law_key", ENV_LAW_KEY, &self.law_secrets.law_key),
            (
                "client_id",
                ENV_CLIENT_ID,
                &self.law_principal_credentials.client_id,
            ),
            (
                "client_secret",
                ENV_CLIENT_SECRET,
                &self.law_principal_credentials.client_secret,
            ),
            ("domain", ENV_DOMAIN, &self.law_principal_credentials.domain),
        ];
        if let Some((name, env, _)) = required.iter().find(|(_, _, v)| v.trim().is_empty()) {
            return Err(Error::MissingSecret(*name, *env));
        }
        Ok(self)
    }

    /// Client credentials for the query API
    #[must_use]
    pub fn auth(&self) -> tremor_connectors_azure::auth::Config {
        let principal = &self.law_principal_credentials;
        tremor_connectors_azure::auth::Config::new(
            &principal.client_id,
            &principal.client_secret,
            &principal.domain,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    const YAML: &str = r"
law_secrets:
  law_id: workspace
  law_key: c25vdA==
law_principal_credentials:
  client_id: client
  client_secret: secret
  domain: contoso.onmicrosoft.com
";

    #[test]
    fn from_yaml_file() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        file.write_all(YAML.as_bytes())?;
        let secrets = Secrets::from_file(file.path())?.validated()?;
        assert_eq!(secrets.law_secrets.law_id, "workspace");
        assert_eq!(secrets.law_principal_credentials.domain, "contoso.onmicrosoft.com");
        let auth = secrets.auth();
        assert_eq!(auth.client_id, "client");
        assert_eq!(auth.tenant_id, "contoso.onmicrosoft.com");
        Ok(())
    }

    #[test]
    fn env_overrides_file() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        file.write_all(YAML.as_bytes())?;
        let env: HashMap<&str, &str> = [(ENV_LAW_ID, "from-env"), (ENV_LAW_KEY, "")]
            .into_iter()
            .collect();
        let secrets = Secrets::from_file(file.path())?
            .with_env(|k| env.get(k).map(ToString::to_string))
            .validated()?;
        assert_eq!(secrets.law_secrets.law_id, "from-env");
        // empty variables don't clear values
        assert_eq!(secrets.law_secrets.law_key, "c25vdA==");
        Ok(())
    }

    #[test]
    fn env_only() -> anyhow::Result<()> {
        let secrets = Secrets::default()
            .with_env(|k| Some(format!("{k}-value")))
            .validated()?;
        assert_eq!(
            secrets.law_principal_credentials.client_secret,
            "LAW_PRINCIPAL_CLIENT_SECRET-value"
        );
        Ok(())
    }

    #[test]
    fn read_leaves_missing_secrets_empty() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        file.write_all(b"law_secrets:\n  law_id: workspace\n  law_key: c25vdA==\n")?;
        let secrets = Secrets::read(Some(file.path()))?;
        // variables set in the test environment take precedence
        let env_or = |key: &str, file: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| file.to_string())
        };
        assert_eq!(secrets.law_secrets.law_id, env_or(ENV_LAW_ID, "workspace"));
        assert_eq!(secrets.law_secrets.law_key, env_or(ENV_LAW_KEY, "c25vdA=="));
        assert_eq!(
            secrets.law_principal_credentials.client_id,
            env_or(ENV_CLIENT_ID, "")
        );
        assert_eq!(
            secrets.law_principal_credentials.domain,
            env_or(ENV_DOMAIN, "")
        );
        Ok(())
    }

    #[test]
    fn read_missing_file() {
        assert!(matches!(
            Secrets::read(Some("/this/does/not/exist.yaml")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_secret_is_named() {
        let res = Secrets::default()
            .with_env(|k| (k == ENV_LAW_ID).then(|| "workspace".to_string()))
            .validated();
        match res {
            Err(Error::MissingSecret(name, env)) => {
                assert_eq!(name, "law_key");
                assert_eq!(env, ENV_LAW_KEY);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn debug_hides_secrets() {
        let secrets = Secrets::default().with_env(|k| Some(format!("{k}-value")));
        let dbg = format!("{secrets:?}");
        assert!(!dbg.contains("LAW_KEY-value"));
        assert!(!dbg.contains("LAW_PRINCIPAL_CLIENT_SECRET-value"));
        assert!(dbg.contains("LAW_ID-value"));
    }
}
