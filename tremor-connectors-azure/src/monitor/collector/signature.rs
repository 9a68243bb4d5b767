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
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt::Debug;
use tremor_common::base64;

type HmacSha256 = Hmac<Sha256>;

/// Resource the data collector expects in the string to sign
const RESOURCE: &str = "/api/logs";

/// Workspace shared key used to sign data collector requests.
///
/// The signature is the base64 encoded HMAC-SHA256 of
///
/// ```text
/// POST\n{content-length}\napplication/json\nx-ms-date:{rfc1123 date}\n/api/logs
/// ```
///
/// keyed with the base64 decoded workspace key.
#[derive(Clone)]
pub(crate) struct SharedKey {
    workspace_id: String,
    key: Vec<u8>,
}

impl Debug for SharedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedKey")
            .field("workspace_id", &self.workspace_id)
            .finish_non_exhaustive()
    }
}

impl SharedKey {
    pub(crate) fn new(workspace_id: &str, shared_key: &str) -> Result<Self> {
        if workspace_id.trim().is_empty() {
            return Err(Error::MissingWorkspaceId);
        }
        if shared_key.trim().is_empty() {
            return Err(Error::MissingSharedKey);
        }
        Ok(Self {
            workspace_id: workspace_id.to_string(),
            key: base64::decode(shared_key.trim())?,
        })
    }

    pub(crate) fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub(crate) fn string_to_sign(content_length: usize, date: &str) -> String {
        format!("POST\n{content_length}\napplication/json\nx-ms-date:{date}\n{RESOURCE}")
    }

    /// The signature for a body of `content_length` bytes sent at `date`
    pub(crate) fn sign(&self, content_length: usize, date: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| Error::Signature(e.to_string()))?;
        mac.update(Self::string_to_sign(content_length, date).as_bytes());
        Ok(base64::encode(mac.finalize().into_bytes()))
    }

    /// The value of the `Authorization` header
    pub(crate) fn authorization(&self, content_length: usize, date: &str) -> Result<String> {
        Ok(format!(
            "SharedKey {}:{}",
            self.workspace_id,
            self.sign(content_length, date)?
        ))
    }
}
