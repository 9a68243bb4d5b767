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

use std::time::Duration;

/// The error type for the Azure Log Analytics clients
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Workspace id is missing
    #[error("Workspace id must not be empty")]
    MissingWorkspaceId,
    /// Shared key is missing
    #[error("Shared key must not be empty")]
    MissingSharedKey,
    /// Shared key isn't valid base64
    #[error("Invalid shared key: {0}")]
    InvalidSharedKey(#[from] tremor_common::base64::DecodeError),
    /// Log type violates the naming rules of custom tables
    #[error("Invalid log type `{0}`: only letters, numbers and underscores are allowed, up to 100 characters")]
    InvalidLogType(String),
    /// Nothing to send
    #[error("No entities to send")]
    NoEntities,
    /// Entity isn't a JSON object
    #[error("Entity {0} must serialize to a JSON object")]
    NotAnObject(usize),
    /// Entity has a field of a type the data collector can't store
    #[error("Field `{field}` of entity {index} has an unsupported type: {kind}")]
    UnsupportedFieldType {
        /// position of the entity in the batch
        index: usize,
        /// name of the offending field
        field: String,
        /// json kind of the offending value
        kind: &'static str,
    },
    /// A single entity is larger than a request may be
    #[error("Entity {index} is {size} bytes which exceeds the {limit} byte request limit")]
    PayloadTooLarge {
        /// position of the entity in the batch
        index: usize,
        /// serialized size of the entity
        size: usize,
        /// maximum request size
        limit: usize,
    },
    /// Token acquisition failed
    #[error("Authentication failed: {0}")]
    Auth(String),
    /// The service answered with a non success status
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body, lossily decoded
        body: String,
    },
    /// The request didn't complete in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Signing key rejected by the MAC implementation
    #[error("Invalid signing key: {0}")]
    Signature(String),
    /// HTTP client error
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// JSON (de)serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Invalid URL
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

/// Result alias for the Azure Log Analytics clients
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// true if the service rejected the request, as opposed to a local or transport failure
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { .. } | Self::Auth(_))
    }
}
