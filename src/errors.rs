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

/// The error type of the end to end verification
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A secret is neither in the secrets file nor in the environment
    #[error("Missing secret `{0}`, set it in the secrets file or via the {1} environment variable")]
    MissingSecret(&'static str, &'static str),
    /// Configuration error
    #[error(transparent)]
    Config(#[from] tremor_config::Error),
    /// Azure client error
    #[error(transparent)]
    Azure(#[from] tremor_connectors_azure::Error),
    /// The workspace didn't return what was sent
    #[error("Verification of {check} failed: expected `{expected}`, got `{actual}`")]
    Verification {
        /// what was checked
        check: String,
        /// expected value
        expected: String,
        /// actual value
        actual: String,
    },
}

/// Result alias for the end to end verification
pub type Result<T> = std::result::Result<T, Error>;
