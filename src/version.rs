// Copyright 2020-2024, The Tremor Team
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

use log::info;

/// Version of the tremor loganalytics crate;
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit the crate was built from, if known
pub const VERSION_HASH: Option<&str> = option_env!("VERSION_HASH");

/// Git branch the crate was built from, if known
pub const VERSION_BRANCH: Option<&str> = option_env!("VERSION_BRANCH");

/// The long version string, e.g. `0.13.0 (main 1a2b3c4)`
#[must_use]
pub fn long() -> String {
    match (VERSION_BRANCH, VERSION_HASH) {
        (Some(branch), Some(hash)) => format!("{VERSION} ({branch} {hash})"),
        _ => VERSION.to_string(),
    }
}

/// Logs the version.
pub fn log() {
    info!("tremor-loganalytics version: {}", long());
}
