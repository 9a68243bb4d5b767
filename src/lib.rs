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

//! Tremor Log Analytics
//!
//! Ships entities into a Log Analytics workspace and verifies their delivery end to end:
//! entities are sent with the shared key signed data collector, the workspace is given
//! time to ingest them and they are read back through the query API.
//!
//! ```no_run
//! # async fn run() -> tremor_loganalytics::Result<()> {
//! use tremor_loganalytics::{e2e::EndToEnd, secrets::Secrets};
//!
//! let secrets = Secrets::load(Some("secrets.yaml"))?;
//! let mut e2e = EndToEnd::new(&secrets)?;
//! e2e.run().await?;
//! # Ok(())
//! # }
//! ```

#![deny(warnings)]
#![deny(missing_docs)]
#![recursion_limit = "1024"]
#![deny(
    clippy::all,
    clippy::unwrap_used,
    clippy::unnecessary_unwrap,
    clippy::pedantic,
    clippy::mod_module_files
)]

/// End to end delivery verification
pub mod e2e;
mod errors;
/// Workspace and principal secrets
pub mod secrets;
/// Version information
pub mod version;

pub use errors::{Error, Result};
pub use tremor_connectors_azure::monitor::{collector, query};
pub use tremor_connectors_azure::{auth, Error as AzureError};
