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

use crate::cli::VerifyArgs;
use anyhow::Result;
use std::time::Duration;
use tremor_loganalytics::e2e::EndToEnd;
use tremor_loganalytics::secrets::Secrets;

impl VerifyArgs {
    pub(crate) async fn run(self) -> Result<()> {
        let secrets = Secrets::load(self.secrets.secrets.as_deref())?;
        let mut e2e =
            EndToEnd::new(&secrets)?.with_ingestion_latency(Duration::from_secs(self.latency));
        if let Some(log_type) = &self.log_type {
            e2e = e2e.with_log_type(log_type);
        }
        e2e.run().await?;
        println!("Delivery of {} and {} verified", e2e.batch_id(), e2e.single_id());
        Ok(())
    }
}
