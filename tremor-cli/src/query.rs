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

use crate::cli::QueryArgs;
use anyhow::Result;
use tremor_connectors_azure::monitor::query::QueryClient;
use tremor_loganalytics::secrets::Secrets;

impl QueryArgs {
    pub(crate) async fn run(self) -> Result<()> {
        let secrets = Secrets::read(self.secrets.secrets.as_deref())?;
        let mut client = QueryClient::new(&secrets.law_secrets.law_id, secrets.auth())?;
        let results = client.query(&self.query).await?;
        for row in results.results() {
            let row = row.to_object();
            if self.pretty {
                println!("{}", serde_json::to_string_pretty(&row)?);
            } else {
                println!("{}", serde_json::to_string(&row)?);
            }
        }
        Ok(())
    }
}
