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

use crate::secrets::Secrets;
use crate::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tremor_connectors_azure::monitor::collector::{
    custom_field_name, custom_table_name, LogAnalyticsClient,
};
use tremor_connectors_azure::monitor::query::{kql, QueryClient, Row};

/// Log type the synthetic entities are sent to
pub const LOG_TYPE: &str = "endtoendlogs";

/// Number of entities sent in the batch
pub const BATCH_SIZE: usize = 12;

/// How long the workspace gets to make entities queryable
pub const DEFAULT_INGESTION_LATENCY: Duration = Duration::from_secs(6 * 60);

const BATCH_CRITICALITY: &str = "e2ecriticality";
const BATCH_SOURCE: &str = "e2etest";
const SINGLE_CRITICALITY: &str = "e2ecriticalitysingleentry";
const SINGLE_SOURCE: &str = "e2etestsingleentry";

/// The synthetic entity shipped to the workspace
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DemoEntity {
    /// criticality label
    pub criticality: String,
    /// free text message, carries the test id
    pub message: String,
    /// source system label
    pub system_source: String,
}

impl DemoEntity {
    fn new(criticality: &str, message: &str, system_source: &str) -> Self {
        Self {
            criticality: criticality.to_string(),
            message: message.to_string(),
            system_source: system_source.to_string(),
        }
    }
}

fn test_id() -> String {
    format!("test-id-{}", uuid::Uuid::new_v4())
}

/// Sends a batch and a single entity, waits for ingestion and verifies both can be queried back
pub struct EndToEnd {
    logger: LogAnalyticsClient,
    data: QueryClient,
    log_type: String,
    batch_id: String,
    single_id: String,
    ingestion_latency: Duration,
}

impl EndToEnd {
    /// Sets up both clients against the public cloud
    ///
    /// # Errors
    /// if the secrets are rejected by the clients
    pub fn new(secrets: &Secrets) -> Result<Self> {
        let law = &secrets.law_secrets;
        let logger = LogAnalyticsClient::new(&law.law_id, &law.law_key)?;
        let data = QueryClient::new(&law.law_id, secrets.auth())?;
        Ok(Self::with_clients(logger, data))
    }

    /// Uses the given clients, each run gets fresh test ids
    #[must_use]
    pub fn with_clients(logger: LogAnalyticsClient, data: QueryClient) -> Self {
        Self {
            logger,
            data,
            log_type: LOG_TYPE.to_string(),
            batch_id: test_id(),
            single_id: test_id(),
            ingestion_latency: DEFAULT_INGESTION_LATENCY,
        }
    }

    /// Overrides how long to wait for ingestion
    #[must_use]
    pub fn with_ingestion_latency(mut self, latency: Duration) -> Self {
        self.ingestion_latency = latency;
        self
    }

    /// Sends to a different log type
    #[must_use]
    pub fn with_log_type(mut self, log_type: &str) -> Self {
        self.log_type = log_type.to_string();
        self
    }

    /// Message of the batched entities
    #[must_use]
    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    /// Message of the single entity
    #[must_use]
    pub fn single_id(&self) -> &str {
        &self.single_id
    }

    /// Sends the batch, then the single entity
    ///
    /// # Errors
    /// if either send fails
    pub async fn prepare(&self) -> Result<()> {
        let entities: Vec<DemoEntity> = (0..BATCH_SIZE)
            .map(|_| DemoEntity::new(BATCH_CRITICALITY, &self.batch_id, BATCH_SOURCE))
            .collect();
        self.logger
            .send_log_entries(&entities, &self.log_type)
            .await?;

        let entity = DemoEntity::new(SINGLE_CRITICALITY, &self.single_id, SINGLE_SOURCE);
        self.logger.send_log_entry(&entity, &self.log_type).await?;
        info!(
            "Sent batch {} and single entry {} to {}",
            self.batch_id, self.single_id, self.log_type
        );
        Ok(())
    }

    /// Sits tight until the entities should be queryable
    pub async fn wait_for_ingestion(&self) {
        info!(
            "Waiting {:?} for the workspace to ingest the entities",
            self.ingestion_latency
        );
        tokio::time::sleep(self.ingestion_latency).await;
    }

    /// Checks the batch made it: all entities, with their labels
    ///
    /// # Errors
    /// if the query fails or the rows don't match
    pub async fn verify_batch(&mut self) -> Result<()> {
        let id = self.batch_id.clone();
        self.verify(&id, 20, BATCH_SIZE, BATCH_SOURCE, BATCH_CRITICALITY)
            .await
    }

    /// Checks the single entity made it, with its labels
    ///
    /// # Errors
    /// if the query fails or the rows don't match
    pub async fn verify_single(&mut self) -> Result<()> {
        let id = self.single_id.clone();
        self.verify(&id, 10, 1, SINGLE_SOURCE, SINGLE_CRITICALITY)
            .await
    }

    /// Prepares, waits and verifies
    ///
    /// # Errors
    /// on the first failing step
    pub async fn run(&mut self) -> Result<()> {
        self.prepare().await?;
        self.wait_for_ingestion().await;
        self.verify_batch().await?;
        self.verify_single().await?;
        info!("End to end verification of {} passed", self.log_type);
        Ok(())
    }

    async fn verify(
        &mut self,
        id: &str,
        limit: usize,
        expected_rows: usize,
        source: &str,
        criticality: &str,
    ) -> Result<()> {
        let table = custom_table_name(&self.log_type);
        let query = kql::latest_where_equals(&table, "Message", id, limit);
        let results = self.data.query(&query).await?;
        let rows = results.results();

        check("row count", &expected_rows.to_string(), &rows.len().to_string())?;
        let Some(entry) = rows.first() else {
            return Ok(());
        };
        check_field(entry, "Message", id)?;
        let source_column = custom_field_name("SystemSource", &Value::from(source));
        check_field(entry, &source_column, source)?;
        let criticality_column = custom_field_name("Criticality", &Value::from(criticality));
        check_field(entry, &criticality_column, criticality)?;
        info!("Verified {expected_rows} row(s) of {id}");
        Ok(())
    }
}

fn check(check: &str, expected: &str, actual: &str) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::Verification {
            check: check.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

fn check_field(row: &Row, column: &str, expected: &str) -> Result<()> {
    check(column, expected, row.get_str(column).unwrap_or("<missing>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn demo_entity_on_the_wire() -> anyhow::Result<()> {
        let entity = DemoEntity::new("c", "m", "s");
        assert_eq!(
            serde_json::to_value(&entity)?,
            serde_json::json!({"Criticality": "c", "Message": "m", "SystemSource": "s"})
        );
        Ok(())
    }

    #[test]
    fn ids_are_unique() {
        let a = test_id();
        let b = test_id();
        assert!(a.starts_with("test-id-"));
        assert_ne!(a, b);
    }

    #[test]
    fn check_reports_mismatch() {
        assert!(check("row count", "12", "12").is_ok());
        match check("row count", "12", "11") {
            Err(Error::Verification {
                check,
                expected,
                actual,
            }) => {
                assert_eq!(check, "row count");
                assert_eq!(expected, "12");
                assert_eq!(actual, "11");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
