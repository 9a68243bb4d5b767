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

use crate::cli::SendArgs;
use anyhow::{bail, Result};
use log::info;
use serde_json::Value;
use std::io::Read;
use tremor_connectors_azure::monitor::collector::{LogAnalyticsClient, SendOptions};
use tremor_loganalytics::secrets::Secrets;

/// Entities of an input document, either a single object or an array of them
fn entities(input: &str) -> Result<Vec<Value>> {
    match serde_json::from_str(input)? {
        Value::Array(entities) => Ok(entities),
        entity @ Value::Object(_) => Ok(vec![entity]),
        other => bail!("Expected an object or an array of objects, got `{other}`"),
    }
}

fn read_input(infile: &str) -> Result<String> {
    if infile == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        Ok(tremor_common::file::read_to_string(infile)?)
    }
}

impl SendArgs {
    pub(crate) async fn run(self) -> Result<()> {
        let secrets = Secrets::read(self.secrets.secrets.as_deref())?;
        let law = &secrets.law_secrets;
        let mut client = LogAnalyticsClient::new(&law.law_id, &law.law_key)?;
        if let Some(timeout) = self.timeout {
            client = client.with_timeout(std::time::Duration::from_millis(timeout));
        }
        let entities = entities(&read_input(&self.infile)?)?;
        let options = SendOptions {
            resource_id: self.resource_id,
            time_generated_field: self.time_generated_field,
        };
        client
            .send_log_entries_with(&entities, &self.log_type, &options)
            .await?;
        info!("Sent {} entities to {}", entities.len(), self.log_type);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn object_or_array() -> Result<()> {
        assert_eq!(entities(r#"{"Message": "snot"}"#)?, vec![json!({"Message": "snot"})]);
        assert_eq!(
            entities(r#"[{"Message": "snot"}, {"Message": "badger"}]"#)?,
            vec![json!({"Message": "snot"}), json!({"Message": "badger"})]
        );
        assert!(entities("42").is_err());
        assert!(entities("{").is_err());
        Ok(())
    }

    #[test]
    fn input_from_file() -> Result<()> {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(br#"{"Message": "snot"}"#)?;
        let path = file.path().to_string_lossy().to_string();
        assert_eq!(entities(&read_input(&path)?)?.len(), 1);
        assert!(read_input("/this/does/not/exist.json").is_err());
        Ok(())
    }
}
