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
use serde::Serialize;
use serde_json::Value;

/// Maximum length of a log type
pub const MAX_LOG_TYPE_LEN: usize = 100;

/// Maximum size of a single data collector request
pub const MAX_PAYLOAD_BYTES: usize = 30 * 1024 * 1024;

/// Checks a log type against the custom table naming rules: letters, digits and
/// underscores, at most 100 characters.
///
/// # Errors
/// if the log type is empty, too long or contains other characters
pub fn validate_log_type(log_type: &str) -> Result<()> {
    let valid = !log_type.is_empty()
        && log_type.len() <= MAX_LOG_TYPE_LEN
        && log_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidLogType(log_type.to_string()))
    }
}

/// The table a log type ends up in
#[must_use]
pub fn custom_table_name(log_type: &str) -> String {
    format!("{log_type}_CL")
}

/// The column name the backend gives a custom field holding `value`
#[must_use]
pub fn custom_field_name(field: &str, value: &Value) -> String {
    let suffix = match value {
        Value::Bool(_) => "_b",
        Value::Number(_) => "_d",
        _ => "_s",
    };
    format!("{field}{suffix}")
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serializes the entity at `index` into a flat JSON object
pub(crate) fn serialize<T: Serialize>(index: usize, entity: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(entity)?;
    let Value::Object(fields) = &value else {
        return Err(Error::NotAnObject(index));
    };
    if let Some((field, value)) = fields
        .iter()
        .find(|(_, v)| matches!(v, Value::Array(_) | Value::Object(_)))
    {
        return Err(Error::UnsupportedFieldType {
            index,
            field: field.clone(),
            kind: kind(value),
        });
    }
    Ok(serde_json::to_vec(&value)?)
}

/// Packs serialized records into JSON array bodies of at most `limit` bytes each
pub(crate) fn batch(records: Vec<Vec<u8>>, limit: usize) -> Result<Vec<Vec<u8>>> {
    let mut batches = Vec::new();
    // the open batch, `[` followed by comma separated records, still missing its `]`
    let mut current: Vec<u8> = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        if record.len() + 2 > limit {
            return Err(Error::PayloadTooLarge {
                index,
                size: record.len(),
                limit,
            });
        }
        if !current.is_empty() && current.len() + record.len() + 2 > limit {
            current.push(b']');
            batches.push(std::mem::take(&mut current));
        }
        current.push(if current.is_empty() { b'[' } else { b',' });
        current.extend_from_slice(&record);
    }
    if !current.is_empty() {
        current.push(b']');
        batches.push(current);
    }
    Ok(batches)
}
