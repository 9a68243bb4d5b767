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

//! Configuration loading shared by the tremor log analytics crates
#![deny(missing_docs)]
#![deny(
    clippy::all,
    clippy::unwrap_used,
    clippy::unnecessary_unwrap,
    clippy::pedantic
)]

use serde::de::DeserializeOwned;
use std::path::Path;

/// Error for config
#[derive(Debug)]
pub enum Error {
    /// The configuration didn't match the expected structure
    InvalidConfig(String),
    /// The configuration file couldn't be read
    Common(tremor_common::Error),
    /// The configuration file has an extension we don't know how to parse
    UnsupportedFormat(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            Self::InvalidConfig(v) => write!(f, "Invalid config: {v}"),
            Self::Common(e) => write!(f, "{e}"),
            Self::UnsupportedFormat(file) => {
                write!(f, "Unsupported config format `{file}`, expected yaml or json")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<tremor_common::Error> for Error {
    fn from(e: tremor_common::Error) -> Self {
        Self::Common(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

/// Trait for detecting errors in config and the key names are included in errors
pub trait Impl {
    /// deserialises the config into a struct and returns nice errors
    /// this doesn't need to be overwritten in most cases.
    ///
    /// # Errors
    /// if the Configuration is invalid
    fn new(config: &serde_json::Value) -> Result<Self, Error>
    where
        Self: DeserializeOwned,
    {
        Ok(serde_json::from_value(config.clone())?)
    }

    /// Reads the config from a yaml or json file, the format is picked by the file extension
    ///
    /// # Errors
    /// if the file can't be read or the Configuration is invalid
    fn from_file<P>(path: &P) -> Result<Self, Error>
    where
        Self: DeserializeOwned,
        P: AsRef<Path> + ?Sized,
    {
        let path = path.as_ref();
        let content = tremor_common::file::read_to_string(path)?;
        let value: serde_json::Value = match tremor_common::file::extension(path) {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => return Err(Error::UnsupportedFormat(path.to_string_lossy().to_string())),
        };
        Self::new(&value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Snot {
        badger: String,
        #[serde(default)]
        count: u32,
    }

    impl Impl for Snot {}

    #[test]
    fn structurize_value() -> Result<(), Error> {
        let snot = Snot::new(&serde_json::json!({"badger": "yes"}))?;
        assert_eq!(
            snot,
            Snot {
                badger: "yes".to_string(),
                count: 0
            }
        );
        Ok(())
    }

    #[test]
    fn unknown_fields_are_named() {
        let res = Snot::new(&serde_json::json!({"badger": "yes", "snot": 1}));
        match res {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("snot"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn from_yaml_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        file.write_all(b"badger: yaml\ncount: 3\n")?;
        let snot = Snot::from_file(file.path())?;
        assert_eq!(snot.badger, "yaml");
        assert_eq!(snot.count, 3);
        Ok(())
    }

    #[test]
    fn from_unknown_extension() -> Result<(), Box<dyn std::error::Error>> {
        let file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        assert!(matches!(
            Snot::from_file(file.path()),
            Err(Error::UnsupportedFormat(_))
        ));
        Ok(())
    }
}
