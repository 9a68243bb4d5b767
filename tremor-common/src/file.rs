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

use std::{ffi::OsStr, fs::File, io::Read, path::Path};

use crate::errors::Error;

/// A wrapper around `File::open` that will give a better error (including the filename)
///
/// # Errors
///   * if the file couldn't be opened
pub fn open<S>(path: &S) -> Result<File, Error>
where
    S: AsRef<Path> + ?Sized,
{
    File::open(path).map_err(|e| {
        let p: &Path = path.as_ref();
        Error::FileOpen(e, p.to_string_lossy().to_string())
    })
}

/// Reads the whole file into a string, the error includes the filename
///
/// # Errors
///   * if the file couldn't be opened or read
pub fn read_to_string<S>(path: &S) -> Result<String, Error>
where
    S: AsRef<Path> + ?Sized,
{
    let mut file = open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content).map_err(|e| {
        let p: &Path = path.as_ref();
        Error::FileRead(e, p.to_string_lossy().to_string())
    })?;
    Ok(content)
}

/// Gets the extesion for a filename
pub fn extension<S>(path: &S) -> Option<&str>
where
    S: AsRef<Path> + ?Sized,
{
    path.as_ref().extension().and_then(OsStr::to_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_and_extension() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        file.write_all(b"law_id: snot\n")?;
        assert_eq!(read_to_string(file.path())?, "law_id: snot\n");
        assert_eq!(extension(file.path()), Some("yaml"));
        Ok(())
    }

    #[test]
    fn missing_file_names_the_file() {
        let res = read_to_string("/this/does/not/exist.yaml");
        assert!(matches!(res, Err(Error::FileOpen(_, ref f)) if f == "/this/does/not/exist.yaml"));
    }
}
