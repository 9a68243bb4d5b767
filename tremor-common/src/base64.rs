// Copyright 2022, The Tremor Team
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
use base64::alphabet::STANDARD as STANDARD_ALPHABET;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
pub use base64::{DecodeError, Engine};

/**
 * Our very own base64 engine, that produces base64 with padding, but accepts base64 with and without padding.
 * Workspace keys are handed out padded, but we don't want to reject a key that lost its `=` in a copy & paste.
 */
pub const BASE64: GeneralPurpose = GeneralPurpose::new(
    &STANDARD_ALPHABET,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes a base64 encoded secret
///
/// # Errors
/// if the input isn't valid base64
pub fn decode<T: AsRef<[u8]>>(input: T) -> Result<Vec<u8>, DecodeError> {
    BASE64.decode(input)
}

/// Encodes bytes as padded base64
#[must_use]
pub fn encode<T: AsRef<[u8]>>(input: T) -> String {
    BASE64.encode(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_with_and_without_padding() -> Result<(), DecodeError> {
        assert_eq!(decode("c25vdA==")?, b"snot");
        assert_eq!(decode("c25vdA")?, b"snot");
        assert_eq!(encode(b"snot"), "c25vdA==");
        Ok(())
    }

    #[test]
    fn decode_garbage() {
        assert!(decode("not base64!").is_err());
    }
}
