//! `TSK1:` share codes.
//!
//! A share code is the scenario record as JSON, zlib-compressed and then
//! base64-encoded with the standard padded alphabet, prefixed with
//! [`SHARE_CODE_PREFIX`].

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use thiserror::Error;

use crate::record::ScenarioRecord;

/// Prefix that marks a share code and its format version.
pub const SHARE_CODE_PREFIX: &str = "TSK1:";

/// Errors produced while encoding or decoding share codes.
#[derive(Error, Debug)]
pub enum ShareCodeError {
    #[error("share code must start with \"TSK1:\"")]
    MissingPrefix,

    #[error("share code payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("share code payload failed to (de)compress: {0}")]
    Compression(#[from] std::io::Error),

    #[error("share code payload is not a scenario: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a scenario record as a share code.
///
/// The whole record is carried, including `name` and `author`, so the
/// receiver sees what the author called it.
pub fn encode(record: &ScenarioRecord) -> Result<String, ShareCodeError> {
    let json = serde_json::to_vec(record)?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;

    Ok(format!("{SHARE_CODE_PREFIX}{}", STANDARD.encode(compressed)))
}

/// Decode a share code back into a scenario record.
///
/// Surrounding whitespace is ignored, so codes pasted from chat work.
pub fn decode(code: &str) -> Result<ScenarioRecord, ShareCodeError> {
    let payload = code
        .trim()
        .strip_prefix(SHARE_CODE_PREFIX)
        .ok_or(ShareCodeError::MissingPrefix)?;

    let compressed = STANDARD.decode(payload.trim())?;

    let mut json = Vec::new();
    ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut json)?;

    Ok(serde_json::from_slice(&json)?)
}

/// Whether `input` should be treated as a share code rather than a path.
pub fn looks_like_share_code(input: &str) -> bool {
    input.trim_start().starts_with(SHARE_CODE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::Directions;
    use crate::identity::ScenarioIdentity;
    use crate::record::TimelineEntry;

    #[test]
    fn test_encode_produces_prefixed_code() {
        let code = encode(&ScenarioRecord::flat(500.0, 500.0, 75.0, 10.0)).unwrap();
        assert!(code.starts_with("TSK1:"));
        assert!(looks_like_share_code(&code));
    }

    #[test]
    fn test_decode_restores_record_and_identity() {
        let record = ScenarioRecord::flat(100.0, 1000.0, 100.0, 10.0)
            .with_name("Accel Ramp Test")
            .with_directions(Directions::HORIZONTAL)
            .with_timeline(vec![
                TimelineEntry::new(0.0, 100.0, 100.0, Directions::HORIZONTAL),
                TimelineEntry::new(10.0, 1000.0, 100.0, Directions::HORIZONTAL),
            ]);

        let decoded = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(ScenarioIdentity::of(&decoded), ScenarioIdentity::of(&record));
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        let code = encode(&ScenarioRecord::default()).unwrap();
        let padded = format!("  {code}\n");
        assert!(decode(&padded).is_ok());
    }

    #[test]
    fn test_decode_rejects_missing_prefix() {
        assert!(matches!(
            decode("eJyrVkrOz0vOTFGyUjA1MNBRKs"),
            Err(ShareCodeError::MissingPrefix)
        ));
        assert!(!looks_like_share_code("scenarios/standard.json"));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode("TSK1:not*base64!"),
            Err(ShareCodeError::Base64(_))
        ));
    }

    #[test]
    fn test_decode_rejects_uncompressed_payload() {
        let code = format!("TSK1:{}", STANDARD.encode(b"{\"start_speed\":500}"));
        assert!(matches!(decode(&code), Err(ShareCodeError::Compression(_))));
    }

    #[test]
    fn test_decode_rejects_non_scenario_json() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"\"just text\"").unwrap();
        let code = format!("TSK1:{}", STANDARD.encode(encoder.finish().unwrap()));
        assert!(matches!(decode(&code), Err(ShareCodeError::Json(_))));
    }
}
