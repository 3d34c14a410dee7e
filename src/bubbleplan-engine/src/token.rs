// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Compact, URL-embeddable spec tokens.
//!
//! A token is the spec's canonical JSON, raw-deflate compressed, then
//! base64 encoded with the URL-safe alphabet and no padding.  Tokens
//! contain only `[A-Za-z0-9_-]` and can be pasted into a query string
//! or fragment without escaping.
//!
//! Decoding reverses the stages and reports which one failed: transport
//! corruption ([`DecodeError::Transform`]), malformed JSON
//! ([`DecodeError::Parse`]), or well-formed JSON that is not a valid
//! spec ([`DecodeError::Schema`]).

use std::io::{Read, Write};

use base64::{Engine as _, engine::general_purpose};
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::common::{DecodeError, Error, ErrorCode, ErrorKind, Result, ValidationError};
use crate::datamodel::BubbleSpec;
use crate::json;

/// Encode a spec as a shareable token.
pub fn encode(spec: &BubbleSpec) -> Result<String> {
    let raw: json::BubbleSpec = spec.into();
    let serialized = serde_json::to_vec(&raw).map_err(|err| {
        Error::new(
            ErrorKind::Token,
            ErrorCode::Generic,
            Some(err.to_string()),
        )
    })?;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&serialized).map_err(|err| {
        Error::new(
            ErrorKind::Token,
            ErrorCode::Generic,
            Some(err.to_string()),
        )
    })?;
    let compressed = encoder.finish().map_err(|err| {
        Error::new(
            ErrorKind::Token,
            ErrorCode::Generic,
            Some(err.to_string()),
        )
    })?;

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(compressed))
}

/// Decode a token back into a validated spec.
pub fn decode(token: &str) -> std::result::Result<BubbleSpec, DecodeError> {
    let compressed = general_purpose::URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|err| DecodeError::Transform(err.to_string()))?;

    let mut serialized = Vec::new();
    DeflateDecoder::new(&compressed[..])
        .read_to_end(&mut serialized)
        .map_err(|err| DecodeError::Transform(err.to_string()))?;

    let raw: json::BubbleSpec = match serde_json::from_slice(&serialized) {
        Ok(raw) => raw,
        Err(err) => {
            return Err(classify_json_error(err));
        }
    };

    json::validate(&raw).map_err(DecodeError::from)
}

fn classify_json_error(err: serde_json::Error) -> DecodeError {
    use serde_json::error::Category::*;
    match err.classify() {
        Syntax | Eof | Io => DecodeError::Parse(err.to_string()),
        // well-formed JSON whose shape doesn't fit the spec structs
        Data => DecodeError::Schema(
            ValidationError::with_details("$".to_owned(), ErrorCode::Generic, err.to_string())
                .into(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel::{Edge, EdgeKind, Space, Zone};

    fn sample_spec() -> BubbleSpec {
        let mut living = Space::new("living", Zone::Public, 25.0);
        living.tags.push("view".to_owned());
        let kitchen = Space::new("kitchen", Zone::Service, 10.0);
        BubbleSpec {
            meta: Default::default(),
            spaces: vec![living, kitchen],
            edges: vec![Edge::new("living", "kitchen", 1.2, EdgeKind::Adjacent)],
        }
    }

    fn raw_token(bytes: &[u8]) -> String {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        general_purpose::URL_SAFE_NO_PAD.encode(encoder.finish().unwrap())
    }

    #[test]
    fn test_roundtrip() {
        let spec = sample_spec();
        let token = encode(&spec).unwrap();
        let back = decode(&token).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode(&sample_spec()).unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "unexpected character in token: {token}"
        );
    }

    #[test]
    fn test_decode_trims_whitespace() {
        let token = encode(&sample_spec()).unwrap();
        let padded = format!("  {token}\n");
        assert_eq!(sample_spec(), decode(&padded).unwrap());
    }

    #[test]
    fn test_decode_bad_base64() {
        let err = decode("not!!legal@@base64").unwrap_err();
        assert!(matches!(err, DecodeError::Transform(_)), "got: {err:?}");
    }

    #[test]
    fn test_decode_bad_deflate() {
        // valid base64 of bytes that are not a deflate stream
        let token = general_purpose::URL_SAFE_NO_PAD.encode(b"definitely not deflate");
        let err = decode(&token).unwrap_err();
        assert!(matches!(err, DecodeError::Transform(_)), "got: {err:?}");
    }

    #[test]
    fn test_decode_bad_json() {
        let token = raw_token(b"{\"spaces\": [");
        let err = decode(&token).unwrap_err();
        assert!(matches!(err, DecodeError::Parse(_)), "got: {err:?}");
    }

    #[test]
    fn test_decode_wrong_shape() {
        // well-formed JSON, wrong type for "spaces"
        let token = raw_token(b"{\"spaces\": 7}");
        let err = decode(&token).unwrap_err();
        match err {
            DecodeError::Schema(errors) => {
                assert_eq!(1, errors.len());
                assert_eq!("$", errors.0[0].path);
            }
            other => panic!("expected schema error, got: {other:?}"),
        }
    }

    #[test]
    fn test_decode_invalid_spec() {
        let token = raw_token(
            br#"{"spaces": [{"id": "living", "zone": "lagoon", "area_target": 25.0}]}"#,
        );
        let err = decode(&token).unwrap_err();
        match err {
            DecodeError::Schema(errors) => {
                assert_eq!("spaces[0].zone", errors.0[0].path);
                assert_eq!(ErrorCode::BadZone, errors.0[0].code);
            }
            other => panic!("expected schema error, got: {other:?}"),
        }
    }
}
