// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError,      // will never be produced
    DoesNotExist, // the named entity doesn't exist
    MissingField,
    BadZone,
    BadEdgeKind,
    BadRoomCount,
    NegativeArea,
    BadAreaBounds,
    NegativeWeight,
    DuplicateSpace,
    SelfRelation,
    TokenTransform,
    TokenParse,
    TokenSchema,
    Generic,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            DoesNotExist => "does_not_exist",
            MissingField => "missing_field",
            BadZone => "bad_zone",
            BadEdgeKind => "bad_edge_kind",
            BadRoomCount => "bad_room_count",
            NegativeArea => "negative_area",
            BadAreaBounds => "bad_area_bounds",
            NegativeWeight => "negative_weight",
            DuplicateSpace => "duplicate_space",
            SelfRelation => "self_relation",
            TokenTransform => "token_transform",
            TokenParse => "token_parse",
            TokenSchema => "token_schema",
            Generic => "generic",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Spec,
    Generation,
    Layout,
    Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl From<Box<dyn std::error::Error>> for Error {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        Error {
            kind: ErrorKind::Generation,
            code: ErrorCode::Generic,
            details: Some(err.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Spec => "SpecError",
            ErrorKind::Generation => "GenerationError",
            ErrorKind::Layout => "LayoutError",
            ErrorKind::Token => "TokenError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

/// A single schema violation, located by a dotted path into the JSON
/// document (e.g. `spaces[2].zone`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValidationError {
    pub path: String,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, code: ErrorCode) -> Self {
        ValidationError {
            path: path.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(path: impl Into<String>, code: ErrorCode, details: impl Into<String>) -> Self {
        ValidationError {
            path: path.into(),
            code,
            details: Some(details.into()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.details {
            Some(ref details) => write!(f, "{}:{}: {}", self.path, self.code, details),
            None => write!(f, "{}:{}", self.path, self.code),
        }
    }
}

/// All violations found in one validation pass; never empty when returned
/// as an `Err`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        ValidationErrors(vec![err])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl error::Error for ValidationErrors {}

/// Why a share token failed to decode.  Callers keep their previously
/// loaded spec on any of these; none is fatal.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodeError {
    /// The base64 or inflate stage failed: the token is corrupt or truncated.
    Transform(String),
    /// The transform succeeded but the payload is not well-formed JSON.
    Parse(String),
    /// The payload parsed but the spec is invalid.
    Schema(ValidationErrors),
}

impl DecodeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::Transform(_) => ErrorCode::TokenTransform,
            DecodeError::Parse(_) => ErrorCode::TokenParse,
            DecodeError::Schema(_) => ErrorCode::TokenSchema,
        }
    }
}

impl From<ValidationErrors> for DecodeError {
    fn from(errors: ValidationErrors) -> Self {
        DecodeError::Schema(errors)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::Transform(details) => write!(f, "{}: {}", self.code(), details),
            DecodeError::Parse(details) => write!(f, "{}: {}", self.code(), details),
            DecodeError::Schema(errors) => write!(f, "{}: {}", self.code(), errors),
        }
    }
}

impl error::Error for DecodeError {}

#[test]
fn test_error_display() {
    let err = Error::new(ErrorKind::Spec, ErrorCode::BadZone, None);
    assert_eq!("SpecError{bad_zone}", format!("{err}"));

    let err = Error::new(
        ErrorKind::Token,
        ErrorCode::TokenTransform,
        Some("truncated".to_owned()),
    );
    assert_eq!("TokenError{token_transform: truncated}", format!("{err}"));
}

#[test]
fn test_validation_error_display() {
    let err = ValidationError::new("spaces[2].zone", ErrorCode::BadZone);
    assert_eq!("spaces[2].zone:bad_zone", format!("{err}"));

    let err = ValidationError::with_details("edges[0].weight", ErrorCode::NegativeWeight, "-1");
    assert_eq!("edges[0].weight:negative_weight: -1", format!("{err}"));

    let errors = ValidationErrors(vec![
        ValidationError::new("spaces[0].id", ErrorCode::MissingField),
        ValidationError::new("spaces[1].zone", ErrorCode::BadZone),
    ]);
    assert_eq!(
        "spaces[0].id:missing_field; spaces[1].zone:bad_zone",
        format!("{errors}")
    );
}

#[test]
fn test_decode_error_codes() {
    assert_eq!(
        ErrorCode::TokenTransform,
        DecodeError::Transform("bad".to_owned()).code()
    );
    assert_eq!(
        ErrorCode::TokenParse,
        DecodeError::Parse("bad".to_owned()).code()
    );
    assert_eq!(
        ErrorCode::TokenSchema,
        DecodeError::Schema(ValidationErrors::default()).code()
    );
}
