// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Share links: packing a spec into a URL query and resolving one back
//! out.  A link carries an `s` parameter with the compact token from
//! [`crate::token`] and optionally a `roomType` preset hint; resolution
//! prefers the token and falls back to the preset when the token is
//! absent or unreadable.

use crate::catalog::standard_spec;
use crate::common::Result;
use crate::datamodel::{BubbleSpec, RoomType};
use crate::generate::spec_to_form_data;
use crate::token;

/// The share-relevant parameters of a URL query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShareQuery {
    pub room_type: Option<RoomType>,
    pub token: Option<String>,
}

/// Pull the share parameters out of a raw query string, with or
/// without its leading `?`.  Unknown keys and unparseable values are
/// ignored; `rt` is the short alias for `roomType` and wins when both
/// appear.
pub fn parse_query(query: &str) -> ShareQuery {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut rt: Option<RoomType> = None;
    let mut room_type: Option<RoomType> = None;
    let mut token: Option<String> = None;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "rt" | "roomType" => {
                let parsed = value.parse::<u8>().ok().and_then(RoomType::from_count);
                if key == "rt" {
                    rt = rt.or(parsed);
                } else {
                    room_type = room_type.or(parsed);
                }
            }
            "s" if !value.is_empty() => {
                token = Some(value.to_owned());
            }
            _ => {}
        }
    }

    ShareQuery {
        room_type: rt.or(room_type),
        token,
    }
}

/// Turn a parsed query into the spec to show.  A decodable token wins
/// outright, with the room type inferred from its slots; otherwise the
/// preset for the requested (or default) room type is generated fresh.
pub fn resolve_spec(query: &ShareQuery) -> (BubbleSpec, RoomType) {
    let preset = query.room_type.unwrap_or_default();
    if let Some(raw) = &query.token {
        match token::decode(raw) {
            Ok(spec) => {
                let inferred = spec_to_form_data(&spec).room_type;
                return (spec, inferred);
            }
            Err(err) => {
                log::debug!("ignoring unusable share token: {}", err);
            }
        }
    }
    (standard_spec(preset), preset)
}

/// Build a share URL for `spec`.  The token is URL-safe by
/// construction so nothing needs percent-encoding.
pub fn share_url(
    origin: &str,
    path: &str,
    spec: &BubbleSpec,
    room_type: Option<RoomType>,
) -> Result<String> {
    let token = token::encode(spec)?;
    let mut url = format!("{}{}?s={}", origin, path, token);
    if let Some(rt) = room_type {
        url.push_str(&format!("&roomType={}", rt.as_count()));
    }
    Ok(url)
}
