// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! JSON interchange for bubble specs.
//!
//! Mirrors the wire shape used by the web client: tolerant on read
//! (missing or null fields default), strict on write (default-valued
//! fields are skipped).  [`validate`] is the only path from interchange
//! structs to the typed datamodel; it checks structure and types but
//! deliberately not referential integrity — dangling edge and relation
//! ids are tolerated and skipped downstream.
//!
//! # Example
//! ```no_run
//! use bubbleplan_engine::json;
//!
//! let json_str = r#"{"spaces": [{"id": "living", "zone": "public", "area_target": 25}]}"#;
//! let raw: json::BubbleSpec = serde_json::from_str(json_str)?;
//! let spec: bubbleplan_engine::datamodel::BubbleSpec = json::validate(&raw)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::common::{ErrorCode, ValidationError, ValidationErrors};
use crate::datamodel;

// Helper functions for serde skip_serializing_if

fn is_false(val: &bool) -> bool {
    !*val
}

fn is_one_f64(val: &f64) -> bool {
    *val == 1.0
}

fn is_empty_string(val: &str) -> bool {
    val.is_empty()
}

fn is_empty_vec<T>(val: &[T]) -> bool {
    val.is_empty()
}

fn is_empty_map(val: &BTreeMap<String, String>) -> bool {
    val.is_empty()
}

fn is_default_relations(val: &Relations) -> bool {
    *val == Relations::default()
}

fn is_default_meta(val: &Meta) -> bool {
    *val == Meta::default()
}

fn is_default_external(val: &External) -> bool {
    *val == External::default()
}

fn one_f64() -> f64 {
    1.0
}

fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Relations {
    #[serde(
        skip_serializing_if = "is_empty_vec",
        default,
        deserialize_with = "deserialize_null_default"
    )]
    pub positive: Vec<String>,
    #[serde(
        skip_serializing_if = "is_empty_vec",
        default,
        deserialize_with = "deserialize_null_default"
    )]
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Space {
    #[serde(default)]
    pub id: String,
    #[serde(skip_serializing_if = "is_empty_string", default)]
    pub name: String,
    #[serde(default)]
    pub area_target: f64,
    #[serde(default)]
    pub zone: String,
    #[serde(
        skip_serializing_if = "is_empty_vec",
        default,
        deserialize_with = "deserialize_null_default"
    )]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "is_default_relations", default)]
    pub relations: Relations,
    #[serde(rename = "areaMin", skip_serializing_if = "Option::is_none", default)]
    pub area_min: Option<f64>,
    #[serde(rename = "areaMax", skip_serializing_if = "Option::is_none", default)]
    pub area_max: Option<f64>,
    #[serde(skip_serializing_if = "is_empty_map", default)]
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Edge {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
    #[serde(skip_serializing_if = "is_one_f64", default = "one_f64")]
    pub weight: f64,
    #[serde(rename = "type", skip_serializing_if = "is_empty_string", default)]
    pub kind: String,
    #[serde(skip_serializing_if = "is_empty_map", default)]
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct External {
    #[serde(rename = "scenicView", skip_serializing_if = "is_false", default)]
    pub scenic_view: bool,
    #[serde(rename = "noiseControl", skip_serializing_if = "is_false", default)]
    pub noise_control: bool,
    #[serde(skip_serializing_if = "is_false", default)]
    pub ventilation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Meta {
    #[serde(skip_serializing_if = "is_empty_string", default)]
    pub title: String,
    #[serde(skip_serializing_if = "is_empty_string", default)]
    pub author: String,
    #[serde(skip_serializing_if = "is_default_external", default)]
    pub external: External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BubbleSpec {
    #[serde(skip_serializing_if = "is_default_meta", default)]
    pub meta: Meta,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub spaces: Vec<Space>,
    #[serde(
        skip_serializing_if = "is_empty_vec",
        default,
        deserialize_with = "deserialize_null_default"
    )]
    pub edges: Vec<Edge>,
}

// Datamodel -> JSON conversions (infallible)

impl From<&datamodel::Relations> for Relations {
    fn from(relations: &datamodel::Relations) -> Self {
        Relations {
            positive: relations.positive.clone(),
            negative: relations.negative.clone(),
        }
    }
}

impl From<&datamodel::Space> for Space {
    fn from(space: &datamodel::Space) -> Self {
        Space {
            id: space.id.clone(),
            name: space.name.clone().unwrap_or_default(),
            area_target: space.area_target,
            zone: space.zone.as_str().to_owned(),
            tags: space.tags.clone(),
            relations: (&space.relations).into(),
            area_min: space.area_min,
            area_max: space.area_max,
            meta: space.meta.clone(),
        }
    }
}

impl From<&datamodel::Edge> for Edge {
    fn from(edge: &datamodel::Edge) -> Self {
        Edge {
            source: edge.source.clone(),
            target: edge.target.clone(),
            weight: edge.weight,
            kind: edge.kind.as_str().to_owned(),
            meta: edge.meta.clone(),
        }
    }
}

impl From<&datamodel::Meta> for Meta {
    fn from(meta: &datamodel::Meta) -> Self {
        Meta {
            title: meta.title.clone().unwrap_or_default(),
            author: meta.author.clone().unwrap_or_default(),
            external: External {
                scenic_view: meta.external.scenic_view,
                noise_control: meta.external.noise_control,
                ventilation: meta.external.ventilation,
            },
        }
    }
}

impl From<&datamodel::BubbleSpec> for BubbleSpec {
    fn from(spec: &datamodel::BubbleSpec) -> Self {
        BubbleSpec {
            meta: (&spec.meta).into(),
            spaces: spec.spaces.iter().map(Space::from).collect(),
            edges: spec.edges.iter().map(Edge::from).collect(),
        }
    }
}

/// Validate an interchange spec and convert it to the typed datamodel.
///
/// Structural and type-level checks only: enum membership, numeric lower
/// bounds, required fields, duplicate space ids, self-relations.  All
/// violations are collected; no partial spec is returned on failure.
/// Edge and relation ids are NOT checked against the space list.
pub fn validate(raw: &BubbleSpec) -> Result<datamodel::BubbleSpec, ValidationErrors> {
    let mut errors: Vec<ValidationError> = Vec::new();

    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut spaces: Vec<datamodel::Space> = Vec::with_capacity(raw.spaces.len());
    for (i, space) in raw.spaces.iter().enumerate() {
        if space.id.is_empty() {
            errors.push(ValidationError::new(
                format!("spaces[{i}].id"),
                ErrorCode::MissingField,
            ));
        } else if !seen_ids.insert(&space.id) {
            errors.push(ValidationError::with_details(
                format!("spaces[{i}].id"),
                ErrorCode::DuplicateSpace,
                space.id.clone(),
            ));
        }

        let zone = if space.zone.is_empty() {
            errors.push(ValidationError::new(
                format!("spaces[{i}].zone"),
                ErrorCode::MissingField,
            ));
            datamodel::Zone::Public
        } else {
            match datamodel::Zone::parse(&space.zone) {
                Some(zone) => zone,
                None => {
                    errors.push(ValidationError::with_details(
                        format!("spaces[{i}].zone"),
                        ErrorCode::BadZone,
                        space.zone.clone(),
                    ));
                    datamodel::Zone::Public
                }
            }
        };

        if space.area_target < 0.0 {
            errors.push(ValidationError::with_details(
                format!("spaces[{i}].area_target"),
                ErrorCode::NegativeArea,
                format!("{}", space.area_target),
            ));
        }
        if let Some(min) = space.area_min
            && min < 0.0
        {
            errors.push(ValidationError::with_details(
                format!("spaces[{i}].areaMin"),
                ErrorCode::NegativeArea,
                format!("{min}"),
            ));
        }
        if let Some(max) = space.area_max
            && max < 0.0
        {
            errors.push(ValidationError::with_details(
                format!("spaces[{i}].areaMax"),
                ErrorCode::NegativeArea,
                format!("{max}"),
            ));
        }
        if let (Some(min), Some(max)) = (space.area_min, space.area_max)
            && min > max
        {
            errors.push(ValidationError::with_details(
                format!("spaces[{i}].areaMin"),
                ErrorCode::BadAreaBounds,
                format!("min {min} > max {max}"),
            ));
        }

        if !space.id.is_empty() {
            if space.relations.positive.iter().any(|id| *id == space.id) {
                errors.push(ValidationError::with_details(
                    format!("spaces[{i}].relations.positive"),
                    ErrorCode::SelfRelation,
                    space.id.clone(),
                ));
            }
            if space.relations.negative.iter().any(|id| *id == space.id) {
                errors.push(ValidationError::with_details(
                    format!("spaces[{i}].relations.negative"),
                    ErrorCode::SelfRelation,
                    space.id.clone(),
                ));
            }
        }

        spaces.push(datamodel::Space {
            id: space.id.clone(),
            name: if space.name.is_empty() {
                None
            } else {
                Some(space.name.clone())
            },
            area_target: space.area_target,
            zone,
            tags: space.tags.clone(),
            relations: datamodel::Relations {
                positive: space.relations.positive.clone(),
                negative: space.relations.negative.clone(),
            },
            area_min: space.area_min,
            area_max: space.area_max,
            meta: space.meta.clone(),
        });
    }

    let mut edges: Vec<datamodel::Edge> = Vec::with_capacity(raw.edges.len());
    for (i, edge) in raw.edges.iter().enumerate() {
        if edge.source.is_empty() {
            errors.push(ValidationError::new(
                format!("edges[{i}].source"),
                ErrorCode::MissingField,
            ));
        }
        if edge.target.is_empty() {
            errors.push(ValidationError::new(
                format!("edges[{i}].target"),
                ErrorCode::MissingField,
            ));
        }
        if edge.weight < 0.0 {
            errors.push(ValidationError::with_details(
                format!("edges[{i}].weight"),
                ErrorCode::NegativeWeight,
                format!("{}", edge.weight),
            ));
        }

        // an absent kind reads as the default; only a present-but-unknown
        // value is an error
        let kind = if edge.kind.is_empty() {
            datamodel::EdgeKind::default()
        } else {
            match datamodel::EdgeKind::parse(&edge.kind) {
                Some(kind) => kind,
                None => {
                    errors.push(ValidationError::with_details(
                        format!("edges[{i}].type"),
                        ErrorCode::BadEdgeKind,
                        edge.kind.clone(),
                    ));
                    datamodel::EdgeKind::default()
                }
            }
        };

        edges.push(datamodel::Edge {
            source: edge.source.clone(),
            target: edge.target.clone(),
            weight: edge.weight,
            kind,
            meta: edge.meta.clone(),
        });
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    Ok(datamodel::BubbleSpec {
        meta: datamodel::Meta {
            title: if raw.meta.title.is_empty() {
                None
            } else {
                Some(raw.meta.title.clone())
            },
            author: if raw.meta.author.is_empty() {
                None
            } else {
                Some(raw.meta.author.clone())
            },
            external: datamodel::External {
                scenic_view: raw.meta.external.scenic_view,
                noise_control: raw.meta.external.noise_control,
                ventilation: raw.meta.external.ventilation,
            },
        },
        spaces,
        edges,
    })
}
