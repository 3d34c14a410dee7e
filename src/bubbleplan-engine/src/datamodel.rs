// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeMap;
use std::fmt;

pub type SpaceId = String;

/// Coarse room category, used for coloring and room-count slot matching.
/// `Unit` is reserved for the synthetic apartment-boundary space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    Public,
    Private,
    Service,
    Unit,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Public => "public",
            Zone::Private => "private",
            Zone::Service => "service",
            Zone::Unit => "unit",
        }
    }

    pub fn parse(s: &str) -> Option<Zone> {
        match s {
            "public" => Some(Zone::Public),
            "private" => Some(Zone::Private),
            "service" => Some(Zone::Service),
            "unit" => Some(Zone::Unit),
            _ => None,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Adjacency-link flavor; a rendering/semantic hint, not a constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Adjacent,
    Near,
    Separate,
    Avoid,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Adjacent => "adjacent",
            EdgeKind::Near => "near",
            EdgeKind::Separate => "separate",
            EdgeKind::Avoid => "avoid",
        }
    }

    pub fn parse(s: &str) -> Option<EdgeKind> {
        match s {
            "adjacent" => Some(EdgeKind::Adjacent),
            "near" => Some(EdgeKind::Near),
            "separate" => Some(EdgeKind::Separate),
            "avoid" => Some(EdgeKind::Avoid),
            _ => None,
        }
    }
}

impl Default for EdgeKind {
    fn default() -> Self {
        EdgeKind::Near
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Soft spatial preferences: ids this room should be drawn near
/// (`positive`) or far from (`negative`).  Distinct from rendered edges.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Relations {
    pub positive: Vec<SpaceId>,
    pub negative: Vec<SpaceId>,
}

impl Relations {
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

/// One room (or the synthetic `unit` boundary).
#[derive(Clone, Debug, PartialEq)]
pub struct Space {
    pub id: SpaceId,
    pub name: Option<String>,
    pub area_target: f64,
    pub zone: Zone,
    pub tags: Vec<String>,
    pub relations: Relations,
    pub area_min: Option<f64>,
    pub area_max: Option<f64>,
    pub meta: BTreeMap<String, String>,
}

impl Space {
    pub fn new(id: impl Into<SpaceId>, zone: Zone, area_target: f64) -> Self {
        Space {
            id: id.into(),
            name: None,
            area_target,
            zone,
            tags: Vec::new(),
            relations: Relations::default(),
            area_min: None,
            area_max: None,
            meta: BTreeMap::new(),
        }
    }

    /// Display label; falls back to the id when no name is set.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Stored directed, rendered undirected.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source: SpaceId,
    pub target: SpaceId,
    pub weight: f64,
    pub kind: EdgeKind,
    pub meta: BTreeMap<String, String>,
}

impl Edge {
    pub fn new(source: impl Into<SpaceId>, target: impl Into<SpaceId>, weight: f64, kind: EdgeKind) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
            weight,
            kind,
            meta: BTreeMap::new(),
        }
    }

    /// True if the edge joins `a` and `b` in either storage direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// External site conditions; each drives a fixed tag assignment during
/// generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct External {
    pub scenic_view: bool,
    pub noise_control: bool,
    pub ventilation: bool,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Meta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub external: External,
}

/// Root aggregate: everything a bubble diagram needs.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BubbleSpec {
    pub meta: Meta,
    pub spaces: Vec<Space>,
    pub edges: Vec<Edge>,
}

impl BubbleSpec {
    pub fn get_space(&self, id: &str) -> Option<&Space> {
        self.spaces.iter().find(|s| s.id == id)
    }

    pub fn get_space_mut(&mut self, id: &str) -> Option<&mut Space> {
        self.spaces.iter_mut().find(|s| s.id == id)
    }

    pub fn get_edge(&self, a: &str, b: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.connects(a, b))
    }
}

/// Room-count preset selector, 1 through 4 bedrooms.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomType {
    One,
    Two,
    Three,
    Four,
}

impl RoomType {
    pub const ALL: [RoomType; 4] = [RoomType::One, RoomType::Two, RoomType::Three, RoomType::Four];

    pub fn as_count(&self) -> u8 {
        match self {
            RoomType::One => 1,
            RoomType::Two => 2,
            RoomType::Three => 3,
            RoomType::Four => 4,
        }
    }

    pub fn from_count(count: u8) -> Option<RoomType> {
        match count {
            1 => Some(RoomType::One),
            2 => Some(RoomType::Two),
            3 => Some(RoomType::Three),
            4 => Some(RoomType::Four),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RoomType::One => "One-bedroom plan",
            RoomType::Two => "Two-bedroom plan",
            RoomType::Three => "Three-bedroom plan",
            RoomType::Four => "Four-bedroom plan",
        }
    }
}

impl Default for RoomType {
    fn default() -> Self {
        RoomType::Two
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// The ten canonical room slots a preset can populate.  Each has a
/// stable string id used in specs, edges, and the share format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomSlot {
    MasterBedroom,
    SecondBedroom,
    ThirdBedroom,
    FourthBedroom,
    Living,
    Dining,
    Kitchen,
    Bath,
    Balcony,
    Entryway,
}

impl RoomSlot {
    pub const ALL: [RoomSlot; 10] = [
        RoomSlot::MasterBedroom,
        RoomSlot::SecondBedroom,
        RoomSlot::ThirdBedroom,
        RoomSlot::FourthBedroom,
        RoomSlot::Living,
        RoomSlot::Dining,
        RoomSlot::Kitchen,
        RoomSlot::Bath,
        RoomSlot::Balcony,
        RoomSlot::Entryway,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            RoomSlot::MasterBedroom => "bed1",
            RoomSlot::SecondBedroom => "bed2",
            RoomSlot::ThirdBedroom => "bed3",
            RoomSlot::FourthBedroom => "bed4",
            RoomSlot::Living => "living",
            RoomSlot::Dining => "dining",
            RoomSlot::Kitchen => "kitchen",
            RoomSlot::Bath => "bath",
            RoomSlot::Balcony => "balcony",
            RoomSlot::Entryway => "entryway",
        }
    }

    pub fn from_id(s: &str) -> Option<RoomSlot> {
        match s {
            "bed1" => Some(RoomSlot::MasterBedroom),
            "bed2" => Some(RoomSlot::SecondBedroom),
            "bed3" => Some(RoomSlot::ThirdBedroom),
            "bed4" => Some(RoomSlot::FourthBedroom),
            "living" => Some(RoomSlot::Living),
            "dining" => Some(RoomSlot::Dining),
            "kitchen" => Some(RoomSlot::Kitchen),
            "bath" => Some(RoomSlot::Bath),
            "balcony" => Some(RoomSlot::Balcony),
            "entryway" => Some(RoomSlot::Entryway),
            _ => None,
        }
    }

    pub fn is_bedroom(&self) -> bool {
        matches!(
            self,
            RoomSlot::MasterBedroom
                | RoomSlot::SecondBedroom
                | RoomSlot::ThirdBedroom
                | RoomSlot::FourthBedroom
        )
    }

    pub fn is_secondary_bedroom(&self) -> bool {
        matches!(
            self,
            RoomSlot::SecondBedroom | RoomSlot::ThirdBedroom | RoomSlot::FourthBedroom
        )
    }
}

/// The editable surface behind the form: a room-count selector, one
/// target area per slot (absent entries fall back during generation),
/// and the three external-condition flags.
#[derive(Clone, Debug, PartialEq)]
pub struct FormData {
    pub room_type: RoomType,
    pub areas: BTreeMap<RoomSlot, f64>,
    pub scenic_view: bool,
    pub noise_control: bool,
    pub ventilation: bool,
}

impl Default for FormData {
    fn default() -> Self {
        FormData {
            room_type: RoomType::default(),
            areas: BTreeMap::new(),
            scenic_view: false,
            noise_control: false,
            ventilation: false,
        }
    }
}

#[test]
fn test_zone_round_trip() {
    for zone in [Zone::Public, Zone::Private, Zone::Service, Zone::Unit] {
        assert_eq!(Some(zone), Zone::parse(zone.as_str()));
    }
    assert_eq!(None, Zone::parse("atrium"));
    assert_eq!(None, Zone::parse(""));
}

#[test]
fn test_edge_kind_round_trip() {
    for kind in [
        EdgeKind::Adjacent,
        EdgeKind::Near,
        EdgeKind::Separate,
        EdgeKind::Avoid,
    ] {
        assert_eq!(Some(kind), EdgeKind::parse(kind.as_str()));
    }
    assert_eq!(None, EdgeKind::parse("touching"));
}

#[test]
fn test_room_type_counts() {
    for rt in RoomType::ALL {
        assert_eq!(Some(rt), RoomType::from_count(rt.as_count()));
    }
    assert_eq!(None, RoomType::from_count(0));
    assert_eq!(None, RoomType::from_count(5));
}

#[test]
fn test_room_slot_ids() {
    for slot in RoomSlot::ALL {
        assert_eq!(Some(slot), RoomSlot::from_id(slot.id()));
    }
    assert_eq!(None, RoomSlot::from_id("bed5"));
    assert!(RoomSlot::MasterBedroom.is_bedroom());
    assert!(!RoomSlot::MasterBedroom.is_secondary_bedroom());
    assert!(RoomSlot::ThirdBedroom.is_secondary_bedroom());
    assert!(!RoomSlot::Kitchen.is_bedroom());
}

#[test]
fn test_space_display_name() {
    let mut space = Space::new("bed1", Zone::Private, 18.0);
    assert_eq!("bed1", space.display_name());
    space.name = Some("Master Bedroom".to_owned());
    assert_eq!("Master Bedroom", space.display_name());
}

#[test]
fn test_edge_connects_both_directions() {
    let edge = Edge::new("living", "kitchen", 1.5, EdgeKind::Near);
    assert!(edge.connects("living", "kitchen"));
    assert!(edge.connects("kitchen", "living"));
    assert!(!edge.connects("living", "bath"));
}
