// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Room-count preset catalog.
//!
//! Pure reference data: which room slots each count uses, their default
//! areas and zones, the baseline relation graph, and the per-count unit
//! budget.  This module is the single source of truth for "which room
//! ids are valid for this room count"; everything else goes through
//! [`preset_for`] rather than importing the raw tables.

use lazy_static::lazy_static;

use crate::datamodel::{
    BubbleSpec, Edge, EdgeKind, External, Meta, RoomSlot, RoomType, Space, Zone,
};

/// Fraction of the unit budget reserved for circulation and walls.
pub const DEFAULT_ALLOWANCE_RATIO: f64 = 0.15;

/// One room slot's template: display name, zone, default target area,
/// and optional hard area bounds honored by budget scaling.
#[derive(Clone, Debug)]
pub struct RoomPreset {
    pub slot: RoomSlot,
    pub name: &'static str,
    pub zone: Zone,
    pub default_area: f64,
    pub area_min: Option<f64>,
    pub area_max: Option<f64>,
}

/// Hand-authored soft preferences for one room slot.
#[derive(Clone, Debug)]
pub struct RelationPreset {
    pub source: RoomSlot,
    pub positive: &'static [RoomSlot],
    pub negative: &'static [RoomSlot],
}

/// One baseline adjacency edge between two room slots.
#[derive(Clone, Debug)]
pub struct EdgePreset {
    pub source: RoomSlot,
    pub target: RoomSlot,
    pub weight: f64,
    pub kind: EdgeKind,
}

/// Everything the generator needs for one room count.
#[derive(Clone, Debug)]
pub struct RoomTypePreset {
    pub room_type: RoomType,
    pub rooms: Vec<RoomPreset>,
    pub relations: Vec<RelationPreset>,
    pub unit_target_area_m2: f64,
    pub allowance_ratio: f64,
    pub unit_padding_px: f64,
}

impl RoomTypePreset {
    pub fn has_slot(&self, slot: RoomSlot) -> bool {
        self.rooms.iter().any(|room| room.slot == slot)
    }

    /// True if `id` names a room slot valid for this count.
    pub fn contains_id(&self, id: &str) -> bool {
        RoomSlot::from_id(id).is_some_and(|slot| self.has_slot(slot))
    }

    pub fn room(&self, slot: RoomSlot) -> Option<&RoomPreset> {
        self.rooms.iter().find(|room| room.slot == slot)
    }

    pub fn default_area(&self, slot: RoomSlot) -> Option<f64> {
        self.room(slot).map(|room| room.default_area)
    }
}

const ROOMS: [RoomPreset; 10] = [
    RoomPreset {
        slot: RoomSlot::MasterBedroom,
        name: "Master bedroom",
        zone: Zone::Private,
        default_area: 18.0,
        area_min: None,
        area_max: None,
    },
    RoomPreset {
        slot: RoomSlot::SecondBedroom,
        name: "Second bedroom",
        zone: Zone::Private,
        default_area: 12.0,
        area_min: None,
        area_max: None,
    },
    RoomPreset {
        slot: RoomSlot::ThirdBedroom,
        name: "Third bedroom",
        zone: Zone::Private,
        default_area: 10.0,
        area_min: None,
        area_max: None,
    },
    RoomPreset {
        slot: RoomSlot::FourthBedroom,
        name: "Fourth bedroom",
        zone: Zone::Private,
        default_area: 10.0,
        area_min: None,
        area_max: None,
    },
    RoomPreset {
        slot: RoomSlot::Living,
        name: "Living room",
        zone: Zone::Public,
        default_area: 25.0,
        area_min: None,
        area_max: None,
    },
    RoomPreset {
        slot: RoomSlot::Dining,
        name: "Dining room",
        zone: Zone::Public,
        default_area: 10.0,
        area_min: None,
        area_max: None,
    },
    RoomPreset {
        slot: RoomSlot::Kitchen,
        name: "Kitchen",
        zone: Zone::Service,
        default_area: 8.0,
        area_min: None,
        area_max: None,
    },
    RoomPreset {
        slot: RoomSlot::Bath,
        name: "Bathroom",
        zone: Zone::Service,
        default_area: 5.0,
        area_min: Some(3.0),
        area_max: None,
    },
    RoomPreset {
        slot: RoomSlot::Balcony,
        name: "Balcony",
        zone: Zone::Public,
        default_area: 4.0,
        area_min: None,
        area_max: Some(8.0),
    },
    RoomPreset {
        slot: RoomSlot::Entryway,
        name: "Entryway",
        zone: Zone::Public,
        default_area: 3.0,
        area_min: Some(2.0),
        area_max: None,
    },
];

const RELATIONS: [RelationPreset; 7] = [
    RelationPreset {
        source: RoomSlot::Living,
        positive: &[RoomSlot::Balcony, RoomSlot::Dining],
        negative: &[],
    },
    RelationPreset {
        source: RoomSlot::Kitchen,
        positive: &[RoomSlot::Dining],
        negative: &[],
    },
    RelationPreset {
        source: RoomSlot::MasterBedroom,
        positive: &[RoomSlot::Bath],
        negative: &[RoomSlot::Kitchen],
    },
    RelationPreset {
        source: RoomSlot::SecondBedroom,
        positive: &[],
        negative: &[RoomSlot::Kitchen, RoomSlot::Entryway],
    },
    RelationPreset {
        source: RoomSlot::ThirdBedroom,
        positive: &[],
        negative: &[RoomSlot::Kitchen, RoomSlot::Entryway],
    },
    RelationPreset {
        source: RoomSlot::FourthBedroom,
        positive: &[],
        negative: &[RoomSlot::Kitchen, RoomSlot::Entryway],
    },
    RelationPreset {
        source: RoomSlot::Bath,
        positive: &[],
        negative: &[RoomSlot::Dining],
    },
];

// the 2-room topology; per-count edge sets are filters of this list
const BASE_EDGES: [EdgePreset; 10] = [
    EdgePreset {
        source: RoomSlot::Entryway,
        target: RoomSlot::Living,
        weight: 2.0,
        kind: EdgeKind::Adjacent,
    },
    EdgePreset {
        source: RoomSlot::Living,
        target: RoomSlot::Dining,
        weight: 1.8,
        kind: EdgeKind::Adjacent,
    },
    EdgePreset {
        source: RoomSlot::Living,
        target: RoomSlot::Kitchen,
        weight: 1.5,
        kind: EdgeKind::Near,
    },
    EdgePreset {
        source: RoomSlot::Dining,
        target: RoomSlot::Kitchen,
        weight: 1.6,
        kind: EdgeKind::Adjacent,
    },
    EdgePreset {
        source: RoomSlot::Living,
        target: RoomSlot::MasterBedroom,
        weight: 0.8,
        kind: EdgeKind::Near,
    },
    EdgePreset {
        source: RoomSlot::Living,
        target: RoomSlot::SecondBedroom,
        weight: 0.8,
        kind: EdgeKind::Near,
    },
    EdgePreset {
        source: RoomSlot::Living,
        target: RoomSlot::Balcony,
        weight: 1.2,
        kind: EdgeKind::Adjacent,
    },
    EdgePreset {
        source: RoomSlot::MasterBedroom,
        target: RoomSlot::Bath,
        weight: 1.0,
        kind: EdgeKind::Near,
    },
    EdgePreset {
        source: RoomSlot::SecondBedroom,
        target: RoomSlot::Bath,
        weight: 0.9,
        kind: EdgeKind::Near,
    },
    EdgePreset {
        source: RoomSlot::Kitchen,
        target: RoomSlot::Bath,
        weight: 0.4,
        kind: EdgeKind::Separate,
    },
];

fn allows(room_type: RoomType, slot: RoomSlot) -> bool {
    match slot {
        RoomSlot::SecondBedroom => room_type.as_count() >= 2,
        RoomSlot::ThirdBedroom => room_type.as_count() >= 3,
        RoomSlot::FourthBedroom => room_type.as_count() >= 4,
        _ => true,
    }
}

fn build_preset(room_type: RoomType) -> RoomTypePreset {
    let rooms = ROOMS
        .iter()
        .filter(|room| allows(room_type, room.slot))
        .cloned()
        .collect();
    let relations = RELATIONS
        .iter()
        .filter(|rel| allows(room_type, rel.source))
        .cloned()
        .collect();
    let (unit_target_area_m2, unit_padding_px) = match room_type {
        RoomType::One => (45.0, 24.0),
        RoomType::Two => (75.0, 28.0),
        RoomType::Three => (95.0, 32.0),
        RoomType::Four => (120.0, 36.0),
    };

    RoomTypePreset {
        room_type,
        rooms,
        relations,
        unit_target_area_m2,
        allowance_ratio: DEFAULT_ALLOWANCE_RATIO,
        unit_padding_px,
    }
}

lazy_static! {
    static ref PRESETS: [RoomTypePreset; 4] = [
        build_preset(RoomType::One),
        build_preset(RoomType::Two),
        build_preset(RoomType::Three),
        build_preset(RoomType::Four),
    ];
}

pub fn preset_for(room_type: RoomType) -> &'static RoomTypePreset {
    &PRESETS[(room_type.as_count() - 1) as usize]
}

pub fn base_edges() -> &'static [EdgePreset] {
    &BASE_EDGES
}

/// The built-in default diagram for a room count: preset rooms at their
/// default areas, baseline relations, and the filtered base edge set.
/// No synthetic `unit` space and no scaling; that is generator work.
pub fn standard_spec(room_type: RoomType) -> BubbleSpec {
    let preset = preset_for(room_type);

    let mut spaces: Vec<Space> = preset
        .rooms
        .iter()
        .map(|room| {
            let mut space = Space::new(room.slot.id(), room.zone, room.default_area);
            space.name = Some(room.name.to_owned());
            space.area_min = room.area_min;
            space.area_max = room.area_max;
            space
        })
        .collect();

    for rel in &preset.relations {
        if let Some(space) = spaces.iter_mut().find(|s| s.id == rel.source.id()) {
            space.relations.positive = rel.positive.iter().map(|s| s.id().to_owned()).collect();
            space.relations.negative = rel.negative.iter().map(|s| s.id().to_owned()).collect();
        }
    }

    let edges = BASE_EDGES
        .iter()
        .filter(|edge| preset.has_slot(edge.source) && preset.has_slot(edge.target))
        .map(|edge| Edge::new(edge.source.id(), edge.target.id(), edge.weight, edge.kind))
        .collect();

    BubbleSpec {
        meta: Meta {
            title: Some(room_type.title().to_owned()),
            author: None,
            external: External::default(),
        },
        spaces,
        edges,
    }
}
