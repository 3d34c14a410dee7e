// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Preset-driven spec generation.
//!
//! [`form_data_to_spec`] expands a room-count selection, user-entered
//! target areas, and the three external-condition flags into a concrete
//! [`BubbleSpec`]: tags from conditions, base adjacency edges with
//! conditional weight boosts, baseline relations, and room areas
//! rescaled to fit the unit budget.  [`prune_spec_to_room_type`] and
//! [`spec_to_form_data`] support switching presets without losing edits.

use std::collections::{BTreeMap, HashSet};

use crate::catalog::{self, RoomTypePreset};
use crate::datamodel::{
    BubbleSpec, Edge, External, FormData, Meta, RoomSlot, RoomType, Space, Zone,
};

/// Target area assumed for a room slot the form left blank.
pub const DEFAULT_SLOT_AREA: f64 = 5.0;

/// Budget-scaling result.  Overflow is non-fatal: the spec is still
/// produced, the caller at most logs it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BudgetOutcome {
    Fit,
    Overflow,
}

/// Scale every room's target area so the total fits the unit budget
/// less the circulation allowance, respecting per-room min/max bounds.
///
/// Clamping can push the total back over budget, so one corrective pass
/// reruns the scale against the clamped sum.  If the total still
/// exceeds 95% of the budget after two passes the outcome is
/// [`BudgetOutcome::Overflow`], logged as a warning; areas are left at
/// whatever the second pass produced.
pub fn scale_room_areas_to_unit_target(
    spaces: &mut [Space],
    unit_target_area_m2: f64,
    allowance_ratio: f64,
) -> BudgetOutcome {
    let sum: f64 = spaces.iter().map(|s| s.area_target).sum();
    if sum <= 0.0 || unit_target_area_m2 <= 0.0 {
        return BudgetOutcome::Fit;
    }

    let usable = unit_target_area_m2 * (1.0 - allowance_ratio);

    rescale_clamped(spaces, usable / sum);
    let mut sum: f64 = spaces.iter().map(|s| s.area_target).sum();

    if sum > 0.95 * unit_target_area_m2 {
        rescale_clamped(spaces, usable / sum);
        sum = spaces.iter().map(|s| s.area_target).sum();
    }

    if sum > 0.95 * unit_target_area_m2 {
        log::warn!(
            "room areas still exceed the unit budget after two rescale passes: {sum:.1} of {unit_target_area_m2:.1} m2"
        );
        BudgetOutcome::Overflow
    } else {
        BudgetOutcome::Fit
    }
}

fn rescale_clamped(spaces: &mut [Space], scale: f64) {
    for space in spaces.iter_mut() {
        let mut area = space.area_target * scale;
        if let Some(min) = space.area_min {
            area = area.max(min);
        }
        if let Some(max) = space.area_max {
            area = area.min(max);
        }
        space.area_target = area;
    }
}

fn tags_for(slot: RoomSlot, external: &External) -> Vec<String> {
    let mut tags = Vec::new();
    if external.scenic_view
        && matches!(
            slot,
            RoomSlot::Living | RoomSlot::MasterBedroom | RoomSlot::Balcony
        )
    {
        tags.push("view".to_owned());
    }
    if external.noise_control && (slot.is_secondary_bedroom() || slot == RoomSlot::Bath) {
        tags.push("noise".to_owned());
    }
    if external.ventilation
        && matches!(
            slot,
            RoomSlot::Living | RoomSlot::Kitchen | RoomSlot::Entryway
        )
    {
        tags.push("vent".to_owned());
    }
    tags
}

fn vent_boosted(a: RoomSlot, b: RoomSlot) -> bool {
    let is_hub = |slot: RoomSlot| matches!(slot, RoomSlot::Living | RoomSlot::Entryway);
    (a.is_bedroom() && is_hub(b)) || (b.is_bedroom() && is_hub(a))
}

fn base_edge_set(preset: &RoomTypePreset, ventilation: bool) -> Vec<Edge> {
    catalog::base_edges()
        .iter()
        .filter(|edge| preset.has_slot(edge.source) && preset.has_slot(edge.target))
        .map(|edge| {
            let mut weight = edge.weight;
            if ventilation && vent_boosted(edge.source, edge.target) {
                weight *= 1.5;
            }
            Edge::new(edge.source.id(), edge.target.id(), weight, edge.kind)
        })
        .collect()
}

/// Expand form data into a concrete spec: preset rooms at the entered
/// areas (scaled to budget), condition tags, baseline relations, the
/// filtered base edge set, and a synthetic `unit` boundary space first
/// in the space list.
pub fn form_data_to_spec(form: &FormData) -> BubbleSpec {
    let preset = catalog::preset_for(form.room_type);
    let external = External {
        scenic_view: form.scenic_view,
        noise_control: form.noise_control,
        ventilation: form.ventilation,
    };

    let mut rooms: Vec<Space> = preset
        .rooms
        .iter()
        .map(|room| {
            let area = form
                .areas
                .get(&room.slot)
                .copied()
                .unwrap_or(DEFAULT_SLOT_AREA);
            let mut space = Space::new(room.slot.id(), room.zone, area);
            space.name = Some(room.name.to_owned());
            space.area_min = room.area_min;
            space.area_max = room.area_max;
            space.tags = tags_for(room.slot, &external);
            space
        })
        .collect();

    scale_room_areas_to_unit_target(
        &mut rooms,
        preset.unit_target_area_m2,
        preset.allowance_ratio,
    );

    for rel in &preset.relations {
        if let Some(space) = rooms.iter_mut().find(|s| s.id == rel.source.id()) {
            space.relations.positive = rel
                .positive
                .iter()
                .filter(|slot| preset.has_slot(**slot))
                .map(|slot| slot.id().to_owned())
                .collect();
            space.relations.negative = rel
                .negative
                .iter()
                .filter(|slot| preset.has_slot(**slot))
                .map(|slot| slot.id().to_owned())
                .collect();
        }
    }

    // the apartment boundary keeps the unscaled budget area
    let mut unit = Space::new("unit", Zone::Unit, preset.unit_target_area_m2);
    unit.name = Some("Unit".to_owned());

    let edges = base_edge_set(preset, form.ventilation);

    let mut spaces = Vec::with_capacity(rooms.len() + 1);
    spaces.push(unit);
    spaces.extend(rooms);

    BubbleSpec {
        meta: Meta {
            title: Some(form.room_type.title().to_owned()),
            author: None,
            external,
        },
        spaces,
        edges,
    }
}

fn looks_like_secondary_bedroom(space: &Space) -> bool {
    if RoomSlot::from_id(&space.id).is_some_and(|slot| slot.is_secondary_bedroom()) {
        return true;
    }
    let name = space.display_name().to_lowercase();
    name.contains("bedroom")
        && ["second", "third", "fourth"]
            .iter()
            .any(|ord| name.contains(ord))
}

/// Restrict a spec to the ids valid for `room_type`, dropping any
/// space, relation entry, or edge that references anything else.  The
/// synthetic `unit` space always survives.  Used when switching
/// room-count presets without discarding edits to shared rooms.
pub fn prune_spec_to_room_type(spec: &mut BubbleSpec, room_type: RoomType) {
    let preset = catalog::preset_for(room_type);

    if room_type == RoomType::One
        && let Some(space) = spec.spaces.iter().find(|s| looks_like_secondary_bedroom(s))
    {
        log::debug!(
            "pruning to a one-bedroom plan but '{}' looks like a secondary bedroom",
            space.id
        );
    }

    let surviving: HashSet<String> = spec
        .spaces
        .iter()
        .filter(|space| space.id == "unit" || preset.contains_id(&space.id))
        .map(|space| space.id.clone())
        .collect();

    spec.spaces.retain(|space| surviving.contains(&space.id));
    for space in spec.spaces.iter_mut() {
        space.relations.positive.retain(|id| surviving.contains(id));
        space.relations.negative.retain(|id| surviving.contains(id));
    }
    spec.edges
        .retain(|edge| surviving.contains(&edge.source) && surviving.contains(&edge.target));
}

/// Recover editable form data from an arbitrary spec.  Counts are tried
/// largest first (each count's slot set contains the smaller ones); the
/// first whose full slot set is present wins, defaulting to two rooms.
/// Slot areas missing from the spec fall back to the winning count's
/// preset defaults.
pub fn spec_to_form_data(spec: &BubbleSpec) -> FormData {
    let ids: HashSet<&str> = spec.spaces.iter().map(|s| s.id.as_str()).collect();

    let room_type = RoomType::ALL
        .iter()
        .rev()
        .find(|rt| {
            let preset = catalog::preset_for(**rt);
            preset.rooms.iter().all(|room| ids.contains(room.slot.id()))
        })
        .copied()
        .unwrap_or_default();

    let preset = catalog::preset_for(room_type);
    let mut areas = BTreeMap::new();
    for room in &preset.rooms {
        let area = spec
            .get_space(room.slot.id())
            .map(|space| space.area_target)
            .unwrap_or(room.default_area);
        areas.insert(room.slot, area);
    }

    FormData {
        room_type,
        areas,
        scenic_view: spec.meta.external.scenic_view,
        noise_control: spec.meta.external.noise_control,
        ventilation: spec.meta.external.ventilation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn form(room_type: RoomType) -> FormData {
        FormData {
            room_type,
            ..Default::default()
        }
    }

    fn total_area(spaces: &[Space]) -> f64 {
        spaces.iter().map(|s| s.area_target).sum()
    }

    #[test]
    fn test_generate_two_rooms_no_conditions() {
        let spec = form_data_to_spec(&form(RoomType::Two));

        assert_eq!(9, spec.spaces.len(), "unit plus the 8 preset rooms");
        assert_eq!("unit", spec.spaces[0].id);
        assert_eq!(Zone::Unit, spec.spaces[0].zone);
        assert_eq!(75.0, spec.spaces[0].area_target, "unit area is unscaled");

        for id in [
            "bed1", "bed2", "living", "dining", "kitchen", "bath", "balcony", "entryway",
        ] {
            assert!(spec.get_space(id).is_some(), "missing room: {id}");
        }

        let edge = spec
            .get_edge("living", "kitchen")
            .expect("living-kitchen edge");
        assert_eq!(1.5, edge.weight, "weight unmultiplied without ventilation");
        assert_eq!(10, spec.edges.len());
        assert!(spec.spaces.iter().all(|s| s.tags.is_empty()));
    }

    #[test]
    fn test_generate_ventilation_boosts_bedroom_edges() {
        let base = form_data_to_spec(&form(RoomType::Two));
        let mut vent_form = form(RoomType::Two);
        vent_form.ventilation = true;
        let vented = form_data_to_spec(&vent_form);

        for (a, b) in [("living", "bed1"), ("living", "bed2")] {
            let before = base.get_edge(a, b).expect("edge").weight;
            let after = vented.get_edge(a, b).expect("edge").weight;
            assert!(
                approx_eq!(f64, after, before * 1.5, ulps = 2),
                "{a}-{b}: {after} should be 1.5x {before}"
            );
        }

        // no bedroom involved, so no boost
        let before = base.get_edge("living", "kitchen").expect("edge").weight;
        let after = vented.get_edge("living", "kitchen").expect("edge").weight;
        assert_eq!(before, after);
        let before = base.get_edge("entryway", "living").expect("edge").weight;
        let after = vented.get_edge("entryway", "living").expect("edge").weight;
        assert_eq!(before, after);
    }

    #[test]
    fn test_generate_tag_mapping() {
        let mut all_on = form(RoomType::Three);
        all_on.scenic_view = true;
        all_on.noise_control = true;
        all_on.ventilation = true;
        let spec = form_data_to_spec(&all_on);

        let tags = |id: &str| spec.get_space(id).expect(id).tags.clone();
        assert_eq!(vec!["view".to_owned(), "vent".to_owned()], tags("living"));
        assert_eq!(vec!["view".to_owned()], tags("bed1"));
        assert_eq!(vec!["view".to_owned()], tags("balcony"));
        assert_eq!(vec!["noise".to_owned()], tags("bed2"));
        assert_eq!(vec!["noise".to_owned()], tags("bed3"));
        assert_eq!(vec!["noise".to_owned()], tags("bath"));
        assert_eq!(vec!["vent".to_owned()], tags("kitchen"));
        assert_eq!(vec!["vent".to_owned()], tags("entryway"));
        assert!(tags("dining").is_empty());
        assert!(spec.meta.external.scenic_view);
    }

    #[test]
    fn test_generate_relations_from_preset() {
        let spec = form_data_to_spec(&form(RoomType::Four));
        let living = spec.get_space("living").expect("living");
        assert_eq!(
            vec!["balcony".to_owned(), "dining".to_owned()],
            living.relations.positive
        );
        let bed4 = spec.get_space("bed4").expect("bed4");
        assert_eq!(
            vec!["kitchen".to_owned(), "entryway".to_owned()],
            bed4.relations.negative
        );
        // bed3/bed4 carry relations but no base edges
        assert!(spec.edges.iter().all(|e| e.source != "bed4" && e.target != "bed4"));
    }

    #[test]
    fn test_scale_down_without_bounds() {
        let mut spaces = vec![
            Space::new("a", Zone::Public, 60.0),
            Space::new("b", Zone::Private, 40.0),
        ];
        let outcome = scale_room_areas_to_unit_target(&mut spaces, 75.0, 0.15);
        assert_eq!(BudgetOutcome::Fit, outcome);
        assert!(
            approx_eq!(f64, 63.75, total_area(&spaces), epsilon = 1e-9),
            "sum should hit the usable budget exactly"
        );
        // proportions preserved
        assert!(approx_eq!(
            f64,
            spaces[0].area_target / spaces[1].area_target,
            1.5,
            epsilon = 1e-9
        ));
    }

    #[test]
    fn test_scale_up_when_under_budget() {
        let mut spaces = vec![
            Space::new("a", Zone::Public, 10.0),
            Space::new("b", Zone::Private, 10.0),
        ];
        let outcome = scale_room_areas_to_unit_target(&mut spaces, 75.0, 0.15);
        assert_eq!(BudgetOutcome::Fit, outcome);
        assert!(approx_eq!(f64, 31.875, spaces[0].area_target, epsilon = 1e-9));
    }

    #[test]
    fn test_scale_noop_on_zero_sum_or_budget() {
        let mut spaces = vec![Space::new("a", Zone::Public, 0.0)];
        assert_eq!(
            BudgetOutcome::Fit,
            scale_room_areas_to_unit_target(&mut spaces, 75.0, 0.15)
        );
        assert_eq!(0.0, spaces[0].area_target);

        let mut spaces = vec![Space::new("a", Zone::Public, 30.0)];
        assert_eq!(
            BudgetOutcome::Fit,
            scale_room_areas_to_unit_target(&mut spaces, 0.0, 0.15)
        );
        assert_eq!(30.0, spaces[0].area_target);
    }

    #[test]
    fn test_scale_overflow_with_tight_minimums() {
        let mut spaces: Vec<Space> = (0..3)
            .map(|i| {
                let mut space = Space::new(format!("r{i}"), Zone::Private, 30.0);
                space.area_min = Some(30.0);
                space
            })
            .collect();
        let outcome = scale_room_areas_to_unit_target(&mut spaces, 45.0, 0.15);
        assert_eq!(BudgetOutcome::Overflow, outcome);
        // minimums held, spec still usable
        assert_eq!(90.0, total_area(&spaces));
    }

    #[test]
    fn test_scale_corrective_pass_converges() {
        // the clamp pushes the first pass to 108.75 of a 100 budget;
        // the corrective pass squeezes the unclamped room back under
        let mut clamped = Space::new("clamped", Zone::Service, 50.0);
        clamped.area_min = Some(45.0);
        let mut spaces = vec![clamped, Space::new("free", Zone::Public, 150.0)];
        let outcome = scale_room_areas_to_unit_target(&mut spaces, 100.0, 0.15);
        assert_eq!(BudgetOutcome::Fit, outcome);
        assert_eq!(45.0, spaces[0].area_target, "clamp holds");
        assert!(
            total_area(&spaces) <= 0.95 * 100.0 + 1e-9,
            "total {} should fit inside 95% of the budget",
            total_area(&spaces)
        );
    }

    #[test]
    fn test_prune_four_to_one() {
        let mut spec = form_data_to_spec(&form(RoomType::Four));
        prune_spec_to_room_type(&mut spec, RoomType::One);

        for id in ["bed2", "bed3", "bed4"] {
            assert!(spec.get_space(id).is_none(), "{id} should be pruned");
            assert!(
                spec.edges.iter().all(|e| e.source != id && e.target != id),
                "edge still references {id}"
            );
            for space in &spec.spaces {
                assert!(!space.relations.positive.iter().any(|r| r == id));
                assert!(!space.relations.negative.iter().any(|r| r == id));
            }
        }
        assert!(spec.get_space("unit").is_some(), "unit always survives");
        assert!(spec.get_space("bed1").is_some());
    }

    #[test]
    fn test_prune_closure_over_arbitrary_specs() {
        let mut garage = Space::new("garage", Zone::Service, 20.0);
        garage.relations.positive.push("living".to_owned());
        let mut living = Space::new("living", Zone::Public, 25.0);
        living.relations.negative.push("garage".to_owned());
        living.relations.positive.push("kitchen".to_owned());
        let mut spec = BubbleSpec {
            meta: Default::default(),
            spaces: vec![garage, living, Space::new("kitchen", Zone::Service, 8.0)],
            edges: vec![
                Edge::new("living", "garage", 1.0, Default::default()),
                Edge::new("living", "kitchen", 1.5, Default::default()),
                // valid slot id for the count, but no such space here
                Edge::new("living", "bed1", 0.8, Default::default()),
            ],
        };
        prune_spec_to_room_type(&mut spec, RoomType::Two);

        let ids: HashSet<&str> = spec.spaces.iter().map(|s| s.id.as_str()).collect();
        assert!(!ids.contains("garage"));
        for edge in &spec.edges {
            assert!(ids.contains(edge.source.as_str()), "dangling {}", edge.source);
            assert!(ids.contains(edge.target.as_str()), "dangling {}", edge.target);
        }
        for space in &spec.spaces {
            for id in space
                .relations
                .positive
                .iter()
                .chain(space.relations.negative.iter())
            {
                assert!(ids.contains(id.as_str()), "dangling relation {id}");
            }
        }
        assert_eq!(1, spec.edges.len(), "only living-kitchen survives");
    }

    #[test]
    fn test_spec_to_form_data_roundtrip() {
        let mut original = form(RoomType::Three);
        original.ventilation = true;
        original
            .areas
            .insert(RoomSlot::Living, 30.0);
        let spec = form_data_to_spec(&original);
        let recovered = spec_to_form_data(&spec);

        assert_eq!(RoomType::Three, recovered.room_type);
        assert!(recovered.ventilation);
        assert!(!recovered.scenic_view);
        // areas come back scaled; the living room stays the largest
        let living = recovered.areas[&RoomSlot::Living];
        let kitchen = recovered.areas[&RoomSlot::Kitchen];
        assert!(living > kitchen);
    }

    #[test]
    fn test_spec_to_form_data_prefers_largest_count() {
        let spec = form_data_to_spec(&form(RoomType::Four));
        assert_eq!(RoomType::Four, spec_to_form_data(&spec).room_type);

        let spec = form_data_to_spec(&form(RoomType::One));
        assert_eq!(RoomType::One, spec_to_form_data(&spec).room_type);
    }

    #[test]
    fn test_spec_to_form_data_defaults_on_no_match() {
        let spec = BubbleSpec::default();
        let form = spec_to_form_data(&spec);
        assert_eq!(RoomType::Two, form.room_type);
        assert_eq!(8, form.areas.len());
        assert_eq!(25.0, form.areas[&RoomSlot::Living], "preset default");
        assert_eq!(5.0, form.areas[&RoomSlot::Bath], "preset default");
    }

    #[test]
    fn test_spec_to_form_data_missing_slot_falls_back() {
        let mut spec = form_data_to_spec(&form(RoomType::Two));
        spec.spaces.retain(|s| s.id != "bath");
        let form = spec_to_form_data(&spec);
        // bath is required by every count, so the default count wins
        assert_eq!(RoomType::Two, form.room_type);
        assert_eq!(5.0, form.areas[&RoomSlot::Bath], "fallback to preset default");
    }
}
