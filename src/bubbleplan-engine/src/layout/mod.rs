// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Constraint-aware force-directed layout.
//!
//! The composer translates a spec's spaces, edges, and relations into
//! typed nodes, links, and named forces on the particle simulation:
//! circle collision, link attraction, negative-relation repulsion, and
//! axis pinning for tagged rooms.  The result is an approximate, stable
//! equilibrium, not a solved floor plan.

pub mod forces;
pub mod sim;
pub mod view;

use std::collections::HashSet;

use crate::datamodel::{BubbleSpec, SpaceId};

use self::sim::Simulation;

pub const COLLIDE_PADDING: f64 = 4.0;
pub const COLLIDE_ITERATIONS: usize = 3;
pub const ATTRACT_DISTANCE: f64 = 90.0;
pub const ATTRACT_STRENGTH: f64 = 0.4;
pub const REPEL_DISTANCE: f64 = 180.0;
pub const DEFAULT_REPEL_STRENGTH: f64 = 0.6;
pub const PIN_OFFSET: f64 = 240.0;

/// One simulated circle.  `pinned_x` fixes the horizontal axis; the
/// vertical axis always integrates freely.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: SpaceId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub pinned_x: Option<f64>,
}

impl LayoutNode {
    /// A node with no position yet; the simulation places it when the
    /// node array is installed.
    pub fn new(id: impl Into<SpaceId>, radius: f64) -> Self {
        LayoutNode {
            id: id.into(),
            x: f64::NAN,
            y: f64::NAN,
            vx: 0.0,
            vy: 0.0,
            radius,
            pinned_x: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LinkKind {
    /// A rendered adjacency edge.
    Adjacency,
    /// An auxiliary attraction edge from a positive relation; it takes
    /// part in the link force but is never drawn.
    Relation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutLink {
    pub source_id: SpaceId,
    pub target_id: SpaceId,
    pub weight: f64,
    pub kind: LinkKind,
}

/// Translates the relational part of a spec into forces on the
/// simulation.  Owns nothing of the simulation itself; every spec or
/// relation edit goes through [`ForceComposer::install`] again.
pub struct ForceComposer {
    repel_strength: f64,
    links: Vec<LayoutLink>,
}

impl Default for ForceComposer {
    fn default() -> Self {
        ForceComposer::new()
    }
}

impl ForceComposer {
    pub fn new() -> Self {
        ForceComposer {
            repel_strength: DEFAULT_REPEL_STRENGTH,
            links: Vec::new(),
        }
    }

    /// The link set derived by the last install: adjacency links for
    /// rendering plus the auxiliary relation links.
    pub fn links(&self) -> &[LayoutLink] {
        &self.links
    }

    pub fn repel_strength(&self) -> f64 {
        self.repel_strength
    }

    /// Adjust how hard negatively related rooms push apart.  Takes
    /// effect on the next install.
    pub fn set_repel_strength(&mut self, strength: f64) {
        self.repel_strength = strength;
    }

    pub fn reset_repel_strength(&mut self) {
        self.repel_strength = DEFAULT_REPEL_STRENGTH;
    }

    /// Rebuild nodes, links, and forces from `spec` and install them
    /// under their stable names.  Positions and velocities of surviving
    /// ids are preserved; fresh nodes are placed by the simulation.
    /// Forces whose input set became empty are cleared rather than left
    /// stale.  Ends with a reheat so the layout re-equilibrates.
    pub fn install(&mut self, sim: &mut Simulation, spec: &BubbleSpec) {
        let mut nodes = Vec::with_capacity(spec.spaces.len());
        for space in &spec.spaces {
            let mut node = LayoutNode::new(space.id.clone(), forces::radius(space.area_target));
            if let Some(existing) = sim.get_node(&space.id) {
                node.x = existing.x;
                node.y = existing.y;
                node.vx = existing.vx;
                node.vy = existing.vy;
            }
            // view pins right, noise pins left; view wins when both
            node.pinned_x = if space.has_tag("view") {
                Some(PIN_OFFSET)
            } else if space.has_tag("noise") {
                Some(-PIN_OFFSET)
            } else {
                None
            };
            nodes.push(node);
        }

        let ids: HashSet<&str> = spec.spaces.iter().map(|s| s.id.as_str()).collect();

        let mut links: Vec<LayoutLink> = Vec::new();
        for edge in &spec.edges {
            // dangling edges render nothing and exert nothing
            if ids.contains(edge.source.as_str()) && ids.contains(edge.target.as_str()) {
                links.push(LayoutLink {
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                    weight: edge.weight,
                    kind: LinkKind::Adjacency,
                });
            }
        }
        for space in &spec.spaces {
            for id in &space.relations.positive {
                if ids.contains(id.as_str()) {
                    links.push(LayoutLink {
                        source_id: space.id.clone(),
                        target_id: id.clone(),
                        weight: 1.0,
                        kind: LinkKind::Relation,
                    });
                }
            }
        }

        let mut pairs: Vec<(SpaceId, SpaceId)> = Vec::new();
        for space in &spec.spaces {
            for id in &space.relations.negative {
                if ids.contains(id.as_str()) {
                    pairs.push((space.id.clone(), id.clone()));
                }
            }
        }

        sim.set_nodes(nodes);

        let collide = if sim.nodes().is_empty() {
            None
        } else {
            Some(forces::collide(COLLIDE_PADDING, COLLIDE_ITERATIONS))
        };
        sim.install_force("collide", collide);

        let attract = if links.is_empty() {
            None
        } else {
            Some(forces::attract(
                sim.nodes(),
                &links,
                ATTRACT_DISTANCE,
                ATTRACT_STRENGTH,
            ))
        };
        sim.install_force("attract", attract);

        let repel = if pairs.is_empty() {
            None
        } else {
            Some(forces::repel(
                sim.nodes(),
                &pairs,
                REPEL_DISTANCE,
                self.repel_strength,
            ))
        };
        sim.install_force("repel", repel);

        self.links = links;
        sim.reheat();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::standard_spec;
    use crate::datamodel::{FormData, RoomType, Space, Zone};
    use crate::generate::form_data_to_spec;

    fn form(room_type: RoomType) -> FormData {
        FormData {
            room_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_install_derives_one_node_per_space() {
        let spec = standard_spec(RoomType::Two);
        let mut sim = Simulation::new();
        let mut composer = ForceComposer::new();
        composer.install(&mut sim, &spec);

        assert_eq!(8, sim.nodes().len());
        for (space, node) in spec.spaces.iter().zip(sim.nodes()) {
            assert_eq!(space.id, node.id, "node order follows space order");
            assert_eq!(forces::radius(space.area_target), node.radius);
            assert!(node.x.is_finite() && node.y.is_finite());
        }
        assert_eq!(1.0, sim.alpha(), "install reheats");
    }

    #[test]
    fn test_install_builds_links_and_forces() {
        let spec = standard_spec(RoomType::Two);
        let mut sim = Simulation::new();
        let mut composer = ForceComposer::new();
        composer.install(&mut sim, &spec);

        let adjacency = composer
            .links()
            .iter()
            .filter(|l| l.kind == LinkKind::Adjacency)
            .count();
        let relation = composer
            .links()
            .iter()
            .filter(|l| l.kind == LinkKind::Relation)
            .count();
        assert_eq!(10, adjacency);
        // living: balcony+dining, kitchen: dining, bed1: bath
        assert_eq!(4, relation);
        assert!(
            composer
                .links()
                .iter()
                .filter(|l| l.kind == LinkKind::Relation)
                .all(|l| l.weight == 1.0)
        );

        assert!(sim.has_force("collide"));
        assert!(sim.has_force("attract"));
        assert!(sim.has_force("repel"));
    }

    #[test]
    fn test_install_preserves_surviving_positions() {
        let mut sim = Simulation::new();
        let mut composer = ForceComposer::new();
        composer.install(&mut sim, &form_data_to_spec(&form(RoomType::Two)));
        for _ in 0..5 {
            sim.tick();
        }
        let living_before = sim.get_node("living").unwrap().clone();

        composer.install(&mut sim, &form_data_to_spec(&form(RoomType::Three)));
        let living_after = sim.get_node("living").unwrap();
        assert_eq!(living_before.x, living_after.x);
        assert_eq!(living_before.y, living_after.y);

        let bed3 = sim.get_node("bed3").expect("new room gets a node");
        assert!(bed3.x.is_finite() && bed3.y.is_finite());
    }

    #[test]
    fn test_install_clears_forces_with_empty_inputs() {
        let mut sim = Simulation::new();
        let mut composer = ForceComposer::new();
        composer.install(&mut sim, &standard_spec(RoomType::Two));
        assert!(sim.has_force("attract") && sim.has_force("repel"));

        let bare = BubbleSpec {
            meta: Default::default(),
            spaces: vec![
                Space::new("a", Zone::Public, 10.0),
                Space::new("b", Zone::Private, 10.0),
            ],
            edges: vec![],
        };
        composer.install(&mut sim, &bare);
        assert!(sim.has_force("collide"), "nodes still collide");
        assert!(!sim.has_force("attract"), "no links left");
        assert!(!sim.has_force("repel"), "no negative pairs left");

        composer.install(&mut sim, &BubbleSpec::default());
        assert!(!sim.has_force("collide"), "nothing left to collide");
        assert!(sim.nodes().is_empty());
    }

    #[test]
    fn test_install_assigns_pins() {
        let mut all_on = form(RoomType::Two);
        all_on.scenic_view = true;
        all_on.noise_control = true;
        let spec = form_data_to_spec(&all_on);

        let mut sim = Simulation::new();
        let mut composer = ForceComposer::new();
        composer.install(&mut sim, &spec);

        assert_eq!(Some(PIN_OFFSET), sim.get_node("living").unwrap().pinned_x);
        assert_eq!(Some(PIN_OFFSET), sim.get_node("balcony").unwrap().pinned_x);
        assert_eq!(Some(-PIN_OFFSET), sim.get_node("bath").unwrap().pinned_x);
        assert_eq!(Some(-PIN_OFFSET), sim.get_node("bed2").unwrap().pinned_x);
        assert_eq!(None, sim.get_node("kitchen").unwrap().pinned_x);
    }

    #[test]
    fn test_view_wins_over_noise() {
        let mut space = Space::new("odd", Zone::Private, 12.0);
        space.tags = vec!["noise".to_owned(), "view".to_owned()];
        let spec = BubbleSpec {
            meta: Default::default(),
            spaces: vec![space],
            edges: vec![],
        };

        let mut sim = Simulation::new();
        let mut composer = ForceComposer::new();
        composer.install(&mut sim, &spec);
        assert_eq!(Some(PIN_OFFSET), sim.get_node("odd").unwrap().pinned_x);
    }

    #[test]
    fn test_install_skips_dangling_references() {
        let mut living = Space::new("living", Zone::Public, 25.0);
        living.relations.positive.push("ghost".to_owned());
        living.relations.negative.push("phantom".to_owned());
        let spec = BubbleSpec {
            meta: Default::default(),
            spaces: vec![living, Space::new("kitchen", Zone::Service, 8.0)],
            edges: vec![
                crate::datamodel::Edge::new("living", "kitchen", 1.5, Default::default()),
                crate::datamodel::Edge::new("living", "nowhere", 1.0, Default::default()),
            ],
        };

        let mut sim = Simulation::new();
        let mut composer = ForceComposer::new();
        composer.install(&mut sim, &spec);

        assert_eq!(1, composer.links().len(), "dangling edge and relation dropped");
        assert!(!sim.has_force("repel"));
        // a few ticks to make sure nothing resolves out of bounds
        for _ in 0..10 {
            sim.tick();
        }
    }

    #[test]
    fn test_settled_layout_honors_pins() {
        let mut vista = form(RoomType::Two);
        vista.scenic_view = true;
        let spec = form_data_to_spec(&vista);

        let mut sim = Simulation::new();
        let mut composer = ForceComposer::new();
        composer.install(&mut sim, &spec);
        sim.settle();

        assert_eq!(PIN_OFFSET, sim.get_node("living").unwrap().x);
        assert_eq!(PIN_OFFSET, sim.get_node("bed1").unwrap().x);
        let kitchen = sim.get_node("kitchen").unwrap();
        assert!(kitchen.x.is_finite() && kitchen.y.is_finite());
    }
}
