// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Force builders.
//!
//! Each builder resolves its inputs against the node array it is given
//! and returns a closure for [`Simulation::install_force`].  Ids that
//! fail to resolve are silently dropped here, at build time, so the
//! per-tick closures never look anything up.  Builders are rerun from
//! scratch whenever the node set changes; a returned closure must never
//! outlive the node array it was resolved against.
//!
//! [`Simulation::install_force`]: super::sim::Simulation::install_force

use std::collections::HashMap;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::sim::Force;
use super::{LayoutLink, LayoutNode};
use crate::datamodel::SpaceId;

pub const RADIUS_MIN: f64 = 8.0;
pub const RADIUS_MAX: f64 = 40.0;

const JIGGLE_SEED: u64 = 42;

/// Circle radius for a room of `area` square meters, in pixels.
pub fn radius(area: f64) -> f64 {
    (area.max(0.0).sqrt() * 2.5 + 6.0).clamp(RADIUS_MIN, RADIUS_MAX)
}

// tiny deterministic displacement to break exact coincidence
fn jiggle(rng: &mut StdRng) -> f64 {
    (rng.random::<f64>() - 0.5) * 1e-6
}

fn id_index(nodes: &[LayoutNode]) -> HashMap<SpaceId, usize> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.clone(), i))
        .collect()
}

/// Pairwise circle collision with `padding` around every node, several
/// solver iterations per tick.  Overlap is split by mass (the larger
/// circle moves less) against anticipated positions, the way d3's
/// collide force does it.
pub fn collide(padding: f64, iterations: usize) -> Force {
    let mut rng = StdRng::seed_from_u64(JIGGLE_SEED);
    Box::new(move |nodes, _alpha| {
        for _ in 0..iterations {
            for i in 0..nodes.len() {
                let ri = nodes[i].radius + padding;
                let xi = nodes[i].x + nodes[i].vx;
                let yi = nodes[i].y + nodes[i].vy;
                for j in (i + 1)..nodes.len() {
                    let rj = nodes[j].radius + padding;
                    let r = ri + rj;
                    let mut dx = xi - (nodes[j].x + nodes[j].vx);
                    let mut dy = yi - (nodes[j].y + nodes[j].vy);
                    let mut d2 = dx * dx + dy * dy;
                    if d2 >= r * r {
                        continue;
                    }
                    if d2 == 0.0 {
                        dx = jiggle(&mut rng);
                        dy = jiggle(&mut rng);
                        d2 = dx * dx + dy * dy;
                    }
                    let d = d2.sqrt();
                    let l = (r - d) / d;
                    let wx = dx * l;
                    let wy = dy * l;
                    let share = (rj * rj) / (ri * ri + rj * rj);
                    nodes[i].vx += wx * share;
                    nodes[i].vy += wy * share;
                    nodes[j].vx -= wx * (1.0 - share);
                    nodes[j].vy -= wy * (1.0 - share);
                }
            }
        }
    })
}

/// Spring force over the derived link set: every link relaxes toward
/// `distance`, with strength `base_strength` scaled by the link weight
/// and split evenly between the two endpoints.
pub fn attract(
    nodes: &[LayoutNode],
    links: &[LayoutLink],
    distance: f64,
    base_strength: f64,
) -> Force {
    let index = id_index(nodes);
    let resolved: Vec<(usize, usize, f64)> = links
        .iter()
        .filter_map(|link| {
            let s = *index.get(&link.source_id)?;
            let t = *index.get(&link.target_id)?;
            Some((s, t, base_strength * link.weight))
        })
        .filter(|(s, t, _)| s != t)
        .collect();

    let mut rng = StdRng::seed_from_u64(JIGGLE_SEED);
    Box::new(move |nodes, alpha| {
        for &(s, t, strength) in &resolved {
            let mut dx = (nodes[t].x + nodes[t].vx) - (nodes[s].x + nodes[s].vx);
            let mut dy = (nodes[t].y + nodes[t].vy) - (nodes[s].y + nodes[s].vy);
            if dx == 0.0 && dy == 0.0 {
                dx = jiggle(&mut rng);
                dy = jiggle(&mut rng);
            }
            let d = (dx * dx + dy * dy).sqrt();
            let l = (d - distance) / d * alpha * strength;
            let wx = dx * l;
            let wy = dy * l;
            nodes[t].vx -= wx * 0.5;
            nodes[t].vy -= wy * 0.5;
            nodes[s].vx += wx * 0.5;
            nodes[s].vy += wy * 0.5;
        }
    })
}

/// Negative-relation repulsion.  Purely repulsive: pairs further apart
/// than `desired` feel nothing; closer pairs are pushed apart by
/// `((desired - d) / desired) * strength * alpha` along the line
/// between them.  Reads positions only (never velocities), so the
/// order pairs are processed in cannot matter.
pub fn repel(
    nodes: &[LayoutNode],
    pairs: &[(SpaceId, SpaceId)],
    desired: f64,
    strength: f64,
) -> Force {
    let index = id_index(nodes);
    let resolved: Vec<(usize, usize)> = pairs
        .iter()
        .filter_map(|(a, b)| Some((*index.get(a)?, *index.get(b)?)))
        .filter(|(a, b)| a != b)
        .collect();

    Box::new(move |nodes, alpha| {
        for &(a, b) in &resolved {
            let dx = nodes[b].x - nodes[a].x;
            let dy = nodes[b].y - nodes[a].y;
            let d = (dx * dx + dy * dy).sqrt().max(1e-6);
            if d >= desired {
                continue;
            }
            let push = (desired - d) / desired * strength * alpha;
            let ux = dx / d;
            let uy = dy / d;
            nodes[b].vx += ux * push;
            nodes[b].vy += uy * push;
            nodes[a].vx -= ux * push;
            nodes[a].vy -= uy * push;
        }
    })
}
