// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Minimal deterministic particle engine.
//!
//! Velocity-Verlet-free and intentionally simple: per tick the cooling
//! factor `alpha` relaxes toward its target, every installed force runs
//! in insertion order against the shared node array, then velocities
//! decay and integrate into positions.  Forces are named so each can be
//! replaced or removed independently.  The constants match the d3-force
//! defaults (alpha decays from 1 to 0.001 over 300 ticks).

use super::LayoutNode;

/// A named force: perturbs node velocities given the current alpha.
pub type Force = Box<dyn FnMut(&mut [LayoutNode], f64)>;

pub const ALPHA_MIN: f64 = 0.001;
const ALPHA_TICKS: f64 = 300.0;
const VELOCITY_DECAY: f64 = 0.4;
const MAX_SETTLE_TICKS: usize = 1000;
const INITIAL_RADIUS: f64 = 10.0;

pub struct Simulation {
    nodes: Vec<LayoutNode>,
    forces: Vec<(String, Force)>,
    alpha: f64,
    alpha_min: f64,
    alpha_decay: f64,
    alpha_target: f64,
    velocity_decay: f64,
}

impl Default for Simulation {
    fn default() -> Self {
        Simulation::new()
    }
}

impl Simulation {
    pub fn new() -> Self {
        Simulation {
            nodes: Vec::new(),
            forces: Vec::new(),
            alpha: 1.0,
            alpha_min: ALPHA_MIN,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / ALPHA_TICKS),
            alpha_target: 0.0,
            velocity_decay: VELOCITY_DECAY,
        }
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn get_node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Replace the node array.  Nodes without a finite position (fresh
    /// entries) are placed on a phyllotaxis spiral around the origin so
    /// no two start exactly coincident.
    pub fn set_nodes(&mut self, mut nodes: Vec<LayoutNode>) {
        let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
        for (i, node) in nodes.iter_mut().enumerate() {
            if !node.x.is_finite() || !node.y.is_finite() {
                let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                let a = i as f64 * golden_angle;
                node.x = r * a.cos();
                node.y = r * a.sin();
                node.vx = 0.0;
                node.vy = 0.0;
            }
        }
        self.nodes = nodes;
    }

    /// Install `force` under `name`, replacing any force already there;
    /// `None` removes the named force entirely.
    pub fn install_force(&mut self, name: &str, force: Option<Force>) {
        match force {
            Some(force) => {
                if let Some(slot) = self.forces.iter_mut().find(|(n, _)| n == name) {
                    slot.1 = force;
                } else {
                    self.forces.push((name.to_owned(), force));
                }
            }
            None => self.forces.retain(|(n, _)| n != name),
        }
    }

    pub fn has_force(&self, name: &str) -> bool {
        self.forces.iter().any(|(n, _)| n == name)
    }

    /// One step: cool alpha, run forces in insertion order, then decay
    /// velocities and integrate.  A node with `pinned_x` set is held at
    /// that x with zero x-velocity; y integrates normally.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        let mut forces = std::mem::take(&mut self.forces);
        for (_, force) in forces.iter_mut() {
            force(&mut self.nodes, self.alpha);
        }
        self.forces = forces;

        let damping = 1.0 - self.velocity_decay;
        for node in self.nodes.iter_mut() {
            match node.pinned_x {
                Some(px) => {
                    node.x = px;
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= damping;
                    node.x += node.vx;
                }
            }
            node.vy *= damping;
            node.y += node.vy;
        }
    }

    /// Tick until alpha cools below the minimum (bounded).  Returns the
    /// number of ticks run.
    pub fn settle(&mut self) -> usize {
        let mut ticks = 0;
        while self.alpha >= self.alpha_min && ticks < MAX_SETTLE_TICKS {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Set alpha back to 1 so the layout re-equilibrates after a change.
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    /// Re-center every node at the origin with zero velocity.  The next
    /// ticks pull the layout apart again from scratch.
    pub fn reset_positions(&mut self) {
        for node in self.nodes.iter_mut() {
            node.x = 0.0;
            node.y = 0.0;
            node.vx = 0.0;
            node.vy = 0.0;
        }
    }
}
