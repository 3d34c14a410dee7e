// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Viewport synchronization: keeping the settled diagram visible.
//!
//! [`ViewSync`] owns the pan/zoom transform and decides when to refit
//! it.  Spec edits and host resizes each debounce through their own
//! [`Scheduler`] timer so a burst of either collapses into a single
//! fit; an explicit layout reset refits immediately with generous
//! padding.

use crate::datamodel::BubbleSpec;
use crate::schedule::{CancelToken, Scheduler};

use super::sim::Simulation;
use super::{ForceComposer, LayoutNode};

pub const MIN_USABLE_DIMENSION: f64 = 80.0;
pub const SPEC_CHANGE_DELAY_MS: u64 = 150;
pub const RESIZE_DEBOUNCE_MS: u64 = 250;
pub const MIN_FIT_PADDING: f64 = 20.0;
pub const GENEROUS_PADDING_FACTOR: f64 = 2.0;
pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 4.0;

/// The world-to-screen transform: `screen = world * zoom + (x, y)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Deferred viewport work, delivered through a [`Scheduler`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewCommand {
    /// Refit with the standard padding.
    Fit,
    /// Refit with doubled padding, used right after a layout reset so
    /// the reheated diagram has room to move before the next fit.
    GenerousFit,
}

pub struct ViewSync {
    width: f64,
    height: f64,
    viewport: Viewport,
    spec_fit_task: Option<CancelToken>,
    resize_fit_task: Option<CancelToken>,
}

impl ViewSync {
    pub fn new(width: f64, height: f64) -> Self {
        ViewSync {
            width,
            height,
            viewport: Viewport::default(),
            spec_fit_task: None,
            resize_fit_task: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Standard fit padding: 5% of the smaller screen dimension, with
    /// a floor so small screens keep a visible margin.
    pub fn fit_padding(&self) -> f64 {
        (0.05 * self.width.min(self.height)).max(MIN_FIT_PADDING)
    }

    /// The spec changed; refit once things have had a moment to move.
    /// Successive calls inside the window coalesce into one fit.
    pub fn notify_spec_changed(&mut self, scheduler: &mut Scheduler<ViewCommand>) {
        if let Some(token) = self.spec_fit_task.take() {
            scheduler.cancel(token);
        }
        self.spec_fit_task = Some(scheduler.schedule(SPEC_CHANGE_DELAY_MS, ViewCommand::Fit));
    }

    /// The host surface was resized.  Dimensions take effect
    /// immediately; the refit debounces so a drag-resize burst fits
    /// only once.
    pub fn notify_resized(
        &mut self,
        width: f64,
        height: f64,
        scheduler: &mut Scheduler<ViewCommand>,
    ) {
        self.width = width;
        self.height = height;
        if let Some(token) = self.resize_fit_task.take() {
            scheduler.cancel(token);
        }
        self.resize_fit_task = Some(scheduler.schedule(RESIZE_DEBOUNCE_MS, ViewCommand::Fit));
    }

    /// Throw the whole layout away and start over: positions cleared,
    /// repel strength back to default, forces rebuilt, and a generous
    /// refit queued for the next scheduler turn.
    pub fn reset_layout(
        &mut self,
        sim: &mut Simulation,
        composer: &mut ForceComposer,
        spec: &BubbleSpec,
        scheduler: &mut Scheduler<ViewCommand>,
    ) {
        sim.reset_positions();
        composer.reset_repel_strength();
        composer.install(sim, spec);
        if let Some(token) = self.spec_fit_task.take() {
            scheduler.cancel(token);
        }
        self.spec_fit_task = Some(scheduler.schedule(0, ViewCommand::GenerousFit));
    }

    /// Cancel any outstanding refits, for when the view goes away.
    pub fn teardown(&mut self, scheduler: &mut Scheduler<ViewCommand>) {
        if let Some(token) = self.spec_fit_task.take() {
            scheduler.cancel(token);
        }
        if let Some(token) = self.resize_fit_task.take() {
            scheduler.cancel(token);
        }
    }

    /// Run one fired command against the current node positions.
    pub fn handle(&mut self, cmd: ViewCommand, nodes: &[LayoutNode]) {
        match cmd {
            ViewCommand::Fit => self.fit_to_view(nodes, self.fit_padding()),
            ViewCommand::GenerousFit => {
                self.fit_to_view(nodes, self.fit_padding() * GENEROUS_PADDING_FACTOR)
            }
        }
    }

    fn fit_to_view(&mut self, nodes: &[LayoutNode], padding: f64) {
        if self.width < MIN_USABLE_DIMENSION || self.height < MIN_USABLE_DIMENSION {
            // too small for a meaningful fit; keep whatever we had
            return;
        }
        if nodes.is_empty() {
            self.viewport = Viewport::default();
            return;
        }

        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for node in nodes {
            min_x = min_x.min(node.x - node.radius);
            max_x = max_x.max(node.x + node.radius);
            min_y = min_y.min(node.y - node.radius);
            max_y = max_y.max(node.y + node.radius);
        }

        let bounds_w = max_x - min_x;
        let bounds_h = max_y - min_y;
        if !bounds_w.is_finite() || !bounds_h.is_finite() || bounds_w <= 0.0 || bounds_h <= 0.0 {
            self.viewport = Viewport::default();
            return;
        }

        let usable_w = (self.width - 2.0 * padding).max(1.0);
        let usable_h = (self.height - 2.0 * padding).max(1.0);
        let zoom = (usable_w / bounds_w)
            .min(usable_h / bounds_h)
            .clamp(MIN_ZOOM, MAX_ZOOM);

        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;
        self.viewport = Viewport {
            x: self.width / 2.0 - center_x * zoom,
            y: self.height / 2.0 - center_y * zoom,
            zoom,
        };
    }
}
