// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod common;
pub mod datamodel;
pub mod generate;
pub mod json;
pub mod layout;
pub mod schedule;
pub mod share;
pub mod token;

pub use self::common::{DecodeError, Error, ErrorCode, Result, ValidationError, ValidationErrors};
pub use self::datamodel::{BubbleSpec, Edge, EdgeKind, FormData, RoomSlot, RoomType, Space, Zone};
pub use self::layout::sim::Simulation;
pub use self::layout::view::{ViewCommand, ViewSync, Viewport};
pub use self::layout::{ForceComposer, LayoutLink, LayoutNode, LinkKind};
pub use self::schedule::{CancelToken, Scheduler};
