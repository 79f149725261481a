// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display nodes, collision events and sprite-sheet animation for 2D scenes.
//!
//! `stagecraft_core` is the scene-graph core of a 2D rendering engine. It is
//! `no_std` compatible (with `alloc`), addresses nodes through generational
//! handles, and draws through a canvas-style [`RenderContext`] the host
//! supplies.
//!
//! # Architecture
//!
//! The host drives three independent schedules against one [`Scene`]:
//!
//! ```text
//!   update ticker ──► Scene::update() ──► check_collisions ──► Collision* events
//!                                     └─► Update event
//!
//!   host clock ──► Scene::advance_animations(now) ──► FrameTimer::poll
//!                                                        │
//!                                                        ▼
//!                                          SpriteSheet::advance_frame ──► AnimationEnd
//!
//!   render ticker ──► Scene::render() ──► save ─► update_context ─► draw ─► children ─► restore
//! ```
//!
//! **[`node`]**: [`DisplayNode`](node::DisplayNode) spatial and visual state,
//! derived size and visibility, deferred context operations and edge-triggered
//! collision memory.
//!
//! **[`sprite_sheet`]**: [`SpriteSheet`](sprite_sheet::SpriteSheet), a display
//! node plus a frame-range state machine driven by its own timer.
//!
//! **[`scene`]**: node arena, hierarchy, context propagation and the update,
//! animate and render passes.
//!
//! **[`transform`]**: affine composition from position, scale, rotation, skew
//! and pivot.
//!
//! **[`collision`]**: colliders, collider identity keys and the closed-open
//! box overlap test.
//!
//! **[`context`]**: the [`RenderContext`] trait, the deferred-operation map and
//! the headless [`RecordingContext`](context::RecordingContext).
//!
//! **[`event`]**: per-node synchronous event handlers.
//!
//! **[`time`]** / **[`timer`]**: host time, timebases and the recurring
//! [`FrameTimer`](timer::FrameTimer).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Links `std` and enables `std` support in
//!   dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//!
//! [`RenderContext`]: context::RenderContext
//! [`Scene`]: scene::Scene

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod collision;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod id;
pub mod node;
pub mod scene;
pub mod sprite_sheet;
pub mod time;
pub mod timer;
pub mod trace;
pub mod transform;

pub use error::{Result, StagecraftError};
