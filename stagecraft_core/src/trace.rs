// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing hooks for the update, animation and render passes.
//!
//! [`TraceSink`] has one method per event, all defaulting to no-ops.
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`; with the `trace`
//! feature **off** every method compiles to nothing, with it **on** each
//! call is a single `Option` branch.

use crate::id::NodeId;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which scene pass is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Simulation tick (collision checks, `Update` handlers).
    Update,
    /// Sprite-sheet frame timers.
    Animate,
    /// Context updates and drawing.
    Render,
}

impl PhaseKind {
    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Animate => "animate",
            Self::Render => "render",
        }
    }
}

/// Which collision edge was observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionTransition {
    /// First tick of an overlap.
    Enter,
    /// Any tick of an overlap, including the first.
    Continue,
    /// First tick after an overlap ended.
    Exit,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Marks the beginning of a scene pass.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Monotonic counter of passes of this kind.
    pub pass_index: u64,
    /// Which pass is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a scene pass.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Monotonic counter of passes of this kind.
    pub pass_index: u64,
    /// Which pass is ending.
    pub phase: PhaseKind,
    /// Nodes visited by the pass.
    pub nodes_visited: u32,
}

/// Emitted for every collision edge a node observes.
#[derive(Clone, Copy, Debug)]
pub struct CollisionTraceEvent {
    /// Node running the check.
    pub node: NodeId,
    /// Target it was checked against.
    pub target: NodeId,
    /// Observed edge.
    pub transition: CollisionTransition,
}

/// Emitted each time a sprite-sheet timer advances a frame.
#[derive(Clone, Copy, Debug)]
pub struct AnimationFrameEvent {
    /// The sprite sheet.
    pub node: NodeId,
    /// Host time passed to the animation pass.
    pub now: HostTime,
    /// Frame index after advancing.
    pub frame: u32,
    /// Whether the advance wrapped to the first frame.
    pub wrapped: bool,
}

/// Emitted when a node is drawn.
#[derive(Clone, Copy, Debug)]
pub struct NodeRenderEvent {
    /// The node.
    pub node: NodeId,
    /// Nesting depth below the root.
    pub depth: u32,
    /// Context global alpha after the node's own alpha was applied.
    pub alpha: f64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from scene passes.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called at the beginning of a pass.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pass.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called for each collision edge.
    fn on_collision(&mut self, e: &CollisionTraceEvent) {
        _ = e;
    }

    /// Called for each animation frame advance.
    fn on_animation_frame(&mut self, e: &AnimationFrameEvent) {
        _ = e;
    }

    /// Called for each drawn node.
    fn on_node_render(&mut self, e: &NodeRenderEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! emit {
    ($(#[$doc:meta])* $name:ident, $event:ty, $method:ident) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    emit!(
        /// Emits a [`PhaseBeginEvent`].
        phase_begin, PhaseBeginEvent, on_phase_begin
    );
    emit!(
        /// Emits a [`PhaseEndEvent`].
        phase_end, PhaseEndEvent, on_phase_end
    );
    emit!(
        /// Emits a [`CollisionTraceEvent`].
        collision, CollisionTraceEvent, on_collision
    );
    emit!(
        /// Emits an [`AnimationFrameEvent`].
        animation_frame, AnimationFrameEvent, on_animation_frame
    );
    emit!(
        /// Emits a [`NodeRenderEvent`].
        node_render, NodeRenderEvent, on_node_render
    );
}
