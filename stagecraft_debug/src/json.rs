// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace output.
//!
//! [`JsonLinesSink`] writes one self-contained JSON object per event. Every
//! object carries an `"event"` discriminator; node handles are written as
//! `{"index", "generation"}` pairs.

use std::io::Write;

use serde_json::{Value, json};

use stagecraft_core::id::NodeId;
use stagecraft_core::time::Timebase;
use stagecraft_core::trace::{
    AnimationFrameEvent, CollisionTraceEvent, CollisionTransition, NodeRenderEvent,
    PhaseBeginEvent, PhaseEndEvent, TraceSink,
};

/// Writes one JSON object per trace event.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn new(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: &Value) {
        if serde_json::to_writer(&mut self.writer, value).is_ok() {
            let _ = self.writer.write_all(b"\n");
        }
    }
}

fn node(id: NodeId) -> Value {
    json!({ "index": id.index(), "generation": id.generation() })
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.emit(&json!({
            "event": "phase_begin",
            "pass": e.pass_index,
            "phase": e.phase.name(),
        }));
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.emit(&json!({
            "event": "phase_end",
            "pass": e.pass_index,
            "phase": e.phase.name(),
            "nodes": e.nodes_visited,
        }));
    }

    fn on_collision(&mut self, e: &CollisionTraceEvent) {
        let transition = match e.transition {
            CollisionTransition::Enter => "enter",
            CollisionTransition::Continue => "continue",
            CollisionTransition::Exit => "exit",
        };
        self.emit(&json!({
            "event": "collision",
            "transition": transition,
            "node": node(e.node),
            "target": node(e.target),
        }));
    }

    fn on_animation_frame(&mut self, e: &AnimationFrameEvent) {
        let now_ns = self.timebase.ticks_to_nanos(e.now.ticks());
        self.emit(&json!({
            "event": "animation_frame",
            "node": node(e.node),
            "now_ns": now_ns,
            "frame": e.frame,
            "wrapped": e.wrapped,
        }));
    }

    fn on_node_render(&mut self, e: &NodeRenderEvent) {
        self.emit(&json!({
            "event": "node_render",
            "node": node(e.node),
            "depth": e.depth,
            "alpha": e.alpha,
        }));
    }
}
