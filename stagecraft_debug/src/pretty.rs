// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host times
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use stagecraft_core::time::{HostTime, Timebase};
use stagecraft_core::trace::{
    AnimationFrameEvent, CollisionTraceEvent, CollisionTransition, NodeRenderEvent,
    PhaseBeginEvent, PhaseEndEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }
}

fn transition_name(transition: CollisionTransition) -> &'static str {
    match transition {
        CollisionTransition::Enter => "enter",
        CollisionTransition::Continue => "continue",
        CollisionTransition::Exit => "exit",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] pass={} {}",
            e.pass_index,
            e.phase.name(),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] pass={} {} nodes={}",
            e.pass_index,
            e.phase.name(),
            e.nodes_visited,
        );
    }

    fn on_collision(&mut self, e: &CollisionTraceEvent) {
        let _ = writeln!(
            self.writer,
            "[collision:{}] {:?} -> {:?}",
            transition_name(e.transition),
            e.node,
            e.target,
        );
    }

    fn on_animation_frame(&mut self, e: &AnimationFrameEvent) {
        let wrapped = if e.wrapped { " wrapped" } else { "" };
        let _ = writeln!(
            self.writer,
            "[frame] {:?} frame={} at {:.1}ms{wrapped}",
            e.node,
            e.frame,
            self.host_ms(e.now),
        );
    }

    fn on_node_render(&mut self, e: &NodeRenderEvent) {
        let _ = writeln!(
            self.writer,
            "[render] {:indent$}{:?} alpha={:.3}",
            "",
            e.node,
            e.alpha,
            indent = e.depth as usize * 2,
        );
    }
}
