// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated update, animation and render loop over a small scene.
//!
//! A walking sprite crosses a wall while a 60 Hz loop drives the scene's
//! three passes headlessly. Trace events go to a
//! [`PrettyPrintSink`](stagecraft_debug::pretty::PrettyPrintSink) on stdout
//! and a [`JsonLinesSink`](stagecraft_debug::json::JsonLinesSink) written to
//! `stage_trace.jsonl`.

use std::cell::RefCell;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use stagecraft_core::collision::Collider;
use stagecraft_core::config::SceneConfig;
use stagecraft_core::context::{DrawCommand, RecordingContext};
use stagecraft_core::event::{EventKind, NodeEvent};
use stagecraft_core::id::ImageId;
use stagecraft_core::node::{NodeOptions, ShadowOptions};
use stagecraft_core::scene::Scene;
use stagecraft_core::sprite_sheet::{ImageAsset, SpriteSheetOptions};
use stagecraft_core::time::HostTime;
use stagecraft_core::trace::{
    AnimationFrameEvent, CollisionTraceEvent, NodeRenderEvent, PhaseBeginEvent, PhaseEndEvent,
    TraceSink, Tracer,
};

use stagecraft_debug::json::JsonLinesSink;
use stagecraft_debug::pretty::PrettyPrintSink;

const TICK_COUNT: u64 = 60;
/// Loop period in host milliseconds (≈60 Hz).
const TICK_MS: u64 = 16;
/// Horizontal walking speed per tick.
const STEP_X: f64 = 4.0;

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.a.on_phase_begin(e);
        self.b.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.a.on_phase_end(e);
        self.b.on_phase_end(e);
    }

    fn on_collision(&mut self, e: &CollisionTraceEvent) {
        self.a.on_collision(e);
        self.b.on_collision(e);
    }

    fn on_animation_frame(&mut self, e: &AnimationFrameEvent) {
        self.a.on_animation_frame(e);
        self.b.on_animation_frame(e);
    }

    fn on_node_render(&mut self, e: &NodeRenderEvent) {
        self.a.on_node_render(e);
        self.b.on_node_render(e);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = SceneConfig::millis().with_debug_outlines();
    let timebase = config.timebase;
    let mut scene = Scene::new(config);

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()), timebase);
    let mut json = JsonLinesSink::new(BufWriter::new(File::create("stage_trace.jsonl")?), timebase);

    // -- scene -------------------------------------------------------------
    let ctx = RecordingContext::shared();
    let start = HostTime(0);

    let stage = scene.create_node(NodeOptions {
        id: Some("stage".into()),
        width: 320.0,
        height: 240.0,
        ..NodeOptions::default()
    });
    scene.set_context(stage, ctx.clone())?;

    let wall = scene.create_node(NodeOptions {
        id: Some("wall".into()),
        x: 120.0,
        y: 40.0,
        width: 16.0,
        height: 64.0,
        ..NodeOptions::default()
    });
    scene
        .node_mut(wall)?
        .fill_style("#556")
        .fill_rect(0.0, 0.0, 16.0, 64.0);

    let hitbox = scene.add_collider_shape(kurbo::Rect::new(0.0, 48.0, 24.0, 80.0))?;
    let hero = scene.create_sprite_sheet(
        SpriteSheetOptions {
            node: NodeOptions {
                id: Some("hero".into()),
                y: 48.0,
                width: 32.0,
                height: 32.0,
                collider: Collider::Shape(hitbox),
                smooth: true,
                ..NodeOptions::default()
            },
            frames_per_second: Some(12.0),
            animations: vec![("walk".into(), [0, 5]), ("idle".into(), [6, 7])],
        },
        start,
    )?;
    scene.node_mut(hero)?.shadow(Some(ShadowOptions {
        offset_y: Some(2.0),
        blur: Some(3.0),
        ..ShadowOptions::default()
    }));
    scene.add_child(stage, wall)?;
    scene.add_child(stage, hero)?;
    scene.allow_collision_from(hero, wall)?;

    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        EventKind::CollisionEnter,
        EventKind::CollisionExit,
        EventKind::AnimationEnd,
    ] {
        let log = log.clone();
        scene
            .node_mut(hero)?
            .bind(kind, move |e: &NodeEvent| log.borrow_mut().push(*e));
    }

    {
        let sheet = scene.sprite_sheet_mut(hero)?;
        sheet.on_load(ImageAsset {
            id: ImageId(1),
            width: 128.0,
            height: 64.0,
        })?;
        sheet.play("walk")?;
    }

    // -- simulated loop ----------------------------------------------------
    for tick in 0..TICK_COUNT {
        let now = HostTime(start.ticks() + tick * TICK_MS);
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut json,
        };
        let mut tracer = Tracer::new(&mut tee);

        // The hitbox travels with the sprite.
        let x = {
            let node = scene.node_mut(hero)?;
            node.x += STEP_X;
            node.x
        };
        scene.set_collider_shape(hitbox, kurbo::Rect::new(x, 48.0, x + 24.0, 80.0))?;

        scene.update(&mut tracer)?;
        scene.advance_animations(now, &mut tracer);
        if tick % 2 == 0 {
            scene.render(&mut tracer)?;
        }
    }

    // -- summary -----------------------------------------------------------
    let commands = ctx.borrow_mut().take_commands();
    let images = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::DrawImage { .. }))
        .count();
    println!("---");
    println!("draw commands: {} ({images} sprite frames)", commands.len());
    for event in log.borrow().iter() {
        println!("hero event: {event:?}");
    }
    let sheet = scene.sprite_sheet(hero)?;
    println!(
        "hero at x={} playing {:?} frame {}",
        scene.node(hero)?.x,
        sheet.current_animation(),
        sheet.current_frame(),
    );

    scene.destroy(hero)?;
    println!("trace written to stage_trace.jsonl");
    Ok(())
}
