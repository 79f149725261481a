// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-scene scenarios driven through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;

use stagecraft_core::config::SceneConfig;
use stagecraft_core::context::{DrawCommand, RecordingContext};
use stagecraft_core::event::{EventKind, NodeEvent};
use stagecraft_core::id::{ImageId, NodeId};
use stagecraft_core::node::NodeOptions;
use stagecraft_core::scene::Scene;
use stagecraft_core::sprite_sheet::{ImageAsset, SpriteSheetOptions};
use stagecraft_core::time::HostTime;
use stagecraft_core::trace::Tracer;

fn square(scene: &mut Scene, x: f64, y: f64, size: f64) -> NodeId {
    scene.create_node(NodeOptions {
        x,
        y,
        width: size,
        height: size,
        ..NodeOptions::default()
    })
}

fn collect(scene: &mut Scene, id: NodeId, kinds: &[EventKind]) -> Rc<RefCell<Vec<NodeEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for &kind in kinds {
        let log = log.clone();
        scene
            .node_mut(id)
            .unwrap()
            .bind(kind, move |e| log.borrow_mut().push(*e));
    }
    log
}

#[test]
fn enter_exit_enter_across_three_ticks() {
    let mut scene = Scene::default();
    let a = square(&mut scene, 0.0, 0.0, 10.0);
    let b = square(&mut scene, 5.0, 5.0, 10.0);
    scene.allow_collision_from(a, b).unwrap();
    let log = collect(
        &mut scene,
        a,
        &[
            EventKind::CollisionEnter,
            EventKind::Collision,
            EventKind::CollisionExit,
        ],
    );

    let mut tracer = Tracer::none();
    scene.update(&mut tracer).unwrap();
    scene.node_mut(b).unwrap().x = 30.0;
    scene.update(&mut tracer).unwrap();
    scene.node_mut(b).unwrap().x = 5.0;
    scene.update(&mut tracer).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            NodeEvent::CollisionEnter(b),
            NodeEvent::Collision(b),
            NodeEvent::CollisionExit(b),
            NodeEvent::CollisionEnter(b),
            NodeEvent::Collision(b),
        ]
    );
}

#[test]
fn separating_boxes_exit_once() {
    let mut scene = Scene::default();
    let a = square(&mut scene, 0.0, 0.0, 10.0);
    let b = square(&mut scene, 5.0, 5.0, 10.0);
    assert_eq!(
        scene.node(a).unwrap().collide(scene.node(b).unwrap()),
        Ok(true)
    );
    scene.allow_collision_from(a, b).unwrap();
    let exits = collect(&mut scene, a, &[EventKind::CollisionExit]);

    let mut tracer = Tracer::none();
    scene.update(&mut tracer).unwrap();
    {
        let node = scene.node_mut(b).unwrap();
        node.x = 20.0;
        node.y = 20.0;
    }
    assert_eq!(
        scene.node(a).unwrap().collide(scene.node(b).unwrap()),
        Ok(false)
    );
    for _ in 0..3 {
        scene.update(&mut tracer).unwrap();
    }
    assert_eq!(*exits.borrow(), vec![NodeEvent::CollisionExit(b)]);
}

#[test]
fn nested_render_composes_transforms_and_alpha() {
    let rec = RecordingContext::shared();
    let mut scene = Scene::default();
    let layer = scene.create_node(NodeOptions {
        x: 100.0,
        alpha: 0.5,
        ..NodeOptions::default()
    });
    let panel = scene.create_node(NodeOptions {
        x: 10.0,
        y: 20.0,
        width: 8.0,
        height: 8.0,
        alpha: 0.5,
        ..NodeOptions::default()
    });
    scene
        .node_mut(panel)
        .unwrap()
        .fill_style("teal")
        .fill_rect(0.0, 0.0, 8.0, 8.0);
    scene.add_child(layer, panel).unwrap();
    scene.set_context(layer, rec.clone()).unwrap();

    scene.render(&mut Tracer::none()).unwrap();

    let commands = rec.borrow().commands().to_vec();
    let transforms: Vec<[f64; 6]> = commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Transform(m) => Some(*m),
            _ => None,
        })
        .collect();
    assert_eq!(
        transforms,
        vec![
            [1.0, 0.0, 0.0, 1.0, 100.0, 0.0],
            [1.0, 0.0, 0.0, 1.0, 10.0, 20.0],
        ],
        "each node pushes its local matrix onto the parent's"
    );

    let fill = commands
        .iter()
        .position(|c| *c == DrawCommand::FillRect(Rect::new(0.0, 0.0, 8.0, 8.0)))
        .expect("panel drew its rect");
    let saves = commands[..fill]
        .iter()
        .filter(|c| **c == DrawCommand::Save)
        .count();
    assert_eq!(saves, 2, "rect is drawn inside both brackets");
    assert!(commands.contains(&DrawCommand::GlobalAlpha(0.25)));
    assert_eq!(rec.borrow().save_depth(), 0);
}

#[test]
fn sprite_sheet_cycles_on_its_own_clock() {
    let rec = RecordingContext::shared();
    let mut scene = Scene::new(SceneConfig::millis());
    let sheet = scene
        .create_sprite_sheet(
            SpriteSheetOptions {
                node: NodeOptions {
                    width: 16.0,
                    height: 16.0,
                    ..NodeOptions::default()
                },
                ..SpriteSheetOptions::default()
            },
            HostTime(0),
        )
        .unwrap();
    scene.set_context(sheet, rec.clone()).unwrap();
    let ends = collect(&mut scene, sheet, &[EventKind::AnimationEnd]);

    scene
        .sprite_sheet_mut(sheet)
        .unwrap()
        .on_load(ImageAsset {
            id: ImageId(7),
            width: 64.0,
            height: 32.0,
        })
        .unwrap();
    assert_eq!(
        scene.sprite_sheet(sheet).unwrap().current_animation(),
        Some("default")
    );

    // 24 fps in milliseconds is a 41 ms interval; ten intervals cover one
    // full eight-frame cycle plus two frames.
    let advanced = scene.advance_animations(HostTime(410), &mut Tracer::none());
    assert_eq!(advanced, 10);
    assert_eq!(scene.sprite_sheet(sheet).unwrap().current_frame(), 2);
    assert_eq!(*ends.borrow(), vec![NodeEvent::AnimationEnd]);

    // Rendering does not advance frames.
    let mut tracer = Tracer::none();
    scene.render(&mut tracer).unwrap();
    scene.render(&mut tracer).unwrap();
    let draws: Vec<Rect> = rec
        .borrow()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawImage { source, .. } => Some(*source),
            _ => None,
        })
        .collect();
    assert_eq!(
        draws,
        vec![Rect::new(32.0, 0.0, 48.0, 16.0); 2],
        "same frame drawn twice"
    );
}

#[test]
fn destroyed_sprite_sheet_stops_animating() {
    let mut scene = Scene::new(SceneConfig::millis());
    let keep = scene
        .create_sprite_sheet(
            SpriteSheetOptions {
                animations: vec![("spin".into(), [0, 3])],
                ..SpriteSheetOptions::default()
            },
            HostTime(0),
        )
        .unwrap();
    let gone = scene
        .create_sprite_sheet(
            SpriteSheetOptions {
                animations: vec![("spin".into(), [0, 3])],
                ..SpriteSheetOptions::default()
            },
            HostTime(0),
        )
        .unwrap();
    for id in [keep, gone] {
        scene.sprite_sheet_mut(id).unwrap().play("spin").unwrap();
    }
    scene.destroy(gone).unwrap();

    let advanced = scene.advance_animations(HostTime(41), &mut Tracer::none());
    assert_eq!(advanced, 1, "only the surviving sheet ticks");
    assert!(scene.sprite_sheet(gone).is_err());
}
