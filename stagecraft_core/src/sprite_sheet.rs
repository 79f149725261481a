// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-based sprite-sheet animation.
//!
//! A [`SpriteSheet`] is a [`DisplayNode`] plus an animation state machine
//! over `(current_animation, current_frame)`. Each registered animation is a
//! named inclusive frame range. On every firing of the sheet's own
//! [`FrameTimer`] the frame advances by one; advancing from the last frame
//! of the range emits [`NodeEvent::AnimationEnd`] and wraps to the first.
//!
//! Frames are laid out row-major across the image. The frame size is the
//! node's unscaled size; the column and row counts are derived when the
//! image arrives through [`on_load`](SpriteSheet::on_load).

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::Rect;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::DebugOptions;
use crate::error::{Result, StagecraftError};
use crate::event::NodeEvent;
use crate::id::ImageId;
use crate::node::{DisplayNode, NodeOptions};
use crate::time::{HostTime, Timebase};
use crate::timer::FrameTimer;

/// Default playback rate.
pub const DEFAULT_FRAMES_PER_SECOND: f64 = 24.0;

/// Name of the animation synthesized when an image loads with nothing
/// selected.
pub const DEFAULT_ANIMATION: &str = "default";

/// An inclusive frame range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationRange {
    /// First frame index.
    pub first_frame: u32,
    /// Last frame index (inclusive).
    pub last_frame: u32,
}

/// A loaded image and its pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageAsset {
    /// Host image handle.
    pub id: ImageId,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// Construction options for a [`SpriteSheet`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpriteSheetOptions {
    /// Options for the underlying node. `width`/`height` are the frame size.
    pub node: NodeOptions,
    /// Playback rate. Defaults to 24.
    pub frames_per_second: Option<f64>,
    /// Animations registered at construction, as `(name, [first, last])`.
    pub animations: Vec<(String, [u32; 2])>,
}

/// A display node that plays frame ranges from a sprite sheet image.
#[derive(Debug)]
pub struct SpriteSheet {
    node: DisplayNode,
    image: Option<ImageAsset>,
    animations: BTreeMap<String, AnimationRange>,
    current_animation: Option<String>,
    current_frame: u32,
    frames_per_second: f64,
    columns: u32,
    rows: u32,
    timer: FrameTimer,
}

impl SpriteSheet {
    /// Creates a sprite sheet and starts its frame timer at `now`.
    pub fn new(options: SpriteSheetOptions, timebase: Timebase, now: HostTime) -> Result<Self> {
        let frames_per_second = options
            .frames_per_second
            .unwrap_or(DEFAULT_FRAMES_PER_SECOND);
        let mut timer = FrameTimer::new(frames_per_second, timebase)?;
        timer.start(now);

        let mut sheet = Self {
            node: DisplayNode::new(options.node),
            image: None,
            animations: BTreeMap::new(),
            current_animation: None,
            current_frame: 0,
            frames_per_second,
            columns: 1,
            rows: 1,
            timer,
        };
        for (name, frames) in &options.animations {
            sheet.add_animation(name, *frames)?;
        }
        Ok(sheet)
    }

    /// The underlying display node.
    #[must_use]
    pub fn node(&self) -> &DisplayNode {
        &self.node
    }

    /// The underlying display node, mutably.
    pub fn node_mut(&mut self) -> &mut DisplayNode {
        &mut self.node
    }

    // -- Animations --

    /// Registers or replaces a named frame range.
    pub fn add_animation(&mut self, name: &str, [first_frame, last_frame]: [u32; 2]) -> Result<&mut Self> {
        if last_frame < first_frame {
            return Err(StagecraftError::InvalidAnimationRange {
                name: name.to_string(),
                first: first_frame,
                last: last_frame,
            });
        }
        self.animations.insert(
            name.to_string(),
            AnimationRange {
                first_frame,
                last_frame,
            },
        );
        Ok(self)
    }

    /// Number of distinct animation names registered.
    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Looks up a registered range.
    #[must_use]
    pub fn animation(&self, name: &str) -> Option<AnimationRange> {
        self.animations.get(name).copied()
    }

    /// Switches to `name`, resetting to its first frame.
    ///
    /// Playing the animation that is already current leaves the frame alone.
    pub fn play(&mut self, name: &str) -> Result<&mut Self> {
        if self.current_animation.as_deref() == Some(name) {
            return Ok(self);
        }
        let range = self
            .animation(name)
            .ok_or_else(|| StagecraftError::UnknownAnimation(name.to_string()))?;
        self.current_animation = Some(name.to_string());
        self.current_frame = range.first_frame;
        Ok(self)
    }

    /// Name of the current animation.
    #[must_use]
    pub fn current_animation(&self) -> Option<&str> {
        self.current_animation.as_deref()
    }

    /// Current frame index.
    #[must_use]
    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Advances one frame, as on a single timer firing.
    ///
    /// Returns `None` when no animation is selected, otherwise whether the
    /// advance wrapped (in which case `AnimationEnd` was triggered).
    pub fn advance_frame(&mut self) -> Option<bool> {
        let range = self.current_animation.as_deref().and_then(|n| self.animation(n))?;
        if self.current_frame >= range.last_frame {
            self.node.trigger(&NodeEvent::AnimationEnd);
            self.current_frame = range.first_frame;
            Some(true)
        } else {
            self.current_frame += 1;
            Some(false)
        }
    }

    /// Frames to step for `fired` timer firings.
    ///
    /// While the current frame is inside its range the animation is periodic,
    /// so whole cycles past the first are dropped. Each dropped cycle would
    /// only repeat `AnimationEnd` and land on the same frame.
    pub(crate) fn frames_to_step(&self, fired: u64) -> u64 {
        let Some(range) = self
            .current_animation
            .as_deref()
            .and_then(|n| self.animation(n))
        else {
            return 0;
        };
        if !(range.first_frame..=range.last_frame).contains(&self.current_frame) {
            return fired;
        }
        let cycle = u64::from(range.last_frame - range.first_frame) + 1;
        if fired > 2 * cycle {
            cycle + fired % cycle
        } else {
            fired
        }
    }

    // -- Timer --

    /// Frames per second.
    #[must_use]
    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    /// Alias for [`frames_per_second`](Self::frames_per_second).
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.frames_per_second
    }

    /// Changes the playback rate.
    pub fn set_frames_per_second(&mut self, frames_per_second: f64, timebase: Timebase) -> Result<()> {
        self.timer.set_rate(frames_per_second, timebase)?;
        self.frames_per_second = frames_per_second;
        Ok(())
    }

    /// Returns how many frames are due at `now`, without advancing them.
    pub(crate) fn poll_timer(&mut self, now: HostTime) -> u64 {
        self.timer.poll(now)
    }

    /// Restarts the frame timer at `now`.
    pub fn start(&mut self, now: HostTime) {
        self.timer.start(now);
    }

    /// Cancels the frame timer. Frames stay where they are.
    pub fn stop(&mut self) {
        self.timer.cancel();
    }

    /// Whether the frame timer is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// The frame timer.
    #[must_use]
    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    // -- Image --

    /// Columns of frames in the image.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Rows of frames in the image.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Total frames in the image.
    #[must_use]
    pub fn total_frames(&self) -> u32 {
        self.columns * self.rows
    }

    /// The loaded image, if any.
    #[must_use]
    pub fn image(&self) -> Option<&ImageAsset> {
        self.image.as_ref()
    }

    /// Accepts the loaded image and derives the frame grid.
    ///
    /// A node created with zero width or height takes that dimension from
    /// the image. When nothing was registered or selected, a
    /// [`DEFAULT_ANIMATION`] spanning every frame is added and played.
    pub fn on_load(&mut self, image: ImageAsset) -> Result<()> {
        if !(image.width.is_finite() && image.height.is_finite())
            || image.width <= 0.0
            || image.height <= 0.0
        {
            return Err(StagecraftError::InvalidGeometry("image has no pixels"));
        }
        let size = self.node.raw_size();
        let frame_w = if size.width == 0.0 { image.width } else { size.width };
        let frame_h = if size.height == 0.0 { image.height } else { size.height };
        if !(frame_w.is_finite() && frame_h.is_finite()) || frame_w < 0.0 || frame_h < 0.0 {
            return Err(StagecraftError::InvalidGeometry("frame size is not positive"));
        }
        let columns = cells(image.width, frame_w)?;
        let rows = cells(image.height, frame_h)?;
        if columns.checked_mul(rows).is_none() {
            return Err(StagecraftError::InvalidGeometry("too many frames"));
        }
        self.node.set_raw_size(frame_w, frame_h);
        self.columns = columns;
        self.rows = rows;
        self.image = Some(image);

        if self.animations.is_empty() || self.current_animation.is_none() {
            let last = self.total_frames() - 1;
            self.add_animation(DEFAULT_ANIMATION, [0, last])?;
            self.play(DEFAULT_ANIMATION)?;
        }
        Ok(())
    }

    /// Source rectangle of the current frame within the image.
    #[must_use]
    pub fn source_rect(&self) -> Rect {
        let size = self.node.raw_size();
        let column = self.current_frame % self.columns;
        let row = self.current_frame / self.columns;
        Rect::from_origin_size(
            (f64::from(column) * size.width, f64::from(row) * size.height),
            size,
        )
    }

    /// Draws the current frame at the context's local origin.
    ///
    /// Does nothing while invisible or before the image has loaded.
    /// Collision checking for this node is run by the scene immediately
    /// before this call.
    pub fn render(&mut self, debug: &DebugOptions) -> Result<()> {
        if !self.node.visible() {
            return Ok(());
        }
        let Some(image) = self.image else {
            return Ok(());
        };
        let ctx = self
            .node
            .context()
            .cloned()
            .ok_or_else(|| StagecraftError::MissingContext(self.node.id().to_string()))?;
        let dest = Rect::from_origin_size((0.0, 0.0), self.node.raw_size());
        let mut ctx = ctx.borrow_mut();
        ctx.draw_image(image.id, self.source_rect(), dest);
        if debug.outline {
            ctx.set_stroke_style(&debug.outline_color);
            ctx.stroke_rect(dest);
        }
        Ok(())
    }
}

/// Number of whole-or-partial frames along one image axis.
#[expect(
    clippy::cast_possible_truncation,
    reason = "both operands are validated positive and the count is range-checked"
)]
fn cells(image_extent: f64, frame_extent: f64) -> Result<u32> {
    if frame_extent >= image_extent {
        return Ok(1);
    }
    let count = (image_extent / frame_extent).ceil();
    if count > f64::from(u32::MAX) {
        return Err(StagecraftError::InvalidGeometry("too many frames"));
    }
    Ok(count as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DrawCommand, RecordingContext};
    use crate::event::EventKind;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    fn sheet(width: f64, height: f64) -> SpriteSheet {
        SpriteSheet::new(
            SpriteSheetOptions {
                node: NodeOptions {
                    width,
                    height,
                    ..NodeOptions::default()
                },
                ..SpriteSheetOptions::default()
            },
            Timebase::MILLIS,
            HostTime(0),
        )
        .unwrap()
    }

    fn image(width: f64, height: f64) -> ImageAsset {
        ImageAsset {
            id: ImageId(1),
            width,
            height,
        }
    }

    #[test]
    fn defaults_to_24_fps_and_starts_timer() {
        let s = sheet(16.0, 16.0);
        assert_eq!(s.fps(), 24.0);
        assert!(s.is_running());
        assert_eq!(s.current_animation(), None);
    }

    #[test]
    fn rejects_zero_fps() {
        let err = SpriteSheet::new(
            SpriteSheetOptions {
                frames_per_second: Some(0.0),
                ..SpriteSheetOptions::default()
            },
            Timebase::MILLIS,
            HostTime(0),
        )
        .unwrap_err();
        assert_eq!(err, StagecraftError::InvalidFrameRate(0.0));
    }

    #[test]
    fn re_registering_counts_once() {
        let mut s = sheet(16.0, 16.0);
        s.add_animation("walk", [0, 5]).unwrap();
        s.add_animation("walk", [0, 5]).unwrap();
        assert_eq!(s.animation_count(), 1);
        s.add_animation("walk", [2, 3]).unwrap();
        assert_eq!(s.animation("walk").map(|r| r.first_frame), Some(2), "overwritten");
    }

    #[test]
    fn inverted_range_rejected() {
        let mut s = sheet(16.0, 16.0);
        assert!(matches!(
            s.add_animation("back", [5, 1]),
            Err(StagecraftError::InvalidAnimationRange { .. })
        ));
    }

    #[test]
    fn play_resets_only_on_change() {
        let mut s = sheet(16.0, 16.0);
        s.add_animation("walk", [0, 5]).unwrap();
        s.play("walk").unwrap();
        assert_eq!(s.current_frame(), 0);
        for _ in 0..3 {
            s.advance_frame();
        }
        assert_eq!(s.current_frame(), 3);
        s.play("walk").unwrap();
        assert_eq!(s.current_frame(), 3, "already playing, untouched");
    }

    #[test]
    fn play_unknown_fails() {
        let mut s = sheet(16.0, 16.0);
        assert_eq!(
            s.play("fly").map(|_| ()),
            Err(StagecraftError::UnknownAnimation("fly".into()))
        );
    }

    #[test]
    fn wraps_and_signals_once_per_cycle() {
        let ends = Rc::new(RefCell::new(0));
        let mut s = sheet(16.0, 16.0);
        let e = ends.clone();
        s.node_mut()
            .bind(EventKind::AnimationEnd, move |_| *e.borrow_mut() += 1);
        s.add_animation("blink", [2, 4]).unwrap();
        s.play("blink").unwrap();

        let mut frames = Vec::new();
        for _ in 0..6 {
            s.advance_frame();
            frames.push(s.current_frame());
        }
        assert_eq!(frames, vec![3, 4, 2, 3, 4, 2]);
        assert_eq!(*ends.borrow(), 2, "one signal per wrap");
    }

    #[test]
    fn advance_without_animation_is_noop() {
        let mut s = sheet(16.0, 16.0);
        assert_eq!(s.advance_frame(), None);
        assert_eq!(s.current_frame(), 0);
    }

    #[test]
    fn on_load_derives_grid_and_default_animation() {
        let mut s = sheet(16.0, 16.0);
        s.on_load(image(64.0, 32.0)).unwrap();
        assert_eq!((s.columns(), s.rows()), (4, 2));
        assert_eq!(
            s.animation(DEFAULT_ANIMATION),
            Some(AnimationRange {
                first_frame: 0,
                last_frame: 7
            })
        );
        assert_eq!(s.current_animation(), Some(DEFAULT_ANIMATION));
    }

    #[test]
    fn on_load_rounds_partial_frames_up() {
        let mut s = sheet(30.0, 32.0);
        s.on_load(image(64.0, 32.0)).unwrap();
        assert_eq!((s.columns(), s.rows()), (3, 1));
    }

    #[test]
    fn on_load_keeps_selected_animation() {
        let mut s = sheet(16.0, 16.0);
        s.add_animation("idle", [1, 2]).unwrap();
        s.play("idle").unwrap();
        s.on_load(image(64.0, 32.0)).unwrap();
        assert_eq!(s.current_animation(), Some("idle"));
        assert_eq!(s.animation_count(), 1);
    }

    #[test]
    fn on_load_with_unselected_animations_synthesizes_default() {
        let mut s = sheet(16.0, 16.0);
        s.add_animation("idle", [1, 2]).unwrap();
        s.on_load(image(32.0, 16.0)).unwrap();
        assert_eq!(s.current_animation(), Some(DEFAULT_ANIMATION));
        assert_eq!(s.animation_count(), 2);
    }

    #[test]
    fn zero_frame_size_takes_image_size() {
        let mut s = sheet(0.0, 0.0);
        s.on_load(image(48.0, 24.0)).unwrap();
        assert_eq!((s.columns(), s.rows()), (1, 1));
        assert_eq!(s.node().width(), 48.0);
    }

    #[test]
    fn source_rect_is_row_major() {
        let mut s = sheet(16.0, 16.0);
        s.on_load(image(64.0, 32.0)).unwrap();
        for _ in 0..5 {
            s.advance_frame();
        }
        assert_eq!(s.current_frame(), 5);
        assert_eq!(s.source_rect(), Rect::new(16.0, 16.0, 32.0, 32.0));
    }

    #[test]
    fn render_draws_frame_and_outline() {
        let rec = RecordingContext::shared();
        let mut s = sheet(16.0, 16.0);
        s.node_mut().set_context(rec.clone());
        s.on_load(image(64.0, 32.0)).unwrap();
        s.advance_frame();
        s.render(&DebugOptions::OUTLINES).unwrap();

        let frame = Rect::new(0.0, 0.0, 16.0, 16.0);
        assert_eq!(
            rec.borrow().commands(),
            &[
                DrawCommand::DrawImage {
                    image: ImageId(1),
                    source: Rect::new(16.0, 0.0, 32.0, 16.0),
                    dest: frame,
                },
                DrawCommand::StrokeStyle("red".into()),
                DrawCommand::StrokeRect(frame),
            ]
        );
    }

    #[test]
    fn render_skips_invisible() {
        let rec = RecordingContext::shared();
        let mut s = sheet(16.0, 16.0);
        s.node_mut().set_context(rec.clone());
        s.on_load(image(16.0, 16.0)).unwrap();
        s.node_mut().alpha = 0.0;
        s.render(&DebugOptions::OFF).unwrap();
        assert!(rec.borrow().commands().is_empty());
    }

    #[test]
    fn on_load_rejects_frame_grids_past_u32() {
        let mut s = sheet(0.0001, 0.0001);
        assert_eq!(
            s.on_load(image(64.0, 32.0)),
            Err(StagecraftError::InvalidGeometry("too many frames"))
        );
        assert!(s.image().is_none(), "a rejected image is not kept");
        assert_eq!((s.columns(), s.rows()), (1, 1));

        let mut s = sheet(1e-300, 16.0);
        assert_eq!(
            s.on_load(image(64.0, 32.0)),
            Err(StagecraftError::InvalidGeometry("too many frames"))
        );
    }

    #[test]
    fn catch_up_drops_whole_cycles() {
        let mut s = sheet(16.0, 16.0);
        assert_eq!(s.frames_to_step(1_000), 0, "nothing selected");
        s.add_animation("walk", [2, 5]).unwrap();
        s.play("walk").unwrap();
        assert_eq!(s.frames_to_step(8), 8, "two cycles are stepped in full");
        assert_eq!(s.frames_to_step(9), 5);
        assert_eq!(s.frames_to_step(u64::MAX), 4 + u64::MAX % 4);

        s.add_animation("walk", [6, 7]).unwrap();
        assert_eq!(
            s.frames_to_step(1_000),
            1_000,
            "frame outside its range is stepped in full"
        );
    }

    #[test]
    fn stop_cancels_timer() {
        let mut s = sheet(16.0, 16.0);
        s.stop();
        assert!(!s.is_running());
        assert_eq!(s.poll_timer(HostTime(10_000)), 0);
    }
}
