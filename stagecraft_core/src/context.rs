// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering-context contract.
//!
//! Nodes draw by mutating a shared 2-D drawing context in the style of the
//! HTML canvas: the current transform, global alpha, composite operation,
//! smoothing flag and shadow registers are all global state. Nodes never
//! save or restore that state themselves; [`Scene::render`] brackets every
//! node with [`save`](RenderContext::save) / [`restore`](RenderContext::restore).
//!
//! Canvas backends, software rasterizers and test doubles implement
//! [`RenderContext`]. [`RecordingContext`] is a headless implementation that
//! records every call.
//!
//! [`Scene::render`]: crate::scene::Scene::render

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;

use crate::error::{Result, StagecraftError};
use crate::id::ImageId;

/// A context shared between a node, its children and the host.
pub type SharedContext = Rc<RefCell<dyn RenderContext>>;

/// A 2-D drawing surface with canvas-style global state.
pub trait RenderContext {
    /// Pushes the current drawing state.
    fn save(&mut self);

    /// Pops the most recently saved drawing state.
    fn restore(&mut self);

    /// Multiplies the current transform by `[m11, m12, m21, m22, dx, dy]`.
    fn transform(&mut self, m11: f64, m12: f64, m21: f64, m22: f64, dx: f64, dy: f64);

    /// Translates the current transform.
    fn translate(&mut self, x: f64, y: f64);

    /// Returns the current global alpha.
    fn global_alpha(&self) -> f64;

    /// Sets the global alpha.
    fn set_global_alpha(&mut self, alpha: f64);

    /// Sets the global composite operation (e.g. `"lighter"`).
    fn set_global_composite_operation(&mut self, op: &str);

    /// Enables or disables image smoothing.
    fn set_image_smoothing_enabled(&mut self, enabled: bool);

    /// Sets the shadow color.
    fn set_shadow_color(&mut self, color: &str);

    /// Sets the horizontal shadow offset.
    fn set_shadow_offset_x(&mut self, offset: f64);

    /// Sets the vertical shadow offset.
    fn set_shadow_offset_y(&mut self, offset: f64);

    /// Sets the shadow blur radius.
    fn set_shadow_blur(&mut self, blur: f64);

    /// Sets the fill style.
    fn set_fill_style(&mut self, style: &str);

    /// Fills a rectangle with the current fill style.
    fn fill_rect(&mut self, rect: Rect);

    /// Sets the stroke style.
    fn set_stroke_style(&mut self, style: &str);

    /// Strokes a rectangle outline with the current stroke style.
    fn stroke_rect(&mut self, rect: Rect);

    /// Draws the `source` region of `image` into `dest`.
    fn draw_image(&mut self, image: ImageId, source: Rect, dest: Rect);

    /// Invokes a context method by name with positional arguments.
    ///
    /// This is the replay path for deferred operations. The default
    /// implementation understands `translate`, `transform`, `fillRect` and
    /// `strokeRect`; contexts with more methods override it and fall back to
    /// [`dispatch_call`] for the rest.
    fn call(&mut self, name: &str, args: &[f64]) -> Result<()> {
        dispatch_call(self, name, args)
    }

    /// Assigns a context property by name.
    ///
    /// The default implementation understands `fillStyle`, `strokeStyle` and
    /// `globalCompositeOperation`.
    fn assign(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "fillStyle" => self.set_fill_style(value),
            "strokeStyle" => self.set_stroke_style(value),
            "globalCompositeOperation" => self.set_global_composite_operation(value),
            _ => return Err(StagecraftError::UnknownOperation(name.to_string())),
        }
        Ok(())
    }
}

/// Dispatches the built-in method names of [`RenderContext::call`].
pub fn dispatch_call<C: RenderContext + ?Sized>(ctx: &mut C, name: &str, args: &[f64]) -> Result<()> {
    match (name, args) {
        ("translate", &[x, y]) => ctx.translate(x, y),
        ("transform", &[m11, m12, m21, m22, dx, dy]) => ctx.transform(m11, m12, m21, m22, dx, dy),
        ("fillRect", &[x, y, w, h]) => ctx.fill_rect(Rect::from_origin_size((x, y), (w, h))),
        ("strokeRect", &[x, y, w, h]) => ctx.stroke_rect(Rect::from_origin_size((x, y), (w, h))),
        _ => return Err(StagecraftError::UnknownOperation(name.to_string())),
    }
    Ok(())
}

/// A recorded drawing-context call or assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum ContextOp {
    /// Invoke the named method with these positional arguments.
    Call(Vec<f64>),
    /// Assign this value to the named property.
    Assign(String),
}

/// Ordered name → operation map replayed at render time.
///
/// Recording a name that is already present replaces its arguments but keeps
/// its original position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextOperations {
    entries: Vec<(String, ContextOp)>,
}

impl ContextOperations {
    /// Records `op` under `name`.
    pub fn record(&mut self, name: &str, op: ContextOp) {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| n == name) {
            slot.1 = op;
        } else {
            self.entries.push((name.to_string(), op));
        }
    }

    /// Returns the operation recorded under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ContextOp> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, op)| op)
    }

    /// Whether anything is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct operation names queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates operations in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextOp)> {
        self.entries.iter().map(|(n, op)| (n.as_str(), op))
    }

    /// Drops every queued operation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Applies every operation to `ctx` in recording order.
    pub fn replay(&self, ctx: &mut dyn RenderContext) -> Result<()> {
        for (name, op) in &self.entries {
            match op {
                ContextOp::Call(args) => ctx.call(name, args)?,
                ContextOp::Assign(value) => ctx.assign(name, value)?,
            }
        }
        Ok(())
    }
}

/// One call observed by a [`RecordingContext`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// `save()`.
    Save,
    /// `restore()`.
    Restore,
    /// `transform(m11, m12, m21, m22, dx, dy)`.
    Transform([f64; 6]),
    /// `translate(x, y)`.
    Translate(f64, f64),
    /// `globalAlpha = value`.
    GlobalAlpha(f64),
    /// `globalCompositeOperation = value`.
    CompositeOperation(String),
    /// Image smoothing flag assignment.
    ImageSmoothing(bool),
    /// `shadowColor = value`.
    ShadowColor(String),
    /// `shadowOffsetX = value`.
    ShadowOffsetX(f64),
    /// `shadowOffsetY = value`.
    ShadowOffsetY(f64),
    /// `shadowBlur = value`.
    ShadowBlur(f64),
    /// `fillStyle = value`.
    FillStyle(String),
    /// `fillRect(rect)`.
    FillRect(Rect),
    /// `strokeStyle = value`.
    StrokeStyle(String),
    /// `strokeRect(rect)`.
    StrokeRect(Rect),
    /// `drawImage(image, source, dest)`.
    DrawImage {
        /// Image handle.
        image: ImageId,
        /// Region of the image that was sampled.
        source: Rect,
        /// Region of the surface that was covered.
        dest: Rect,
    },
}

/// A headless context that records every call and tracks global alpha
/// across `save`/`restore`.
#[derive(Clone, Debug)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    alpha: f64,
    alpha_stack: Vec<f64>,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingContext {
    /// Creates an empty recording with global alpha 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            alpha: 1.0,
            alpha_stack: Vec::new(),
        }
    }

    /// Wraps a new recording in a [`SharedContext`]-compatible cell.
    #[must_use]
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Returns the recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Takes the recorded commands, leaving the recording empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        core::mem::take(&mut self.commands)
    }

    /// Current depth of the save stack.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.alpha_stack.len()
    }
}

impl RenderContext for RecordingContext {
    fn save(&mut self) {
        self.alpha_stack.push(self.alpha);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(alpha) = self.alpha_stack.pop() {
            self.alpha = alpha;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn transform(&mut self, m11: f64, m12: f64, m21: f64, m22: f64, dx: f64, dy: f64) {
        self.commands
            .push(DrawCommand::Transform([m11, m12, m21, m22, dx, dy]));
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Translate(x, y));
    }

    fn global_alpha(&self) -> f64 {
        self.alpha
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn set_global_composite_operation(&mut self, op: &str) {
        self.commands
            .push(DrawCommand::CompositeOperation(op.to_string()));
    }

    fn set_image_smoothing_enabled(&mut self, enabled: bool) {
        self.commands.push(DrawCommand::ImageSmoothing(enabled));
    }

    fn set_shadow_color(&mut self, color: &str) {
        self.commands.push(DrawCommand::ShadowColor(color.to_string()));
    }

    fn set_shadow_offset_x(&mut self, offset: f64) {
        self.commands.push(DrawCommand::ShadowOffsetX(offset));
    }

    fn set_shadow_offset_y(&mut self, offset: f64) {
        self.commands.push(DrawCommand::ShadowOffsetY(offset));
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.commands.push(DrawCommand::ShadowBlur(blur));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.commands.push(DrawCommand::FillStyle(style.to_string()));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::FillRect(rect));
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.commands.push(DrawCommand::StrokeStyle(style.to_string()));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::StrokeRect(rect));
    }

    fn draw_image(&mut self, image: ImageId, source: Rect, dest: Rect) {
        self.commands.push(DrawCommand::DrawImage {
            image,
            source,
            dest,
        });
    }
}
