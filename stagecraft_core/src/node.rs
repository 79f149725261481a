// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display nodes.
//!
//! A [`DisplayNode`] carries the spatial and visual state of one renderable
//! entity. Its effective size, visibility and transform matrix are always
//! derived from the raw fields and never stored independently:
//!
//! - `width = raw_width * |scale_x|`, `height = raw_height * |scale_y|`
//! - `visible = raw_visible && alpha > 0 && scale_x != 0 && scale_y != 0`
//! - the matrix is recomputed on every [`update_context`](DisplayNode::update_context)
//!
//! Nodes live in a [`Scene`](crate::scene::Scene), which owns hierarchy,
//! assigns contexts and drives collision checks from its update tick.

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Size};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::collision::{Bounds, Collider, ColliderKey, boxes_overlap};
use crate::context::{ContextOp, ContextOperations, SharedContext};
use crate::error::{Result, StagecraftError};
use crate::event::{EventHandlers, EventKind, NodeEvent};
use crate::id::{NodeId, generate_unique_id};
use crate::trace::{CollisionTraceEvent, CollisionTransition, Tracer};
use crate::transform::{Matrix2d, TransformParams};

/// Construction options for a [`DisplayNode`].
///
/// Every field has a default; `..NodeOptions::default()` fills the rest.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeOptions {
    /// String id. Generated when `None`.
    pub id: Option<String>,
    /// Left edge in parent space.
    pub x: f64,
    /// Top edge in parent space.
    pub y: f64,
    /// Unscaled width.
    pub width: f64,
    /// Unscaled height.
    pub height: f64,
    /// Horizontal pivot in local units.
    pub pivot_x: f64,
    /// Vertical pivot in local units.
    pub pivot_y: f64,
    /// Horizontal skew in degrees.
    pub skew_x: f64,
    /// Vertical skew in degrees.
    pub skew_y: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Opacity multiplier.
    pub alpha: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Image smoothing flag applied to the context.
    pub smooth: bool,
    /// Geometry used for collision testing.
    pub collider: Collider,
    /// Raw visibility flag.
    pub visible: bool,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            id: None,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            alpha: 1.0,
            rotation: 0.0,
            smooth: false,
            collider: Collider::Own,
            visible: true,
        }
    }
}

/// Shadow settings as given by callers; unset fields take defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShadowOptions {
    /// Shadow color. Defaults to `"#000"`.
    pub color: Option<String>,
    /// Horizontal offset. Defaults to 0.
    pub offset_x: Option<f64>,
    /// Vertical offset. Defaults to 0.
    pub offset_y: Option<f64>,
    /// Blur radius. Defaults to 1.
    pub blur: Option<f64>,
}

/// A normalized shadow descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow color.
    pub color: String,
    /// Horizontal offset.
    pub offset_x: f64,
    /// Vertical offset.
    pub offset_y: f64,
    /// Blur radius.
    pub blur: f64,
}

impl From<ShadowOptions> for Shadow {
    fn from(o: ShadowOptions) -> Self {
        Self {
            color: o.color.unwrap_or_else(|| "#000".to_string()),
            offset_x: o.offset_x.unwrap_or(0.0),
            offset_y: o.offset_y.unwrap_or(0.0),
            blur: o.blur.unwrap_or(1.0),
        }
    }
}

/// A renderable, collidable node.
pub struct DisplayNode {
    id: String,

    /// Left edge in parent space.
    pub x: f64,
    /// Top edge in parent space.
    pub y: f64,
    /// Horizontal pivot in local units.
    pub pivot_x: f64,
    /// Vertical pivot in local units.
    pub pivot_y: f64,
    /// Horizontal scale. Negative values mirror; zero hides the node.
    pub scale_x: f64,
    /// Vertical scale. Negative values mirror; zero hides the node.
    pub scale_y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Horizontal skew in degrees.
    pub skew_x: f64,
    /// Vertical skew in degrees.
    pub skew_y: f64,
    /// Mirror horizontally about the node's own box.
    pub flip_x: bool,
    /// Mirror vertically about the node's own box.
    pub flip_y: bool,
    /// Opacity multiplier; compounds down the hierarchy.
    pub alpha: f64,
    /// Image smoothing flag.
    pub smooth: bool,

    raw_width: f64,
    raw_height: f64,
    raw_visible: bool,
    shadow: Option<Shadow>,
    composite_operation: Option<String>,

    // -- Hierarchy (owned by the scene) --
    pub(crate) parent: Option<NodeId>,
    pub(crate) index: Option<usize>,
    context: Option<SharedContext>,

    // -- Collision --
    collider: Collider,
    collision_targets: Vec<NodeId>,
    collision_active: BTreeSet<ColliderKey>,

    matrix: Matrix2d,
    operations: ContextOperations,
    handlers: EventHandlers,
}

impl fmt::Debug for DisplayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayNode")
            .field("id", &self.id)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("visible", &self.visible())
            .field("parent", &self.parent)
            .field("collider", &self.collider)
            .field("collision_targets", &self.collision_targets)
            .finish_non_exhaustive()
    }
}

impl DisplayNode {
    /// Creates a node from options.
    #[must_use]
    pub fn new(options: NodeOptions) -> Self {
        Self {
            id: options.id.unwrap_or_else(generate_unique_id),
            x: options.x,
            y: options.y,
            pivot_x: options.pivot_x,
            pivot_y: options.pivot_y,
            scale_x: options.scale_x,
            scale_y: options.scale_y,
            rotation: options.rotation,
            skew_x: options.skew_x,
            skew_y: options.skew_y,
            flip_x: false,
            flip_y: false,
            alpha: options.alpha,
            smooth: options.smooth,
            raw_width: options.width,
            raw_height: options.height,
            raw_visible: options.visible,
            shadow: None,
            composite_operation: None,
            parent: None,
            index: None,
            context: None,
            collider: options.collider,
            collision_targets: Vec::new(),
            collision_active: BTreeSet::new(),
            matrix: Matrix2d::IDENTITY,
            operations: ContextOperations::default(),
            handlers: EventHandlers::default(),
        }
    }

    /// Returns the node's string id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    // -- Derived geometry --

    /// Effective width: `raw_width * |scale_x|`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.raw_width * self.scale_x.abs()
    }

    /// Effective height: `raw_height * |scale_y|`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.raw_height * self.scale_y.abs()
    }

    /// Right edge: `x + width`.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width()
    }

    /// Bottom edge: `y + height`.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height()
    }

    /// Unscaled size.
    #[must_use]
    pub fn raw_size(&self) -> Size {
        Size::new(self.raw_width, self.raw_height)
    }

    /// Sets the unscaled size.
    pub fn set_raw_size(&mut self, width: f64, height: f64) {
        self.raw_width = width;
        self.raw_height = height;
    }

    /// Axis-aligned bounds `{x, y, width, height}` at the current scale.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size((self.x, self.y), (self.width(), self.height()))
    }

    // -- Visibility --

    /// Whether the node should be drawn at all.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.raw_visible && self.alpha > 0.0 && self.scale_x != 0.0 && self.scale_y != 0.0
    }

    /// Sets the raw visibility flag.
    pub fn set_visible(&mut self, visible: bool) {
        self.raw_visible = visible;
    }

    // -- Hierarchy --

    /// The containing node, if any.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Position among the parent's children.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The rendering context, if one was assigned.
    #[must_use]
    pub fn context(&self) -> Option<&SharedContext> {
        self.context.as_ref()
    }

    /// Assigns the rendering context.
    pub fn set_context(&mut self, ctx: SharedContext) {
        self.context = Some(ctx);
    }

    // -- Events --

    /// Subscribes a handler to this node's events.
    pub fn bind(&mut self, kind: EventKind, handler: impl FnMut(&NodeEvent) + 'static) -> &mut Self {
        self.handlers.bind(kind, handler);
        self
    }

    /// Delivers an event to this node's handlers.
    pub fn trigger(&mut self, event: &NodeEvent) {
        self.handlers.trigger(event);
    }

    // -- Transform state --

    /// Sets both scale factors directly.
    pub fn scale(&mut self, scale_x: f64, scale_y: f64) -> &mut Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Sets the rotation in degrees.
    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        self.rotation = angle;
        self
    }

    /// Sets the composite operation applied by [`update_context`](Self::update_context).
    pub fn composite(&mut self, op: impl Into<String>) -> &mut Self {
        self.composite_operation = Some(op.into());
        self
    }

    /// Returns the composite operation, if set.
    #[must_use]
    pub fn composite_operation(&self) -> Option<&str> {
        self.composite_operation.as_deref()
    }

    /// Sets or clears the shadow.
    pub fn shadow(&mut self, options: Option<ShadowOptions>) -> &mut Self {
        self.shadow = options.map(Shadow::from);
        self
    }

    /// Returns the normalized shadow, if set.
    #[must_use]
    pub fn shadow_descriptor(&self) -> Option<&Shadow> {
        self.shadow.as_ref()
    }

    // -- Deferred context operations --

    /// Queues `translate(x, y)`.
    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.record_operation("translate", ContextOp::Call(vec![x, y]))
    }

    /// Queues `transform(m11, m12, m21, m22, dx, dy)`.
    pub fn transform(&mut self, m11: f64, m12: f64, m21: f64, m22: f64, dx: f64, dy: f64) -> &mut Self {
        self.record_operation("transform", ContextOp::Call(vec![m11, m12, m21, m22, dx, dy]))
    }

    /// Queues a `fillStyle` assignment.
    pub fn fill_style(&mut self, color: impl fmt::Display) -> &mut Self {
        self.record_operation("fillStyle", ContextOp::Assign(color.to_string()))
    }

    /// Queues `fillRect(x, y, width, height)`.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.record_operation("fillRect", ContextOp::Call(vec![x, y, width, height]))
    }

    /// Queues any named context operation, replacing an earlier one of the
    /// same name.
    pub fn record_operation(&mut self, name: &str, op: ContextOp) -> &mut Self {
        self.operations.record(name, op);
        self
    }

    /// The queued operations.
    #[must_use]
    pub fn operations(&self) -> &ContextOperations {
        &self.operations
    }

    /// Whether any operations are queued.
    #[must_use]
    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }

    // -- Matrix and context --

    /// Inputs for the transform composition, with flips folded in.
    ///
    /// Flipping mirrors the origin to the far edge and negates the scale.
    #[must_use]
    pub fn transform_params(&self) -> TransformParams {
        let (x, scale_x) = if self.flip_x {
            (self.x + self.width(), -self.scale_x)
        } else {
            (self.x, self.scale_x)
        };
        let (y, scale_y) = if self.flip_y {
            (self.y + self.height(), -self.scale_y)
        } else {
            (self.y, self.scale_y)
        };
        TransformParams {
            x,
            y,
            scale_x,
            scale_y,
            rotation: self.rotation,
            skew_x: self.skew_x,
            skew_y: self.skew_y,
            pivot_x: self.pivot_x,
            pivot_y: self.pivot_y,
        }
    }

    /// Recomputes the cached matrix from current state.
    pub fn update_matrix(&mut self) -> Matrix2d {
        let params = self.transform_params();
        *self.matrix.identity().append_transform(&params)
    }

    /// Returns a copy of the cached matrix.
    #[must_use]
    pub fn matrix(&self) -> Matrix2d {
        self.matrix
    }

    fn require_context(&self) -> Result<SharedContext> {
        self.context
            .clone()
            .ok_or_else(|| StagecraftError::MissingContext(self.id.clone()))
    }

    /// Pushes this node's transform and visual state onto its context.
    ///
    /// The context must already be positioned at the parent's origin. The
    /// matrix is multiplied onto the current transform and alpha multiplies
    /// the current global alpha, so both compound down the hierarchy.
    pub fn update_context(&mut self) -> Result<()> {
        let ctx = self.require_context()?;
        let m = self.update_matrix();
        let mut ctx = ctx.borrow_mut();

        ctx.transform(m.m11(), m.m12(), m.m21(), m.m22(), m.dx(), m.dy());
        let alpha = ctx.global_alpha() * self.alpha;
        ctx.set_global_alpha(alpha);

        if let Some(op) = &self.composite_operation {
            ctx.set_global_composite_operation(op);
        }

        ctx.set_image_smoothing_enabled(self.smooth);

        if let Some(shadow) = &self.shadow {
            ctx.set_shadow_color(&shadow.color);
            ctx.set_shadow_offset_x(shadow.offset_x);
            ctx.set_shadow_offset_y(shadow.offset_y);
            ctx.set_shadow_blur(shadow.blur);
        }
        Ok(())
    }

    /// Replays queued context operations in recording order.
    pub fn render(&mut self) -> Result<()> {
        if self.operations.is_empty() {
            return Ok(());
        }
        let ctx = self.require_context()?;
        let mut ctx = ctx.borrow_mut();
        self.operations.replay(&mut *ctx)
    }

    // -- Collision --

    /// Returns the collider.
    #[must_use]
    pub fn collider(&self) -> Collider {
        self.collider
    }

    /// Replaces the collider.
    pub fn set_collider(&mut self, collider: Collider) {
        self.collider = collider;
    }

    /// Adds `other` to the targets tested each tick.
    ///
    /// No de-duplication: adding the same target twice tests it twice.
    pub fn allow_collision_from(&mut self, other: NodeId) -> &mut Self {
        self.collision_targets.push(other);
        self
    }

    /// The registered collision targets, in order.
    #[must_use]
    pub fn collision_targets(&self) -> &[NodeId] {
        &self.collision_targets
    }

    /// Whether the collider identified by `key` is currently overlapping.
    #[must_use]
    pub fn is_colliding_with(&self, key: ColliderKey) -> bool {
        self.collision_active.contains(&key)
    }

    /// Axis-aligned overlap test against anything with bounds.
    pub fn collide(&self, other: &impl Bounds) -> Result<bool> {
        boxes_overlap(self.bounds(), other.bounds())
    }

    pub(crate) fn forget_target(&mut self, target: NodeId) {
        self.collision_targets.retain(|t| *t != target);
    }

    /// Keeps edge memory only for the given collider keys.
    pub(crate) fn retain_collisions(&mut self, live: &BTreeSet<ColliderKey>) {
        self.collision_active.retain(|key| live.contains(key));
    }

    /// Applies one target's overlap result, firing edge events.
    pub(crate) fn observe_overlap(
        &mut self,
        me: NodeId,
        target: NodeId,
        key: ColliderKey,
        overlapping: bool,
        tracer: &mut Tracer<'_>,
    ) {
        let mut edge = |transition| {
            tracer.collision(&CollisionTraceEvent {
                node: me,
                target,
                transition,
            });
        };
        if overlapping {
            if self.collision_active.insert(key) {
                edge(CollisionTransition::Enter);
                self.handlers.trigger(&NodeEvent::CollisionEnter(target));
            }
            edge(CollisionTransition::Continue);
            self.handlers.trigger(&NodeEvent::Collision(target));
        } else if self.collision_active.remove(&key) {
            edge(CollisionTransition::Exit);
            self.handlers.trigger(&NodeEvent::CollisionExit(target));
        }
    }
}

impl Bounds for DisplayNode {
    fn bounds(&self) -> Rect {
        Self::bounds(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DrawCommand, RecordingContext, RenderContext};
    use alloc::rc::Rc;
    use core::cell::RefCell;

    fn node_at(x: f64, y: f64, w: f64, h: f64) -> DisplayNode {
        DisplayNode::new(NodeOptions {
            x,
            y,
            width: w,
            height: h,
            ..NodeOptions::default()
        })
    }

    #[test]
    fn defaults() {
        let n = DisplayNode::new(NodeOptions::default());
        assert!(n.id().starts_with("stagecraft-"));
        assert_eq!((n.scale_x, n.scale_y, n.alpha), (1.0, 1.0, 1.0));
        assert_eq!(n.collider(), Collider::Own);
        assert!(n.visible());
        assert_eq!(n.matrix(), Matrix2d::IDENTITY);
    }

    #[test]
    fn explicit_id_is_kept() {
        let n = DisplayNode::new(NodeOptions {
            id: Some("hero".into()),
            ..NodeOptions::default()
        });
        assert_eq!(n.id(), "hero");
    }

    #[test]
    fn size_follows_absolute_scale() {
        let mut n = node_at(0.0, 0.0, 10.0, 4.0);
        for (sx, sy) in [(2.0, 0.5), (-2.0, -0.5), (0.0, 1.0), (-1.0, 3.0)] {
            n.scale(sx, sy);
            assert_eq!(n.width(), 10.0 * f64::abs(sx), "scale_x {sx}");
            assert_eq!(n.height(), 4.0 * f64::abs(sy), "scale_y {sy}");
        }
        n.scale(2.0, 2.0);
        assert_eq!((n.right(), n.bottom()), (20.0, 8.0));
    }

    #[test]
    fn visibility_is_derived() {
        let mut n = node_at(0.0, 0.0, 1.0, 1.0);
        assert!(n.visible());
        n.scale(0.0, 1.0);
        assert!(!n.visible(), "zero scale_x hides");
        n.scale(-1.0, 1.0);
        assert!(n.visible(), "negative scale stays visible");
        n.alpha = 0.0;
        assert!(!n.visible(), "zero alpha hides");
        n.alpha = -0.5;
        assert!(!n.visible(), "negative alpha hides");
        n.alpha = 0.5;
        n.set_visible(false);
        assert!(!n.visible(), "raw flag hides");
    }

    #[test]
    fn shadow_is_normalized() {
        let mut n = node_at(0.0, 0.0, 1.0, 1.0);
        n.shadow(Some(ShadowOptions {
            offset_x: Some(3.0),
            ..ShadowOptions::default()
        }));
        assert_eq!(
            n.shadow_descriptor(),
            Some(&Shadow {
                color: "#000".into(),
                offset_x: 3.0,
                offset_y: 0.0,
                blur: 1.0,
            })
        );
        n.shadow(None);
        assert!(n.shadow_descriptor().is_none());
    }

    #[test]
    fn deferred_operations_replace_by_name() {
        let mut n = node_at(0.0, 0.0, 1.0, 1.0);
        assert!(!n.has_operations());
        n.translate(1.0, 1.0).fill_style("red").translate(5.0, 6.0);
        assert!(n.has_operations());
        assert_eq!(n.operations().len(), 2);
        assert_eq!(
            n.operations().get("translate"),
            Some(&ContextOp::Call(vec![5.0, 6.0]))
        );
    }

    #[test]
    fn transform_alone_marks_pending() {
        let mut n = node_at(0.0, 0.0, 1.0, 1.0);
        n.transform(1.0, 0.0, 0.0, 1.0, 2.0, 3.0);
        assert!(n.has_operations());
    }

    #[test]
    fn update_context_without_context_fails() {
        let mut n = DisplayNode::new(NodeOptions {
            id: Some("orphan".into()),
            ..NodeOptions::default()
        });
        assert_eq!(
            n.update_context(),
            Err(StagecraftError::MissingContext("orphan".into()))
        );
    }

    #[test]
    fn update_context_pushes_state() {
        let rec = RecordingContext::shared();
        let mut n = node_at(10.0, 20.0, 4.0, 4.0);
        n.alpha = 0.5;
        n.smooth = true;
        n.composite("lighter");
        n.shadow(Some(ShadowOptions {
            color: Some("blue".into()),
            blur: Some(4.0),
            ..ShadowOptions::default()
        }));
        n.set_context(rec.clone());
        rec.borrow_mut().set_global_alpha(0.5);
        rec.borrow_mut().take_commands();

        n.update_context().unwrap();
        assert_eq!(
            rec.borrow().commands(),
            &[
                DrawCommand::Transform([1.0, 0.0, 0.0, 1.0, 10.0, 20.0]),
                DrawCommand::GlobalAlpha(0.25),
                DrawCommand::CompositeOperation("lighter".into()),
                DrawCommand::ImageSmoothing(true),
                DrawCommand::ShadowColor("blue".into()),
                DrawCommand::ShadowOffsetX(0.0),
                DrawCommand::ShadowOffsetY(0.0),
                DrawCommand::ShadowBlur(4.0),
            ]
        );
    }

    #[test]
    fn flip_mirrors_about_far_edge() {
        let mut n = node_at(10.0, 0.0, 8.0, 4.0);
        n.flip_x = true;
        let m = n.update_matrix();
        assert_eq!(m.as_coeffs(), [-1.0, 0.0, 0.0, 1.0, 18.0, 0.0]);
        // Local origin lands on the right edge, local far edge on the left.
        let p = m.to_affine() * kurbo::Point::new(8.0, 0.0);
        assert_eq!(p.x, 10.0);
    }

    #[test]
    fn get_matrix_is_a_copy() {
        let mut n = node_at(3.0, 4.0, 1.0, 1.0);
        n.update_matrix();
        let mut copy = n.matrix();
        copy.identity();
        assert_eq!(n.matrix().dx(), 3.0, "internal matrix untouched");
    }

    #[test]
    fn render_replays_operations() {
        let rec = RecordingContext::shared();
        let mut n = node_at(0.0, 0.0, 1.0, 1.0);
        n.set_context(rec.clone());
        n.fill_style("#0f0").fill_rect(0.0, 0.0, 2.0, 2.0);
        n.render().unwrap();
        assert_eq!(
            rec.borrow().commands(),
            &[
                DrawCommand::FillStyle("#0f0".into()),
                DrawCommand::FillRect(Rect::new(0.0, 0.0, 2.0, 2.0)),
            ]
        );
    }

    #[test]
    fn render_without_operations_needs_no_context() {
        let mut n = node_at(0.0, 0.0, 1.0, 1.0);
        assert_eq!(n.render(), Ok(()));
    }

    #[test]
    fn collide_scenario() {
        let a = node_at(0.0, 0.0, 10.0, 10.0);
        let mut b = node_at(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.collide(&b), Ok(true));
        assert_eq!(b.collide(&a), Ok(true));
        b.x = 20.0;
        b.y = 20.0;
        assert_eq!(a.collide(&b), Ok(false));
    }

    #[test]
    fn collide_rejects_nan_geometry() {
        let a = node_at(0.0, 0.0, 10.0, 10.0);
        let bad = node_at(f64::NAN, 0.0, 1.0, 1.0);
        assert!(a.collide(&bad).is_err());
    }

    #[test]
    fn observe_overlap_is_edge_triggered() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let me = NodeId {
            idx: 0,
            generation: 0,
        };
        let target = NodeId {
            idx: 1,
            generation: 0,
        };
        let key = ColliderKey::Node(target);
        let mut n = node_at(0.0, 0.0, 1.0, 1.0);
        for kind in [
            EventKind::CollisionEnter,
            EventKind::Collision,
            EventKind::CollisionExit,
        ] {
            let log = log.clone();
            n.bind(kind, move |e| log.borrow_mut().push(*e));
        }

        let mut tracer = Tracer::none();
        for overlapping in [true, true, false, false, true] {
            n.observe_overlap(me, target, key, overlapping, &mut tracer);
        }
        assert_eq!(
            *log.borrow(),
            vec![
                NodeEvent::CollisionEnter(target),
                NodeEvent::Collision(target),
                NodeEvent::Collision(target),
                NodeEvent::CollisionExit(target),
                NodeEvent::CollisionEnter(target),
                NodeEvent::Collision(target),
            ]
        );
        assert!(n.is_colliding_with(key));
    }
}
