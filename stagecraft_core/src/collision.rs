// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colliders and the axis-aligned overlap test.
//!
//! A node tests its targets through their *collider*: the node itself by
//! default, another node, or a free-standing shape registered with the
//! scene. Edge-trigger memory is keyed by [`ColliderKey`], the identity of
//! the resolved collider, so two targets sharing one collider are tracked
//! as a single overlap.
//!
//! Boxes are closed-open. Touching edges do not overlap.

use kurbo::{Circle, Rect, Shape};

use crate::error::{Result, StagecraftError};
use crate::id::{NodeId, ShapeId};

/// Geometry usable as a free-standing collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A circle, tested through its bounding box.
    Circle(Circle),
}

impl ColliderShape {
    /// Returns the axis-aligned box used for overlap testing.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Rect(r) => r.abs(),
            Self::Circle(c) => c.bounding_box(),
        }
    }
}

impl From<Rect> for ColliderShape {
    fn from(r: Rect) -> Self {
        Self::Rect(r)
    }
}

impl From<Circle> for ColliderShape {
    fn from(c: Circle) -> Self {
        Self::Circle(c)
    }
}

/// What a node collides *as*.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Collider {
    /// The owning node's own bounds.
    #[default]
    Own,
    /// Another node's bounds.
    Node(NodeId),
    /// A shape registered with [`Scene::add_collider_shape`](crate::scene::Scene::add_collider_shape).
    Shape(ShapeId),
}

impl Collider {
    /// Resolves this collider to an identity key, given the node that owns it.
    #[must_use]
    pub const fn key(self, owner: NodeId) -> ColliderKey {
        match self {
            Self::Own => ColliderKey::Node(owner),
            Self::Node(id) => ColliderKey::Node(id),
            Self::Shape(id) => ColliderKey::Shape(id),
        }
    }
}

/// Identity of a resolved collider, used as the edge-trigger map key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColliderKey {
    /// A node's bounds.
    Node(NodeId),
    /// A registered shape.
    Shape(ShapeId),
}

/// Anything exposing an axis-aligned box.
pub trait Bounds {
    /// Returns the box as `x, y, width, height` in a [`Rect`].
    fn bounds(&self) -> Rect;
}

impl Bounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

impl Bounds for Circle {
    fn bounds(&self) -> Rect {
        self.bounding_box()
    }
}

impl Bounds for ColliderShape {
    fn bounds(&self) -> Rect {
        self.bounding_box()
    }
}

/// Validates a box for collision testing.
///
/// Every edge must be finite and the box must not be inverted.
pub fn validate_box(r: Rect) -> Result<Rect> {
    if !(r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()) {
        return Err(StagecraftError::InvalidGeometry("collision box is not finite"));
    }
    if r.x1 < r.x0 || r.y1 < r.y0 {
        return Err(StagecraftError::InvalidGeometry("collision box has negative size"));
    }
    Ok(r)
}

/// Closed-open axis-aligned overlap test.
///
/// Returns `true` unless the boxes are separated on either axis. A box whose
/// near edge is at or beyond the other's far edge counts as separated.
pub fn boxes_overlap(a: Rect, b: Rect) -> Result<bool> {
    let a = validate_box(a)?;
    let b = validate_box(b)?;
    Ok(!(a.x0 >= b.x1 || b.x0 >= a.x1 || a.y0 >= b.y1 || b.y0 >= a.y1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xywh(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::from_origin_size((x, y), (w, h))
    }

    #[test]
    fn overlapping_boxes() {
        assert_eq!(boxes_overlap(xywh(0., 0., 10., 10.), xywh(5., 5., 10., 10.)), Ok(true));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        assert_eq!(boxes_overlap(xywh(0., 0., 10., 10.), xywh(10., 0., 5., 5.)), Ok(false));
        assert_eq!(boxes_overlap(xywh(0., 0., 10., 10.), xywh(0., 10., 5., 5.)), Ok(false));
    }

    #[test]
    fn overlap_is_symmetric() {
        let boxes = [
            xywh(0., 0., 10., 10.),
            xywh(5., 5., 10., 10.),
            xywh(10., 0., 1., 1.),
            xywh(-3., 2., 4., 1.),
            xywh(20., 20., 10., 10.),
            xywh(2., 2., 0., 0.),
        ];
        for a in boxes {
            for b in boxes {
                assert_eq!(
                    boxes_overlap(a, b),
                    boxes_overlap(b, a),
                    "asymmetric for {a:?} / {b:?}"
                );
            }
        }
    }

    #[test]
    fn non_finite_box_is_rejected() {
        let bad = Rect::new(0.0, 0.0, f64::NAN, 1.0);
        assert!(matches!(
            boxes_overlap(bad, xywh(0., 0., 1., 1.)),
            Err(StagecraftError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn inverted_box_is_rejected() {
        let inverted = Rect::new(5.0, 5.0, 0.0, 0.0);
        assert!(validate_box(inverted).is_err());
    }

    #[test]
    fn circle_collides_through_its_bounding_box() {
        let c = ColliderShape::from(Circle::new((5.0, 5.0), 5.0));
        assert_eq!(c.bounding_box(), xywh(0., 0., 10., 10.));
        assert_eq!(boxes_overlap(c.bounds(), xywh(9., 9., 2., 2.)), Ok(true));
    }

    #[test]
    fn collider_keys_share_identity() {
        let target = NodeId {
            idx: 4,
            generation: 0,
        };
        let other = NodeId {
            idx: 9,
            generation: 0,
        };
        assert_eq!(Collider::Own.key(target), Collider::Node(target).key(other));
    }
}
