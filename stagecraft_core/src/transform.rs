// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2-D affine transform composition for display nodes.
//!
//! [`Matrix2d`] wraps a [`kurbo::Affine`] and exposes the canvas-style
//! `m11, m12, m21, m22, dx, dy` coefficient names. Its
//! [`append_transform`](Matrix2d::append_transform) composes position,
//! scale, rotation, skew and pivot in one step:
//!
//! ```text
//! M' = M · T(x, y) · K(skewX, skewY) · R(rotation) · S(scaleX, scaleY) · T(-pivotX, -pivotY)
//! ```
//!
//! Rotation and skew angles are in degrees.

use kurbo::{Affine, Vec2};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;

/// Inputs to [`Matrix2d::append_transform`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformParams {
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Horizontal skew in degrees.
    pub skew_x: f64,
    /// Vertical skew in degrees.
    pub skew_y: f64,
    /// Horizontal pivot (registration point) in local units.
    pub pivot_x: f64,
    /// Vertical pivot (registration point) in local units.
    pub pivot_y: f64,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
        }
    }
}

/// A mutable 2-D affine matrix with canvas-style coefficient accessors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix2d(Affine);

impl Matrix2d {
    /// The identity matrix.
    pub const IDENTITY: Self = Self(Affine::IDENTITY);

    /// Creates a matrix from `[m11, m12, m21, m22, dx, dy]`.
    #[inline]
    #[must_use]
    pub const fn new(coeffs: [f64; 6]) -> Self {
        Self(Affine::new(coeffs))
    }

    /// Resets this matrix to identity in place.
    #[inline]
    pub fn identity(&mut self) -> &mut Self {
        self.0 = Affine::IDENTITY;
        self
    }

    /// Post-multiplies `[m11, m12, m21, m22, dx, dy]` onto this matrix.
    #[inline]
    pub fn append(&mut self, coeffs: [f64; 6]) -> &mut Self {
        self.0 = self.0 * Affine::new(coeffs);
        self
    }

    /// Composes a full display transform onto this matrix.
    pub fn append_transform(&mut self, p: &TransformParams) -> &mut Self {
        let (sin, cos) = if p.rotation % 360.0 != 0.0 {
            let r = p.rotation * DEG_TO_RAD;
            (r.sin(), r.cos())
        } else {
            (0.0, 1.0)
        };
        let rotate_scale = [
            cos * p.scale_x,
            sin * p.scale_x,
            -sin * p.scale_y,
            cos * p.scale_y,
        ];

        if p.skew_x != 0.0 || p.skew_y != 0.0 {
            let kx = p.skew_x * DEG_TO_RAD;
            let ky = p.skew_y * DEG_TO_RAD;
            self.append([ky.cos(), ky.sin(), -kx.sin(), kx.cos(), p.x, p.y]);
            let [a, b, c, d] = rotate_scale;
            self.append([a, b, c, d, 0.0, 0.0]);
        } else {
            let [a, b, c, d] = rotate_scale;
            self.append([a, b, c, d, p.x, p.y]);
        }

        if p.pivot_x != 0.0 || p.pivot_y != 0.0 {
            self.0 = self.0 * Affine::translate(Vec2::new(-p.pivot_x, -p.pivot_y));
        }
        self
    }

    /// Returns the underlying affine.
    #[inline]
    #[must_use]
    pub const fn to_affine(self) -> Affine {
        self.0
    }

    /// Returns `[m11, m12, m21, m22, dx, dy]`.
    #[inline]
    #[must_use]
    pub fn as_coeffs(self) -> [f64; 6] {
        self.0.as_coeffs()
    }

    /// Horizontal scaling / first column, first row.
    #[inline]
    #[must_use]
    pub fn m11(self) -> f64 {
        self.as_coeffs()[0]
    }

    /// Vertical skewing / first column, second row.
    #[inline]
    #[must_use]
    pub fn m12(self) -> f64 {
        self.as_coeffs()[1]
    }

    /// Horizontal skewing / second column, first row.
    #[inline]
    #[must_use]
    pub fn m21(self) -> f64 {
        self.as_coeffs()[2]
    }

    /// Vertical scaling / second column, second row.
    #[inline]
    #[must_use]
    pub fn m22(self) -> f64 {
        self.as_coeffs()[3]
    }

    /// Horizontal translation.
    #[inline]
    #[must_use]
    pub fn dx(self) -> f64 {
        self.as_coeffs()[4]
    }

    /// Vertical translation.
    #[inline]
    #[must_use]
    pub fn dy(self) -> f64 {
        self.as_coeffs()[5]
    }

    /// Is every coefficient finite?
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Default for Matrix2d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Affine> for Matrix2d {
    fn from(affine: Affine) -> Self {
        Self(affine)
    }
}
