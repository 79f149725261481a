// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by every fallible operation in the crate.
//!
//! Missing optional configuration is absorbed by defaulting at construction
//! time. Everything else that would otherwise produce `NaN` geometry or an
//! undefined draw call surfaces here instead.

use alloc::string::String;
use core::fmt;

use crate::id::{NodeId, ShapeId};

/// Errors from node, sprite-sheet and scene operations.
#[derive(Clone, Debug, PartialEq)]
pub enum StagecraftError {
    /// `play` was called with a name that was never registered.
    UnknownAnimation(String),
    /// A node was asked to touch its rendering context before one was
    /// assigned. Carries the node's string id.
    MissingContext(String),
    /// The handle refers to a destroyed node.
    StaleNode(NodeId),
    /// A box or frame had a non-finite or negative component.
    InvalidGeometry(&'static str),
    /// An animation range whose last frame precedes its first.
    InvalidAnimationRange {
        /// Animation name.
        name: String,
        /// First frame as given.
        first: u32,
        /// Last frame as given.
        last: u32,
    },
    /// Frames per second must be finite and strictly positive.
    InvalidFrameRate(f64),
    /// A timebase with a zero numerator or denominator.
    InvalidTimebase {
        /// Numerator as given.
        numer: u32,
        /// Denominator as given.
        denom: u32,
    },
    /// The deferred-operation replay named something the context does not
    /// understand.
    UnknownOperation(String),
    /// A sprite-sheet operation was issued against a plain display node.
    NotASpriteSheet(NodeId),
    /// Nodes with children must have them removed before being destroyed.
    NodeHasChildren(NodeId),
    /// Attaching the child would make a node its own ancestor.
    HierarchyCycle(NodeId),
    /// The shape handle was never issued by this scene.
    UnknownShape(ShapeId),
}

impl fmt::Display for StagecraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAnimation(name) => write!(f, "no animation named {name:?}"),
            Self::MissingContext(id) => {
                write!(f, "node {id:?} has no rendering context assigned")
            }
            Self::StaleNode(id) => write!(f, "stale node handle {id:?}"),
            Self::InvalidGeometry(what) => write!(f, "invalid geometry: {what}"),
            Self::InvalidAnimationRange { name, first, last } => {
                write!(f, "animation {name:?} ends at frame {last} before it starts at {first}")
            }
            Self::InvalidFrameRate(fps) => {
                write!(f, "frames per second must be positive and finite (got {fps})")
            }
            Self::InvalidTimebase { numer, denom } => {
                write!(f, "timebase {numer}/{denom} has a zero term")
            }
            Self::UnknownOperation(name) => {
                write!(f, "rendering context has no operation named {name:?}")
            }
            Self::NotASpriteSheet(id) => write!(f, "node {id:?} is not a sprite sheet"),
            Self::NodeHasChildren(id) => {
                write!(f, "cannot destroy node {id:?} while it has children")
            }
            Self::HierarchyCycle(id) => {
                write!(f, "node {id:?} cannot be attached below its own subtree")
            }
            Self::UnknownShape(id) => write!(f, "unknown collider shape {id:?}"),
        }
    }
}

impl core::error::Error for StagecraftError {}

/// Shorthand for results carrying a [`StagecraftError`].
pub type Result<T, E = StagecraftError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_animation() {
        let err = StagecraftError::UnknownAnimation("walk".into());
        assert_eq!(err.to_string(), "no animation named \"walk\"");
    }

    #[test]
    fn display_frame_rate() {
        let err = StagecraftError::InvalidFrameRate(0.0);
        assert!(
            err.to_string().contains("got 0"),
            "message should carry the rejected value: {err}"
        );
    }
}
