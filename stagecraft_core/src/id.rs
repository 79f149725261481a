// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node, shape and image identity types.

use alloc::format;
use alloc::string::String;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

/// A handle to a node in a [`Scene`](crate::scene::Scene).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a node is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}@gen{})", self.idx, self.generation)
    }
}

/// A handle to a free-standing collider shape registered with a scene.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub(crate) u32);

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeId({})", self.0)
    }
}

/// An opaque reference to a loaded image.
///
/// Images are decoded and owned by the host; the core only forwards the
/// handle to [`RenderContext::draw_image`](crate::context::RenderContext::draw_image).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.0)
    }
}

static NEXT_UNIQUE: AtomicUsize = AtomicUsize::new(0);

/// Returns a process-unique string id for nodes created without one.
#[must_use]
pub fn generate_unique_id() -> String {
    let n = NEXT_UNIQUE.fetch_add(1, Ordering::Relaxed);
    format!("stagecraft-{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_ids_differ() {
        let a = generate_unique_id();
        let b = generate_unique_id();
        assert_ne!(a, b);
        assert!(a.starts_with("stagecraft-"), "unexpected prefix: {a}");
    }

    #[test]
    fn node_id_debug() {
        let id = NodeId {
            idx: 3,
            generation: 1,
        };
        assert_eq!(format!("{id:?}"), "NodeId(3@gen1)");
    }
}
