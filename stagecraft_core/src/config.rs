// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-wide configuration.

use alloc::borrow::Cow;

use crate::time::Timebase;

/// Debug drawing options, passed explicitly to every render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugOptions {
    /// Stroke an outline around every sprite sheet frame.
    pub outline: bool,
    /// Stroke style used for outlines.
    pub outline_color: Cow<'static, str>,
}

impl DebugOptions {
    /// Debug drawing disabled.
    pub const OFF: Self = Self {
        outline: false,
        outline_color: Cow::Borrowed("red"),
    };

    /// Red outlines around sprite frames.
    pub const OUTLINES: Self = Self {
        outline: true,
        outline_color: Cow::Borrowed("red"),
    };
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self::OFF
    }
}

/// Configuration for a [`Scene`](crate::scene::Scene).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneConfig {
    /// Unit of the [`HostTime`](crate::time::HostTime) values the host passes
    /// to [`Scene::advance_animations`](crate::scene::Scene::advance_animations).
    pub timebase: Timebase,
    /// Debug drawing.
    pub debug: DebugOptions,
}

impl SceneConfig {
    /// Host time in milliseconds, debug drawing off.
    #[must_use]
    pub const fn millis() -> Self {
        Self {
            timebase: Timebase::MILLIS,
            debug: DebugOptions::OFF,
        }
    }

    /// Host time in nanoseconds, debug drawing off.
    #[must_use]
    pub const fn nanos() -> Self {
        Self {
            timebase: Timebase::NANOS,
            debug: DebugOptions::OFF,
        }
    }

    /// Returns this configuration with debug outlines enabled.
    #[must_use]
    pub fn with_debug_outlines(mut self) -> Self {
        self.debug = DebugOptions::OUTLINES;
        self
    }
}
