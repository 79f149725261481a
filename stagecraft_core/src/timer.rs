// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recurring frame timer.
//!
//! A [`FrameTimer`] is the per-sprite-sheet interval that advances animation
//! frames. It runs on its own schedule: the host polls it with the current
//! [`HostTime`] whenever convenient and receives the number of intervals
//! that elapsed since the previous poll. It is never driven by the render
//! pass, so a render may show the same frame twice or skip one.

use crate::error::{Result, StagecraftError};
use crate::time::{Duration, HostTime, Timebase};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// A fixed-rate recurring timer that can be started and cancelled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameTimer {
    interval: Duration,
    next_due: Option<HostTime>,
}

impl FrameTimer {
    /// Creates a stopped timer firing `frames_per_second` times per second.
    pub fn new(frames_per_second: f64, timebase: Timebase) -> Result<Self> {
        Ok(Self {
            interval: interval_for(frames_per_second, timebase)?,
            next_due: None,
        })
    }

    /// Returns the interval between firings.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns when the timer next fires, if it is running.
    #[must_use]
    pub fn next_due(&self) -> Option<HostTime> {
        self.next_due
    }

    /// Starts (or restarts) the timer; the first firing is one interval
    /// after `now`.
    pub fn start(&mut self, now: HostTime) {
        self.next_due = Some(now.saturating_add(self.interval));
    }

    /// Stops the timer. Polling a cancelled timer never fires.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Whether the timer is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Changes the firing rate. A running timer keeps its next due time.
    pub fn set_rate(&mut self, frames_per_second: f64, timebase: Timebase) -> Result<()> {
        self.interval = interval_for(frames_per_second, timebase)?;
        Ok(())
    }

    /// Returns how many times the timer fired between the previous poll and
    /// `now`, and schedules the next firing.
    ///
    /// The schedule is fixed-rate: a late poll reports every missed firing
    /// rather than drifting.
    pub fn poll(&mut self, now: HostTime) -> u64 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }
        let step = self.interval.ticks();
        let fired = (now - due).ticks() / step + 1;
        self.next_due = Some(due.saturating_add(Duration(fired.saturating_mul(step))));
        fired
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "interval is validated finite and positive; sub-nanosecond precision is irrelevant"
)]
fn interval_for(frames_per_second: f64, timebase: Timebase) -> Result<Duration> {
    if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
        return Err(StagecraftError::InvalidFrameRate(frames_per_second));
    }
    if !timebase.is_valid() {
        return Err(StagecraftError::InvalidTimebase {
            numer: timebase.numer,
            denom: timebase.denom,
        });
    }
    let nanos = (NANOS_PER_SECOND / frames_per_second) as u64;
    Ok(Duration(timebase.nanos_to_ticks(nanos).max(1)))
}
