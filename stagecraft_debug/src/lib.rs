// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON-lines trace output for stagecraft scenes.
//!
//! This crate provides [`TraceSink`](stagecraft_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`json::JsonLinesSink`]: one JSON object per line, for feeding into
//!   log processors or diffing between runs.

pub mod json;
pub mod pretty;
