//! Shared test utilities for `weave_core` integration tests.
//!
//! This module provides common helpers used across multiple test files.
//! Import via `mod test_utils;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities — not all items used in every test binary"
)]

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use weave_core::prelude::*;
use weave_profiler::Profiler;

// ═══════════════════════════════════════════════════════════════════════════════
// EXECUTION TRACKING
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared, ordered log of execution checkpoints.
#[derive(Clone, Default)]
pub struct ExecutionLog(Arc<Mutex<Vec<&'static str>>>);

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: &'static str) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

/// A pluggable whose implementation counts its calls and returns `value`.
pub fn counting(name: &'static str, value: i64) -> (Pluggable, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let pluggable = Pluggable::new(name, move |_cx, _args| {
        let seen = Arc::clone(&seen);
        async move {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(json!(value))
        }
    });
    (pluggable, calls)
}

/// A pluggable whose implementation logs `name` and returns `value`.
pub fn logged(name: &'static str, value: i64, log: &ExecutionLog) -> Pluggable {
    let log = log.clone();
    Pluggable::new(name, move |_cx, _args| {
        let log = log.clone();
        async move {
            log.push(name);
            Ok(json!(value))
        }
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTEXT SETUP
// ═══════════════════════════════════════════════════════════════════════════════

/// A profiler isolated from the process-wide one, for timing assertions.
pub fn fresh_profiler() -> Arc<Profiler> {
    Arc::new(Profiler::new())
}

/// A profiler isolated from the process-wide one, already enabled.
pub fn enabled_profiler() -> Arc<Profiler> {
    let profiler = fresh_profiler();
    profiler.set_enabled(true);
    profiler
}
