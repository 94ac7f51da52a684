//! Invocation timing for the Weave pipeline core (Layer 0).
//!
//! A [`Profiler`] records how long named pluggable invocations take. Opening
//! an event captures a monotonic start timestamp; concluding it appends one
//! elapsed-time [`InvocationRecord`] to the profiler's shared record list.
//!
//! The profiler itself records unconditionally whenever an event is
//! concluded. The [`enablement flag`](Profiler::is_enabled) only governs
//! whether *callers* (the pluggable wrapper) bother opening events at all.
//!
//! # Process-wide instance
//!
//! Most callers use the process-wide profiler via [`Profiler::global`] or the
//! module-level convenience functions ([`create_event`], [`set_enabled`],
//! [`invocations`], [`clear`]). Tests that need isolation construct their own
//! `Profiler` and inject it as a collaborator instead.
//!
//! # Example
//!
//! ```
//! use weave_profiler::Profiler;
//!
//! let profiler = Profiler::new();
//! let event = profiler.start_event("resolve");
//! // ... timed work ...
//! event.conclude();
//!
//! let records = profiler.records();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].name, "resolve");
//! ```

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Instant;

use parking_lot::Mutex;
use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// InvocationRecord
// ─────────────────────────────────────────────────────────────────────────────

/// One concluded timing event: elapsed time, not absolute timestamps.
///
/// Elapsed time is split into whole seconds and remainder nanoseconds so
/// collaborators can report at whichever resolution they need without loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvocationRecord {
    /// Name of the pluggable (or other timed unit) this record belongs to.
    pub name: &'static str,
    /// Whole seconds elapsed between open and conclude.
    pub sec: u64,
    /// Remainder nanoseconds elapsed (always `< 1_000_000_000`).
    pub nsec: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Profiler
// ─────────────────────────────────────────────────────────────────────────────

/// Timing recorder with an ordered record list and an enablement flag.
///
/// Independent call trees sharing one profiler may interleave their records
/// arbitrarily; the only ordering guarantee is between one event's open and
/// its own conclude. The record list has no automatic bound or rotation —
/// callers [`clear`](Profiler::clear) it when done inspecting.
#[derive(Debug, Default)]
pub struct Profiler {
    /// Consulted by callers before opening events; never by the profiler.
    enabled: AtomicBool,
    /// Ordered list of concluded events.
    invocations: Mutex<Vec<InvocationRecord>>,
}

static GLOBAL: LazyLock<Arc<Profiler>> = LazyLock::new(|| Arc::new(Profiler::new()));

impl Profiler {
    /// Creates a new profiler with recording disabled and no records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide profiler instance.
    #[must_use]
    pub fn global() -> Arc<Profiler> {
        Arc::clone(&GLOBAL)
    }

    /// Sets the enablement flag consulted by instrumenting callers.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Returns whether instrumenting callers should open events.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Opens a timing event, capturing a monotonic start timestamp.
    ///
    /// Nothing is recorded until the returned event is
    /// [concluded](ProfilerEvent::conclude). Events open regardless of the
    /// enablement flag; gating is the caller's concern.
    #[must_use]
    pub fn start_event(&self, name: &'static str) -> ProfilerEvent<'_> {
        ProfilerEvent {
            profiler: self,
            name,
            start: Instant::now(),
        }
    }

    /// Returns a snapshot of all concluded records, in conclusion order.
    #[must_use]
    pub fn records(&self) -> Vec<InvocationRecord> {
        self.invocations.lock().clone()
    }

    /// Returns the number of concluded records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.invocations.lock().len()
    }

    /// Returns true if no events have been concluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invocations.lock().is_empty()
    }

    /// Removes all recorded invocations.
    pub fn clear(&self) {
        self.invocations.lock().clear();
    }

    /// Clears all records and disables recording.
    ///
    /// Test-isolation lifecycle: call between independent runs that share
    /// one profiler instance.
    pub fn reset(&self) {
        self.clear();
        self.set_enabled(false);
    }

    fn append(&self, record: InvocationRecord) {
        self.invocations.lock().push(record);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ProfilerEvent
// ─────────────────────────────────────────────────────────────────────────────

/// An open timing event. Concluding appends one record to the profiler.
///
/// Each call to [`conclude`](Self::conclude) appends independently — a
/// twice-concluded event yields two records. Dropping an event without
/// concluding records nothing.
#[derive(Debug)]
pub struct ProfilerEvent<'p> {
    profiler: &'p Profiler,
    name: &'static str,
    start: Instant,
}

impl ProfilerEvent<'_> {
    /// Returns the name this event was opened under.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Computes elapsed time since the event was opened and appends one
    /// [`InvocationRecord`] to the owning profiler.
    pub fn conclude(&self) {
        let elapsed = self.start.elapsed();
        self.profiler.append(InvocationRecord {
            name: self.name,
            sec: elapsed.as_secs(),
            nsec: elapsed.subsec_nanos(),
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Process-wide convenience functions
// ─────────────────────────────────────────────────────────────────────────────

/// Opens a timing event on the process-wide profiler.
#[must_use]
pub fn create_event(name: &'static str) -> ProfilerEvent<'static> {
    let profiler: &'static Profiler = &GLOBAL;
    profiler.start_event(name)
}

/// Sets the process-wide enablement flag.
pub fn set_enabled(enabled: bool) {
    GLOBAL.set_enabled(enabled);
}

/// Returns the process-wide enablement flag.
#[must_use]
pub fn is_enabled() -> bool {
    GLOBAL.is_enabled()
}

/// Returns a snapshot of the process-wide record list.
#[must_use]
pub fn invocations() -> Vec<InvocationRecord> {
    GLOBAL.records()
}

/// Clears the process-wide record list.
pub fn clear() {
    GLOBAL.clear();
}

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::{InvocationRecord, Profiler, ProfilerEvent};
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    #[test]
    fn start_without_conclude_records_nothing() {
        let profiler = Profiler::new();
        let _event = profiler.start_event("event_name");
        assert!(profiler.is_empty());
    }

    #[test]
    fn conclude_appends_one_record() {
        let profiler = Profiler::new();
        profiler.start_event("event_name").conclude();

        let records = profiler.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "event_name");
    }

    #[test]
    fn records_elapsed_time_between_open_and_conclude() {
        let profiler = Profiler::new();
        let event = profiler.start_event("my_event");
        std::thread::sleep(Duration::from_millis(520));
        event.conclude();

        let records = profiler.records();
        assert_eq!(records.len(), 1);

        let record = records[0];
        let elapsed = Duration::new(record.sec, record.nsec);
        assert!(
            elapsed >= Duration::from_millis(500),
            "expected >= 500ms, got {elapsed:?}"
        );
        assert_eq!(record.sec, 0);
    }

    #[test]
    fn each_conclude_call_appends_independently() {
        let profiler = Profiler::new();
        let event = profiler.start_event("repeat");
        event.conclude();
        event.conclude();
        assert_eq!(profiler.len(), 2);
    }

    #[test]
    fn recording_ignores_enablement_flag() {
        let profiler = Profiler::new();
        assert!(!profiler.is_enabled());

        // Disabled profilers still record when asked; the flag is advisory.
        profiler.start_event("ungated").conclude();
        assert_eq!(profiler.len(), 1);
    }

    #[test]
    fn clear_removes_all_records() {
        let profiler = Profiler::new();
        profiler.start_event("a").conclude();
        profiler.start_event("b").conclude();
        assert_eq!(profiler.len(), 2);

        profiler.clear();
        assert!(profiler.is_empty());
    }

    #[test]
    fn reset_clears_and_disables() {
        let profiler = Profiler::new();
        profiler.set_enabled(true);
        profiler.start_event("a").conclude();

        profiler.reset();
        assert!(profiler.is_empty());
        assert!(!profiler.is_enabled());
    }

    #[test]
    fn records_preserve_conclusion_order() {
        let profiler = Profiler::new();
        let outer = profiler.start_event("outer");
        let inner = profiler.start_event("inner");
        inner.conclude();
        outer.conclude();

        let names: Vec<_> = profiler.records().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["inner", "outer"]);
    }

    #[test]
    fn record_serializes_to_json() {
        let record = InvocationRecord {
            name: "resolve",
            sec: 1,
            nsec: 250,
        };
        let json = serde_json::to_value(&record).expect("record should serialize");
        assert_eq!(json["name"], "resolve");
        assert_eq!(json["sec"], 1);
        assert_eq!(json["nsec"], 250);
    }

    #[test]
    fn convenience_functions_drive_the_global_profiler() {
        set_enabled(true);
        assert!(is_enabled());
        set_enabled(false);
        assert!(!is_enabled());

        create_event("global_convenience_event").conclude();
        let matching = invocations()
            .iter()
            .filter(|r| r.name == "global_convenience_event")
            .count();
        assert_eq!(matching, 1);

        clear();
        assert!(!invocations()
            .iter()
            .any(|r| r.name == "global_convenience_event"));
    }

    #[test]
    fn global_profiler_is_shared() {
        let a = Profiler::global();
        let b = Profiler::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
