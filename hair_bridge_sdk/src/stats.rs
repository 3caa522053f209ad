/// SDK call statistics - process-wide counters per adapter generation
///
/// Every adapter call records one entry (and one failure when the SDK reports
/// an error). The counters are atomics so recording never blocks the render
/// thread.

use colored::*;
use std::sync::atomic::{AtomicU32, Ordering};

/// SDK generation an adapter drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    /// C-style return codes and integer ids
    Legacy,
    /// Status results and instance objects
    Object,
}

impl Generation {
    pub fn name(self) -> &'static str {
        match self {
            Generation::Legacy => "legacy",
            Generation::Object => "object",
        }
    }
}

/// Snapshot of one generation's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallStats {
    pub calls: u32,
    pub failures: u32,
}

impl CallStats {
    pub fn succeeded(&self) -> u32 {
        self.calls - self.failures
    }
}

/// Thread-safe call statistics tracker
struct CallStatsTracker {
    calls: AtomicU32,
    failures: AtomicU32,
}

impl CallStatsTracker {
    const fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
            failures: AtomicU32::new(0),
        }
    }

    fn record(&self, succeeded: bool) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn get_stats(&self) -> CallStats {
        CallStats {
            calls: self.calls.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
    }
}

static LEGACY_STATS: CallStatsTracker = CallStatsTracker::new();
static OBJECT_STATS: CallStatsTracker = CallStatsTracker::new();

fn tracker(generation: Generation) -> &'static CallStatsTracker {
    match generation {
        Generation::Legacy => &LEGACY_STATS,
        Generation::Object => &OBJECT_STATS,
    }
}

pub(crate) fn record_call(generation: Generation, succeeded: bool) {
    tracker(generation).record(succeeded);
}

/// Current counters of one generation
pub fn get_call_stats(generation: Generation) -> CallStats {
    tracker(generation).get_stats()
}

/// Zero both generations' counters
pub fn reset_call_stats() {
    LEGACY_STATS.reset();
    OBJECT_STATS.reset();
}

/// Print the call statistics report
pub fn print_call_stats_report() {
    println!("\n{}", "=== Hair SDK Call Statistics ===".bright_blue().bold());

    for generation in [Generation::Legacy, Generation::Object] {
        let stats = get_call_stats(generation);
        if stats.calls == 0 {
            continue;
        }
        let failures = if stats.failures > 0 {
            stats.failures.to_string().red().bold()
        } else {
            stats.failures.to_string().green()
        };
        println!(
            "  {} {} calls, {} failed",
            format!("{}:", generation.name()).white().bold(),
            stats.calls,
            failures
        );
    }

    println!("{}\n", "=================================".bright_blue().bold());
}

// ============================================================================
// Tests
// ============================================================================
