//! Cumulative mutation counters for a grid.
//!
//! [`GridMetrics`] is a plain snapshot; the live counters are atomics so
//! they can be bumped from any thread without taking the grid locks.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters accumulated since the grid was created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridMetrics {
    /// Occupants inserted.
    pub insertions: u64,
    /// Occupants removed.
    pub removals: u64,
    /// Occupant moves committed.
    pub moves_committed: u64,
    /// Occupant moves aborted by a constraint or observer.
    pub moves_aborted: u64,
    /// Occupant moves rejected with a hard error.
    pub moves_failed: u64,
    /// Constraint predicates that reported a violation.
    pub rule_violations: u64,
    /// Action callbacks invoked.
    pub actions_run: u64,
    /// Whole-grid translations.
    pub translations: u64,
}

#[derive(Debug, Default)]
pub(crate) struct MetricsRecorder {
    insertions: AtomicU64,
    removals: AtomicU64,
    moves_committed: AtomicU64,
    moves_aborted: AtomicU64,
    moves_failed: AtomicU64,
    rule_violations: AtomicU64,
    actions_run: AtomicU64,
    translations: AtomicU64,
}

fn bump(counter: &AtomicU64, n: u64) {
    counter.fetch_add(n, Ordering::Relaxed);
}

impl MetricsRecorder {
    pub(crate) fn insertions(&self, n: usize) {
        bump(&self.insertions, n as u64);
    }

    pub(crate) fn removals(&self, n: usize) {
        bump(&self.removals, n as u64);
    }

    pub(crate) fn move_committed(&self) {
        bump(&self.moves_committed, 1);
    }

    pub(crate) fn move_aborted(&self) {
        bump(&self.moves_aborted, 1);
    }

    pub(crate) fn move_failed(&self) {
        bump(&self.moves_failed, 1);
    }

    pub(crate) fn rule_violations(&self, n: usize) {
        bump(&self.rule_violations, n as u64);
    }

    pub(crate) fn action_run(&self) {
        bump(&self.actions_run, 1);
    }

    pub(crate) fn translation(&self) {
        bump(&self.translations, 1);
    }

    pub(crate) fn snapshot(&self) -> GridMetrics {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        GridMetrics {
            insertions: load(&self.insertions),
            removals: load(&self.removals),
            moves_committed: load(&self.moves_committed),
            moves_aborted: load(&self.moves_aborted),
            moves_failed: load(&self.moves_failed),
            rule_violations: load(&self.rule_violations),
            actions_run: load(&self.actions_run),
            translations: load(&self.translations),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        assert_eq!(MetricsRecorder::default().snapshot(), GridMetrics::default());
    }

    #[test]
    fn recorder_accumulates() {
        let m = MetricsRecorder::default();
        m.insertions(3);
        m.removals(1);
        m.move_committed();
        m.move_committed();
        m.move_aborted();
        m.move_failed();
        m.rule_violations(2);
        m.action_run();
        m.translation();
        let snap = m.snapshot();
        assert_eq!(snap.insertions, 3);
        assert_eq!(snap.removals, 1);
        assert_eq!(snap.moves_committed, 2);
        assert_eq!(snap.moves_aborted, 1);
        assert_eq!(snap.moves_failed, 1);
        assert_eq!(snap.rule_violations, 2);
        assert_eq!(snap.actions_run, 1);
        assert_eq!(snap.translations, 1);
    }
}
