//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a constraint or action registered on a grid.
///
/// Ids are assigned sequentially per registry (one past the current
/// maximum, starting at 1) unless the caller supplies one explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u32);

impl RuleId {
    /// The first id handed out by an empty registry.
    pub const FIRST: RuleId = RuleId(1);

    /// The id following this one.
    pub fn next(self) -> RuleId {
        RuleId(self.0.saturating_add(1))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RuleId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for unique [`SubscriptionId`] allocation.
static SUBSCRIPTION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Handle returned when an observer is registered.
///
/// Allocated from a process-wide monotonic counter, so a handle is never
/// reused even across different observer lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocate a fresh, unique subscription id. Thread-safe.
    pub fn next() -> Self {
        Self(SUBSCRIPTION_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_ids_step_by_one() {
        assert_eq!(RuleId::FIRST.next(), RuleId(2));
        assert_eq!(RuleId(u32::MAX).next(), RuleId(u32::MAX));
        assert_eq!(RuleId::from(7).to_string(), "7");
    }

    #[test]
    fn subscription_ids_are_unique() {
        let a = SubscriptionId::next();
        let b = SubscriptionId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
