//! Test utilities for Tessera development.
//!
//! Provides grid and occupant [`fixtures`], an [`EventLog`] that records
//! grid notifications in firing order, and [`init_tracing`] for tests that
//! want log output.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Arc;

use parking_lot::Mutex;
use tessera_core::{Point, RuleId, SubscriptionId};
use tessera_grid::{Grid, Payload};
use tracing_subscriber::EnvFilter;

/// One grid notification, reduced to what tests usually assert on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recorded {
    /// Top-left of the inserted occupant.
    Added(Point),
    /// Top-left of the removed occupant.
    Removed(Point),
    /// Top-left of the moved occupant, after the move.
    Moved(Point),
    Violated(RuleId),
    Modified,
}

/// Records every notification a grid fires, in order.
///
/// Subscribes on [`attach`](EventLog::attach); call
/// [`detach`](EventLog::detach) to stop recording.
pub struct EventLog {
    events: Arc<Mutex<Vec<Recorded>>>,
    subscriptions: Vec<SubscriptionId>,
}

impl EventLog {
    pub fn attach<T: Payload>(grid: &Grid<T>) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut subscriptions = Vec::with_capacity(5);

        let log = Arc::clone(&events);
        subscriptions.push(grid.on_item_added(move |o| log.lock().push(Recorded::Added(o.top_left()))));
        let log = Arc::clone(&events);
        subscriptions
            .push(grid.on_item_removed(move |o| log.lock().push(Recorded::Removed(o.top_left()))));
        let log = Arc::clone(&events);
        subscriptions.push(grid.on_item_moved(move |o| log.lock().push(Recorded::Moved(o.top_left()))));
        let log = Arc::clone(&events);
        subscriptions
            .push(grid.on_rule_violated(move |v| log.lock().push(Recorded::Violated(v.rule))));
        let log = Arc::clone(&events);
        subscriptions.push(grid.on_modified(move || log.lock().push(Recorded::Modified)));

        Self {
            events,
            subscriptions,
        }
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn count_moved(&self) -> usize {
        self.count(|e| matches!(e, Recorded::Moved(_)))
    }

    pub fn count_modified(&self) -> usize {
        self.count(|e| *e == Recorded::Modified)
    }

    pub fn count(&self, pred: impl Fn(&Recorded) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }

    /// Unsubscribe from `grid`, returning what was recorded.
    pub fn detach<T: Payload>(self, grid: &Grid<T>) -> Vec<Recorded> {
        for id in &self.subscriptions {
            grid.unsubscribe(*id);
        }
        self.take()
    }
}

/// Install a fmt subscriber honouring `RUST_LOG`, writing through the test
/// harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
