//! Grid-level notifications.
//!
//! Each notification kind has its own ordered observer list on the grid.
//! [`Grid::subscribe_channel`](crate::Grid::subscribe_channel) funnels all
//! of them into one crossbeam channel as [`GridEvent`] values, in firing
//! order.

use std::sync::Weak;

use crossbeam_channel::{Receiver, TryIter};

use tessera_core::{Observers, RuleId, SubscriptionId};

use crate::grid::GridShared;
use crate::occupant::Occupant;

/// A constraint vetoed a proposed move.
#[derive(Debug)]
pub struct RuleViolation<T> {
    /// The violated constraint.
    pub rule: RuleId,
    /// The constraint's tag.
    pub tag: Option<String>,
    /// The occupant whose move was vetoed.
    pub occupant: Occupant<T>,
}

/// Any grid notification, as delivered through a channel subscription.
#[derive(Debug)]
pub enum GridEvent<T> {
    /// An occupant was inserted.
    ItemAdded(Occupant<T>),
    /// An occupant was removed.
    ItemRemoved(Occupant<T>),
    /// An occupant moved (including moves caused by translating the grid).
    ItemMoved(Occupant<T>),
    /// A constraint vetoed a move.
    RuleViolated(RuleViolation<T>),
    /// The grid changed in any way.
    Modified,
}

impl<T> Clone for RuleViolation<T> {
    fn clone(&self) -> Self {
        Self {
            rule: self.rule,
            tag: self.tag.clone(),
            occupant: self.occupant.clone(),
        }
    }
}

impl<T> Clone for GridEvent<T> {
    fn clone(&self) -> Self {
        match self {
            Self::ItemAdded(o) => Self::ItemAdded(o.clone()),
            Self::ItemRemoved(o) => Self::ItemRemoved(o.clone()),
            Self::ItemMoved(o) => Self::ItemMoved(o.clone()),
            Self::RuleViolated(v) => Self::RuleViolated(v.clone()),
            Self::Modified => Self::Modified,
        }
    }
}

pub(crate) struct GridObservers<T> {
    pub(crate) item_added: Observers<Occupant<T>>,
    pub(crate) item_removed: Observers<Occupant<T>>,
    pub(crate) item_moved: Observers<Occupant<T>>,
    pub(crate) rule_violated: Observers<RuleViolation<T>>,
    pub(crate) modified: Observers<()>,
}

impl<T> Default for GridObservers<T> {
    fn default() -> Self {
        Self {
            item_added: Observers::new(),
            item_removed: Observers::new(),
            item_moved: Observers::new(),
            rule_violated: Observers::new(),
            modified: Observers::new(),
        }
    }
}

impl<T> GridObservers<T> {
    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.item_added.unsubscribe(id)
            || self.item_removed.unsubscribe(id)
            || self.item_moved.unsubscribe(id)
            || self.rule_violated.unsubscribe(id)
            || self.modified.unsubscribe(id)
    }
}

/// Receiving end of a channel subscription to every grid event.
///
/// Dropping the channel removes its observers from the grid. To stop
/// delivery earlier, pass each of [`subscriptions`](Self::subscriptions)
/// to [`Grid::unsubscribe`](crate::Grid::unsubscribe).
pub struct EventChannel<T> {
    pub(crate) receiver: Receiver<GridEvent<T>>,
    pub(crate) subscriptions: Vec<SubscriptionId>,
    pub(crate) grid: Weak<GridShared<T>>,
}

impl<T> EventChannel<T> {
    /// The underlying receiver.
    pub fn receiver(&self) -> &Receiver<GridEvent<T>> {
        &self.receiver
    }

    /// Drain all events delivered so far without blocking.
    pub fn try_iter(&self) -> TryIter<'_, GridEvent<T>> {
        self.receiver.try_iter()
    }

    /// The observer ids backing this channel.
    pub fn subscriptions(&self) -> &[SubscriptionId] {
        &self.subscriptions
    }
}

impl<T> Drop for EventChannel<T> {
    fn drop(&mut self) {
        if let Some(grid) = self.grid.upgrade() {
            for id in &self.subscriptions {
                grid.unsubscribe(*id);
            }
        }
    }
}
