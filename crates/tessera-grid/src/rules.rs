//! Constraint and action registries.
//!
//! A *constraint* is a predicate over `(mover, candidate positions)`; when
//! it returns `true` the move is vetoed. An *action* pairs such a predicate
//! with a callback that runs against the grid.
//!
//! Both registries are ordered: evaluation follows registration order, and
//! re-registering an existing id replaces the entry in place.

use std::sync::Arc;

use indexmap::IndexMap;

use tessera_core::{Point, RuleId};

use crate::grid::Grid;
use crate::occupant::Occupant;

/// Constraint or action predicate: `(mover, candidate positions) -> hit`.
pub type Predicate<T> = Arc<dyn Fn(&Occupant<T>, &[Point]) -> bool + Send + Sync>;

/// Action callback: `(grid, mover)`.
pub type ActionFn<T> = Arc<dyn Fn(&Grid<T>, &Occupant<T>) + Send + Sync>;

/// Public identity of a registered constraint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintHandle {
    /// Registry id.
    pub id: RuleId,
    /// Caller-supplied metadata, opaque to the grid.
    pub tag: Option<String>,
}

pub(crate) struct Constraint<T> {
    pub(crate) handle: ConstraintHandle,
    pub(crate) predicate: Predicate<T>,
}

impl<T> Clone for Constraint<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

pub(crate) struct Action<T> {
    pub(crate) id: RuleId,
    pub(crate) predicate: Predicate<T>,
    pub(crate) callback: ActionFn<T>,
}

impl<T> Clone for Action<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            predicate: Arc::clone(&self.predicate),
            callback: Arc::clone(&self.callback),
        }
    }
}

fn next_id<V>(map: &IndexMap<RuleId, V>) -> RuleId {
    map.keys().max().map_or(RuleId::FIRST, |id| id.next())
}

pub(crate) struct RuleBook<T> {
    constraints: IndexMap<RuleId, Constraint<T>>,
    actions: IndexMap<RuleId, Action<T>>,
}

impl<T> Default for RuleBook<T> {
    fn default() -> Self {
        Self {
            constraints: IndexMap::new(),
            actions: IndexMap::new(),
        }
    }
}

impl<T> RuleBook<T> {
    pub(crate) fn add_constraint(
        &mut self,
        id: Option<RuleId>,
        tag: Option<String>,
        predicate: Predicate<T>,
    ) -> ConstraintHandle {
        let id = id.unwrap_or_else(|| next_id(&self.constraints));
        let handle = ConstraintHandle { id, tag };
        self.constraints.insert(
            id,
            Constraint {
                handle: handle.clone(),
                predicate,
            },
        );
        handle
    }

    pub(crate) fn remove_constraint(&mut self, id: RuleId) -> bool {
        self.constraints.shift_remove(&id).is_some()
    }

    pub(crate) fn constraint_handles(&self) -> Vec<ConstraintHandle> {
        self.constraints.values().map(|c| c.handle.clone()).collect()
    }

    pub(crate) fn add_action(
        &mut self,
        id: Option<RuleId>,
        predicate: Predicate<T>,
        callback: ActionFn<T>,
    ) -> RuleId {
        let id = id.unwrap_or_else(|| next_id(&self.actions));
        self.actions.insert(
            id,
            Action {
                id,
                predicate,
                callback,
            },
        );
        id
    }

    pub(crate) fn remove_action(&mut self, id: RuleId) -> bool {
        self.actions.shift_remove(&id).is_some()
    }

    pub(crate) fn action_ids(&self) -> Vec<RuleId> {
        self.actions.keys().copied().collect()
    }

    /// Clones of both registries, so evaluation can run with no lock held.
    pub(crate) fn snapshot(&self) -> (Vec<Constraint<T>>, Vec<Action<T>>) {
        (
            self.constraints.values().cloned().collect(),
            self.actions.values().cloned().collect(),
        )
    }
}
