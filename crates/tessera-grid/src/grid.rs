//! The grid: an indexed container of occupants that arbitrates their moves.
//!
//! # Locking
//!
//! Every mutation first takes the *writer gate*, a reentrant mutex. It
//! serializes writers across threads while letting callbacks that run
//! inside a mutation (observers, constraints, actions) mutate the same grid
//! again on the same thread.
//!
//! Grid state sits behind a separate `RwLock`. Queries take it shared;
//! mutations take it exclusively for short critical sections and release
//! it before any user callback runs. When both are needed the grid state
//! lock is taken before an occupant's own lock.

use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::{IndexMap, IndexSet};
use parking_lot::{ReentrantMutex, RwLock};
use smallvec::SmallVec;
use tracing::{debug, trace};

use tessera_core::{GridError, Point, RuleId, Shape, SubscriptionId};
use tessera_space::{Region, Spatial};

use crate::config::{validate_unit_size, ActionPolicy, ConfigError, GridConfig};
use crate::events::{EventChannel, GridEvent, GridObservers, RuleViolation};
use crate::metrics::{GridMetrics, MetricsRecorder};
use crate::occupant::{Motion, MoveEvent, MoveProposal, Occupant};
use crate::rules::{ConstraintHandle, RuleBook};
use crate::Payload;

// ── GridState ──────────────────────────────────────────────────────

/// Occupants anchored at one top-left position; usually exactly one.
type Bucket<T> = SmallVec<[Occupant<T>; 1]>;

struct GridState<T> {
    region: Region,
    viewport: Region,
    /// Occupants bucketed by their current top-left position.
    index: IndexMap<Point, Bucket<T>>,
    allow_overlapping: bool,
    unit_width: f64,
    unit_height: f64,
    action_policy: ActionPolicy,
}

impl<T: Payload> GridState<T> {
    fn occupants(&self) -> impl Iterator<Item = &Occupant<T>> {
        self.index.values().flatten()
    }

    fn out_of_bounds(&self, candidate: &[Point]) -> Option<Point> {
        candidate.iter().find(|p| !self.region.contains(p)).copied()
    }

    /// First candidate position held by an occupant other than `mover`.
    fn collision(&self, mover: Option<&Occupant<T>>, candidate: &[Point]) -> Option<Point> {
        if self.allow_overlapping {
            return None;
        }
        candidate
            .iter()
            .find(|p| {
                self.occupants()
                    .filter(|o| !mover.is_some_and(|m| m.ptr_eq(o)))
                    .any(|o| o.contains_point(p))
            })
            .copied()
    }

    fn check_placement(
        &self,
        mover: Option<&Occupant<T>>,
        candidate: &[Point],
    ) -> Result<(), GridError> {
        if let Some(position) = self.out_of_bounds(candidate) {
            return Err(GridError::OutOfBounds { position });
        }
        if let Some(position) = self.collision(mover, candidate) {
            return Err(GridError::Overlap { position });
        }
        Ok(())
    }

    /// Row-major first cell covered by more than one occupant.
    fn first_shared_cell(&self) -> Option<Point> {
        let mut seen = IndexSet::new();
        let mut shared = Vec::new();
        for occupant in self.occupants() {
            for p in occupant.shape() {
                if !seen.insert(p) {
                    shared.push(p);
                }
            }
        }
        shared.into_iter().min()
    }

    fn insert_indexed(&mut self, occupant: &Occupant<T>) {
        self.index
            .entry(occupant.top_left())
            .or_default()
            .push(occupant.clone());
    }

    /// Drop `occupant` from whichever bucket holds it, trying `hint` first.
    fn unindex(&mut self, occupant: &Occupant<T>, hint: Point) {
        let holds = |bucket: &Bucket<T>| bucket.iter().any(|o| o.ptr_eq(occupant));
        let key = if self.index.get(&hint).is_some_and(holds) {
            Some(hint)
        } else {
            self.index
                .iter()
                .find(|(_, bucket)| holds(bucket))
                .map(|(key, _)| *key)
        };
        let Some(key) = key else {
            return;
        };
        if let Some(bucket) = self.index.get_mut(&key) {
            bucket.retain(|o| !o.ptr_eq(occupant));
            if bucket.is_empty() {
                self.index.shift_remove(&key);
            }
        }
    }

    fn reindex(&mut self, occupant: &Occupant<T>, previous_top_left: Point) {
        self.unindex(occupant, previous_top_left);
        self.insert_indexed(occupant);
    }

    /// Remove every occupant equal to `target`, pruning emptied buckets.
    fn remove_equal(&mut self, target: &Occupant<T>) -> Vec<Occupant<T>> {
        let mut removed = Vec::new();
        for bucket in self.index.values_mut() {
            bucket.retain(|o| {
                if *o == *target {
                    removed.push(o.clone());
                    false
                } else {
                    true
                }
            });
        }
        self.index.retain(|_, bucket| !bucket.is_empty());
        removed
    }

    /// Row-major cells of the visible part of the grid, with the occupants
    /// covering each.
    fn visible_cells(&self) -> Vec<(Point, Vec<Occupant<T>>)> {
        let Some(visible) = self.region.intersection(&self.viewport) else {
            return Vec::new();
        };
        let mut by_cell: IndexMap<Point, Vec<Occupant<T>>> = IndexMap::new();
        for occupant in self.occupants() {
            for p in occupant.shape() {
                if visible.contains(&p) {
                    by_cell.entry(p).or_default().push(occupant.clone());
                }
            }
        }
        visible
            .iter()
            .map(|p| (p, by_cell.swap_remove(&p).unwrap_or_default()))
            .collect()
    }
}

// ── GridShared ─────────────────────────────────────────────────────

pub(crate) struct GridShared<T> {
    gate: ReentrantMutex<()>,
    state: RwLock<GridState<T>>,
    rules: RwLock<RuleBook<T>>,
    events: GridObservers<T>,
    metrics: MetricsRecorder,
    this: Weak<GridShared<T>>,
}

impl<T> GridShared<T> {
    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}

impl<T: Payload> GridShared<T> {
    /// Insertion checks, in order: bounds, duplicate, foreign attachment,
    /// overlap. `pending` holds batch members that will be inserted before
    /// `occupant`.
    fn check_insert(
        &self,
        state: &GridState<T>,
        occupant: &Occupant<T>,
        pending: &[Occupant<T>],
    ) -> Result<(), GridError> {
        let shape = occupant.shape();
        if let Some(position) = state.out_of_bounds(&shape) {
            return Err(GridError::OutOfBounds { position });
        }
        if let Some(existing) = state.occupants().chain(pending).find(|o| *o == occupant) {
            return Err(GridError::DuplicateOccupant {
                top_left: existing.top_left(),
            });
        }
        if occupant.is_attached_elsewhere(self) {
            return Err(GridError::AttachedElsewhere);
        }
        if !state.allow_overlapping {
            let collision = state.collision(None, &shape).or_else(|| {
                shape
                    .iter()
                    .find(|p| pending.iter().any(|o| o.contains_point(p)))
                    .copied()
            });
            if let Some(position) = collision {
                return Err(GridError::Overlap { position });
            }
        }
        Ok(())
    }

    /// Run the grid's side of the move protocol for an attached occupant.
    ///
    /// The proposal is built from the occupant's positions under the writer
    /// gate. Returns `None` if the occupant left this grid before the gate
    /// was taken.
    pub(crate) fn arbitrate(
        self: &Arc<Self>,
        occupant: &Occupant<T>,
        motion: &Motion,
    ) -> Option<Result<bool, GridError>> {
        let _gate = self.gate.lock();
        if !occupant.is_attached_to(self) {
            return None;
        }
        let base = occupant.shape();
        let proposal = match motion.propose(occupant, &base) {
            Some(proposal) => proposal,
            None => return Some(Ok(false)),
        };
        Some(self.resolve(occupant, &base, &proposal))
    }

    fn resolve(
        self: &Arc<Self>,
        occupant: &Occupant<T>,
        base: &Shape,
        proposal: &MoveProposal,
    ) -> Result<bool, GridError> {
        occupant.notify_before_move(proposal);
        if let Err(err) = self.validate(occupant, proposal) {
            self.metrics.move_failed();
            debug!(%err, "move rejected");
            return Err(err);
        }
        if proposal.is_aborted() {
            self.metrics.move_aborted();
            debug!(top_left = %occupant.top_left(), "move aborted");
            return Ok(false);
        }
        self.commit(occupant, base, proposal)
    }

    /// Bounds, overlap, constraints, then actions.
    ///
    /// Hard failures return `Err`; constraint violations abort `proposal`
    /// and return `Ok`.
    fn validate(
        self: &Arc<Self>,
        occupant: &Occupant<T>,
        proposal: &MoveProposal,
    ) -> Result<(), GridError> {
        let candidate = proposal.candidate();
        self.state
            .read()
            .check_placement(Some(occupant), candidate)?;

        let (constraints, actions) = self.rules.read().snapshot();
        let violated: Vec<ConstraintHandle> = constraints
            .into_iter()
            .filter(|c| (c.predicate)(occupant, candidate))
            .map(|c| c.handle)
            .collect();
        if !violated.is_empty() {
            proposal.abort();
            self.metrics.rule_violations(violated.len());
            trace!(count = violated.len(), "constraints violated");
            // Nobody is listening: stop at the veto and skip actions.
            if self.events.rule_violated.is_empty() {
                return Ok(());
            }
            for handle in violated {
                self.events.rule_violated.notify(&RuleViolation {
                    rule: handle.id,
                    tag: handle.tag,
                    occupant: occupant.clone(),
                });
            }
        }

        let policy = self.state.read().action_policy;
        if policy == ActionPolicy::CommittedOnly && proposal.is_aborted() {
            return Ok(());
        }
        let grid = Grid {
            shared: Arc::clone(self),
        };
        for action in actions {
            if (action.predicate)(occupant, candidate) {
                self.metrics.action_run();
                trace!(action = %action.id, "action triggered");
                (action.callback)(&grid, occupant);
            }
        }
        Ok(())
    }

    fn commit(
        self: &Arc<Self>,
        occupant: &Occupant<T>,
        base: &Shape,
        proposal: &MoveProposal,
    ) -> Result<bool, GridError> {
        let mut state = self.state.write();
        if !occupant.is_attached_to(self) {
            // An action removed the mover; finish as a standalone move.
            drop(state);
            let Some(event) = occupant.apply_standalone(base, proposal) else {
                return Ok(false);
            };
            occupant.notify_moved(&event);
            return Ok(true);
        }
        if occupant.shape() != *base {
            // A callback already moved the mover during validation.
            drop(state);
            self.metrics.move_aborted();
            debug!(top_left = %occupant.top_left(), "move superseded");
            return Ok(false);
        }
        // Actions may have changed the grid since validation.
        if let Err(err) = state.check_placement(Some(occupant), proposal.candidate()) {
            drop(state);
            self.metrics.move_failed();
            debug!(%err, "move rejected at commit");
            return Err(err);
        }
        let event = occupant.apply(proposal);
        state.reindex(occupant, event.previous[0]);
        drop(state);

        self.metrics.move_committed();
        debug!(from = %event.previous[0], to = %event.current[0], "occupant moved");
        occupant.notify_moved(&event);
        self.events.item_moved.notify(occupant);
        self.events.modified.notify(&());
        Ok(true)
    }
}

// ── RenderFrame ────────────────────────────────────────────────────

/// A grid's geometry and visible cells, captured together.
#[derive(Debug)]
pub struct RenderFrame<T> {
    /// Grid bounds.
    pub region: Region,
    /// The viewport.
    pub viewport: Region,
    /// Rendered `(width, height)` of one cell.
    pub unit_size: (f64, f64),
    /// Cells of `region ∩ viewport`, row-major, with the occupants covering
    /// each.
    pub cells: Vec<(Point, Vec<Occupant<T>>)>,
}

// ── Grid ───────────────────────────────────────────────────────────

/// A bounded 2D grid of occupants.
///
/// `Grid` is a cheap, clonable handle; clones share the same grid. All
/// operations take `&self` and are safe to call from several threads.
///
/// Invariants after every committed mutation:
/// - every indexed occupant lies entirely inside [`region`](Self::region);
/// - unless overlap is allowed, no two occupants share a position;
/// - each occupant is indexed exactly once, under its current top-left.
pub struct Grid<T> {
    shared: Arc<GridShared<T>>,
}

impl<T> Clone for Grid<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Payload> Grid<T> {
    /// A `width` x `height` grid at the origin with default settings.
    pub fn new(width: i32, height: i32) -> Result<Self, ConfigError> {
        Self::with_config(GridConfig::new(width, height))
    }

    /// A grid built from a validated configuration.
    pub fn with_config(config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let region = config.region()?;
        let state = GridState {
            region,
            viewport: config.viewport.unwrap_or(region),
            index: IndexMap::new(),
            allow_overlapping: config.allow_overlapping,
            unit_width: config.unit_width,
            unit_height: config.unit_height,
            action_policy: config.action_policy,
        };
        let shared = Arc::new_cyclic(|this| GridShared {
            gate: ReentrantMutex::new(()),
            state: RwLock::new(state),
            rules: RwLock::new(RuleBook::default()),
            events: GridObservers::default(),
            metrics: MetricsRecorder::default(),
            this: this.clone(),
        });
        debug!(width = config.width, height = config.height, "grid created");
        Ok(Self { shared })
    }

    // ── Insertion & removal ────────────────────────────────────

    /// Insert one occupant.
    ///
    /// Fails with, in order of checking: `OutOfBounds`, `DuplicateOccupant`,
    /// `AttachedElsewhere`, `Overlap`. On success fires item-added, then
    /// modified.
    pub fn insert(&self, occupant: &Occupant<T>) -> Result<(), GridError> {
        let shared = &*self.shared;
        let _gate = shared.gate.lock();
        {
            let mut state = shared.state.write();
            let _motion = occupant.lock_motion();
            if let Err(err) = shared.check_insert(&state, occupant, &[]) {
                debug!(%err, "insertion rejected");
                return Err(err);
            }
            occupant.attach(shared.this.clone());
            state.insert_indexed(occupant);
        }
        shared.metrics.insertions(1);
        debug!(top_left = %occupant.top_left(), cells = occupant.cell_count(), "occupant inserted");
        shared.events.item_added.notify(occupant);
        shared.events.modified.notify(&());
        Ok(())
    }

    /// Insert several occupants atomically.
    ///
    /// Every insertion is checked first, including collisions between
    /// members of the batch; the first failure rejects the whole batch and
    /// leaves the grid untouched. Item-added and modified then fire once per
    /// occupant, in input order.
    pub fn insert_all(&self, occupants: &[Occupant<T>]) -> Result<(), GridError> {
        let shared = &*self.shared;
        let _gate = shared.gate.lock();
        {
            let mut state = shared.state.write();
            let _motion: Vec<_> = occupants.iter().map(Occupant::lock_motion).collect();
            for (i, occupant) in occupants.iter().enumerate() {
                if let Err(err) = shared.check_insert(&state, occupant, &occupants[..i]) {
                    debug!(%err, index = i, "batch insertion rejected");
                    return Err(err);
                }
            }
            for occupant in occupants {
                occupant.attach(shared.this.clone());
                state.insert_indexed(occupant);
            }
        }
        shared.metrics.insertions(occupants.len());
        debug!(count = occupants.len(), "batch inserted");
        for occupant in occupants {
            shared.events.item_added.notify(occupant);
            shared.events.modified.notify(&());
        }
        Ok(())
    }

    /// Build a single-cell occupant carrying `payload` at `(x, y)` and
    /// insert it.
    pub fn place(&self, payload: T, x: i32, y: i32) -> Result<Occupant<T>, GridError> {
        let occupant = Occupant::from_payload(payload, Point::new(x, y), []);
        self.insert(&occupant)?;
        Ok(occupant)
    }

    /// Remove every indexed occupant equal to `occupant`.
    ///
    /// Returns whether anything was removed; if so, fires item-removed,
    /// then modified.
    pub fn remove(&self, occupant: &Occupant<T>) -> bool {
        let shared = &*self.shared;
        let _gate = shared.gate.lock();
        let removed = shared.state.write().remove_equal(occupant);
        if removed.is_empty() {
            return false;
        }
        for o in &removed {
            o.detach_from(shared);
        }
        occupant.detach_from(shared);
        shared.metrics.removals(removed.len());
        debug!(top_left = %occupant.top_left(), count = removed.len(), "occupant removed");
        shared.events.item_removed.notify(occupant);
        shared.events.modified.notify(&());
        true
    }

    // ── Translation ────────────────────────────────────────────

    /// Translate the grid, its viewport, and every occupant by `vector`.
    ///
    /// Occupants move in lockstep without constraint evaluation. Each
    /// occupant's post-move observers and the grid's item-moved fire once
    /// per occupant, followed by a single modified. Half-cell offsets in
    /// `vector` are ignored.
    ///
    /// Returns `false` and changes nothing if the grid or its viewport
    /// would leave the `i32` coordinate range.
    pub fn move_by(&self, vector: Point) -> bool {
        let vector = Point::new(vector.x, vector.y);
        let shared = &*self.shared;
        let _gate = shared.gate.lock();
        let moved: Vec<(Occupant<T>, MoveEvent)> = {
            let mut state = shared.state.write();
            let translated = state
                .region
                .translate(vector)
                .and_then(|region| Ok((region, state.viewport.translate(vector)?)));
            let (region, viewport) = match translated {
                Ok(bounds) => bounds,
                Err(err) => {
                    debug!(%err, %vector, "grid translation rejected");
                    return false;
                }
            };
            state.region = region;
            state.viewport = viewport;
            let buckets = std::mem::take(&mut state.index);
            let mut moved = Vec::new();
            for occupant in buckets.into_values().flatten() {
                let event = occupant.shift(vector);
                state.insert_indexed(&occupant);
                moved.push((occupant, event));
            }
            moved
        };
        shared.metrics.translation();
        debug!(%vector, occupants = moved.len(), "grid translated");
        for (occupant, event) in &moved {
            occupant.notify_moved(event);
            shared.events.item_moved.notify(occupant);
        }
        shared.events.modified.notify(&());
        true
    }

    /// Translate the grid by `(x, y)`.
    pub fn move_xy(&self, x: i32, y: i32) -> bool {
        self.move_by(Point::new(x, y))
    }

    // ── Queries ────────────────────────────────────────────────

    /// Occupants whose top-left position is `top_left`.
    pub fn objects_at(&self, top_left: Point) -> Vec<Occupant<T>> {
        self.shared
            .state
            .read()
            .index
            .get(&top_left)
            .map(|bucket| bucket.to_vec())
            .unwrap_or_default()
    }

    /// Occupants whose top-left position is `(x, y)`.
    pub fn objects_at_xy(&self, x: i32, y: i32) -> Vec<Occupant<T>> {
        self.objects_at(Point::new(x, y))
    }

    /// Occupants covering `point`.
    pub fn objects_overlapping(&self, point: Point) -> Vec<Occupant<T>> {
        self.shared
            .state
            .read()
            .occupants()
            .filter(|o| o.contains_point(&point))
            .cloned()
            .collect()
    }

    /// Occupants lying entirely inside `region`.
    pub fn objects_within(&self, region: &Region) -> Vec<Occupant<T>> {
        self.shared
            .state
            .read()
            .occupants()
            .filter(|o| o.is_within(region))
            .cloned()
            .collect()
    }

    /// Every occupant, in index order.
    pub fn all_objects(&self) -> Vec<Occupant<T>> {
        self.shared.state.read().occupants().cloned().collect()
    }

    /// Whether an occupant equal to `occupant` is indexed.
    pub fn contains(&self, occupant: &Occupant<T>) -> bool {
        self.shared.state.read().occupants().any(|o| o == occupant)
    }

    /// Number of indexed occupants.
    pub fn len(&self) -> usize {
        self.shared.state.read().index.values().map(|b| b.len()).sum()
    }

    /// Whether the grid holds no occupants.
    pub fn is_empty(&self) -> bool {
        self.shared.state.read().index.is_empty()
    }

    /// The grid bounds.
    pub fn region(&self) -> Region {
        self.shared.state.read().region
    }

    /// Top-left cell of the grid.
    pub fn top_left(&self) -> Point {
        self.region().top_left()
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.region().width()
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.region().height()
    }

    /// The grid's cells grouped by row, top to bottom.
    pub fn rows(&self) -> Vec<Vec<Point>> {
        self.region().rows()
    }

    /// Walk the visible cells row-major, passing each cell and the
    /// occupants covering it.
    ///
    /// Cells are collected under the shared lock; `callback` runs with no
    /// lock held.
    pub fn render<F>(&self, mut callback: F)
    where
        F: FnMut(Point, &[Occupant<T>]),
    {
        for (point, occupants) in &self.render_frame().cells {
            callback(*point, occupants);
        }
    }

    /// Capture the grid geometry and its visible cells in one read.
    pub fn render_frame(&self) -> RenderFrame<T> {
        let state = self.shared.state.read();
        RenderFrame {
            region: state.region,
            viewport: state.viewport,
            unit_size: (state.unit_width, state.unit_height),
            cells: state.visible_cells(),
        }
    }

    // ── Settings ───────────────────────────────────────────────

    /// The sub-region walked by [`render`](Self::render).
    pub fn viewport(&self) -> Region {
        self.shared.state.read().viewport
    }

    /// Replace the viewport. Fires modified only if it changed.
    pub fn set_viewport(&self, viewport: Region) {
        let shared = &*self.shared;
        let _gate = shared.gate.lock();
        let changed = {
            let mut state = shared.state.write();
            let changed = state.viewport != viewport;
            state.viewport = viewport;
            changed
        };
        if changed {
            shared.events.modified.notify(&());
        }
    }

    /// Whether distinct occupants may share cells.
    pub fn allow_overlapping(&self) -> bool {
        self.shared.state.read().allow_overlapping
    }

    /// Change the overlap policy.
    ///
    /// Disallowing overlap fails with `Err(GridError::Overlap)` at the
    /// first shared cell, row-major, while any two occupants still share
    /// one; the policy is then unchanged.
    pub fn set_allow_overlapping(&self, allow: bool) -> Result<(), GridError> {
        let _gate = self.shared.gate.lock();
        let mut state = self.shared.state.write();
        if !allow {
            if let Some(position) = state.first_shared_cell() {
                debug!(%position, "overlap policy change rejected");
                return Err(GridError::Overlap { position });
            }
        }
        state.allow_overlapping = allow;
        Ok(())
    }

    /// Rendered `(width, height)` of one cell.
    pub fn unit_size(&self) -> (f64, f64) {
        let state = self.shared.state.read();
        (state.unit_width, state.unit_height)
    }

    /// Change the rendered cell size.
    pub fn set_unit_size(&self, width: f64, height: f64) -> Result<(), ConfigError> {
        validate_unit_size(width, height)?;
        let _gate = self.shared.gate.lock();
        let mut state = self.shared.state.write();
        state.unit_width = width;
        state.unit_height = height;
        Ok(())
    }

    /// When actions run relative to aborted moves.
    pub fn action_policy(&self) -> ActionPolicy {
        self.shared.state.read().action_policy
    }

    /// Change the action policy.
    pub fn set_action_policy(&self, policy: ActionPolicy) {
        let _gate = self.shared.gate.lock();
        self.shared.state.write().action_policy = policy;
    }

    /// Cumulative mutation counters.
    pub fn metrics(&self) -> GridMetrics {
        self.shared.metrics.snapshot()
    }

    // ── Constraints & actions ──────────────────────────────────

    /// Register a constraint under the next free id.
    ///
    /// `predicate` receives the mover and its candidate positions and
    /// returns `true` to veto the move.
    pub fn add_constraint<F>(&self, predicate: F) -> ConstraintHandle
    where
        F: Fn(&Occupant<T>, &[Point]) -> bool + Send + Sync + 'static,
    {
        self.add_constraint_with(None, None, predicate)
    }

    /// Register a constraint with an explicit id and/or tag. An existing
    /// constraint with the same id is replaced in place.
    pub fn add_constraint_with<F>(
        &self,
        id: Option<RuleId>,
        tag: Option<String>,
        predicate: F,
    ) -> ConstraintHandle
    where
        F: Fn(&Occupant<T>, &[Point]) -> bool + Send + Sync + 'static,
    {
        self.shared
            .rules
            .write()
            .add_constraint(id, tag, Arc::new(predicate))
    }

    /// Unregister a constraint.
    pub fn remove_constraint(&self, id: RuleId) -> bool {
        self.shared.rules.write().remove_constraint(id)
    }

    /// Registered constraints, in evaluation order.
    pub fn constraints(&self) -> Vec<ConstraintHandle> {
        self.shared.rules.read().constraint_handles()
    }

    /// Register an action under the next free id.
    ///
    /// Whenever `predicate` matches a proposed move, `action` runs with the
    /// grid and the mover. See [`ActionPolicy`] for whether that includes
    /// vetoed moves.
    pub fn add_action<P, A>(&self, predicate: P, action: A) -> RuleId
    where
        P: Fn(&Occupant<T>, &[Point]) -> bool + Send + Sync + 'static,
        A: Fn(&Grid<T>, &Occupant<T>) + Send + Sync + 'static,
    {
        self.add_action_with(None, predicate, action)
    }

    /// Register an action with an explicit id, replacing any existing
    /// action with that id in place.
    pub fn add_action_with<P, A>(&self, id: Option<RuleId>, predicate: P, action: A) -> RuleId
    where
        P: Fn(&Occupant<T>, &[Point]) -> bool + Send + Sync + 'static,
        A: Fn(&Grid<T>, &Occupant<T>) + Send + Sync + 'static,
    {
        self.shared
            .rules
            .write()
            .add_action(id, Arc::new(predicate), Arc::new(action))
    }

    /// Unregister an action.
    pub fn remove_action(&self, id: RuleId) -> bool {
        self.shared.rules.write().remove_action(id)
    }

    /// Registered action ids, in evaluation order.
    pub fn action_ids(&self) -> Vec<RuleId> {
        self.shared.rules.read().action_ids()
    }

    // ── Events ─────────────────────────────────────────────────

    /// Observe insertions.
    pub fn on_item_added<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Occupant<T>) + Send + Sync + 'static,
    {
        self.shared.events.item_added.subscribe(callback)
    }

    /// Observe removals.
    pub fn on_item_removed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Occupant<T>) + Send + Sync + 'static,
    {
        self.shared.events.item_removed.subscribe(callback)
    }

    /// Observe committed occupant moves.
    pub fn on_item_moved<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Occupant<T>) + Send + Sync + 'static,
    {
        self.shared.events.item_moved.subscribe(callback)
    }

    /// Observe constraint violations.
    pub fn on_rule_violated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RuleViolation<T>) + Send + Sync + 'static,
    {
        self.shared.events.rule_violated.subscribe(callback)
    }

    /// Observe any change to the grid.
    pub fn on_modified<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.events.modified.subscribe(move |_: &()| callback())
    }

    /// Remove an observer registered through any `on_*` method.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.unsubscribe(id)
    }

    /// Receive every grid event, in firing order, through a channel.
    pub fn subscribe_channel(&self) -> EventChannel<T> {
        let (tx, receiver) = crossbeam_channel::unbounded();
        let events = &self.shared.events;
        let mut subscriptions = Vec::with_capacity(5);

        let sender = tx.clone();
        subscriptions.push(events.item_added.subscribe(move |o: &Occupant<T>| {
            let _ = sender.send(GridEvent::ItemAdded(o.clone()));
        }));
        let sender = tx.clone();
        subscriptions.push(events.item_removed.subscribe(move |o: &Occupant<T>| {
            let _ = sender.send(GridEvent::ItemRemoved(o.clone()));
        }));
        let sender = tx.clone();
        subscriptions.push(events.item_moved.subscribe(move |o: &Occupant<T>| {
            let _ = sender.send(GridEvent::ItemMoved(o.clone()));
        }));
        let sender = tx.clone();
        subscriptions.push(
            events
                .rule_violated
                .subscribe(move |v: &RuleViolation<T>| {
                    let _ = sender.send(GridEvent::RuleViolated(v.clone()));
                }),
        );
        subscriptions.push(events.modified.subscribe(move |_: &()| {
            let _ = tx.send(GridEvent::Modified);
        }));

        EventChannel {
            receiver,
            subscriptions,
            grid: Arc::downgrade(&self.shared),
        }
    }
}

impl<T: Payload> Spatial for Grid<T> {
    fn top_left(&self) -> Point {
        Grid::top_left(self)
    }

    fn positions(&self) -> Vec<Point> {
        self.region().iter().collect()
    }

    fn contains_point(&self, point: &Point) -> bool {
        self.region().contains(point)
    }
}

impl<T: Payload> fmt::Debug for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("region", &self.region())
            .field("occupants", &self.len())
            .finish()
    }
}
