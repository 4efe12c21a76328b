//! Movable multi-cell occupants.
//!
//! An [`Occupant`] is a shared handle: clones refer to the same piece, and
//! every mutation is visible through all of them. Occupants live happily on
//! their own; once inserted into a [`Grid`](crate::Grid) their moves are
//! arbitrated by that grid.
//!
//! # Move protocol
//!
//! Every move (`move_by`, `move_in`, `rotate`, `replace_positions`) runs in
//! three phases:
//!
//! 1. **Propose**: the candidate position set is computed, sorted and
//!    deduplicated. For an occupant in a grid this happens under the
//!    grid's writer gate, so concurrent moves of one occupant compose.
//! 2. **Pre-move**: a cancellable [`MoveProposal`] is shown to the
//!    occupant's `on_before_move` observers, then to the owning grid's
//!    validation. Anyone may [`abort`](MoveProposal::abort) it.
//! 3. **Resolve**: an aborted proposal returns `Ok(false)` with positions
//!    untouched; otherwise the positions are committed and `on_moved`
//!    observers receive a [`MoveEvent`].
//!
//! A standalone move commits only if the occupant is still standalone and
//! still holds the positions it was proposed from; otherwise it starts
//! over, through the grid if the occupant was inserted meanwhile.

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard, RwLock};

use tessera_core::{
    sorted_shape, Colour, Direction, GridError, Observers, Point, Shape, SubscriptionId,
};
use tessera_space::{SpaceError, Spatial};

use crate::grid::GridShared;
use crate::Payload;

// ── Move proposals ─────────────────────────────────────────────────

/// The operation a move was requested through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Translation by a vector.
    Translate {
        /// The translation applied to every position.
        vector: Point,
    },
    /// Rotation about an origin.
    Rotate {
        /// Centre of rotation.
        origin: Point,
        /// Angle in degrees, clockwise on screen.
        angle: i32,
    },
    /// Wholesale replacement of the position set.
    Replace,
}

/// A pending move, shown to pre-move observers and grid validation.
///
/// Observers receive `&MoveProposal` and veto it with
/// [`abort`](Self::abort).
#[derive(Debug)]
pub struct MoveProposal {
    kind: MoveKind,
    candidate: Shape,
    aborted: Cell<bool>,
}

impl MoveProposal {
    pub(crate) fn new(kind: MoveKind, candidate: Shape) -> Self {
        Self {
            kind,
            candidate,
            aborted: Cell::new(false),
        }
    }

    /// How the move was requested.
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Positions the occupant would hold after the move, row-major.
    pub fn candidate(&self) -> &[Point] {
        &self.candidate
    }

    /// Veto the move. Positions stay unchanged and the move returns
    /// `Ok(false)`.
    pub fn abort(&self) {
        self.aborted.set(true);
    }

    /// Whether any listener vetoed the move.
    pub fn is_aborted(&self) -> bool {
        self.aborted.get()
    }
}

/// A requested move, resolved against the occupant's positions when it is
/// arbitrated rather than when it is requested.
#[derive(Clone, Debug)]
pub(crate) enum Motion {
    Translate(Point),
    Rotate { origin: Option<Point>, angle: i32 },
    Replace(Shape),
}

impl Motion {
    /// The proposal this motion yields from `base`, or `None` if it would
    /// change nothing.
    pub(crate) fn propose<T>(
        &self,
        occupant: &Occupant<T>,
        base: &Shape,
    ) -> Option<MoveProposal> {
        match self {
            Motion::Translate(vector) => {
                let candidate = sorted_shape(base.iter().map(|p| p.translate(*vector)));
                Some(MoveProposal::new(MoveKind::Translate { vector: *vector }, candidate))
            }
            Motion::Rotate { origin, angle } => {
                let origin = origin.unwrap_or_else(|| occupant.rotation_pivot());
                let candidate = sorted_shape(base.iter().map(|p| p.rotate(origin, *angle)));
                Some(MoveProposal::new(
                    MoveKind::Rotate {
                        origin,
                        angle: *angle,
                    },
                    candidate,
                ))
            }
            Motion::Replace(candidate) => (candidate != base)
                .then(|| MoveProposal::new(MoveKind::Replace, candidate.clone())),
        }
    }
}

/// A committed move, delivered to `on_moved` observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveEvent {
    /// How the move was requested.
    pub kind: MoveKind,
    /// Positions before the move.
    pub previous: Shape,
    /// Positions after the move.
    pub current: Shape,
}

// ── Occupant ───────────────────────────────────────────────────────

struct OccupantState<T> {
    positions: Shape,
    payload: Option<T>,
    label: Option<String>,
    colour: Option<Colour>,
    selected: bool,
    pivot: Option<Point>,
}

struct OccupantInner<T> {
    id: Option<String>,
    state: RwLock<OccupantState<T>>,
    grid: Mutex<Option<Weak<GridShared<T>>>>,
    /// Held while attaching and while committing a standalone move.
    motion: ReentrantMutex<()>,
    before_move: Observers<MoveProposal>,
    moved: Observers<MoveEvent>,
    payload_modified: Observers<Occupant<T>>,
    selection_changed: Observers<bool>,
}

/// A named, multi-cell piece with a payload.
///
/// Positions are kept sorted row-major and are never empty. Two occupants
/// compare equal when their ids match, their payloads are equal (or both
/// absent), and their position sequences are equal.
pub struct Occupant<T> {
    inner: Arc<OccupantInner<T>>,
}

impl<T> Clone for Occupant<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Occupant<T> {
    fn build(id: Option<String>, positions: Shape, payload: Option<T>) -> Self {
        Self {
            inner: Arc::new(OccupantInner {
                id,
                state: RwLock::new(OccupantState {
                    positions,
                    payload,
                    label: None,
                    colour: None,
                    selected: false,
                    pivot: None,
                }),
                grid: Mutex::new(None),
                motion: ReentrantMutex::new(()),
                before_move: Observers::new(),
                moved: Observers::new(),
                payload_modified: Observers::new(),
                selection_changed: Observers::new(),
            }),
        }
    }

    /// An anonymous occupant without payload.
    ///
    /// Returns `Err(SpaceError::EmptyShape)` if `positions` is empty.
    pub fn new<I>(positions: I) -> Result<Self, SpaceError>
    where
        I: IntoIterator<Item = Point>,
    {
        let shape = sorted_shape(positions);
        if shape.is_empty() {
            return Err(SpaceError::EmptyShape);
        }
        Ok(Self::build(None, shape, None))
    }

    /// An occupant with an explicit identity.
    pub fn with_id<I>(id: impl Into<String>, positions: I) -> Result<Self, SpaceError>
    where
        I: IntoIterator<Item = Point>,
    {
        let shape = sorted_shape(positions);
        if shape.is_empty() {
            return Err(SpaceError::EmptyShape);
        }
        Ok(Self::build(Some(id.into()), shape, None))
    }

    /// A single-cell occupant without payload.
    pub fn at(point: Point) -> Self {
        Self::build(None, sorted_shape([point]), None)
    }

    /// An occupant carrying `payload` at `anchor` plus `extra` positions.
    pub fn from_payload<I>(payload: T, anchor: Point, extra: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let shape = sorted_shape(std::iter::once(anchor).chain(extra));
        Self::build(None, shape, Some(payload))
    }

    /// Like [`from_payload`](Self::from_payload), with an explicit identity.
    pub fn from_payload_with_id<I>(payload: T, id: impl Into<String>, anchor: Point, extra: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let shape = sorted_shape(std::iter::once(anchor).chain(extra));
        Self::build(Some(id.into()), shape, Some(payload))
    }

    /// Set the label, builder style.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.inner.state.write().label = Some(label.into());
        self
    }

    /// Set the colour, builder style.
    pub fn with_colour(self, colour: Colour) -> Self {
        self.inner.state.write().colour = Some(colour);
        self
    }

    /// Set an explicit rotation pivot, builder style.
    pub fn with_pivot(self, pivot: Point) -> Self {
        self.inner.state.write().pivot = Some(pivot);
        self
    }

    /// The explicit identity, if one was assigned.
    pub fn id(&self) -> Option<&str> {
        self.inner.id.as_deref()
    }

    /// Current positions, row-major.
    pub fn shape(&self) -> Shape {
        self.inner.state.read().positions.clone()
    }

    /// The first position, row-major.
    pub fn top_left(&self) -> Point {
        // Non-empty by construction.
        self.inner.state.read().positions[0]
    }

    /// Number of cells covered.
    pub fn cell_count(&self) -> usize {
        self.inner.state.read().positions.len()
    }

    /// A clone of the payload.
    pub fn payload(&self) -> Option<T>
    where
        T: Clone,
    {
        self.inner.state.read().payload.clone()
    }

    /// Inspect the payload without cloning it.
    ///
    /// `f` runs under the occupant's read lock; it must not mutate this
    /// occupant.
    pub fn with_payload<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.inner.state.read().payload.as_ref())
    }

    /// Remove and return the payload. Fires nothing.
    pub fn take_payload(&self) -> Option<T> {
        self.inner.state.write().payload.take()
    }

    /// The visual label.
    pub fn label(&self) -> Option<String> {
        self.inner.state.read().label.clone()
    }

    /// Replace the visual label.
    pub fn set_label(&self, label: impl Into<String>) {
        self.inner.state.write().label = Some(label.into());
    }

    /// The display colour.
    pub fn colour(&self) -> Option<Colour> {
        self.inner.state.read().colour
    }

    /// Replace the display colour.
    pub fn set_colour(&self, colour: Colour) {
        self.inner.state.write().colour = Some(colour);
    }

    /// Whether the occupant is selected.
    pub fn is_selected(&self) -> bool {
        self.inner.state.read().selected
    }

    /// Change the selection flag. Fires `on_selection_changed` only when
    /// the value actually changes.
    pub fn set_selected(&self, selected: bool) {
        let changed = {
            let mut state = self.inner.state.write();
            let changed = state.selected != selected;
            state.selected = selected;
            changed
        };
        if changed {
            self.inner.selection_changed.notify(&selected);
        }
    }

    /// The point rotations default to: the explicit pivot if one was set,
    /// otherwise the bounding-box centroid of the current positions.
    pub fn rotation_pivot(&self) -> Point {
        let state = self.inner.state.read();
        state
            .pivot
            .or_else(|| Point::centroid(&state.positions))
            .unwrap_or_default()
    }

    /// Set an explicit rotation pivot. It follows the occupant on
    /// translation.
    pub fn set_rotation_pivot(&self, pivot: Point) {
        self.inner.state.write().pivot = Some(pivot);
    }

    /// Revert to the centroid pivot.
    pub fn clear_rotation_pivot(&self) {
        self.inner.state.write().pivot = None;
    }

    /// Whether both handles refer to the same occupant.
    pub fn ptr_eq(&self, other: &Occupant<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether the occupant currently belongs to a live grid.
    pub fn is_attached(&self) -> bool {
        self.inner
            .grid
            .lock()
            .as_ref()
            .is_some_and(|grid| grid.strong_count() > 0)
    }

    // ── Observers ──────────────────────────────────────────────

    /// Observe proposed moves. The callback may abort the proposal.
    pub fn on_before_move<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&MoveProposal) + Send + Sync + 'static,
    {
        self.inner.before_move.subscribe(callback)
    }

    /// Observe committed moves.
    pub fn on_moved<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&MoveEvent) + Send + Sync + 'static,
    {
        self.inner.moved.subscribe(callback)
    }

    /// Observe payload changes. The callback receives this occupant.
    pub fn on_payload_modified<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Occupant<T>) + Send + Sync + 'static,
    {
        self.inner.payload_modified.subscribe(callback)
    }

    /// Observe selection changes. The callback receives the new value.
    pub fn on_selection_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.inner.selection_changed.subscribe(callback)
    }

    /// Remove an observer registered through any `on_*` method.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.before_move.unsubscribe(id)
            || self.inner.moved.unsubscribe(id)
            || self.inner.payload_modified.unsubscribe(id)
            || self.inner.selection_changed.unsubscribe(id)
    }

    // ── Crate-internal move plumbing ───────────────────────────

    pub(crate) fn notify_before_move(&self, proposal: &MoveProposal) {
        self.inner.before_move.notify(proposal);
    }

    pub(crate) fn notify_moved(&self, event: &MoveEvent) {
        self.inner.moved.notify(event);
    }

    /// Commit `proposal` unconditionally.
    pub(crate) fn apply(&self, proposal: &MoveProposal) -> MoveEvent {
        Self::apply_to(&mut self.inner.state.write(), proposal)
    }

    /// Commit `proposal` if the occupant is still standalone and still
    /// holds `base`. Returns `None` otherwise.
    pub(crate) fn apply_standalone(
        &self,
        base: &Shape,
        proposal: &MoveProposal,
    ) -> Option<MoveEvent> {
        let _motion = self.inner.motion.lock();
        if self.attached_grid().is_some() {
            return None;
        }
        let mut state = self.inner.state.write();
        if state.positions != *base {
            return None;
        }
        Some(Self::apply_to(&mut state, proposal))
    }

    /// Block standalone commits until the guard drops.
    pub(crate) fn lock_motion(&self) -> ReentrantMutexGuard<'_, ()> {
        self.inner.motion.lock()
    }

    fn apply_to(state: &mut OccupantState<T>, proposal: &MoveProposal) -> MoveEvent {
        let previous = std::mem::replace(&mut state.positions, proposal.candidate.clone());
        if let MoveKind::Translate { vector } = proposal.kind {
            if let Some(pivot) = state.pivot.as_mut() {
                *pivot = pivot.translate(vector);
            }
        }
        MoveEvent {
            kind: proposal.kind,
            previous,
            current: state.positions.clone(),
        }
    }

    /// Translate without any validation; used when the whole grid moves.
    pub(crate) fn shift(&self, vector: Point) -> MoveEvent {
        let candidate = self
            .inner
            .state
            .read()
            .positions
            .iter()
            .map(|p| p.translate(vector))
            .collect();
        self.apply(&MoveProposal::new(MoveKind::Translate { vector }, candidate))
    }

    pub(crate) fn attached_grid(&self) -> Option<Arc<GridShared<T>>> {
        self.inner.grid.lock().as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn is_attached_to(&self, grid: &GridShared<T>) -> bool {
        self.inner
            .grid
            .lock()
            .as_ref()
            .is_some_and(|weak| std::ptr::eq(weak.as_ptr(), grid))
    }

    /// Whether the occupant belongs to a live grid other than `grid`.
    pub(crate) fn is_attached_elsewhere(&self, grid: &GridShared<T>) -> bool {
        self.inner
            .grid
            .lock()
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0 && !std::ptr::eq(weak.as_ptr(), grid))
    }

    pub(crate) fn attach(&self, grid: Weak<GridShared<T>>) {
        *self.inner.grid.lock() = Some(grid);
    }

    pub(crate) fn detach_from(&self, grid: &GridShared<T>) {
        let mut link = self.inner.grid.lock();
        if link
            .as_ref()
            .is_some_and(|weak| std::ptr::eq(weak.as_ptr(), grid))
        {
            *link = None;
        }
    }
}

impl<T: PartialEq> Occupant<T> {
    /// Replace the payload.
    ///
    /// Fires `on_payload_modified` when the payload was absent or differs
    /// from `payload`; returns whether it fired.
    pub fn set_payload(&self, payload: T) -> bool {
        let changed = {
            let mut state = self.inner.state.write();
            let changed = state.payload.as_ref() != Some(&payload);
            state.payload = Some(payload);
            changed
        };
        if changed {
            self.inner.payload_modified.notify(self);
        }
        changed
    }
}

impl<T: Payload> Occupant<T> {
    /// Translate every position by `vector`.
    pub fn move_by(&self, vector: Point) -> Result<bool, GridError> {
        self.propose(Motion::Translate(vector))
    }

    /// Translate by `(x, y)`.
    pub fn move_xy(&self, x: i32, y: i32) -> Result<bool, GridError> {
        self.move_by(Point::new(x, y))
    }

    /// Translate `amount` cells in `direction`.
    pub fn move_in(&self, direction: Direction, amount: i32) -> Result<bool, GridError> {
        self.move_by(direction.vector(amount))
    }

    /// Translate one cell in `direction`.
    pub fn step(&self, direction: Direction) -> Result<bool, GridError> {
        self.move_in(direction, 1)
    }

    /// Rotate every position by `angle` degrees about `origin`, or about
    /// the [rotation pivot](Self::rotation_pivot) when `origin` is `None`.
    ///
    /// Cells that land on the same position after rounding merge.
    pub fn rotate(&self, origin: Option<Point>, angle: i32) -> Result<bool, GridError> {
        self.propose(Motion::Rotate { origin, angle })
    }

    /// Rotate a quarter turn clockwise about the rotation pivot.
    pub fn rotate_quarter(&self) -> Result<bool, GridError> {
        self.rotate(None, 90)
    }

    /// Replace the whole position set.
    ///
    /// Returns `Ok(false)` without notifying anyone if the new set equals
    /// the current one, and `Err(GridError::EmptyShape)` if it is empty.
    pub fn replace_positions<I>(&self, positions: I) -> Result<bool, GridError>
    where
        I: IntoIterator<Item = Point>,
    {
        let candidate = sorted_shape(positions);
        if candidate.is_empty() {
            return Err(GridError::EmptyShape);
        }
        self.propose(Motion::Replace(candidate))
    }

    fn propose(&self, motion: Motion) -> Result<bool, GridError> {
        loop {
            if let Some(grid) = self.attached_grid() {
                match grid.arbitrate(self, &motion) {
                    Some(result) => return result,
                    None => continue,
                }
            }
            let base = self.shape();
            let Some(proposal) = motion.propose(self, &base) else {
                return Ok(false);
            };
            self.notify_before_move(&proposal);
            if proposal.is_aborted() {
                return Ok(false);
            }
            if let Some(event) = self.apply_standalone(&base, &proposal) {
                self.notify_moved(&event);
                return Ok(true);
            }
        }
    }
}

impl<T: PartialEq> PartialEq for Occupant<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.inner.id != other.inner.id {
            return false;
        }
        let a = self.inner.state.read();
        let b = other.inner.state.read();
        a.payload == b.payload && a.positions == b.positions
    }
}

impl<T> Spatial for Occupant<T> {
    fn top_left(&self) -> Point {
        Occupant::top_left(self)
    }

    fn positions(&self) -> Vec<Point> {
        self.inner.state.read().positions.to_vec()
    }

    fn contains_point(&self, point: &Point) -> bool {
        self.inner
            .state
            .read()
            .positions
            .binary_search(point)
            .is_ok()
    }
}

impl<T: fmt::Debug> fmt::Debug for Occupant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("Occupant")
            .field("id", &self.inner.id)
            .field("positions", &state.positions)
            .field("payload", &state.payload)
            .field("label", &state.label)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    // ── Construction tests ─────────────────────────────────────

    #[test]
    fn positions_are_sorted_and_deduplicated() {
        let o: Occupant<()> = Occupant::new([p(2, 1), p(0, 0), p(1, 1), p(0, 0)]).unwrap();
        assert_eq!(o.shape().as_slice(), &[p(0, 0), p(1, 1), p(2, 1)]);
        assert_eq!(o.top_left(), p(0, 0));
        assert_eq!(o.cell_count(), 3);
    }

    #[test]
    fn empty_shape_is_rejected() {
        let r: Result<Occupant<()>, _> = Occupant::new(std::iter::empty());
        assert_eq!(r.err(), Some(SpaceError::EmptyShape));
    }

    #[test]
    fn factory_helper_places_anchor_and_extras() {
        let o = Occupant::from_payload_with_id("rook", "r1", p(3, 3), [p(3, 4)]);
        assert_eq!(o.id(), Some("r1"));
        assert_eq!(o.payload(), Some("rook"));
        assert_eq!(o.shape().as_slice(), &[p(3, 3), p(3, 4)]);
    }

    #[test]
    fn metadata_round_trips() {
        let o = Occupant::from_payload(1u8, p(0, 0), [])
            .with_label("A")
            .with_colour(Colour::new(255, 0, 0));
        assert_eq!(o.label().as_deref(), Some("A"));
        assert_eq!(o.colour(), Some(Colour::new(255, 0, 0)));
        o.set_label("B");
        assert_eq!(o.label().as_deref(), Some("B"));
    }

    #[test]
    fn spatial_compliance() {
        let o: Occupant<()> = Occupant::new([p(1, 1), p(2, 1), p(1, 2)]).unwrap();
        assert_eq!(Spatial::positions(&o), vec![p(1, 1), p(2, 1), p(1, 2)]);
        assert_eq!(Spatial::top_left(&o), p(1, 1));
        assert!(o.contains_point(&p(1, 2)));
        assert!(!o.contains_point(&p(2, 2)));
        assert!(o.is_within(&o));
    }

    // ── Equality tests ─────────────────────────────────────────

    #[test]
    fn equality_compares_payload_positions_and_id() {
        let a = Occupant::from_payload("x", p(1, 1), []);
        let b = Occupant::from_payload("x", p(1, 1), []);
        let c = Occupant::from_payload("y", p(1, 1), []);
        let d = Occupant::from_payload("x", p(2, 1), []);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);

        let id1 = Occupant::from_payload_with_id("x", "one", p(1, 1), []);
        let id1_again = Occupant::from_payload_with_id("x", "one", p(1, 1), []);
        let id2 = Occupant::from_payload_with_id("x", "two", p(1, 1), []);
        assert_eq!(id1, id1_again);
        assert_ne!(id1, id2);
        assert_ne!(id1, a);
    }

    #[test]
    fn absent_payloads_are_equal() {
        let a: Occupant<u32> = Occupant::at(p(0, 0));
        let b: Occupant<u32> = Occupant::at(p(0, 0));
        assert_eq!(a, b);
        b.set_payload(3);
        assert_ne!(a, b);
    }

    #[test]
    fn clones_share_state() {
        let a: Occupant<u32> = Occupant::at(p(0, 0));
        let b = a.clone();
        a.move_xy(2, 0).unwrap();
        assert_eq!(b.top_left(), p(2, 0));
        assert!(a.ptr_eq(&b));
    }

    // ── Payload & selection notifications ──────────────────────

    #[test]
    fn payload_modified_fires_on_first_and_unequal_assignments() {
        let o: Occupant<u32> = Occupant::at(p(0, 0));
        let hits = counter();
        let h = Arc::clone(&hits);
        o.on_payload_modified(move |_| {
            h.fetch_add(1, Ordering::Relaxed);
        });

        assert!(o.set_payload(1));
        assert!(!o.set_payload(1));
        assert!(o.set_payload(2));
        assert_eq!(hits.load(Ordering::Relaxed), 2);

        assert_eq!(o.take_payload(), Some(2));
        assert!(o.set_payload(2));
        assert_eq!(hits.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn payload_observer_can_read_the_new_value() {
        let o: Occupant<u32> = Occupant::at(p(0, 0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        o.on_payload_modified(move |occ| s.lock().push(occ.payload()));
        o.set_payload(9);
        assert_eq!(*seen.lock(), vec![Some(9)]);
    }

    #[test]
    fn selection_changed_fires_only_on_change() {
        let o: Occupant<()> = Occupant::at(p(0, 0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        o.on_selection_changed(move |v| s.lock().push(*v));
        o.set_selected(false);
        o.set_selected(true);
        o.set_selected(true);
        o.set_selected(false);
        assert_eq!(*seen.lock(), vec![true, false]);
    }

    // ── Standalone move tests ──────────────────────────────────

    #[test]
    fn move_in_direction() {
        let o: Occupant<()> = Occupant::at(p(1, 1));
        assert_eq!(o.step(Direction::Down), Ok(true));
        assert_eq!(o.top_left(), p(1, 2));
        assert_eq!(o.move_in(Direction::Left, 3), Ok(true));
        assert_eq!(o.top_left(), p(-2, 2));
    }

    #[test]
    fn pre_move_observer_can_abort() {
        let o: Occupant<()> = Occupant::at(p(0, 0));
        let moved = counter();
        let m = Arc::clone(&moved);
        o.on_before_move(|proposal| {
            if proposal.candidate().iter().any(|q| q.x > 1) {
                proposal.abort();
            }
        });
        o.on_moved(move |_| {
            m.fetch_add(1, Ordering::Relaxed);
        });

        assert_eq!(o.move_xy(1, 0), Ok(true));
        assert_eq!(o.move_xy(1, 0), Ok(false));
        assert_eq!(o.top_left(), p(1, 0));
        assert_eq!(moved.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn moved_event_carries_previous_and_current() {
        let o: Occupant<()> = Occupant::new([p(0, 0), p(1, 0)]).unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));
        let e = Arc::clone(&events);
        o.on_moved(move |ev| e.lock().push(ev.clone()));
        o.move_xy(0, 2).unwrap();

        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, MoveKind::Translate { vector: p(0, 2) });
        assert_eq!(events[0].previous.as_slice(), &[p(0, 0), p(1, 0)]);
        assert_eq!(events[0].current.as_slice(), &[p(0, 2), p(1, 2)]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let o: Occupant<()> = Occupant::at(p(0, 0));
        let hits = counter();
        let h = Arc::clone(&hits);
        let id = o.on_moved(move |_| {
            h.fetch_add(1, Ordering::Relaxed);
        });
        o.move_xy(1, 0).unwrap();
        assert!(o.unsubscribe(id));
        o.move_xy(1, 0).unwrap();
        assert_eq!(hits.load(Ordering::Relaxed), 1);
        assert!(!o.unsubscribe(id));
    }

    // ── Rotation tests ─────────────────────────────────────────

    #[test]
    fn bar_rotates_about_explicit_pivot() {
        let o: Occupant<()> = Occupant::new([p(5, 0), p(5, 1), p(5, 2)])
            .unwrap()
            .with_pivot(p(5, 1));
        assert_eq!(o.rotate_quarter(), Ok(true));
        assert_eq!(o.shape().as_slice(), &[p(4, 1), p(5, 1), p(6, 1)]);
        assert_eq!(o.rotate_quarter(), Ok(true));
        assert_eq!(o.shape().as_slice(), &[p(5, 0), p(5, 1), p(5, 2)]);
    }

    #[test]
    fn pivot_follows_translation() {
        let o: Occupant<()> = Occupant::new([p(5, 0), p(5, 1), p(5, 2)])
            .unwrap()
            .with_pivot(p(5, 1));
        o.move_xy(5, 0).unwrap();
        assert_eq!(o.rotation_pivot(), p(10, 1));
        o.rotate_quarter().unwrap();
        assert_eq!(o.shape().as_slice(), &[p(9, 1), p(10, 1), p(11, 1)]);
    }

    #[test]
    fn default_pivot_is_centroid() {
        let o: Occupant<()> = Occupant::new([p(0, 0), p(2, 0), p(0, 2)]).unwrap();
        assert_eq!(o.rotation_pivot(), p(1, 1));
        o.move_xy(3, 3).unwrap();
        assert_eq!(o.rotation_pivot(), p(4, 4));
        o.set_rotation_pivot(p(0, 0));
        assert_eq!(o.rotation_pivot(), p(0, 0));
        o.clear_rotation_pivot();
        assert_eq!(o.rotation_pivot(), p(4, 4));
    }

    #[test]
    fn rotate_about_explicit_origin() {
        let o: Occupant<()> = Occupant::at(p(0, -1));
        o.rotate(Some(p(0, 0)), 180).unwrap();
        assert_eq!(o.top_left(), p(0, 1));
    }

    // ── Replacement tests ──────────────────────────────────────

    #[test]
    fn replace_with_identical_set_is_silent() {
        let o: Occupant<()> = Occupant::new([p(0, 0), p(1, 0)]).unwrap();
        let hits = counter();
        let (h1, h2) = (Arc::clone(&hits), Arc::clone(&hits));
        o.on_before_move(move |_| {
            h1.fetch_add(1, Ordering::Relaxed);
        });
        o.on_moved(move |_| {
            h2.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(o.replace_positions([p(1, 0), p(0, 0)]), Ok(false));
        assert_eq!(hits.load(Ordering::Relaxed), 0);

        assert_eq!(o.replace_positions([p(4, 4)]), Ok(true));
        assert_eq!(hits.load(Ordering::Relaxed), 2);
        assert_eq!(o.replace_positions(std::iter::empty()), Err(GridError::EmptyShape));
    }

    // ── Property tests ─────────────────────────────────────────

    proptest! {
        #[test]
        fn move_there_and_back_restores_shape(
            cells in proptest::collection::vec((-20i32..20, -20i32..20), 1..6),
            dx in -10i32..10,
            dy in -10i32..10,
        ) {
            let o: Occupant<()> = Occupant::new(cells.into_iter().map(|(x, y)| p(x, y))).unwrap();
            let before = o.shape();
            prop_assert_eq!(o.move_xy(dx, dy), Ok(true));
            prop_assert_eq!(o.move_xy(-dx, -dy), Ok(true));
            prop_assert_eq!(o.shape(), before);
        }

        #[test]
        fn four_quarter_turns_restore_shape(
            cells in proptest::collection::vec((-20i32..20, -20i32..20), 1..6),
        ) {
            let o: Occupant<()> = Occupant::new(cells.into_iter().map(|(x, y)| p(x, y))).unwrap();
            let pivot = o.rotation_pivot();
            o.set_rotation_pivot(pivot);
            let before = o.shape();
            for _ in 0..4 {
                prop_assert_eq!(o.rotate_quarter(), Ok(true));
            }
            prop_assert_eq!(o.shape(), before);
        }
    }
}
