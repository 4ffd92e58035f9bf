//! Keeps a set of chart panes on one time axis.
//!
//! Every pane registers with a [`ViewportGroup`], which hands it a listener. When
//! the user pans or zooms a pane, the pane calls that listener and the group
//! pushes the new time range to every other pane, refreshes tick spacing and
//! rescales the vertical range of unpinned panes.
//!
//! Writing a range into a pane may make the pane call its listener again. The
//! group is the only dispatcher and owns the [`SyncState`]; a signal that arrives
//! while a pass is running is dropped, never queued.
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use log::{debug, warn};
use crate::channel::TimeSeriesTable;
use crate::error::ScopeError;
use super::scale::auto_y_range;
use super::surface::{AxisRange, RangeListener, ViewportSurface};
use super::ticks::TickPolicy;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewportId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Propagating,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// A pass was already running; the signal was dropped.
    Ignored,
    /// A full pass ran and `followers` other panes were updated.
    Propagated { followers: usize },
}
struct Viewport<S> {
    surface: S,
    columns: Vec<String>,
    pinned_y: Option<AxisRange>,
}
/// Marks the group as propagating for its lifetime and always resets it to idle.
struct PassGuard<'a> {
    state: &'a Cell<SyncState>,
}
impl<'a> PassGuard<'a> {
    /// `None` when a pass is already active.
    fn enter(state: &'a Cell<SyncState>) -> Option<Self> {
        if state.get() == SyncState::Propagating {
            return None;
        }
        state.set(SyncState::Propagating);
        Some(Self { state })
    }
}
impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.state.set(SyncState::Idle);
    }
}
pub struct ViewportGroup<S: ViewportSurface> {
    table: Rc<TimeSeriesTable>,
    ticks: TickPolicy,
    state: Cell<SyncState>,
    passes: Cell<usize>,
    viewports: RefCell<Vec<Viewport<S>>>,
    this: Weak<ViewportGroup<S>>,
}
impl<S: ViewportSurface + 'static> ViewportGroup<S> {
    pub fn new(table: Rc<TimeSeriesTable>, ticks: TickPolicy) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            table,
            ticks,
            state: Cell::new(SyncState::Idle),
            passes: Cell::new(0),
            viewports: RefCell::new(Vec::new()),
            this: this.clone(),
        })
    }
    pub fn table(&self) -> &TimeSeriesTable {
        &self.table
    }
    pub fn state(&self) -> SyncState {
        self.state.get()
    }
    /// Number of completed propagation passes.
    pub fn passes(&self) -> usize {
        self.passes.get()
    }
    pub fn len(&self) -> usize {
        self.viewports.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.viewports.borrow().is_empty()
    }
    /// Add a pane showing `columns`, optionally with a pinned vertical range.
    ///
    /// The pane starts on the full time span of the table with matching ticks;
    /// its vertical range is the pinned one or fitted to all of its data.
    pub fn register(
        &self,
        mut surface: S,
        columns: Vec<String>,
        pinned_y: Option<AxisRange>,
    ) -> Result<ViewportId, ScopeError> {
        if let Some(missing) = columns.iter().find(|c| !self.table.has_column(c)) {
            return Err(ScopeError::ConfigColumnMissing(missing.clone()));
        }
        let id = ViewportId(self.viewports.borrow().len());
        if let Some(span) = self.table.time_span() {
            surface.set_visible_x_range(span);
            surface.set_tick_intervals(self.ticks.intervals_for(span.span()));
            let y = pinned_y.or_else(|| auto_y_range(&self.table, &columns, span));
            if let Some(y) = y {
                surface.set_visible_y_range(y);
            }
        }
        let group = self.this.clone();
        let listener: RangeListener = Rc::new(move || {
            let Some(group) = group.upgrade() else {
                return;
            };
            if let Err(err) = group.on_range_changed(id) {
                warn!("range change from viewport {}: {err}", id.0);
            }
        });
        surface.register_range_listener(listener);
        self.viewports.borrow_mut().push(Viewport {
            surface,
            columns,
            pinned_y,
        });
        Ok(id)
    }
    /// Propagate the visible time range of `source` to the rest of the group.
    pub fn on_range_changed(&self, source: ViewportId) -> Result<PropagationOutcome, ScopeError> {
        let Some(_pass) = PassGuard::enter(&self.state) else {
            debug!("ignoring re-entrant range change from viewport {}", source.0);
            return Ok(PropagationOutcome::Ignored);
        };
        let mut viewports = self.viewports.borrow_mut();
        let range = viewports
            .get(source.0)
            .ok_or(ScopeError::UnknownViewport(source.0))?
            .surface
            .visible_x_range();
        let ticks = self.ticks.intervals_for(range.span());
        let mut followers = 0;
        for (idx, viewport) in viewports.iter_mut().enumerate() {
            if idx == source.0 {
                continue;
            }
            viewport.surface.set_visible_x_range(range);
            viewport.surface.set_tick_intervals(ticks);
            if viewport.pinned_y.is_none() {
                if let Some(y) = auto_y_range(&self.table, &viewport.columns, range) {
                    viewport.surface.set_visible_y_range(y);
                }
            }
            followers += 1;
        }
        viewports[source.0].surface.set_tick_intervals(ticks);
        self.passes.set(self.passes.get() + 1);
        debug!(
            "time range [{:.4}, {:.4}] pushed from viewport {} to {} others",
            range.start, range.end, source.0, followers
        );
        Ok(PropagationOutcome::Propagated { followers })
    }
    /// Run `f` against one pane's surface; `None` for an unknown id.
    ///
    /// Must not be called from inside a surface callback.
    pub fn with_surface<R>(&self, id: ViewportId, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        let mut viewports = self.viewports.borrow_mut();
        viewports.get_mut(id.0).map(|v| f(&mut v.surface))
    }
    pub fn columns(&self, id: ViewportId) -> Option<Vec<String>> {
        self.viewports.borrow().get(id.0).map(|v| v.columns.clone())
    }
    pub fn is_pinned(&self, id: ViewportId) -> bool {
        self.viewports
            .borrow()
            .get(id.0)
            .map_or(false, |v| v.pinned_y.is_some())
    }
    pub fn ids(&self) -> Vec<ViewportId> {
        (0..self.len()).map(ViewportId).collect()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::surface::TickIntervals;
    /// Records every call and, like a real toolkit, reports x-range writes back to its listener.
    #[derive(Default)]
    struct Recorder {
        x: Option<AxisRange>,
        y: Option<AxisRange>,
        ticks: Option<TickIntervals>,
        y_writes: usize,
        listener: Option<RangeListener>,
        echoes: usize,
    }
    impl ViewportSurface for Recorder {
        fn visible_x_range(&self) -> AxisRange {
            self.x.unwrap_or(AxisRange::new(0.0, 0.0))
        }
        fn set_visible_x_range(&mut self, range: AxisRange) {
            self.x = Some(range);
            if let Some(listener) = self.listener.clone() {
                self.echoes += 1;
                listener();
            }
        }
        fn set_visible_y_range(&mut self, range: AxisRange) {
            self.y = Some(range);
            self.y_writes += 1;
        }
        fn set_tick_intervals(&mut self, ticks: TickIntervals) {
            self.ticks = Some(ticks);
        }
        fn register_range_listener(&mut self, listener: RangeListener) {
            self.listener = Some(listener);
        }
    }
    fn table() -> Rc<TimeSeriesTable> {
        Rc::new(
            TimeSeriesTable::new(
                (0..11).map(|i| i as f64).collect(),
                vec![
                    ("a".into(), vec![2.0, 3.0, 7.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 50.0]),
                    ("b".into(), vec![1.0; 11]),
                ],
            )
            .unwrap(),
        )
    }
    fn pan(group: &ViewportGroup<Recorder>, id: ViewportId, range: AxisRange) {
        // Simulates the user: the pane's range changes, then the pane fires its listener.
        let listener = group
            .with_surface(id, |s| {
                s.x = Some(range);
                s.listener.clone()
            })
            .flatten()
            .unwrap();
        listener();
    }
    #[test]
    fn registration_initialises_full_span() {
        let group = ViewportGroup::new(table(), TickPolicy::Auto);
        let id = group.register(Recorder::default(), vec!["a".into()], None).unwrap();
        group.with_surface(id, |s| {
            assert_eq!(s.x, Some(AxisRange::new(0.0, 10.0)));
            assert_eq!(s.ticks, Some(TickIntervals { major: 1.0, minor: 0.5 }));
            let y = s.y.unwrap();
            assert!((y.start + 5.0).abs() < 1e-9 && (y.end - 55.0).abs() < 1e-9);
        });
        assert_eq!(group.passes(), 0);
        assert_eq!(group.state(), SyncState::Idle);
    }
    #[test]
    fn pan_propagates_once_and_rescales_followers() {
        let group = ViewportGroup::new(table(), TickPolicy::Auto);
        let a = group.register(Recorder::default(), vec!["a".into()], None).unwrap();
        let b = group.register(Recorder::default(), vec!["a".into()], None).unwrap();
        let c = group.register(Recorder::default(), vec!["b".into()], None).unwrap();
        let window = AxisRange::new(0.0, 2.0);
        pan(&group, a, window);
        assert_eq!(group.passes(), 1);
        assert_eq!(group.state(), SyncState::Idle);
        group.with_surface(b, |s| {
            assert_eq!(s.x, Some(window));
            assert_eq!(s.ticks, Some(TickIntervals { major: 0.5, minor: 0.05 }));
            let y = s.y.unwrap();
            assert!((y.start - 1.5).abs() < 1e-9 && (y.end - 7.5).abs() < 1e-9);
            // One echo from the propagated write, swallowed by the guard.
            assert_eq!(s.echoes, 1);
        });
        group.with_surface(c, |s| {
            let y = s.y.unwrap();
            assert!((y.start - 0.99).abs() < 1e-9 && (y.end - 1.01).abs() < 1e-9);
        });
        group.with_surface(a, |s| {
            assert_eq!(s.ticks, Some(TickIntervals { major: 0.5, minor: 0.05 }));
            assert_eq!(s.x, Some(window));
        });
    }
    #[test]
    fn reentrant_signal_is_ignored_while_propagating() {
        let group = ViewportGroup::new(table(), TickPolicy::Auto);
        let a = group.register(Recorder::default(), vec!["a".into()], None).unwrap();
        group.register(Recorder::default(), vec!["a".into()], None).unwrap();
        group.state.set(SyncState::Propagating);
        assert_eq!(group.on_range_changed(a).unwrap(), PropagationOutcome::Ignored);
        group.state.set(SyncState::Idle);
        assert_eq!(
            group.on_range_changed(a).unwrap(),
            PropagationOutcome::Propagated { followers: 1 }
        );
        assert_eq!(group.passes(), 1);
    }
    #[test]
    fn pinned_viewport_keeps_vertical_range() {
        let group = ViewportGroup::new(table(), TickPolicy::Fixed(5.0));
        let a = group.register(Recorder::default(), vec!["a".into()], None).unwrap();
        let pinned = AxisRange::new(-10.0, 10.0);
        let p = group
            .register(Recorder::default(), vec!["a".into()], Some(pinned))
            .unwrap();
        assert!(group.is_pinned(p));
        pan(&group, a, AxisRange::new(1.0, 3.0));
        pan(&group, a, AxisRange::new(8.0, 10.0));
        group.with_surface(p, |s| {
            assert_eq!(s.y, Some(pinned));
            assert_eq!(s.y_writes, 1);
            assert_eq!(s.x, Some(AxisRange::new(8.0, 10.0)));
            assert_eq!(s.ticks, Some(TickIntervals { major: 5.0, minor: 1.0 }));
        });
        assert_eq!(group.passes(), 2);
    }
    #[test]
    fn empty_window_leaves_vertical_range_alone() {
        let group = ViewportGroup::new(table(), TickPolicy::Auto);
        let a = group.register(Recorder::default(), vec!["a".into()], None).unwrap();
        let b = group.register(Recorder::default(), vec!["a".into()], None).unwrap();
        let before = group.with_surface(b, |s| s.y).flatten();
        pan(&group, a, AxisRange::new(20.0, 30.0));
        group.with_surface(b, |s| {
            assert_eq!(s.y, before);
            assert_eq!(s.x, Some(AxisRange::new(20.0, 30.0)));
        });
    }
    #[test]
    fn unknown_source_errors_and_resets_state() {
        let group = ViewportGroup::new(table(), TickPolicy::Auto);
        group.register(Recorder::default(), vec!["a".into()], None).unwrap();
        let result = group.on_range_changed(ViewportId(7));
        assert!(matches!(result, Err(ScopeError::UnknownViewport(7))));
        assert_eq!(group.state(), SyncState::Idle);
        assert_eq!(group.passes(), 0);
    }
    #[test]
    fn registering_unknown_column_fails() {
        let group = ViewportGroup::new(table(), TickPolicy::Auto);
        let err = group
            .register(Recorder::default(), vec!["zzz".into()], None)
            .unwrap_err();
        assert!(matches!(err, ScopeError::ConfigColumnMissing(name) if name == "zzz"));
        assert!(group.is_empty());
    }
}
