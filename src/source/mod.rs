//! The interactive data source: single owner of records, selection, and
//! focus.
//!
//! All mutation flows through [`CarDataSource`] methods and every mutation
//! notifies its stream synchronously, so loosely-coupled consumers (chart,
//! legend, table mirror) observe the same sequence of state transitions.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{CarId, CarRecord, RecordSet};
use crate::error::PlotResult;
use crate::observe::{ReplayTopic, SubscriptionId, Topic};

/// Payload of the data-changed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataChanged {
    pub record_count: usize,
}

/// Payload of the selection stream; one event per mutation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub id: CarId,
    pub selected: bool,
}

/// Payload of the focus stream.
///
/// `old == new` is legal (repeated hover over the same point); observers
/// must apply the change idempotently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FocusChange {
    pub old: Option<CarId>,
    pub new: Option<CarId>,
}

#[derive(Debug, Default)]
struct SourceState {
    records: RecordSet,
    selected: IndexSet<CarId>,
}

/// Reactive facade over the record collection, the selection set, and the
/// focus pointer.
///
/// Cloning yields another handle onto the same shared state. Read accessors
/// return guards that must be dropped before the next mutation; this is the
/// single-writer discipline that keeps multiple renderers consistent without
/// locks.
#[derive(Clone, Default)]
pub struct CarDataSource {
    state: Rc<RefCell<SourceState>>,
    data_changed: Topic<DataChanged>,
    selection: Topic<SelectionEvent>,
    focus: ReplayTopic<FocusChange>,
}

impl CarDataSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the record collection and its id index atomically.
    ///
    /// Selection and focus are left untouched; entries referring to removed
    /// ids stay dangling and consumers tolerate them by checking membership
    /// before lookup.
    pub fn set_data(&self, records: Vec<CarRecord>) -> PlotResult<()> {
        let record_count = records.len();
        let records = RecordSet::new(records)?;
        self.state.borrow_mut().records = records;
        debug!(record_count, "replaced record collection");
        self.data_changed.publish(&DataChanged { record_count });
        Ok(())
    }

    pub fn select(&self, id: CarId) {
        self.set_selected(id, true);
    }

    pub fn unselect(&self, id: CarId) {
        self.set_selected(id, false);
    }

    /// Selects `id` when absent from the selection set, unselects it
    /// otherwise.
    pub fn toggle(&self, id: CarId) {
        let selected = !self.state.borrow().selected.contains(&id);
        self.set_selected(id, selected);
    }

    fn set_selected(&self, id: CarId, selected: bool) {
        {
            let mut state = self.state.borrow_mut();
            if selected {
                state.selected.insert(id);
            } else {
                state.selected.shift_remove(&id);
            }
        }
        trace!(%id, selected, "selection changed");
        self.selection.publish(&SelectionEvent { id, selected });
    }

    /// Moves the focus pointer and notifies observers unconditionally, even
    /// when the pointer does not move.
    pub fn set_current(&self, id: Option<CarId>) {
        let change = FocusChange {
            old: self.focus.latest().new,
            new: id,
        };
        trace!(old = ?change.old, new = ?change.new, "focus changed");
        self.focus.publish(change);
    }

    /// Ordered view of the live records.
    #[must_use]
    pub fn records(&self) -> Ref<'_, RecordSet> {
        Ref::map(self.state.borrow(), |state| &state.records)
    }

    /// Looks up one record by id; a missing id is a caller contract
    /// violation and fails loudly.
    pub fn record(&self, id: CarId) -> PlotResult<CarRecord> {
        self.state.borrow().records.record(id).copied()
    }

    #[must_use]
    pub fn find(&self, id: CarId) -> Option<CarRecord> {
        self.state.borrow().records.find(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: CarId) -> bool {
        self.state.borrow().records.contains(id)
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.state.borrow().records.len()
    }

    /// Read-only view of the selection set, in selection order.
    #[must_use]
    pub fn selected(&self) -> Ref<'_, IndexSet<CarId>> {
        Ref::map(self.state.borrow(), |state| &state.selected)
    }

    #[must_use]
    pub fn is_selected(&self, id: CarId) -> bool {
        self.state.borrow().selected.contains(&id)
    }

    /// Currently focused record id, if any.
    #[must_use]
    pub fn current(&self) -> Option<CarId> {
        self.focus.latest().new
    }

    pub fn subscribe_data_changed(
        &self,
        callback: impl FnMut(&DataChanged) + 'static,
    ) -> SubscriptionId {
        self.data_changed.subscribe(callback)
    }

    pub fn unsubscribe_data_changed(&self, id: SubscriptionId) -> bool {
        self.data_changed.unsubscribe(id)
    }

    pub fn subscribe_selection(
        &self,
        callback: impl FnMut(&SelectionEvent) + 'static,
    ) -> SubscriptionId {
        self.selection.subscribe(callback)
    }

    pub fn unsubscribe_selection(&self, id: SubscriptionId) -> bool {
        self.selection.unsubscribe(id)
    }

    /// Subscribes to focus changes; the latest change replays immediately so
    /// a renderer attaching after load sees a defined no-focus state.
    pub fn subscribe_focus(
        &self,
        callback: impl FnMut(&FocusChange) + 'static,
    ) -> SubscriptionId {
        self.focus.subscribe(callback)
    }

    pub fn unsubscribe_focus(&self, id: SubscriptionId) -> bool {
        self.focus.unsubscribe(id)
    }
}
