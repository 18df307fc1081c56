use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::core::{CarId, CarRecord};
use crate::observe::SubscriptionId;
use crate::source::CarDataSource;

/// Host-side table contract receiving selection add/remove events keyed by
/// record id.
pub trait RowSink {
    fn row_added(&mut self, record: &CarRecord);
    fn row_removed(&mut self, id: CarId);
}

/// Mirrors the selection set into an external table-like sink.
///
/// Selected ids are resolved to full records before forwarding; an id that
/// no longer resolves after a reload is dropped silently instead of looked
/// up loudly.
pub struct SelectionTableMirror<S: RowSink> {
    source: CarDataSource,
    sink: Rc<RefCell<S>>,
    subscription: RefCell<Option<SubscriptionId>>,
}

impl<S: RowSink + 'static> SelectionTableMirror<S> {
    #[must_use]
    pub fn new(source: &CarDataSource, sink: S) -> Self {
        let sink = Rc::new(RefCell::new(sink));

        let event_sink = Rc::clone(&sink);
        let event_source = source.clone();
        let subscription = source.subscribe_selection(move |event| {
            if event.selected {
                let Some(record) = event_source.find(event.id) else {
                    trace!(id = %event.id, "selected id does not resolve, row not mirrored");
                    return;
                };
                event_sink.borrow_mut().row_added(&record);
            } else {
                event_sink.borrow_mut().row_removed(event.id);
            }
        });

        Self {
            source: source.clone(),
            sink,
            subscription: RefCell::new(Some(subscription)),
        }
    }

    /// Read access to the mirrored sink.
    #[must_use]
    pub fn sink(&self) -> Ref<'_, S> {
        self.sink.borrow()
    }

    /// Detaches the mirror from the selection stream; safe to call more
    /// than once, also invoked on drop.
    pub fn dispose(&self) {
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            self.source.unsubscribe_selection(subscription);
            debug!("table mirror detached from selection stream");
        }
    }
}

impl<S: RowSink> Drop for SelectionTableMirror<S> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            self.source.unsubscribe_selection(subscription);
        }
    }
}
