//! Synchronous publish/subscribe primitives used by the interactive data
//! source.
//!
//! Subscribers run in subscription order, inside the call that published the
//! event; nothing is batched or coalesced. Callbacks may subscribe,
//! unsubscribe, or publish again while a dispatch is on the stack.

use std::cell::RefCell;
use std::rc::Rc;

/// Handle identifying one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E)>;

struct Slot<E> {
    id: SubscriptionId,
    dead: bool,
    callback: Option<Callback<E>>,
}

struct TopicState<E> {
    slots: Vec<Slot<E>>,
    next_id: u64,
    dispatch_depth: usize,
}

impl<E> Default for TopicState<E> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
            dispatch_depth: 0,
        }
    }
}

/// Broadcast stream without replay: late subscribers miss past events.
///
/// Cloning yields another handle onto the same subscriber list.
pub struct Topic<E> {
    state: Rc<RefCell<TopicState<E>>>,
}

impl<E> Clone for Topic<E> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<E> Default for Topic<E> {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(TopicState::default())),
        }
    }
}

impl<E> Topic<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let mut state = self.state.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.slots.push(Slot {
            id,
            dead: false,
            callback: Some(Box::new(callback)),
        });
        id
    }

    /// Returns `true` when the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(position) = state
            .slots
            .iter()
            .position(|slot| slot.id == id && !slot.dead)
        else {
            return false;
        };

        if state.dispatch_depth > 0 {
            // A dispatch is walking the slot list by index; mark instead of
            // removing so positions stay valid until it unwinds.
            state.slots[position].dead = true;
            state.slots[position].callback = None;
        } else {
            state.slots.remove(position);
        }
        true
    }

    /// Delivers `event` to every live subscriber in subscription order.
    ///
    /// Subscribers added during the dispatch do not receive this event. A
    /// slot whose callback is already on the stack (re-entrant publish) is
    /// skipped for the inner delivery.
    pub fn publish(&self, event: &E) {
        let snapshot_len = {
            let mut state = self.state.borrow_mut();
            state.dispatch_depth += 1;
            state.slots.len()
        };

        let mut index = 0;
        while index < snapshot_len {
            let taken = {
                let mut state = self.state.borrow_mut();
                let slot = &mut state.slots[index];
                if slot.dead {
                    None
                } else {
                    slot.callback.take().map(|callback| (slot.id, callback))
                }
            };

            if let Some((id, mut callback)) = taken {
                callback(event);
                let mut state = self.state.borrow_mut();
                if let Some(slot) = state.slots.iter_mut().find(|slot| slot.id == id) {
                    if !slot.dead {
                        slot.callback = Some(callback);
                    }
                }
            }
            index += 1;
        }

        let mut state = self.state.borrow_mut();
        state.dispatch_depth -= 1;
        if state.dispatch_depth == 0 {
            state.slots.retain(|slot| !slot.dead);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state
            .borrow()
            .slots
            .iter()
            .filter(|slot| !slot.dead)
            .count()
    }
}

/// Broadcast stream that replays the latest value to each new subscriber.
pub struct ReplayTopic<E: Clone> {
    topic: Topic<E>,
    latest: Rc<RefCell<E>>,
}

impl<E: Clone> Clone for ReplayTopic<E> {
    fn clone(&self) -> Self {
        Self {
            topic: self.topic.clone(),
            latest: Rc::clone(&self.latest),
        }
    }
}

impl<E: Clone> ReplayTopic<E> {
    #[must_use]
    pub fn new(initial: E) -> Self {
        Self {
            topic: Topic::new(),
            latest: Rc::new(RefCell::new(initial)),
        }
    }

    /// Subscribes and immediately delivers the latest value, so a consumer
    /// attaching late still observes a defined state.
    pub fn subscribe(&self, mut callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let replayed = self.latest.borrow().clone();
        callback(&replayed);
        self.topic.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.topic.unsubscribe(id)
    }

    pub fn publish(&self, event: E) {
        *self.latest.borrow_mut() = event.clone();
        self.topic.publish(&event);
    }

    #[must_use]
    pub fn latest(&self) -> E {
        self.latest.borrow().clone()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.topic.subscriber_count()
    }
}

impl<E: Clone + Default> Default for ReplayTopic<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{ReplayTopic, Topic};

    #[test]
    fn subscribers_receive_events_in_subscription_order() {
        let topic: Topic<u32> = Topic::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        topic.subscribe(move |value| first.borrow_mut().push(("first", *value)));
        let second = Rc::clone(&log);
        topic.subscribe(move |value| second.borrow_mut().push(("second", *value)));

        topic.publish(&1);
        topic.publish(&2);

        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("second", 1), ("first", 2), ("second", 2)]
        );
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving() {
        let topic: Topic<u32> = Topic::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&log);
        let id = topic.subscribe(move |value| sink.borrow_mut().push(*value));
        topic.publish(&1);
        assert!(topic.unsubscribe(id));
        assert!(!topic.unsubscribe(id));
        topic.publish(&2);

        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(topic.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribing_inside_a_dispatch_does_not_skip_other_subscribers() {
        let topic: Topic<u32> = Topic::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let unsubscriber_id = Rc::new(RefCell::new(None));
        let self_topic = topic.clone();
        let id_cell = Rc::clone(&unsubscriber_id);
        let first_log = Rc::clone(&log);
        let id = topic.subscribe(move |value| {
            first_log.borrow_mut().push(("first", *value));
            if let Some(own_id) = *id_cell.borrow() {
                self_topic.unsubscribe(own_id);
            }
        });
        *unsubscriber_id.borrow_mut() = Some(id);

        let second_log = Rc::clone(&log);
        topic.subscribe(move |value| second_log.borrow_mut().push(("second", *value)));

        topic.publish(&1);
        topic.publish(&2);

        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("second", 1), ("second", 2)]
        );
    }

    #[test]
    fn subscribers_added_during_dispatch_miss_the_inflight_event() {
        let topic: Topic<u32> = Topic::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let self_topic = topic.clone();
        let outer_log = Rc::clone(&log);
        topic.subscribe(move |value| {
            outer_log.borrow_mut().push(("outer", *value));
            let inner_log = Rc::clone(&outer_log);
            self_topic.subscribe(move |value| inner_log.borrow_mut().push(("inner", *value)));
        });

        topic.publish(&1);
        assert_eq!(*log.borrow(), vec![("outer", 1)]);
    }

    #[test]
    fn replay_topic_delivers_latest_value_on_subscribe() {
        let topic: ReplayTopic<u32> = ReplayTopic::new(0);
        topic.publish(7);

        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        topic.subscribe(move |value| sink.borrow_mut().push(*value));
        topic.publish(8);

        assert_eq!(*log.borrow(), vec![7, 8]);
        assert_eq!(topic.latest(), 8);
    }
}
