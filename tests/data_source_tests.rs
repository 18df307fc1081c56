use std::cell::RefCell;
use std::rc::Rc;

use carplot::core::{CarId, CarRecord, CylinderCount, FuelType, Manufacturer};
use carplot::error::PlotError;
use carplot::source::{CarDataSource, FocusChange, SelectionEvent};

fn car(id: u32, make: Manufacturer, price: f64) -> CarRecord {
    CarRecord {
        id: CarId::new(id),
        price,
        manufacturer: make,
        fuel_type: FuelType::Gas,
        cylinder_count: CylinderCount::Four,
        horsepower: 100.0,
        city_mpg: 25.0,
        highway_mpg: 31.0,
    }
}

fn honda_and_bmw() -> Vec<CarRecord> {
    vec![
        car(1, Manufacturer::Honda, 10_000.0),
        car(2, Manufacturer::Bmw, 50_000.0),
    ]
}

#[test]
fn selection_scenario_emits_three_events_in_call_order() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");

    let events: Rc<RefCell<Vec<SelectionEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    source.subscribe_selection(move |event| sink.borrow_mut().push(*event));

    source.select(CarId::new(1));
    source.select(CarId::new(2));
    source.unselect(CarId::new(1));

    let events = events.borrow();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], SelectionEvent { id: CarId::new(1), selected: true });
    assert_eq!(events[1], SelectionEvent { id: CarId::new(2), selected: true });
    assert_eq!(events[2], SelectionEvent { id: CarId::new(1), selected: false });

    let selected: Vec<CarId> = source.selected().iter().copied().collect();
    assert_eq!(selected, vec![CarId::new(2)]);
}

#[test]
fn toggling_twice_restores_membership_with_opposite_events() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");

    let events: Rc<RefCell<Vec<SelectionEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    source.subscribe_selection(move |event| sink.borrow_mut().push(*event));

    source.toggle(CarId::new(1));
    assert!(source.is_selected(CarId::new(1)));
    source.toggle(CarId::new(1));
    assert!(!source.is_selected(CarId::new(1)));

    let events = events.borrow();
    assert_eq!(events.len(), 2);
    assert!(events[0].selected);
    assert!(!events[1].selected);
}

#[test]
fn selection_events_fan_out_to_all_subscribers_in_order() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");

    let log: Rc<RefCell<Vec<(&'static str, CarId)>>> = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&log);
    source.subscribe_selection(move |event| first.borrow_mut().push(("first", event.id)));
    let second = Rc::clone(&log);
    source.subscribe_selection(move |event| second.borrow_mut().push(("second", event.id)));

    source.select(CarId::new(1));
    source.select(CarId::new(2));

    assert_eq!(
        *log.borrow(),
        vec![
            ("first", CarId::new(1)),
            ("second", CarId::new(1)),
            ("first", CarId::new(2)),
            ("second", CarId::new(2)),
        ]
    );
}

#[test]
fn notifications_arrive_before_the_mutating_call_returns() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");

    let observed: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&observed);
    let selection_view = source.clone();
    source.subscribe_selection(move |_| {
        sink.borrow_mut().push(selection_view.selected().len());
    });

    source.select(CarId::new(1));
    assert_eq!(*observed.borrow(), vec![1]);
    source.select(CarId::new(2));
    assert_eq!(*observed.borrow(), vec![1, 2]);
}

#[test]
fn repeated_focus_emits_unconditionally_with_old_and_new() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");

    let changes: Rc<RefCell<Vec<FocusChange>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    source.subscribe_focus(move |change| sink.borrow_mut().push(*change));

    source.set_current(Some(CarId::new(5)));
    source.set_current(Some(CarId::new(5)));
    source.set_current(None);

    let changes = changes.borrow();
    // First entry is the replayed initial no-focus state.
    assert_eq!(changes[0], FocusChange { old: None, new: None });
    assert_eq!(
        changes[1],
        FocusChange { old: None, new: Some(CarId::new(5)) }
    );
    assert_eq!(
        changes[2],
        FocusChange {
            old: Some(CarId::new(5)),
            new: Some(CarId::new(5)),
        }
    );
    assert_eq!(
        changes[3],
        FocusChange { old: Some(CarId::new(5)), new: None }
    );
}

#[test]
fn focus_stream_replays_latest_value_to_late_subscribers() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");
    source.set_current(Some(CarId::new(2)));

    let changes: Rc<RefCell<Vec<FocusChange>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    source.subscribe_focus(move |change| sink.borrow_mut().push(*change));

    assert_eq!(
        *changes.borrow(),
        vec![FocusChange { old: None, new: Some(CarId::new(2)) }]
    );
    assert_eq!(source.current(), Some(CarId::new(2)));
}

#[test]
fn data_changed_does_not_replay_and_carries_record_count() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");

    let counts: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&counts);
    source.subscribe_data_changed(move |event| sink.borrow_mut().push(event.record_count));

    // No replay: the earlier load is not observed.
    assert!(counts.borrow().is_empty());

    source
        .set_data(vec![car(7, Manufacturer::Volvo, 18_000.0)])
        .expect("reload");
    assert_eq!(*counts.borrow(), vec![1]);
}

#[test]
fn reload_keeps_selection_and_tolerates_dangling_ids() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");
    source.select(CarId::new(1));

    source
        .set_data(vec![car(9, Manufacturer::Mazda, 8_000.0)])
        .expect("reload");

    assert!(source.is_selected(CarId::new(1)));
    assert!(!source.contains(CarId::new(1)));
    assert!(source.find(CarId::new(1)).is_none());
}

#[test]
fn missing_id_lookup_fails_loudly() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");

    assert!(matches!(
        source.record(CarId::new(99)),
        Err(PlotError::UnknownRecordId(id)) if id == CarId::new(99)
    ));
    assert_eq!(source.record(CarId::new(1)).expect("present").price, 10_000.0);
}

#[test]
fn duplicate_ids_are_rejected_and_leave_previous_data_intact() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");

    let result = source.set_data(vec![
        car(3, Manufacturer::Audi, 1.0),
        car(3, Manufacturer::Saab, 2.0),
    ]);
    assert!(matches!(result, Err(PlotError::DuplicateRecordId(_))));
    assert_eq!(source.record_count(), 2);
}

#[test]
fn unsubscribed_consumers_stop_receiving_events() {
    let source = CarDataSource::new();
    source.set_data(honda_and_bmw()).expect("load");

    let events: Rc<RefCell<Vec<SelectionEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let subscription = source.subscribe_selection(move |event| sink.borrow_mut().push(*event));

    source.select(CarId::new(1));
    assert!(source.unsubscribe_selection(subscription));
    source.select(CarId::new(2));

    assert_eq!(events.borrow().len(), 1);
}
