use std::{cell::RefCell, rc::Rc};

use super::*;

fn enabled(id: &str) -> EngineEvent {
    EngineEvent::ElementEnabled {
        output: OutputTarget::new(id, 1, 1),
        viewport_id: id.to_string(),
        engine_id: "e".to_string(),
    }
}

#[test]
fn listeners_receive_events_in_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut bus = EventBus::default();
    let a = Rc::clone(&seen);
    bus.subscribe(move |e| a.borrow_mut().push(format!("1:{}", e.viewport_id())));
    let b = Rc::clone(&seen);
    bus.subscribe(move |e| b.borrow_mut().push(format!("2:{}", e.viewport_id())));

    bus.emit(&enabled("x"));
    assert_eq!(*seen.borrow(), vec!["1:x", "2:x"]);
}

#[test]
fn unsubscribe_stops_delivery() {
    let count = Rc::new(RefCell::new(0));
    let mut bus = EventBus::default();
    let c = Rc::clone(&count);
    let id = bus.subscribe(move |_| *c.borrow_mut() += 1);
    bus.emit(&enabled("x"));
    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id));
    bus.emit(&enabled("x"));
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn event_names() {
    let e = enabled("x");
    assert_eq!(e.name(), "element_enabled");
    assert_eq!(e.output().id(), "x");
}
