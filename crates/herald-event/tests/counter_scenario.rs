//! Publisher scenario: a counter raising `count_reached` once it hits three.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use herald_core::DispatchConfig;
use herald_event::{EventHandler, EventInvoker, Listener};

struct Counter {
    pub count_reached: EventHandler<u32, Counter>,
    count: Cell<u32>,
    invoker: EventInvoker<u32, Counter>,
}

impl Counter {
    fn new() -> Self {
        let invoker = EventInvoker::with_config(DispatchConfig::strict());
        Self {
            count_reached: invoker.handler(),
            count: Cell::new(0),
            invoker,
        }
    }

    fn add_one(&self) {
        let count = self.count.get() + 1;
        self.count.set(count);
        if count < 3 {
            return;
        }
        self.invoker.raise(self, &count);
    }
}

fn reset_on_three() -> Listener<u32, Counter> {
    Listener::new(|counter: &Counter, count: &u32| {
        if *count >= 3 {
            counter.count.set(0);
        }
    })
}

#[test]
fn six_increments_raise_twice_with_three() {
    let mut counter = Counter::new();
    let raises = Rc::new(RefCell::new(Vec::new()));

    let record = {
        let raises = Rc::clone(&raises);
        Listener::new(move |_: &Counter, count: &u32| raises.borrow_mut().push(*count))
    };
    counter.count_reached += &record;
    counter.count_reached += &reset_on_three();

    for _ in 0..6 {
        counter.add_one();
    }

    assert_eq!(*raises.borrow(), vec![3, 3]);
    assert_eq!(counter.count.get(), 0);
}

#[test]
fn sender_is_the_publisher() {
    let counter = Counter::new();
    let sender_addr = Rc::new(Cell::new(0usize));

    let capture_sender = {
        let sender_addr = Rc::clone(&sender_addr);
        Listener::new(move |sender: &Counter, _: &u32| {
            sender_addr.set(std::ptr::from_ref(sender) as usize);
        })
    };
    counter.count_reached.add(&capture_sender);

    for _ in 0..3 {
        counter.add_one();
    }
    assert_eq!(sender_addr.get(), std::ptr::from_ref(&counter) as usize);
}

#[test]
fn without_reset_every_call_past_three_raises() {
    let counter = Counter::new();
    let raises = Rc::new(RefCell::new(Vec::new()));
    let record = {
        let raises = Rc::clone(&raises);
        Listener::new(move |_: &Counter, count: &u32| raises.borrow_mut().push(*count))
    };
    counter.count_reached.add(&record);

    for _ in 0..5 {
        counter.add_one();
    }
    assert_eq!(*raises.borrow(), vec![3, 4, 5]);
}

#[test]
fn subscriber_can_skip_payload_when_nobody_listens() {
    let counter = Counter::new();
    assert!(!counter.count_reached.has_listeners());

    let reset = reset_on_three();
    counter.count_reached.add(&reset);
    assert!(counter.count_reached.has_listeners());

    counter.count_reached.remove(&reset);
    assert!(!counter.count_reached.has_listeners());
}

#[test]
fn handler_outliving_counter_is_detected() {
    let counter = Counter::new();
    let handler = counter.count_reached.clone();
    drop(counter);

    assert!(!handler.is_bound());
    assert!(handler.try_add(&reset_on_three()).is_err());
}
