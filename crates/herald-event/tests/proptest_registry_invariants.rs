//! Property-based invariant tests for the listener registry.
//!
//! For any sequence of add/remove operations on a handler:
//! 1. `raise` invokes exactly the registered multiset of entries, each once.
//! 2. Dispatch order is newest first.
//! 3. Every call sees the raising sender and payload.
//! 4. `has_listeners` is true iff the registry is non-empty.
//! 5. A single remove deletes every matching `(listener, state)` entry.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use herald_core::DispatchConfig;
use herald_event::{EventInvoker, Listener};
use proptest::prelude::*;

const LISTENERS: usize = 4;

#[derive(Debug, Clone)]
enum Op {
    Add { listener: usize, state: u8 },
    Remove { listener: usize, state: u8 },
}

// ── Strategies ────────────────────────────────────────────────────────────

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..LISTENERS, 0u8..3).prop_map(|(listener, state)| Op::Add { listener, state }),
        1 => (0..LISTENERS, 0u8..3).prop_map(|(listener, state)| Op::Remove { listener, state }),
    ]
}

fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op_strategy(), 0..=max_len)
}

/// (listener index, state, sender, payload) per invocation.
type CallLog = Rc<RefCell<Vec<(usize, u8, u16, u32)>>>;

fn listeners(log: &CallLog) -> Vec<Listener<u32, u16, u8>> {
    (0..LISTENERS)
        .map(|idx| {
            let log = Rc::clone(log);
            Listener::with_state(move |sender: &u16, payload: &u32, state: &u8| {
                log.borrow_mut().push((idx, *state, *sender, *payload));
            })
        })
        .collect()
}

proptest! {
    #[test]
    fn raise_matches_model(ops in ops_strategy(40), sender in any::<u16>(), payload in any::<u32>()) {
        let invoker: EventInvoker<u32, u16, u8> = EventInvoker::with_config(DispatchConfig::strict());
        let handler = invoker.handler();
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let pool = listeners(&log);
        let mut model: VecDeque<(usize, u8)> = VecDeque::new();

        for op in &ops {
            match *op {
                Op::Add { listener, state } => {
                    handler.add_with_state(&pool[listener], state);
                    model.push_front((listener, state));
                }
                Op::Remove { listener, state } => {
                    let expected = model.iter().filter(|e| **e == (listener, state)).count();
                    let removed = handler.remove_with_state(&pool[listener], &state);
                    prop_assert_eq!(removed, expected);
                    model.retain(|e| *e != (listener, state));
                }
            }
            prop_assert_eq!(handler.has_listeners(), !model.is_empty());
            prop_assert_eq!(handler.listener_count(), model.len());
        }

        invoker.raise(&sender, &payload);

        let expected: Vec<(usize, u8, u16, u32)> = model
            .iter()
            .map(|&(idx, state)| (idx, state, sender, payload))
            .collect();
        prop_assert_eq!(&*log.borrow(), &expected);
    }

    #[test]
    fn removed_pair_never_fires(listener in 0..LISTENERS, state in 0u8..3, copies in 1usize..5) {
        let invoker: EventInvoker<u32, u16, u8> = EventInvoker::with_config(DispatchConfig::strict());
        let handler = invoker.handler();
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let pool = listeners(&log);

        for _ in 0..copies {
            handler.add_with_state(&pool[listener], state);
        }
        prop_assert_eq!(handler.remove_with_state(&pool[listener], &state), copies);

        invoker.raise(&0, &0);
        prop_assert!(log.borrow().is_empty());
        prop_assert!(!handler.has_listeners());
    }
}
