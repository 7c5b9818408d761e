//! Property-based tests for the subscription state machine.
//!
//! For any interleaving of subscribe, token release, direct unsubscribe and
//! notifications:
//! 1. Each notification reaches exactly the live subscriptions, newest first.
//! 2. A released token never receives anything again.
//! 3. Token and direct unsubscription compose: the second is a no-op.
//! 4. `notify_complete` reaches every live subscription and leaves none.

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use herald_core::DispatchConfig;
use herald_observe::{Observable, Observer, Unsubscriber};
use proptest::prelude::*;

const OBSERVERS: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Subscribe(usize),
    ReleaseToken(usize),
    Unsubscribe(usize),
    Next(i32),
}

// ── Strategies ────────────────────────────────────────────────────────────

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..OBSERVERS).prop_map(Op::Subscribe),
        2 => any::<usize>().prop_map(Op::ReleaseToken),
        1 => (0..OBSERVERS).prop_map(Op::Unsubscribe),
        3 => any::<i32>().prop_map(Op::Next),
    ]
}

fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op_strategy(), 0..=max_len)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Delivery {
    Next(usize, i32),
    Complete(usize),
}

struct Tagged {
    idx: usize,
    log: Rc<RefCell<Vec<Delivery>>>,
}

impl Observer<i32> for Tagged {
    fn on_next(&self, subject: &i32) {
        self.log.borrow_mut().push(Delivery::Next(self.idx, *subject));
    }

    fn on_error(&self, _error: &(dyn Error + 'static)) {}

    fn on_complete(&self) {
        self.log.borrow_mut().push(Delivery::Complete(self.idx));
    }
}

proptest! {
    #[test]
    fn lifecycle_matches_model(ops in ops_strategy(50)) {
        let obs: Observable<i32> = Observable::with_config(DispatchConfig::strict());
        let log = Rc::new(RefCell::new(Vec::new()));
        let observers: Vec<Rc<Tagged>> = (0..OBSERVERS)
            .map(|idx| Rc::new(Tagged { idx, log: Rc::clone(&log) }))
            .collect();

        // Tokens by subscription order; `None` once released.
        let mut tokens: Vec<Option<Unsubscriber>> = Vec::new();
        // Model registry, newest first: (token index, observer index).
        let mut model: Vec<(usize, usize)> = Vec::new();

        for op in &ops {
            match *op {
                Op::Subscribe(idx) => {
                    tokens.push(Some(obs.subscribe(&observers[idx])));
                    model.insert(0, (tokens.len() - 1, idx));
                }
                Op::ReleaseToken(raw) => {
                    if tokens.is_empty() {
                        continue;
                    }
                    let slot = raw % tokens.len();
                    let was_registered = model.iter().any(|&(t, _)| t == slot);
                    if let Some(mut token) = tokens[slot].take() {
                        prop_assert_eq!(token.is_active(), was_registered);
                        prop_assert_eq!(token.unsubscribe(), was_registered);
                    }
                    model.retain(|&(t, _)| t != slot);
                }
                Op::Unsubscribe(idx) => {
                    let expected = model.iter().filter(|&&(_, o)| o == idx).count();
                    prop_assert_eq!(obs.unsubscribe(&observers[idx]), expected);
                    model.retain(|&(_, o)| o != idx);
                }
                Op::Next(value) => {
                    log.borrow_mut().clear();
                    obs.notify_next(&value);
                    let expected: Vec<Delivery> =
                        model.iter().map(|&(_, o)| Delivery::Next(o, value)).collect();
                    prop_assert_eq!(&*log.borrow(), &expected);
                }
            }
            prop_assert_eq!(obs.subscriber_count(), model.len());
        }

        log.borrow_mut().clear();
        obs.notify_complete();
        let expected: Vec<Delivery> = model.iter().map(|&(_, o)| Delivery::Complete(o)).collect();
        prop_assert_eq!(&*log.borrow(), &expected);
        prop_assert_eq!(obs.subscriber_count(), 0);
        prop_assert!(tokens.iter().flatten().all(|t| !t.is_active()));
    }
}
