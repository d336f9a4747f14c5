//! Property-based tests for session history
//!
//! Invariants:
//! - history grows by exactly one per recorded trip, in call order
//! - after recording, the newest trip is selected
//! - the selection always points into history

use super::*;
use crate::testing::trip_request;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Record(String),
    Select(usize),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[A-Z][a-z]{2,10}".prop_map(Op::Record),
        2 => (0usize..12).prop_map(Op::Select),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_history_is_append_only(
        destinations in prop::collection::vec("[A-Z][a-z]{2,10}", 1..20)
    ) {
        let mut session = Session::new();
        for destination in &destinations {
            session.record(TripRecord::new(trip_request(destination), String::new()));
        }

        let recorded: Vec<&str> = session
            .history()
            .iter()
            .map(|t| t.destination.as_str())
            .collect();
        let expected: Vec<&str> = destinations.iter().map(String::as_str).collect();
        prop_assert_eq!(recorded, expected);
        prop_assert_eq!(session.selected_index(), Some(destinations.len() - 1));
    }

    #[test]
    fn prop_selection_always_in_history(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut session = Session::new();
        let mut expected_len = 0;

        for op in ops {
            match op {
                Op::Record(destination) => {
                    let trip = TripRecord::new(trip_request(&destination), String::new());
                    session.record(trip);
                    expected_len += 1;
                    prop_assert_eq!(session.selected_index(), Some(expected_len - 1));
                }
                Op::Select(index) => {
                    let before = session.selected_index();
                    match session.select(index) {
                        Ok(trip) => {
                            prop_assert!(Arc::ptr_eq(&trip, &session.history()[index]));
                        }
                        Err(_) => {
                            prop_assert_eq!(session.selected_index(), before);
                        }
                    }
                }
                Op::Clear => session.clear_selection(),
            }

            prop_assert_eq!(session.history().len(), expected_len);
            if let Some(i) = session.selected_index() {
                prop_assert!(i < session.history().len());
            }
        }
    }
}
