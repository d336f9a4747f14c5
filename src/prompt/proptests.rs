//! Property-based tests for prompt composition

use super::compose;
use crate::trip::{TravelStyle, TripRequest, MIN_BUDGET};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn arb_style() -> impl Strategy<Value = TravelStyle> {
    prop_oneof![
        Just(TravelStyle::Budget),
        Just(TravelStyle::Luxury),
        Just(TravelStyle::Adventure),
        Just(TravelStyle::Family),
    ]
}

fn arb_request() -> impl Strategy<Value = TripRequest> {
    (
        "[A-Z][a-z]{2,15}( [A-Z][a-z]{2,10})?",
        1u32..=30,
        1u32..=20,
        MIN_BUDGET..10_000_000.0f64,
        arb_style(),
    )
        .prop_map(|(destination, days, people, budget, style)| TripRequest {
            destination,
            days,
            people,
            budget,
            style,
            interests: BTreeSet::new(),
        })
}

proptest! {
    #[test]
    fn prop_per_person_is_exact_quotient(request in arb_request()) {
        let expected = request.budget / f64::from(request.people);
        prop_assert_eq!(request.per_person_budget().to_bits(), expected.to_bits());
    }

    #[test]
    fn prop_prompt_embeds_per_person_and_destination(request in arb_request()) {
        let prompt = compose(&request, None, request.style.accommodation());
        let quotient = request.budget / f64::from(request.people);
        let per_person = format!("Per Person Budget: ₹{quotient}");
        let destination = format!("Destination: {}", request.destination);
        prop_assert!(prompt.contains(&per_person));
        prop_assert!(prompt.contains(&destination));
        prop_assert!(prompt.contains(request.style.accommodation()));
    }

    #[test]
    fn prop_validated_requests_stay_valid(request in arb_request()) {
        prop_assert!(request.validate().is_ok());
    }
}
