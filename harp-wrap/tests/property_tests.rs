//! Property-based tests for the wrapping engine

use harp_test_utils::{order, Customer, Order};
use harp_wrap::naming::to_camel_case;
use harp_wrap::{getter, wrap, wrap_all, WrapPolicy};
use proptest::prelude::*;
use serde_json::json;

fn arb_order() -> impl Strategy<Value = Order> {
    (
        "[A-Za-z0-9 -]{0,12}",
        any::<i64>(),
        "[A-Za-z]{0,8}",
        "[A-Za-z]{0,8}",
    )
        .prop_map(|(reference, total, name, city)| Order {
            reference,
            total,
            customer: Customer { name, city },
        })
}

fn reference_policy() -> WrapPolicy<Order> {
    WrapPolicy::<Order>::new()
        .property(getter!(Order => Reference))
        .property(getter!(Order => Customer.Name))
        .build()
}

proptest! {
    #[test]
    fn equal_name_sets_for_any_two_values(a in arb_order(), b in arb_order()) {
        let policy = reference_policy();

        let first = wrap(&a, &policy, None).expect("wrap first");
        let second = wrap(&b, &policy, None).expect("wrap second");

        let mut first_names: Vec<_> = first.property_names().collect();
        let mut second_names: Vec<_> = second.property_names().collect();
        first_names.sort_unstable();
        second_names.sort_unstable();
        prop_assert_eq!(first_names, second_names);
    }

    #[test]
    fn wrap_is_idempotent(item in arb_order()) {
        let policy = reference_policy();

        let first = wrap(&item, &policy, None).expect("wrap once");
        let second = wrap(&item, &policy, None).expect("wrap twice");

        prop_assert_eq!(first, second);
    }

    #[test]
    fn camel_case_removes_underscores_and_lowers_first(name in "[A-Za-z_]{0,24}") {
        let out = to_camel_case(&name);

        prop_assert!(!out.contains('_'));
        if let Some(first) = out.chars().next() {
            prop_assert!(!first.is_ascii_uppercase());
        }
    }

    #[test]
    fn camel_case_is_idempotent(name in "[A-Za-z_]{0,24}") {
        let once = to_camel_case(&name);
        let twice = to_camel_case(&once);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn camel_case_preserves_length_without_underscores(name in "[A-Za-z]{0,24}") {
        // Casing never adds or removes letters.
        prop_assert_eq!(to_camel_case(&name).chars().count(), name.chars().count());
    }

    #[test]
    fn collection_wrap_preserves_order_and_count(
        references in prop::collection::vec("[A-Za-z]{1,6}", 0..8)
    ) {
        let items: Vec<Order> = references.iter().map(|r| order(r)).collect();
        let policy = WrapPolicy::<Order>::new()
            .property(getter!(Order => Reference))
            .build();

        let resources: Vec<_> = wrap_all(&items, &policy, None)
            .expect("compile")
            .collect::<Result<_, _>>()
            .expect("wrap items");

        prop_assert_eq!(resources.len(), references.len());
        for (resource, reference) in resources.iter().zip(&references) {
            prop_assert_eq!(resource.get("Reference"), Some(&json!(reference)));
        }
    }
}
