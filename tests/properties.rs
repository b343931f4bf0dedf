//! Properties that hold for any sequence of interactions.

mod common;

use proptest::prelude::*;
use tablestate::{Action, DataStore, plan};

use common::{column_values, users_table, views};

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        prop::sample::select(vec!["id", "name", "email", "language_code", "age", "phone"])
            .prop_map(|c| Action::ToggleColumn(c.to_string())),
        (
            prop::sample::select(vec!["name", "email", "language_code", "age"]),
            prop::option::of("[a-z ]{0,4}|de|en|nl"),
        )
            .prop_map(|(column, value)| Action::SetFilter {
                column: column.to_string(),
                value,
            }),
        "[a-zA-Z ]{0,6}".prop_map(Action::SetGlobalSearch),
        prop::sample::select(vec!["id", "name", "email", "language_code", "age"])
            .prop_map(|c| Action::SetSort(c.to_string())),
        (0usize..15).prop_map(Action::SetPage),
        prop::sample::select(vec![0usize, 5, 7, 10, 25]).prop_map(Action::SetPageSize),
        Just(Action::NextPage),
        Just(Action::PreviousPage),
        Just(Action::Reset),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reset_is_idempotent(actions in prop::collection::vec(action(), 0..12)) {
        let mut table = users_table();
        let events = table.subscribe();
        for action in actions {
            // rejected actions are part of the input space
            let _ = table.apply(action);
        }
        views(&events);

        table.reset().unwrap();
        prop_assert!(views(&events).len() <= 1);
        prop_assert!(table.is_default());
        prop_assert_eq!(&table.state(), table.snapshot().state());

        table.reset().unwrap();
        prop_assert!(views(&events).is_empty());
    }

    #[test]
    fn default_indicator_matches_state(actions in prop::collection::vec(action(), 0..12)) {
        let mut table = users_table();
        let events = table.subscribe();
        for action in actions {
            let _ = table.apply(action);
            prop_assert_eq!(table.is_default(), &table.state() == table.snapshot().state());
        }
        for view in views(&events) {
            prop_assert_eq!(view.is_default, !view.show_reset());
        }
    }

    #[test]
    fn filters_never_grow_the_result(
        search in "[a-z]{0,3}",
        language in prop::sample::select(vec!["de", "en", "nl"]),
        needle in "[a-z]{1,2}",
    ) {
        let mut table = users_table();
        table.set_global_search(&search).unwrap();
        let before = table.store().query(&plan(&table.state())).unwrap().total_count;

        table.set_filter("language_code", Some(language)).unwrap();
        let narrowed = table.store().query(&plan(&table.state())).unwrap().total_count;
        prop_assert!(narrowed <= before);

        table.set_filter("email", Some(needle.as_str())).unwrap();
        let narrower = table.store().query(&plan(&table.state())).unwrap().total_count;
        prop_assert!(narrower <= narrowed);
    }

    #[test]
    fn sorting_twice_restores_the_order(
        column in prop::sample::select(vec!["id", "email", "age"]),
    ) {
        let mut table = users_table();
        let events = table.subscribe();
        table.set_sort(column).unwrap();
        let once = views(&events).pop().unwrap();

        table.set_sort(column).unwrap();
        table.set_sort(column).unwrap();
        let thrice = views(&events).pop().unwrap();
        prop_assert_eq!(column_values(&once, "name"), column_values(&thrice, "name"));
    }
}
