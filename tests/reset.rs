//! The reset scenarios of the users index page, replayed against the engine.

mod common;

use common::{column_values, users_by_name, users_table, views};

#[test]
fn it_can_reset_toggled_columns() {
    let users = users_by_name();
    let mut table = users_table();
    let events = table.subscribe();
    table.refresh().unwrap();

    let initial = views(&events).pop().unwrap();
    assert_eq!(initial.rows[0].get("email"), Some(users[0].email.as_str()));
    assert!(!initial.show_reset());

    table.toggle_column("email").unwrap();
    let hidden = views(&events).pop().unwrap();
    assert!(!hidden.columns.contains(&"email".to_string()));
    assert!(hidden.rows.iter().all(|r| r.get("email").is_none()));
    assert!(hidden.show_reset());

    table.reset().unwrap();
    let restored = views(&events).pop().unwrap();
    assert_eq!(restored.rows[0].get("email"), Some(users[0].email.as_str()));
    assert!(!restored.show_reset());
}

#[test]
fn it_can_reset_select_filters() {
    let users = users_by_name();
    let first_dutch = users.iter().find(|u| u.language_code == "nl").unwrap();
    assert_eq!(users[0].language_code, "en");

    let mut table = users_table();
    let events = table.subscribe();
    table.refresh().unwrap();

    table.set_filter("language_code", Some("nl")).unwrap();
    let filtered = views(&events).pop().unwrap();
    let names = column_values(&filtered, "name");
    assert!(!names.contains(&users[0].name));
    assert_eq!(names[0], first_dutch.name);
    assert!(column_values(&filtered, "language_code").iter().all(|l| l == "nl"));

    table.reset().unwrap();
    let restored = views(&events).pop().unwrap();
    assert_eq!(column_values(&restored, "name")[0], users[0].name);
    assert!(restored.state.filters.is_empty());
}

#[test]
fn it_can_reset_global_search() {
    let mut table = users_table();
    let events = table.subscribe();
    table.refresh().unwrap();
    let initial = views(&events).pop().unwrap();
    assert!(!column_values(&initial, "name").contains(&"Pascal Baljet".to_string()));

    table.set_global_search("Pascal Baljet").unwrap();
    let found = views(&events).pop().unwrap();
    assert_eq!(found.total_count, 1);
    assert_eq!(column_values(&found, "email"), vec!["pascal@protone.media"]);
    assert!(found.show_reset());

    table.reset().unwrap();
    let restored = views(&events).pop().unwrap();
    assert!(!column_values(&restored, "email").contains(&"pascal@protone.media".to_string()));
    assert_eq!(restored.state.search, "");
}

#[test]
fn it_can_reset_search_inputs() {
    let mut table = users_table();
    let events = table.subscribe();
    table.refresh().unwrap();

    table.set_filter("name", Some("pascal baljet")).unwrap();
    let found = views(&events).pop().unwrap();
    assert_eq!(column_values(&found, "email"), vec!["pascal@protone.media"]);

    table.reset().unwrap();
    let restored = views(&events).pop().unwrap();
    assert_eq!(restored.total_count, 100);
    assert!(!column_values(&restored, "email").contains(&"pascal@protone.media".to_string()));
}

#[test]
fn it_can_reset_the_sort() {
    let users = users_by_name();
    let mut table = users_table();
    let events = table.subscribe();
    table.refresh().unwrap();

    let initial = column_values(&views(&events).pop().unwrap(), "name");
    assert_eq!(initial.first(), Some(&users[0].name));
    assert_eq!(initial.last(), Some(&users[9].name));

    table.set_sort("name").unwrap();
    let descending = column_values(&views(&events).pop().unwrap(), "name");
    assert_eq!(descending.first(), Some(&users[99].name));
    assert_eq!(descending.last(), Some(&users[90].name));

    table.reset().unwrap();
    let restored = column_values(&views(&events).pop().unwrap(), "name");
    assert_eq!(restored, initial);
}

#[test]
fn it_can_reset_to_the_first_page() {
    let users = users_by_name();
    let mut table = users_table();
    let events = table.subscribe();
    table.refresh().unwrap();

    table.next_page().unwrap();
    let second = column_values(&views(&events).pop().unwrap(), "name");
    assert_eq!(second.first(), Some(&users[10].name));
    assert_eq!(second.last(), Some(&users[19].name));

    table.reset().unwrap();
    let restored = views(&events).pop().unwrap();
    assert_eq!(restored.page(), 1);
    assert_eq!(column_values(&restored, "name")[0], users[0].name);
}

#[test]
fn it_can_reset_the_page_size() {
    let mut table = users_table();
    let events = table.subscribe();
    table.refresh().unwrap();
    table.next_page().unwrap();

    table.set_page_size(5).unwrap();
    let small = views(&events).pop().unwrap();
    assert_eq!(small.rows.len(), 5);
    assert_eq!(small.page(), 1);
    assert_eq!(small.page_count(), 20);

    table.reset().unwrap();
    assert_eq!(views(&events).pop().unwrap().rows.len(), 10);
}

#[test]
fn sort_toggles_between_extremes() {
    let users = users_by_name();
    let mut table = users_table();
    let events = table.subscribe();
    table.refresh().unwrap();

    table.set_sort("name").unwrap();
    assert_eq!(
        column_values(&views(&events).pop().unwrap(), "name")[0],
        users[99].name
    );
    table.set_sort("name").unwrap();
    let again = views(&events).pop().unwrap();
    assert_eq!(column_values(&again, "name")[0], users[0].name);
    assert!(again.is_default);
}

#[test]
fn a_filter_past_the_last_page_shows_page_one() {
    let users = users_by_name();
    let mut table = users_table();
    let events = table.subscribe();

    table.set_page(10).unwrap();
    let last = views(&events).pop().unwrap();
    assert_eq!(column_values(&last, "name")[0], users[90].name);

    table.set_filter("language_code", Some("de")).unwrap();
    let published = views(&events);
    assert_eq!(published.len(), 1);
    let view = &published[0];
    assert_eq!(view.page(), 1);
    assert_eq!(view.total_count, 5);
    assert_eq!(view.rows.len(), 5);
    assert!(column_values(view, "language_code").iter().all(|l| l == "de"));
    assert_eq!(table.state().pagination.page, 1);
}

#[test]
fn reset_publishes_once_then_never() {
    let mut table = users_table();
    let events = table.subscribe();

    table.reset().unwrap();
    assert!(views(&events).is_empty());

    table.toggle_column("email").unwrap();
    table.set_filter("language_code", Some("nl")).unwrap();
    table.set_global_search("van").unwrap();
    table.set_sort("age").unwrap();
    table.set_page(2).unwrap();
    views(&events);

    table.reset().unwrap();
    let published = views(&events);
    assert_eq!(published.len(), 1);
    assert!(published[0].is_default);
    assert_eq!(&published[0].state, table.snapshot().state());

    table.reset().unwrap();
    assert!(views(&events).is_empty());
    assert!(table.is_default());
}

#[test]
fn hidden_columns_still_filter_and_sort() {
    let mut table = users_table();
    let events = table.subscribe();

    table.set_filter("language_code", Some("de")).unwrap();
    table.toggle_column("language_code").unwrap();
    let view = views(&events).pop().unwrap();
    assert_eq!(view.total_count, 5);
    assert!(view.rows.iter().all(|r| r.get("language_code").is_none()));
}

#[test]
fn the_largest_page_is_corrected_to_page_one() {
    let users = users_by_name();
    let mut table = users_table();
    let events = table.subscribe();

    table.set_page(usize::MAX).unwrap();
    let published = views(&events);
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].page(), 1);
    assert_eq!(column_values(&published[0], "name")[0], users[0].name);
    assert!(table.is_default());

    // the table keeps answering after the correction
    table.next_page().unwrap();
    let second = views(&events).pop().unwrap();
    assert_eq!(second.page(), 2);
    assert_eq!(column_values(&second, "name")[0], users[10].name);
}
