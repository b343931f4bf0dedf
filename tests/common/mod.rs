#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use tablestate::{
    ColumnDef, FrameStore, SortDirection, SortState, Table, TableConfig, TableView, ViewEvent,
};

pub fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/users.csv")
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub language_code: String,
    pub age: String,
}

/// The fixture read without the store, in file order.
pub fn users() -> Vec<User> {
    let text = fs::read_to_string(fixture()).unwrap();
    text.lines()
        .skip(1)
        .filter(|l| !l.is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            User {
                id: fields[0].to_string(),
                name: fields[1].to_string(),
                email: fields[2].to_string(),
                language_code: fields[3].to_string(),
                age: fields[4].to_string(),
            }
        })
        .collect()
}

pub fn users_by_name() -> Vec<User> {
    let mut users = users();
    users.sort_by(|a, b| a.name.cmp(&b.name));
    users
}

/// The same users, held in memory without going through polars.
pub fn memory_store() -> FrameStore {
    let users = users();
    FrameStore::from_columns(
        "users",
        vec![
            ("id", users.iter().map(|u| u.id.clone()).collect::<Vec<_>>()),
            ("name", users.iter().map(|u| u.name.clone()).collect()),
            ("email", users.iter().map(|u| u.email.clone()).collect()),
            (
                "language_code",
                users.iter().map(|u| u.language_code.clone()).collect(),
            ),
            ("age", users.iter().map(|u| u.age.clone()).collect()),
        ],
    )
    .unwrap()
}

/// The users table as the original index page defines it: sorted by name,
/// ten per page, a select filter on the language.
pub fn users_config() -> TableConfig {
    TableConfig::default()
        .column(ColumnDef::new("id").with_hidable(false).with_sortable(true))
        .column(
            ColumnDef::new("name")
                .with_label("Name")
                .with_searchable(true)
                .with_sortable(true),
        )
        .column(
            ColumnDef::new("email")
                .with_label("E-mail")
                .with_searchable(true)
                .with_sortable(true),
        )
        .column(ColumnDef::new("language_code").with_label("Language"))
        .column(ColumnDef::new("age").with_sortable(true))
        .select_filter("language_code", ["de", "en", "nl"])
        .with_default_sort(SortState::by("name", SortDirection::Asc))
        .with_per_page_options(vec![5, 10, 25])
}

pub fn users_table() -> Table<FrameStore> {
    Table::new(users_config(), memory_store()).unwrap()
}

pub fn views(events: &Receiver<ViewEvent>) -> Vec<TableView> {
    events
        .try_iter()
        .filter_map(|event| match event {
            ViewEvent::View(view) => Some(view),
            ViewEvent::QueryFailed { .. } => None,
        })
        .collect()
}

pub fn column_values(view: &TableView, column: &str) -> Vec<String> {
    view.rows
        .iter()
        .filter_map(|r| r.get(column))
        .map(str::to_string)
        .collect()
}
