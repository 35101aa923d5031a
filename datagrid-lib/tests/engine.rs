//! Integration tests for table derivation: filtering, sorting, pagination,
//! selection, row replacement and commands.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use datagrid_lib::action::BulkAction;
use datagrid_lib::action::CommandEffect;
use datagrid_lib::action::Shortcut;
use datagrid_lib::action::TableCommand;
use datagrid_lib::error::ConfigError;
use datagrid_lib::error::FieldError;
use datagrid_lib::prefs::MemoryBackend;
use datagrid_lib::prefs::Preferences;
use datagrid_lib::table::ColumnFilter;
use datagrid_lib::table::ColumnVisibility;
use datagrid_lib::table::Direction;
use datagrid_lib::table::OrderBy;
use datagrid_lib::{Column, ExportFormat, RowId, Table, TableOptions, Value};

#[derive(Debug, Clone, PartialEq)]
struct User {
    telegram_id: String,
    username: Option<String>,
    bits: i64,
    level: i64,
}

fn user(n: usize) -> User {
    User {
        telegram_id: format!("tg{}", n),
        username: Some(format!("user{}", n)),
        bits: n as i64 * 10,
        level: (n % 3) as i64,
    }
}

fn user_columns() -> Vec<Column<User>> {
    vec![
        Column::new("select").header("").hideable(false),
        Column::accessor("telegram_id", |u: &User| u.telegram_id.clone()).header("Telegram ID"),
        Column::accessor("username", |u: &User| u.username.clone()).header("Username"),
        Column::accessor("bits", |u: &User| u.bits).header("Bits"),
        Column::accessor("level", |u: &User| u.level).header("Level"),
    ]
}

fn users(n: usize) -> Table<User> {
    Table::builder(user_columns())
        .rows((1..=n).map(user).collect())
        .row_key(|u: &User| u.telegram_id.clone())
        .options(TableOptions::default().with_row_selection(true))
        .build()
        .unwrap()
}

fn ids(rows: &[&User]) -> Vec<String> {
    rows.iter().map(|u| u.telegram_id.clone()).collect()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_duplicate_column_rejected() {
    let result = Table::builder(vec![
        Column::accessor("bits", |u: &User| u.bits),
        Column::accessor("bits", |u: &User| u.level),
    ])
    .build();
    assert_eq!(result.err(), Some(ConfigError::DuplicateColumn("bits".into())));
}

#[test]
fn test_sortable_structural_column_rejected() {
    let result = Table::<User>::builder(vec![Column::new("actions").sortable(true)]).build();
    assert_eq!(result.err(), Some(ConfigError::SortableWithoutAccessor("actions".into())));
}

#[test]
fn test_zero_page_size_rejected() {
    let result = Table::builder(user_columns())
        .options(TableOptions::default().with_page_size(0))
        .build();
    assert_eq!(result.err(), Some(ConfigError::ZeroPageSize));

    let result = Table::builder(user_columns())
        .options(TableOptions::default().with_page_size_options(vec![0, 10]))
        .build();
    assert_eq!(result.err(), Some(ConfigError::ZeroPageSize));
}

#[test]
fn test_page_size_options_include_current_size() {
    let mut table = users(5);
    assert_eq!(table.page_size_options(), vec![10, 20, 30, 50, 100]);
    table.set_page_size(25).unwrap();
    assert_eq!(table.page_size_options(), vec![10, 20, 25, 30, 50, 100]);
}

#[test]
fn test_empty_table_has_one_page() {
    let table = users(0);
    assert!(table.visible_rows().is_empty());
    assert_eq!(table.total_filtered_count(), 0);
    assert_eq!(table.page_count(), 1);
    assert!(!table.can_next_page());
}

// =============================================================================
// Sorting
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pair {
    a: i64,
    b: i64,
}

fn pairs(rows: Vec<Pair>) -> Table<Pair> {
    Table::builder(vec![
        Column::accessor("a", |p: &Pair| p.a),
        Column::accessor("b", |p: &Pair| p.b),
    ])
    .rows(rows)
    .build()
    .unwrap()
}

#[test]
fn test_multi_key_sort() {
    let mut table = pairs(vec![Pair { a: 1, b: 2 }, Pair { a: 1, b: 1 }, Pair { a: 0, b: 5 }]);
    table.set_sort(OrderBy::desc("a").then_asc("b"));

    let rows: Vec<Pair> = table.visible_rows().into_iter().copied().collect();
    assert_eq!(
        rows,
        vec![Pair { a: 1, b: 1 }, Pair { a: 1, b: 2 }, Pair { a: 0, b: 5 }]
    );
}

#[test]
fn test_sort_keeps_input_order_for_ties() {
    let mut table = pairs(vec![
        Pair { a: 2, b: 0 },
        Pair { a: 1, b: 1 },
        Pair { a: 2, b: 2 },
        Pair { a: 1, b: 3 },
    ]);
    table.set_sort(OrderBy::asc("a"));

    let b: Vec<i64> = table.visible_rows().iter().map(|p| p.b).collect();
    assert_eq!(b, vec![1, 3, 0, 2]);
}

#[test]
fn test_toggle_sort_cycles_and_multi_appends() {
    let mut table = users(5);
    table.toggle_sort("level", false);
    assert_eq!(table.state().sort().fields(), &[("level".to_string(), Direction::Asc)]);

    table.toggle_sort("bits", true);
    assert_eq!(table.state().sort().position("bits"), Some((1, Direction::Asc)));

    table.toggle_sort("level", true);
    assert_eq!(table.state().sort().position("level"), Some((0, Direction::Desc)));

    table.toggle_sort("level", true);
    assert_eq!(table.state().sort().fields(), &[("bits".to_string(), Direction::Asc)]);

    table.toggle_sort("level", false);
    assert_eq!(table.state().sort().fields(), &[("level".to_string(), Direction::Asc)]);
}

#[test]
fn test_sort_on_unknown_or_structural_column_ignored() {
    let mut table = users(3);
    table.set_sort(OrderBy::asc("select").then_desc("nope").then_desc("bits"));
    assert_eq!(table.state().sort().fields(), &[("bits".to_string(), Direction::Desc)]);
    assert_eq!(ids(&table.visible_rows()), vec!["tg3", "tg2", "tg1"]);
}

#[test]
fn test_nulls_sort_last() {
    let mut rows: Vec<User> = (1..=3).map(user).collect();
    rows[1].username = None;
    let mut table = Table::builder(user_columns()).rows(rows).build().unwrap();

    table.set_sort(OrderBy::asc("username"));
    assert_eq!(ids(&table.visible_rows()), vec!["tg1", "tg3", "tg2"]);
    table.set_sort(OrderBy::desc("username"));
    assert_eq!(ids(&table.visible_rows()), vec!["tg3", "tg1", "tg2"]);
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_range_filter_is_inclusive() {
    let mut table = pairs(vec![Pair { a: 4, b: 0 }, Pair { a: 5, b: 1 }, Pair { a: 6, b: 2 }]);
    table.set_column_filter("a", Some(ColumnFilter::range(Some(5.0), Some(5.0))));

    assert_eq!(table.visible_rows(), vec![&Pair { a: 5, b: 1 }]);
}

#[test]
fn test_text_filter_is_case_insensitive_substring() {
    let mut table = users(12);
    table.set_column_filter("username", Some(ColumnFilter::contains("USER1")));
    assert_eq!(ids(&table.filtered_rows()), vec!["tg1", "tg10", "tg11", "tg12"]);
}

#[test]
fn test_empty_filter_clears() {
    let mut table = users(5);
    table.set_column_filter("username", Some(ColumnFilter::contains("user1")));
    assert_eq!(table.total_filtered_count(), 1);

    table.set_column_filter("username", Some(ColumnFilter::contains("")));
    assert_eq!(table.total_filtered_count(), 5);
    assert!(table.state().column_filter("username").is_none());
}

#[test]
fn test_global_filter_matches_any_column() {
    let mut table = users(30);
    // "30" matches tg30/user30 and bits 30 (user 3)
    table.set_global_filter("30");
    assert_eq!(ids(&table.filtered_rows()), vec!["tg3", "tg30"]);
}

#[test]
fn test_global_filter_includes_hidden_columns() {
    let mut table = users(5);
    table.set_column_visibility("telegram_id", false);
    table.set_global_filter("TG4");
    assert_eq!(ids(&table.filtered_rows()), vec!["tg4"]);
}

#[test]
fn test_global_and_column_filters_combine() {
    let mut table = users(30);
    table.set_global_filter("user2");
    table.set_column_filter("level", Some(ColumnFilter::one_of([0i64])));
    // user2, user20..29 with level n % 3 == 0
    assert_eq!(ids(&table.filtered_rows()), vec!["tg21", "tg24", "tg27"]);
}

#[test]
fn test_custom_filter_fn() {
    let columns = vec![
        Column::accessor("bits", |u: &User| u.bits)
            .filter_fn(|value, _filter| value.as_f64().is_some_and(|b| b >= 100.0)),
    ];
    let mut table = Table::builder(columns).rows((1..=12).map(user).collect()).build().unwrap();
    table.set_column_filter("bits", Some(ColumnFilter::contains("whatever")));
    assert_eq!(table.total_filtered_count(), 3);
}

#[test]
fn test_failing_accessor_isolated_to_its_row() {
    let columns = vec![
        Column::accessor("telegram_id", |u: &User| u.telegram_id.clone()),
        Column::try_accessor("username", |u: &User| {
            u.username.clone().ok_or_else(|| FieldError::missing("username"))
        }),
        Column::accessor("level", |u: &User| {
            if u.level == 2 {
                panic!("tier lookup failed");
            }
            u.level
        }),
    ];
    let mut rows: Vec<User> = (1..=3).map(user).collect();
    rows[0].username = None;
    let mut table = Table::builder(columns).rows(rows).build().unwrap();

    assert_eq!(table.total_filtered_count(), 3);
    table.set_sort(OrderBy::asc("level"));
    // user2 has level 2 and panics, so its level is null and sorts last
    assert_eq!(ids(&table.visible_rows()), vec!["tg3", "tg1", "tg2"]);

    let column = table.column("username").unwrap();
    assert_eq!(column.value(&table.rows()[0]), Value::Null);
}

// =============================================================================
// Pagination
// =============================================================================

#[test]
fn test_page_clamped_after_filter() {
    let mut table = users(25);
    table.set_page(2);
    assert_eq!(ids(&table.visible_rows()), vec!["tg21", "tg22", "tg23", "tg24", "tg25"]);

    table.set_column_filter("bits", Some(ColumnFilter::range(None, Some(50.0))));
    assert_eq!(table.state().pagination().page_index, 0);
    assert_eq!(table.visible_rows().len(), 5);
}

#[test]
fn test_page_navigation() {
    let mut table = users(25);
    assert!(!table.can_previous_page());
    table.last_page();
    assert_eq!(table.state().pagination().page_index, 2);
    assert!(!table.can_next_page());
    table.next_page();
    assert_eq!(table.state().pagination().page_index, 2);
    table.previous_page();
    assert_eq!(table.page().page_index(), 1);
    table.first_page();
    assert_eq!(table.page().page_index(), 0);

    table.set_page(99);
    assert_eq!(table.page().page_index(), 2);
}

#[test]
fn test_page_size_change_keeps_top_row() {
    let mut table = users(100);
    table.set_page(3);
    assert_eq!(table.visible_rows()[0].telegram_id, "tg31");

    table.set_page_size(20).unwrap();
    assert_eq!(table.state().pagination().page_index, 1);
    assert_eq!(table.visible_rows()[0].telegram_id, "tg21");
    assert_eq!(table.page().page_count(), 5);

    assert_eq!(table.set_page_size(0), Err(ConfigError::ZeroPageSize));
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_selection_follows_rows_through_sort_and_filter() {
    let mut table = users(10);
    table.toggle_row_selection(&RowId::new("tg2"));
    table.toggle_row_selection(&RowId::new("tg7"));

    table.set_sort(OrderBy::desc("bits"));
    assert_eq!(ids(&table.selected_rows()), vec!["tg7", "tg2"]);

    table.set_column_filter("bits", Some(ColumnFilter::range(Some(50.0), None)));
    assert_eq!(ids(&table.selected_rows()), vec!["tg7"]);
    assert!(table.is_row_selected(&RowId::new("tg2")));

    table.clear_column_filters();
    assert_eq!(ids(&table.selected_rows()), vec!["tg7", "tg2"]);
}

#[test]
fn test_selection_kept_for_row_hidden_then_shown() {
    let mut table = users(6);
    table.toggle_row_selection(&RowId::new("tg4"));

    table.set_column_filter("bits", Some(ColumnFilter::range(None, Some(20.0))));
    assert!(table.selected_rows().is_empty());

    table.set_column_filter("bits", None);
    assert!(table.is_row_selected(&RowId::new("tg4")));
    assert_eq!(ids(&table.selected_rows()), vec!["tg4"]);
}

#[test]
fn test_selection_change_callback() {
    let seen: Arc<std::sync::Mutex<Vec<Vec<RowId>>>> = Arc::default();
    let sink = seen.clone();
    let mut table = Table::builder(user_columns())
        .rows((1..=12).map(user).collect())
        .row_key(|u: &User| u.telegram_id.clone())
        .options(TableOptions::default().with_row_selection(true))
        .on_selection_change(move |ids: &[RowId]| sink.lock().unwrap().push(ids.to_vec()))
        .build()
        .unwrap();

    table.toggle_row_selection(&RowId::new("tg3"));
    table.set_sort(OrderBy::desc("bits"));
    table.toggle_all_on_page();
    table.clear_selection();
    table.clear_selection();
    table.toggle_row_selection(&RowId::new("tg1"));
    table.replace_rows((1..=2).map(user).collect());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0], vec![RowId::new("tg3")]);
    assert_eq!(seen[1].len(), 10);
    assert!(seen[2].is_empty());
    assert_eq!(seen[3], vec![RowId::new("tg1")]);
    assert!(seen[4].is_empty());
}

#[test]
fn test_selection_disabled_by_default() {
    let mut table = Table::builder(user_columns()).rows((1..=3).map(user).collect()).build().unwrap();
    table.toggle_row_selection(&RowId::from(0usize));
    table.toggle_all_on_page();
    assert!(table.state().row_selection().is_empty());
}

#[test]
fn test_toggle_all_on_page_only_touches_current_page() {
    let mut table = users(15);
    table.toggle_all_on_page();
    assert!(table.is_all_page_rows_selected());
    assert_eq!(table.state().row_selection().len(), 10);

    table.next_page();
    assert!(!table.is_all_page_rows_selected());
    assert!(!table.is_some_page_rows_selected());
    table.toggle_row_selection(&RowId::new("tg11"));
    assert!(table.is_some_page_rows_selected());

    table.first_page();
    table.toggle_all_on_page();
    assert_eq!(table.selected_ids(), vec![RowId::new("tg11")]);
}

#[test]
fn test_row_outside_filtered_set_not_selectable() {
    let mut table = users(5);
    table.set_global_filter("user1");
    table.toggle_row_selection(&RowId::new("tg3"));
    assert!(table.state().row_selection().is_empty());
}

#[test]
fn test_bulk_action_receives_selected_rows() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let mut table = Table::builder(user_columns())
        .rows((1..=5).map(user).collect())
        .row_key(|u: &User| u.telegram_id.clone())
        .options(TableOptions::default().with_row_selection(true))
        .bulk_action(BulkAction::new("Suspend", move |rows: &[&User]| {
            counter.fetch_add(rows.len(), Ordering::SeqCst);
        }))
        .build()
        .unwrap();

    assert_eq!(table.run_bulk_action(0), None);

    table.toggle_row_selection(&RowId::new("tg1"));
    table.toggle_row_selection(&RowId::new("tg4"));
    assert_eq!(table.run_bulk_action(0), Some(2));
    assert_eq!(table.run_bulk_action(1), None);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Row replacement
// =============================================================================

#[test]
fn test_replace_rows_resets_row_state_but_keeps_visibility() {
    let mut table = users(25);
    table.set_sort(OrderBy::desc("bits"));
    table.set_global_filter("user");
    table.set_page(2);
    table.toggle_row_selection(&RowId::new("tg5"));
    table.set_column_visibility("level", false);

    table.replace_rows((1..=3).map(user).collect());

    assert!(table.state().sort().is_empty());
    assert_eq!(table.state().global_filter(), "");
    assert!(table.state().row_selection().is_empty());
    assert_eq!(table.state().pagination().page_index, 0);
    assert!(!table.is_column_visible("level"));
    assert_eq!(table.total_filtered_count(), 3);
}

#[test]
fn test_extend_rows_keeps_state() {
    let mut table = users(5);
    table.set_sort(OrderBy::desc("bits"));
    table.toggle_row_selection(&RowId::new("tg2"));

    table.extend_rows((6..=8).map(user).collect());

    assert_eq!(table.total_filtered_count(), 8);
    assert_eq!(table.visible_rows()[0].telegram_id, "tg8");
    assert!(table.is_row_selected(&RowId::new("tg2")));
}

#[test]
fn test_index_ids_continue_after_extend() {
    let mut table = Table::builder(vec![Column::accessor("bits", |u: &User| u.bits)])
        .rows((1..=2).map(user).collect())
        .options(TableOptions::default().with_row_selection(true))
        .build()
        .unwrap();
    table.extend_rows(vec![user(3)]);

    let page = table.page();
    let ids: Vec<&str> = page.ids().into_iter().map(RowId::as_str).collect();
    assert_eq!(ids, vec!["0", "1", "2"]);
}

// =============================================================================
// Columns
// =============================================================================

#[test]
fn test_visible_columns_follow_order_and_visibility() {
    let mut table = users(1);
    table
        .set_column_order(vec!["bits".into(), "telegram_id".into()])
        .unwrap();
    table.toggle_column_visibility("username");

    let visible: Vec<&str> = table.visible_columns().iter().map(|c| c.id()).collect();
    assert_eq!(visible, vec!["bits", "telegram_id", "select", "level"]);

    let picker: Vec<&str> = table.picker_columns().iter().map(|c| c.id()).collect();
    assert_eq!(picker, vec!["bits", "telegram_id", "username", "level"]);

    table.show_all_columns();
    assert!(table.is_column_visible("username"));

    assert_eq!(
        table.set_column_order(vec!["nope".into()]),
        Err(ConfigError::UnknownColumn("nope".into()))
    );
}

#[test]
fn test_header_render_sees_sort_state() {
    let columns = vec![Column::accessor("bits", |u: &User| u.bits).header_with("Bits", |cx| {
        match cx.sort {
            Some(direction) => format!("Bits {}", direction.arrow()),
            None => "Bits".to_string(),
        }
    })];
    let mut table = Table::builder(columns).rows(vec![user(1)]).build().unwrap();

    let column = table.column("bits").unwrap().clone();
    assert_eq!(table.render_header(&column), "Bits");
    table.toggle_sort("bits", false);
    assert_eq!(table.render_header(&column), "Bits ↑");
    assert_eq!(column.label(), "Bits");
}

// =============================================================================
// Preferences
// =============================================================================

#[test]
fn test_visibility_restored_and_saved() {
    let prefs = Preferences::new(MemoryBackend::new());
    let stored: ColumnVisibility = [("bits", false), ("gone", false)].into_iter().collect();
    prefs.save("usersTable", &stored).unwrap();

    let mut table = Table::builder(user_columns())
        .options(TableOptions::default().with_preferences_key("usersTable"))
        .preferences(prefs.clone())
        .build()
        .unwrap();

    assert!(!table.is_column_visible("bits"));
    // unknown ids are dropped on load
    assert_eq!(table.state().column_visibility().iter().count(), 1);

    table.set_column_visibility("level", false);
    let saved = prefs.load("usersTable").unwrap();
    assert!(!saved.is_visible("level"));
    assert!(!saved.is_visible("bits"));

    table.reset_column_visibility();
    assert!(table.is_column_visible("bits"));
    assert!(prefs.load("usersTable").is_none());
}

#[test]
fn test_persistence_can_be_disabled() {
    let prefs = Preferences::new(MemoryBackend::new());
    let mut table = Table::builder(user_columns())
        .options(TableOptions::default().with_persist_preferences(false))
        .preferences(prefs.clone())
        .build()
        .unwrap();

    table.set_column_visibility("level", false);
    assert!(prefs.load("dataTablePrefs").is_none());
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_shortcuts_drive_commands() {
    let mut table = users(12);

    let select_all: Shortcut = "ctrl+a".parse().unwrap();
    let effect = table.apply_command(select_all.command().unwrap()).unwrap();
    assert!(matches!(effect, CommandEffect::Handled));
    assert_eq!(table.state().row_selection().len(), 10);

    let effect = table.apply_command(TableCommand::FocusSearch).unwrap();
    assert!(matches!(effect, CommandEffect::FocusSearch));

    let export: Shortcut = "cmd+shift+e".parse().unwrap();
    match table.apply_command(export.command().unwrap()).unwrap() {
        CommandEffect::Exported(payload) => {
            assert_eq!(payload.format, ExportFormat::Excel);
            assert_eq!(payload.row_count, 12);
        }
        other => panic!("unexpected effect {:?}", other),
    }
}

#[test]
fn test_ui_flags_are_per_table() {
    let mut a = users(1);
    let b = users(1);
    a.toggle_column_picker();
    a.toggle_filters();
    assert!(a.ui().show_column_picker);
    assert!(a.ui().show_filters);
    assert!(!b.ui().show_column_picker);
}
