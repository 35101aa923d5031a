//! Property tests for the derivation pipeline.

use std::collections::HashSet;

use datagrid_lib::table::ColumnFilter;
use datagrid_lib::table::OrderBy;
use datagrid_lib::{Column, ExportFormat, RowId, Table, TableOptions};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Row {
    seq: usize,
    group: i64,
    score: i64,
}

fn build(values: &[(i64, i64)], page_size: usize) -> Table<Row> {
    let rows = values
        .iter()
        .enumerate()
        .map(|(seq, &(group, score))| Row { seq, group, score })
        .collect();
    Table::builder(vec![
        Column::accessor("seq", |r: &Row| r.seq as i64),
        Column::accessor("group", |r: &Row| r.group),
        Column::accessor("score", |r: &Row| r.score),
    ])
    .rows(rows)
    .row_key(|r: &Row| r.seq.to_string())
    .options(TableOptions::default().with_page_size(page_size).with_row_selection(true))
    .build()
    .unwrap()
}

fn seqs(rows: &[&Row]) -> Vec<usize> {
    rows.iter().map(|r| r.seq).collect()
}

fn rows_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..4, -50i64..50), 0..60)
}

proptest! {
    #[test]
    fn narrowing_a_range_never_adds_rows(
        values in rows_strategy(),
        lo in -50i64..50,
        width in 0i64..60,
        shrink in 0i64..30,
    ) {
        let mut table = build(&values, 10);

        table.set_column_filter("score", Some(ColumnFilter::range(Some(lo as f64), Some((lo + width) as f64))));
        let wide: HashSet<usize> = seqs(&table.filtered_rows()).into_iter().collect();

        let inner_hi = (lo + width - shrink).max(lo);
        table.set_column_filter("score", Some(ColumnFilter::range(Some(lo as f64), Some(inner_hi as f64))));
        table.set_column_filter("group", Some(ColumnFilter::one_of([0i64, 1])));
        let narrow: HashSet<usize> = seqs(&table.filtered_rows()).into_iter().collect();

        prop_assert!(narrow.is_subset(&wide));
    }

    #[test]
    fn sort_is_stable(values in rows_strategy(), desc in any::<bool>()) {
        let mut table = build(&values, 10);
        table.set_sort(if desc { OrderBy::desc("group") } else { OrderBy::asc("group") });

        let sorted = table.filtered_rows();
        for pair in sorted.windows(2) {
            if pair[0].group == pair[1].group {
                prop_assert!(pair[0].seq < pair[1].seq);
            } else if desc {
                prop_assert!(pair[0].group > pair[1].group);
            } else {
                prop_assert!(pair[0].group < pair[1].group);
            }
        }
    }

    #[test]
    fn pages_concatenate_to_the_filtered_sequence(
        values in rows_strategy(),
        page_size in 1usize..15,
        min_score in -50i64..50,
    ) {
        let mut table = build(&values, page_size);
        table.set_sort(OrderBy::desc("score").then_asc("group"));
        table.set_column_filter("score", Some(ColumnFilter::range(Some(min_score as f64), None)));

        let expected = seqs(&table.filtered_rows());
        let mut collected = Vec::new();
        for page in 0..table.page_count() {
            table.set_page(page);
            collected.extend(seqs(&table.visible_rows()));
        }

        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn export_row_count_matches_filtered_count(
        values in rows_strategy(),
        group in 0i64..4,
        page in 0usize..6,
    ) {
        let mut table = build(&values, 5);
        table.set_column_filter("group", Some(ColumnFilter::one_of([group])));
        table.set_page(page);

        let payload = table.export(ExportFormat::Json).unwrap();
        prop_assert_eq!(payload.row_count, table.total_filtered_count());
    }

    #[test]
    fn selection_survives_filtering_by_identity(
        values in rows_strategy(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        min_score in -50i64..50,
    ) {
        prop_assume!(!values.is_empty());
        let mut table = build(&values, 100);
        let mut picked = HashSet::new();
        for pick in picks {
            let seq = pick.index(values.len());
            if picked.insert(seq) {
                table.toggle_row_selection(&RowId::from(seq));
            }
        }

        table.set_sort(OrderBy::desc("score"));
        table.set_column_filter("score", Some(ColumnFilter::range(Some(min_score as f64), None)));

        let effective: HashSet<usize> = seqs(&table.selected_rows()).into_iter().collect();
        for seq in &picked {
            let in_view = values[*seq].1 >= min_score;
            prop_assert_eq!(effective.contains(seq), in_view);
        }

        table.clear_column_filters();
        for seq in &picked {
            prop_assert!(table.is_row_selected(&RowId::from(*seq)));
        }
    }
}
