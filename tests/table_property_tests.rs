//! ソート・検索・行IDの不変条件

use proptest::prelude::*;
use rowedit::table::{search, Field, SortIndicator};
use rowedit::{EditableTable, Gender, Record, RowId};

fn gender() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
}

fn record() -> impl Strategy<Value = Record> {
    ("[A-Za-z ]{0,12}", 0u32..120, gender())
        .prop_map(|(name, age, gender)| Record::new(name, f64::from(age), gender))
}

fn table_of(records: &[Record]) -> EditableTable {
    let mut table = EditableTable::default();
    table.initialize(records).unwrap();
    table
}

fn ids(table: &EditableTable) -> Vec<RowId> {
    table.rows().iter().map(|row| row.id()).collect()
}

proptest! {
    #[test]
    fn sort_by_age_orders_numerically(records in prop::collection::vec(record(), 0..40)) {
        let mut table = table_of(&records);
        table.sort_by(Field::Age);

        let ages: Vec<f64> = table
            .rows()
            .iter()
            .map(|row| row.cell(Field::Age).text().parse().unwrap())
            .collect();
        prop_assert!(ages.windows(2).all(|pair| pair[0] <= pair[1]));

        table.sort_by(Field::Age);
        let ages: Vec<f64> = table
            .rows()
            .iter()
            .map(|row| row.cell(Field::Age).text().parse().unwrap())
            .collect();
        prop_assert!(ages.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn sort_is_a_permutation(records in prop::collection::vec(record(), 0..40), column in 0usize..3) {
        let field = Field::from_index(column).unwrap();
        let mut table = table_of(&records);
        let mut before = ids(&table);
        table.sort_by(field);
        let mut after = ids(&table);

        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn at_most_one_heading_is_active(columns in prop::collection::vec(0usize..3, 1..20)) {
        let mut table = table_of(&[Record::new("a", 1.0, Gender::Male)]);
        for column in &columns {
            table.sort_by(Field::from_index(*column).unwrap());
        }

        let active = Field::ALL
            .iter()
            .filter(|field| table.sort_state().indicator(**field) != SortIndicator::Inactive)
            .count();
        prop_assert_eq!(active, 1);
        let last = Field::from_index(*columns.last().unwrap()).unwrap();
        prop_assert!(table.sort_state().indicator(last).is_active());
    }

    #[test]
    fn search_visibility_matches_row_text(
        records in prop::collection::vec(record(), 0..30),
        term in "[A-Za-z]{0,3}",
    ) {
        let mut table = table_of(&records);
        let visible = table.search(&term);

        let lowered = term.to_lowercase();
        let mut expected = 0;
        for row in table.rows() {
            let hit = search::matches(&row.text(), &lowered);
            prop_assert_eq!(table.is_visible(row.id()), hit);
            if hit {
                expected += 1;
            }
        }
        prop_assert_eq!(visible, expected);
        prop_assert_eq!(table.len(), records.len());
    }

    #[test]
    fn reveal_delay_grows_with_visible_index(records in prop::collection::vec(record(), 1..30)) {
        let mut table = table_of(&records);
        table.search("");

        for (index, row) in table.rows().iter().enumerate() {
            let delay = table.visibility(row.id()).reveal_delay.unwrap();
            prop_assert_eq!(delay, table.search_filter().reveal_step() * index as u32);
        }
    }

    #[test]
    fn row_ids_stay_unique_across_adds_and_deletes(ops in prop::collection::vec(any::<bool>(), 1..60)) {
        let mut table = table_of(&[]);
        let mut seen = Vec::new();
        for add in ops {
            if add || table.is_empty() {
                let id = table.add_row();
                prop_assert!(!seen.contains(&id));
                seen.push(id);
            } else {
                let id = table.rows()[0].id();
                table.delete_row(id, &mut |_: &str| true).unwrap();
            }
        }
    }
}
