use rowedit::table::{CellState, EditWidget, SortDirection, SortIndicator};
use rowedit::{DeleteOutcome, EditableTable, Field, Gender, Record, Result, RowId};

fn people() -> Vec<Record> {
    vec![
        Record::new("John Doe", 25.0, Gender::Male),
        Record::new("Jane Smith", 30.0, Gender::Female),
        Record::new("alex Kim", 19.0, Gender::Other),
    ]
}

fn seeded() -> Result<EditableTable> {
    let mut table = EditableTable::default();
    table.initialize(&people())?;
    Ok(table)
}

fn column(table: &EditableTable, field: Field) -> Vec<String> {
    table
        .rows()
        .iter()
        .map(|row| row.cell(field).text().to_string())
        .collect()
}

fn ids(table: &EditableTable) -> Vec<RowId> {
    table.rows().iter().map(|row| row.id()).collect()
}

#[test]
fn test_initialize_renders_one_row_per_record() -> Result<()> {
    let table = seeded()?;
    assert_eq!(table.len(), 3);
    assert_eq!(column(&table, Field::Name), vec!["John Doe", "Jane Smith", "alex Kim"]);
    assert_eq!(column(&table, Field::Age), vec!["25", "30", "19"]);
    assert_eq!(column(&table, Field::Gender), vec!["Male", "Female", "Other"]);
    assert_eq!(table.records(), people());
    Ok(())
}

#[test]
fn test_row_ids_are_unique() -> Result<()> {
    let mut table = seeded()?;
    for _ in 0..50 {
        table.add_row();
    }
    let mut all = ids(&table);
    all.sort();
    all.dedup();
    assert_eq!(all.len(), table.len());
    Ok(())
}

#[test]
fn test_add_row_appends_empty_row_in_edit_mode() -> Result<()> {
    let mut table = seeded()?;
    let id = table.add_row();

    assert_eq!(table.len(), 4);
    let row = table.rows().last().unwrap();
    assert_eq!(row.id(), id);
    assert!(row.cells().iter().all(|cell| cell.text().is_empty()));
    assert_eq!(table.editing(), Some((id, Field::Name)));
    assert!(row.cell(Field::Name).is_editing());
    assert!(!row.cell(Field::Age).is_editing());
    Ok(())
}

#[test]
fn test_gender_editor_preselects_matching_option() -> Result<()> {
    let mut table = seeded()?;
    let jane = table.rows()[1].id();
    table.begin_edit(jane, Field::Gender)?;
    match table.editor() {
        Some(EditWidget::Choice(choice)) => assert_eq!(choice.selected(), Some(Gender::Female)),
        other => panic!("expected choice widget, got {:?}", other),
    }
    table.commit_edit();

    let id = table.add_row();
    table.begin_edit(id, Field::Gender)?;
    match table.editor() {
        Some(EditWidget::Choice(choice)) => assert_eq!(choice.selected(), None),
        other => panic!("expected choice widget, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_age_editor_is_numeric() -> Result<()> {
    let mut table = seeded()?;
    let john = table.rows()[0].id();
    table.begin_edit(john, Field::Age)?;
    assert!(matches!(table.editor(), Some(EditWidget::Text(input)) if input.is_numeric()));
    Ok(())
}

#[test]
fn test_commit_restores_display_state() -> Result<()> {
    let mut table = seeded()?;
    let john = table.rows()[0].id();
    table.begin_edit(john, Field::Name)?;
    for _ in 0.."Doe".len() {
        table.edit_key(rowedit::table::EditKey::Backspace);
    }
    for ch in "Smith".chars() {
        table.edit_key(rowedit::table::EditKey::Char(ch));
    }

    let event = table.commit_edit().unwrap();
    assert_eq!(event.value, "John Smith");
    let cell = table.row(john).unwrap().cell(Field::Name);
    assert_eq!(cell.state(), &CellState::Display { text: "John Smith".to_string() });
    assert_eq!(table.editing(), None);
    Ok(())
}

#[test]
fn test_sort_by_age_toggles_direction() -> Result<()> {
    let mut table = seeded()?;

    assert_eq!(table.sort_by(Field::Age), SortDirection::Ascending);
    assert_eq!(column(&table, Field::Age), vec!["19", "25", "30"]);
    assert_eq!(table.sort_state().indicator(Field::Age), SortIndicator::Ascending);

    assert_eq!(table.sort_by(Field::Age), SortDirection::Descending);
    assert_eq!(column(&table, Field::Age), vec!["30", "25", "19"]);

    assert_eq!(table.sort_by(Field::Name), SortDirection::Ascending);
    assert_eq!(column(&table, Field::Name), vec!["alex Kim", "Jane Smith", "John Doe"]);
    assert_eq!(table.sort_state().indicator(Field::Age), SortIndicator::Inactive);
    assert_eq!(table.sort_state().indicator(Field::Name), SortIndicator::Ascending);
    Ok(())
}

#[test]
fn test_sort_moves_rows_without_losing_edit_state() -> Result<()> {
    let mut table = seeded()?;
    let john = table.rows()[0].id();
    table.begin_edit(john, Field::Name)?;
    table.edit_key(rowedit::table::EditKey::Char('!'));

    table.sort_by(Field::Age);
    assert_eq!(table.editing(), Some((john, Field::Name)));
    let row = table.row(john).unwrap();
    assert!(row.cell(Field::Name).is_editing());
    assert_eq!(table.editor().map(EditWidget::value).as_deref(), Some("John Doe!"));
    Ok(())
}

#[test]
fn test_search_hides_and_restores_rows() -> Result<()> {
    let mut table = EditableTable::default();
    table.initialize(&[
        Record::new("John Doe", 25.0, Gender::Male),
        Record::new("Jane Smith", 30.0, Gender::Female),
    ])?;
    let doe = table.rows()[0].id();
    let smith = table.rows()[1].id();

    assert_eq!(table.search("DOE"), 1);
    assert_eq!(table.search_term(), "doe");
    assert!(table.is_visible(doe));
    assert!(!table.is_visible(smith));
    // 非表示でも行は残る
    assert_eq!(table.len(), 2);

    assert_eq!(table.search(""), 2);
    assert!(table.is_visible(doe) && table.is_visible(smith));
    Ok(())
}

#[test]
fn test_delete_row_respects_confirmation() -> Result<()> {
    let mut table = seeded()?;
    let before = ids(&table);
    let jane = before[1];

    let outcome = table.delete_row(jane, &mut |_: &str| false)?;
    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(ids(&table), before);

    let outcome = table.delete_row(jane, &mut |_: &str| true)?;
    assert!(matches!(outcome, DeleteOutcome::Deleted(record) if record.name == "Jane Smith"));
    assert_eq!(ids(&table), vec![before[0], before[2]]);
    Ok(())
}

#[test]
fn test_deleted_row_bindings_are_removed() -> Result<()> {
    use rowedit::table::{Gesture, Target};

    let mut table = seeded()?;
    let john = table.rows()[0].id();
    table.delete_row(john, &mut |_: &str| true)?;

    let bindings = table.bindings();
    assert!(bindings.resolve(Target::DeleteButton(john), Gesture::Click, false).is_empty());
    assert!(bindings
        .resolve(Target::Cell(john, Field::Name), Gesture::DoubleClick, false)
        .is_empty());
    Ok(())
}
