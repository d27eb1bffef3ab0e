//! 編集可能テーブル
//!
//! 行の生成・削除、セル編集、検索、ソートをまとめたコンテキスト。
//! 描画方式には依存せず、描画面は `rows()` などの参照系APIから状態を読む。

pub mod bindings;
pub mod editor;
pub mod record;
pub mod row;
pub mod search;
pub mod sort;

pub use bindings::{Action, BindingRegistry, Gesture, Target};
pub use editor::{Cell, CellState, ChoiceInput, EditKey, EditWidget, TextInput};
pub use record::{Field, Gender, Record};
pub use row::{Row, RowId, RowIdGenerator};
pub use search::{RowVisibility, SearchFilter, DEFAULT_REVEAL_STEP};
pub use sort::{SortDirection, SortIndicator, SortState};

use crate::error::{Result, TableError};
use std::time::Duration;

/// 削除確認の既定メッセージ
pub const DEFAULT_CONFIRM_MESSAGE: &str = "Are you sure you want to delete this row?";

/// 削除確認の能力
///
/// テストでは決まった応答を返すクロージャを渡せる。
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// 削除操作の結果
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// 削除した行のレコード
    Deleted(Record),
    /// ユーザーが確認を拒否した
    Declined,
}

/// 編集確定の通知
#[derive(Debug, Clone, PartialEq)]
pub struct CommitEvent {
    pub row: RowId,
    pub field: Field,
    pub value: String,
}

/// テーブルの設定
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub reveal_step: Duration,
    pub confirm_message: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            reveal_step: DEFAULT_REVEAL_STEP,
            confirm_message: DEFAULT_CONFIRM_MESSAGE.to_string(),
        }
    }
}

/// 編集可能テーブル本体
#[derive(Debug, Clone)]
pub struct EditableTable {
    /// 表示順の行
    rows: Vec<Row>,
    ids: RowIdGenerator,
    bindings: BindingRegistry,
    search: SearchFilter,
    sort: SortState,
    /// 編集中のセル（高々1つ）
    editing: Option<(RowId, Field)>,
    confirm_message: String,
    initialized: bool,
}

impl EditableTable {
    pub fn new(options: TableOptions) -> Self {
        Self {
            rows: Vec::new(),
            ids: RowIdGenerator::new(),
            bindings: BindingRegistry::new(),
            search: SearchFilter::new(options.reveal_step),
            sort: SortState::new(),
            editing: None,
            confirm_message: options.confirm_message,
            initialized: false,
        }
    }

    /// 描画面の準備後に一度だけ呼ぶ
    ///
    /// 共通の操作対象を登録し、初期レコードを流し込む。
    pub fn initialize(&mut self, seeds: &[Record]) -> Result<()> {
        if self.initialized {
            return Err(TableError::AlreadyInitialized.into());
        }

        self.bindings.register_globals();
        for record in seeds {
            self.create_row(record);
        }
        self.initialized = true;

        log::info!("table initialized with {} rows", self.rows.len());
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// 行を末尾に追加し、その行の操作対象を登録する
    pub fn create_row(&mut self, record: &Record) -> RowId {
        let id = self.ids.next_id();
        self.rows.push(Row::from_record(id, record));
        self.bindings.register_row(id);
        log::debug!("created {}", id);
        id
    }

    /// 空の行を追加して先頭セルを編集状態にする
    pub fn add_row(&mut self) -> RowId {
        let id = self.create_row(&Record::default());
        let index = self.rows.len() - 1;
        self.enter_edit_at(index, Field::Name);
        id
    }

    /// 確認が得られた場合のみ行を削除する
    pub fn delete_row<C>(&mut self, id: RowId, confirm: &mut C) -> Result<DeleteOutcome>
    where
        C: Confirm + ?Sized,
    {
        let index = self.index_of(id)?;
        if !confirm.confirm(&self.confirm_message) {
            log::debug!("deletion of {} declined", id);
            return Ok(DeleteOutcome::Declined);
        }

        let row = self.rows.remove(index);
        if matches!(self.editing, Some((editing, _)) if editing == id) {
            // 行ごと破棄されるので確定しない
            self.editing = None;
        }
        self.bindings.unregister_row(id);
        self.search.forget(id);

        log::info!("deleted {}", id);
        Ok(DeleteOutcome::Deleted(row.to_record()))
    }

    /// セルを編集状態にする
    ///
    /// 他のセルが編集中ならフォーカス喪失として先に確定する。
    pub fn begin_edit(&mut self, id: RowId, field: Field) -> Result<()> {
        let index = self.index_of(id)?;
        self.enter_edit_at(index, field);
        Ok(())
    }

    fn enter_edit_at(&mut self, index: usize, field: Field) {
        let id = self.rows[index].id();
        if self.editing == Some((id, field)) {
            return;
        }
        self.commit_edit();
        if self.rows[index].cell_mut(field).begin_edit() {
            self.editing = Some((id, field));
        }
    }

    /// 編集中のセルを確定する。編集中でなければ何もしない
    pub fn commit_edit(&mut self) -> Option<CommitEvent> {
        let (id, field) = self.editing.take()?;
        let row = self.rows.iter_mut().find(|row| row.id() == id)?;
        let value = row.cell_mut(field).commit()?;
        log::debug!("committed {} {} = {:?}", id, field, value);
        Some(CommitEvent { row: id, field, value })
    }

    /// 編集ウィジェット外のクリック
    pub fn click_outside(&mut self) -> Option<CommitEvent> {
        self.commit_edit()
    }

    /// 編集中のウィジェットへキー入力を渡す
    pub fn edit_key(&mut self, key: EditKey) -> bool {
        self.editor_mut().is_some_and(|widget| widget.apply(key))
    }

    pub fn editor(&self) -> Option<&EditWidget> {
        let (id, field) = self.editing?;
        self.row(id)?.cell(field).widget()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditWidget> {
        let (id, field) = self.editing?;
        self.rows
            .iter_mut()
            .find(|row| row.id() == id)?
            .cell_mut(field)
            .widget_mut()
    }

    /// 列でソートする。同じ列の昇順中なら降順に切り替える
    pub fn sort_by(&mut self, field: Field) -> SortDirection {
        let direction = self.sort.next_direction(field);
        self.sort.activate(field, direction);
        sort::sort_rows(&mut self.rows, field, direction);
        log::debug!("sorted by {} {:?}", field, direction);
        direction
    }

    /// 検索語で行の表示・非表示を切り替える。表示行数を返す
    pub fn search(&mut self, term: &str) -> usize {
        self.search.apply(term, &self.rows)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn index_of(&self, id: RowId) -> Result<usize> {
        self.rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| TableError::UnknownRow { id }.into())
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows
            .iter()
            .filter(move |row| self.search.is_visible(row.id()))
    }

    pub fn is_visible(&self, id: RowId) -> bool {
        self.search.is_visible(id)
    }

    pub fn visibility(&self, id: RowId) -> RowVisibility {
        self.search.visibility(id)
    }

    pub fn editing(&self) -> Option<(RowId, Field)> {
        self.editing
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// 直近の検索語（小文字化済み）
    pub fn search_term(&self) -> &str {
        self.search.term()
    }

    pub fn search_filter(&self) -> &SearchFilter {
        &self.search
    }

    pub fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    pub fn confirm_message(&self) -> &str {
        &self.confirm_message
    }

    pub fn records(&self) -> Vec<Record> {
        self.rows.iter().map(Row::to_record).collect()
    }
}

impl Default for EditableTable {
    fn default() -> Self {
        Self::new(TableOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> EditableTable {
        let mut table = EditableTable::default();
        table
            .initialize(&[
                Record::new("John Doe", 25.0, Gender::Male),
                Record::new("Jane Smith", 30.0, Gender::Female),
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_initialize_only_once() {
        let mut table = seeded();
        assert!(matches!(
            table.initialize(&[]),
            Err(crate::RowEditError::Table(TableError::AlreadyInitialized))
        ));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_only_one_cell_edits_at_a_time() {
        let mut table = seeded();
        let first = table.rows()[0].id();
        let second = table.rows()[1].id();

        table.begin_edit(first, Field::Name).unwrap();
        table.edit_key(EditKey::Char('!'));
        table.begin_edit(second, Field::Age).unwrap();

        assert_eq!(table.editing(), Some((second, Field::Age)));
        let editing_cells = table
            .rows()
            .iter()
            .flat_map(|row| row.cells().iter())
            .filter(|cell| cell.is_editing())
            .count();
        assert_eq!(editing_cells, 1);
        assert_eq!(table.row(first).unwrap().cell(Field::Name).text(), "John Doe!");
    }

    #[test]
    fn test_click_outside_commits_once() {
        let mut table = seeded();
        let id = table.rows()[0].id();
        table.begin_edit(id, Field::Name).unwrap();

        let event = table.click_outside().unwrap();
        assert_eq!(event.value, "John Doe");
        assert_eq!(table.click_outside(), None);
        assert_eq!(table.commit_edit(), None);
    }

    #[test]
    fn test_deleting_editing_row_discards_edit() {
        let mut table = seeded();
        let id = table.rows()[0].id();
        table.begin_edit(id, Field::Name).unwrap();

        let outcome = table.delete_row(id, &mut |_: &str| true).unwrap();
        assert!(matches!(outcome, DeleteOutcome::Deleted(record) if record.name == "John Doe"));
        assert_eq!(table.editing(), None);
        assert!(table.editor().is_none());
    }

    #[test]
    fn test_unknown_row_is_reported() {
        let mut table = seeded();
        let id = table.rows()[0].id();
        table.delete_row(id, &mut |_: &str| true).unwrap();
        assert!(table.begin_edit(id, Field::Age).is_err());
        assert!(table.delete_row(id, &mut |_: &str| true).is_err());
    }

    #[test]
    fn test_confirm_receives_message() {
        let mut table = seeded();
        let id = table.rows()[0].id();
        let mut seen = String::new();
        let mut confirm = |message: &str| {
            seen = message.to_string();
            false
        };
        assert_eq!(table.delete_row(id, &mut confirm).unwrap(), DeleteOutcome::Declined);
        assert_eq!(seen, DEFAULT_CONFIRM_MESSAGE);
    }
}
