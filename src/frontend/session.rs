//! 操作セッション
//!
//! キー・マウス入力をテーブル操作に変換する。端末には触れないので
//! イベントを直接渡してテストできる。

use crate::error::{ErrorDisplay, Result, RowEditError};
use crate::input::{ClickTracker, Direction, InputMode, KeyAction, KeyMap, KeyProcessResult};
use crate::table::{
    Action, DeleteOutcome, EditableTable, Field, Gesture, Record, Row, RowId, TableOptions, Target,
};
use crate::ui::{HitMap, TableView};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use std::time::{Duration, Instant};

/// 入力とテーブル状態をまとめたセッション
#[derive(Debug, Clone)]
pub struct Session {
    table: EditableTable,
    keymap: KeyMap,
    clicks: ClickTracker,
    /// 選択中のセル
    selection: Option<(RowId, Field)>,
    search_input: String,
    search_focused: bool,
    /// 確認待ちの削除対象
    pending_delete: Option<RowId>,
    status: Option<ErrorDisplay>,
    /// 直近の検索時刻（行の段階表示の起点）
    reveal_started: Instant,
    running: bool,
}

impl Session {
    pub fn new(options: TableOptions, double_click: Duration) -> Self {
        Self {
            table: EditableTable::new(options),
            keymap: KeyMap::new(),
            clicks: ClickTracker::new(double_click),
            selection: None,
            search_input: String::new(),
            search_focused: false,
            pending_delete: None,
            status: None,
            reveal_started: Instant::now(),
            running: true,
        }
    }

    /// テーブルを初期化して先頭行を選択
    pub fn initialize(&mut self, seeds: &[Record]) -> Result<()> {
        self.table.initialize(seeds)?;
        self.selection = self.table.rows().first().map(|row| (row.id(), Field::Name));
        Ok(())
    }

    pub fn table(&self) -> &EditableTable {
        &self.table
    }

    pub fn selection(&self) -> Option<(RowId, Field)> {
        self.selection
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn is_search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn pending_delete(&self) -> Option<RowId> {
        self.pending_delete
    }

    pub fn status(&self) -> Option<&ErrorDisplay> {
        self.status.as_ref().filter(|status| !status.is_expired())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 現在の入力モード（確認 > 編集 > 検索 > 選択 の優先順）
    pub fn mode(&self) -> InputMode {
        if self.pending_delete.is_some() {
            InputMode::Confirm
        } else if self.table.editing().is_some() {
            InputMode::Editing
        } else if self.search_focused {
            InputMode::Search
        } else {
            InputMode::Browse
        }
    }

    pub fn view(&self, now: Instant) -> TableView<'_> {
        TableView {
            table: &self.table,
            selection: self.selection,
            search_input: &self.search_input,
            search_focused: self.search_focused,
            status: self.status(),
            pending_delete: self.pending_delete,
            reveal_elapsed: now.saturating_duration_since(self.reveal_started),
            mode: self.mode(),
        }
    }

    /// エラーをステータスラインに表示
    pub fn report(&mut self, error: &RowEditError) {
        log::warn!("{}", error);
        self.status = Some(ErrorDisplay::new(error));
    }

    pub fn handle_key_event(&mut self, event: KeyEvent) {
        match self.keymap.process_key_event(self.mode(), event) {
            KeyProcessResult::Action(action) => self.handle_key_action(action),
            KeyProcessResult::NoMatch => {}
        }
    }

    pub fn handle_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::MoveSelection(direction) => self.move_selection(direction),
            KeyAction::EnterEdit => {
                if let Some((id, field)) = self.selection {
                    self.dispatch(Action::EnterEdit(id, field));
                }
            }
            KeyAction::AddRow => self.dispatch(Action::AddRow),
            KeyAction::RequestDelete => {
                if let Some((id, _)) = self.selection {
                    self.dispatch(Action::DeleteRow(id));
                }
            }
            KeyAction::SortBy(field) => self.dispatch(Action::SortBy(field)),
            KeyAction::FocusSearch => self.dispatch(Action::FocusSearch),
            KeyAction::LeaveSearch => self.search_focused = false,
            KeyAction::SearchInput(ch) => {
                self.search_input.push(ch);
                self.run_search();
            }
            KeyAction::SearchBackspace => {
                if self.search_input.pop().is_some() {
                    self.run_search();
                }
            }
            KeyAction::Edit(key) => {
                self.table.edit_key(key);
            }
            KeyAction::Commit => {
                self.table.commit_edit();
            }
            KeyAction::ConfirmAccept => self.resolve_delete(true),
            KeyAction::ConfirmDecline => self.resolve_delete(false),
            KeyAction::Quit => {
                self.table.commit_edit();
                self.running = false;
            }
        }
    }

    pub fn handle_mouse_event(&mut self, event: MouseEvent, hit_map: &HitMap) {
        self.handle_mouse_event_at(event, hit_map, Instant::now());
    }

    pub fn handle_mouse_event_at(&mut self, event: MouseEvent, hit_map: &HitMap, at: Instant) {
        if self.pending_delete.is_some() {
            return;
        }
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let target = hit_map.target_at(event.column, event.row);
                self.click(target, at);
            }
            MouseEventKind::ScrollDown if self.mode() == InputMode::Browse => {
                self.move_selection(Direction::Down)
            }
            MouseEventKind::ScrollUp if self.mode() == InputMode::Browse => {
                self.move_selection(Direction::Up)
            }
            _ => {}
        }
    }

    /// 対象へのクリック。同じ対象への連続クリックはダブルクリックとして委譲処理も行う
    pub fn click(&mut self, target: Target, at: Instant) {
        if self.pending_delete.is_some() {
            return;
        }
        let gesture = self.clicks.register(target, at);

        match target {
            Target::Cell(id, field) | Target::EditIcon(id, field) => self.selection = Some((id, field)),
            Target::DeleteButton(id) => {
                let field = self.selection.map(|(_, field)| field).unwrap_or(Field::Name);
                self.selection = Some((id, field));
            }
            _ => {}
        }
        if target != Target::SearchField {
            self.search_focused = false;
        }

        let editing = self.table.editing().is_some();
        let bindings = self.table.bindings();
        let mut actions = bindings.resolve(target, Gesture::Click, editing);
        if gesture == Gesture::DoubleClick {
            actions.extend(bindings.resolve(target, Gesture::DoubleClick, editing));
        }

        for action in actions {
            self.dispatch(action);
        }
    }

    /// アクションを実行。存在しない行への操作は何もしない
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::FocusSearch => self.search_focused = true,
            Action::AddRow => {
                let id = self.table.add_row();
                self.selection = Some((id, Field::Name));
                self.search_focused = false;
            }
            Action::SortBy(field) => {
                self.table.sort_by(field);
            }
            Action::EnterEdit(id, field) => match self.table.begin_edit(id, field) {
                Ok(()) => {
                    self.selection = Some((id, field));
                    self.search_focused = false;
                }
                Err(err) => log::debug!("ignored edit request: {}", err),
            },
            Action::DeleteRow(id) => {
                if self.table.row(id).is_some() {
                    self.pending_delete = Some(id);
                }
            }
            Action::ClickOutside => {
                self.table.click_outside();
            }
        }
    }

    /// 確認ダイアログの応答で削除を実行
    fn resolve_delete(&mut self, accept: bool) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        let index = self.table.index_of(id).ok();

        match self.table.delete_row(id, &mut |_: &str| accept) {
            Ok(DeleteOutcome::Deleted(record)) => {
                self.status = Some(ErrorDisplay::info(format!("Deleted row \"{}\"", record.name)));
                self.reselect_after_delete(id, index);
            }
            Ok(DeleteOutcome::Declined) => {}
            Err(err) => log::debug!("ignored delete request: {}", err),
        }
    }

    fn reselect_after_delete(&mut self, deleted: RowId, index: Option<usize>) {
        if !matches!(self.selection, Some((id, _)) if id == deleted) {
            return;
        }
        let field = self.selection.map(|(_, field)| field).unwrap_or(Field::Name);
        let rows = self.table.rows();
        let neighbour = index
            .and_then(|idx| rows.get(idx).or_else(|| idx.checked_sub(1).and_then(|prev| rows.get(prev))));
        self.selection = neighbour.map(|row| (row.id(), field));
    }

    fn run_search(&mut self) {
        self.table.search(&self.search_input);
        self.reveal_started = Instant::now();

        // 選択行が隠れたら最初の表示行へ
        let hidden = self.selection.is_some_and(|(id, _)| !self.table.is_visible(id));
        if hidden || self.selection.is_none() {
            let field = self.selection.map(|(_, field)| field).unwrap_or(Field::Name);
            self.selection = self.table.visible_rows().next().map(|row| (row.id(), field));
        }
    }

    fn move_selection(&mut self, direction: Direction) {
        let visible: Vec<RowId> = self.table.visible_rows().map(Row::id).collect();
        if visible.is_empty() {
            self.selection = None;
            return;
        }

        let current = self
            .selection
            .and_then(|(id, field)| visible.iter().position(|row| *row == id).map(|pos| (pos, field)));
        let Some((position, field)) = current else {
            self.selection = Some((visible[0], Field::Name));
            return;
        };

        self.selection = Some(match direction {
            Direction::Up => (visible[position.saturating_sub(1)], field),
            Direction::Down => (visible[(position + 1).min(visible.len() - 1)], field),
            Direction::Left => (
                visible[position],
                Field::from_index(field.index().saturating_sub(1)).unwrap_or(field),
            ),
            Direction::Right => (
                visible[position],
                Field::from_index(field.index() + 1).unwrap_or(field),
            ),
        });
    }
}
