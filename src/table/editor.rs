//! セル編集
//!
//! セルの表示状態と編集状態を明示的な状態機械として扱う。
//! 遷移は `Cell::begin_edit` と `Cell::commit` のみ。

use super::record::{Field, Gender};

/// 編集ウィジェットへのキー入力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

/// 1行テキスト入力（数値モード付き）
#[derive(Debug, Clone, PartialEq)]
pub struct TextInput {
    numeric: bool,
    value: String,
    /// カーソル位置（文字単位）
    cursor: usize,
}

impl TextInput {
    pub fn new(value: &str, numeric: bool) -> Self {
        Self {
            numeric,
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    /// 数値入力で受け付ける文字
    fn accepts(&self, ch: char) -> bool {
        if !self.numeric {
            return !ch.is_control();
        }
        ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E')
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    /// 入力を処理。値またはカーソルが変わった場合 true
    pub fn apply(&mut self, key: EditKey) -> bool {
        let len = self.value.chars().count();
        match key {
            EditKey::Char(ch) => {
                if !self.accepts(ch) {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.insert(at, ch);
                self.cursor += 1;
                true
            }
            EditKey::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            EditKey::Delete => {
                if self.cursor >= len {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            EditKey::Left if self.cursor > 0 => {
                self.cursor -= 1;
                true
            }
            EditKey::Right if self.cursor < len => {
                self.cursor += 1;
                true
            }
            EditKey::Home if self.cursor != 0 => {
                self.cursor = 0;
                true
            }
            EditKey::End if self.cursor != len => {
                self.cursor = len;
                true
            }
            _ => false,
        }
    }
}

/// 固定選択肢のチョイス入力
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceInput {
    selected: Option<usize>,
}

impl ChoiceInput {
    /// 現在値が選択肢のいずれかと一致すればそれを選択状態にする
    pub fn new(current: &str) -> Self {
        Self {
            selected: Gender::OPTIONS
                .iter()
                .position(|option| option.as_str() == current),
        }
    }

    pub fn options() -> &'static [Gender] {
        &Gender::OPTIONS
    }

    /// 選択肢の表示ラベル（先頭文字を大文字化）
    pub fn label(option: Gender) -> String {
        let value = option.as_str();
        let mut chars = value.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn selected(&self) -> Option<Gender> {
        self.selected.and_then(|idx| Gender::OPTIONS.get(idx).copied())
    }

    pub fn value(&self) -> &'static str {
        self.selected().map(Gender::as_str).unwrap_or("")
    }

    pub fn select_next(&mut self) {
        let count = Gender::OPTIONS.len();
        self.selected = Some(match self.selected {
            Some(idx) => (idx + 1) % count,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        let count = Gender::OPTIONS.len();
        self.selected = Some(match self.selected {
            Some(0) | None => count - 1,
            Some(idx) => idx - 1,
        });
    }

    pub fn apply(&mut self, key: EditKey) -> bool {
        match key {
            EditKey::Down | EditKey::Right => self.select_next(),
            EditKey::Up | EditKey::Left => self.select_previous(),
            EditKey::Home => self.selected = Some(0),
            EditKey::End => self.selected = Some(Gender::OPTIONS.len() - 1),
            EditKey::Char(ch) => {
                // 頭文字で選択
                let Some(idx) = Gender::OPTIONS.iter().position(|option| {
                    option
                        .as_str()
                        .chars()
                        .next()
                        .is_some_and(|first| first.eq_ignore_ascii_case(&ch))
                }) else {
                    return false;
                };
                self.selected = Some(idx);
            }
            EditKey::Backspace | EditKey::Delete => return false,
        }
        true
    }
}

/// 編集ウィジェット
#[derive(Debug, Clone, PartialEq)]
pub enum EditWidget {
    Text(TextInput),
    Choice(ChoiceInput),
}

impl EditWidget {
    /// フィールド種別に応じたウィジェットを生成
    pub fn for_field(field: Field, current: &str) -> Self {
        match field {
            Field::Name => EditWidget::Text(TextInput::new(current, false)),
            Field::Age => EditWidget::Text(TextInput::new(current, true)),
            Field::Gender => EditWidget::Choice(ChoiceInput::new(current)),
        }
    }

    /// 現在値（検証なし）
    pub fn value(&self) -> String {
        match self {
            EditWidget::Text(input) => input.value().to_string(),
            EditWidget::Choice(choice) => choice.value().to_string(),
        }
    }

    pub fn apply(&mut self, key: EditKey) -> bool {
        match self {
            EditWidget::Text(input) => input.apply(key),
            EditWidget::Choice(choice) => choice.apply(key),
        }
    }
}

/// セルの状態
#[derive(Debug, Clone, PartialEq)]
pub enum CellState {
    /// 表示状態
    Display { text: String },
    /// 編集状態（`original` は編集開始時の表示テキスト）
    Editing { widget: EditWidget, original: String },
}

/// 1フィールド分のセル
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    field: Field,
    state: CellState,
}

impl Cell {
    pub fn new(field: Field, text: impl Into<String>) -> Self {
        Self {
            field,
            state: CellState::Display { text: text.into() },
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn state(&self) -> &CellState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, CellState::Editing { .. })
    }

    /// 確定済みのテキスト（編集中は編集前の値）
    pub fn text(&self) -> &str {
        match &self.state {
            CellState::Display { text } => text,
            CellState::Editing { original, .. } => original,
        }
    }

    pub fn widget(&self) -> Option<&EditWidget> {
        match &self.state {
            CellState::Editing { widget, .. } => Some(widget),
            CellState::Display { .. } => None,
        }
    }

    pub fn widget_mut(&mut self) -> Option<&mut EditWidget> {
        match &mut self.state {
            CellState::Editing { widget, .. } => Some(widget),
            CellState::Display { .. } => None,
        }
    }

    /// Display -> Editing。既に編集中なら何もしない
    pub fn begin_edit(&mut self) -> bool {
        let CellState::Display { text } = &mut self.state else {
            return false;
        };
        let original = std::mem::take(text).trim().to_string();
        let widget = EditWidget::for_field(self.field, &original);
        self.state = CellState::Editing { widget, original };
        true
    }

    /// Editing -> Display。確定した値を返す。表示状態なら `None`
    pub fn commit(&mut self) -> Option<String> {
        let CellState::Editing { widget, .. } = &self.state else {
            return None;
        };
        let value = widget.value();
        self.state = CellState::Display { text: value.clone() };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_starts_in_display_state() {
        let cell = Cell::new(Field::Name, "John Doe");
        assert!(!cell.is_editing());
        assert_eq!(cell.text(), "John Doe");
        assert!(cell.widget().is_none());
    }

    #[test]
    fn test_edit_cycle() {
        let mut cell = Cell::new(Field::Name, "John");
        assert!(cell.begin_edit());
        assert!(cell.is_editing());
        assert!(!cell.begin_edit());

        let widget = cell.widget_mut().unwrap();
        widget.apply(EditKey::Char(' '));
        widget.apply(EditKey::Char('D'));

        assert_eq!(cell.commit().as_deref(), Some("John D"));
        assert!(!cell.is_editing());
        assert_eq!(cell.text(), "John D");
    }

    #[test]
    fn test_commit_is_idempotent() {
        let mut cell = Cell::new(Field::Age, "25");
        cell.begin_edit();
        assert_eq!(cell.commit().as_deref(), Some("25"));
        assert_eq!(cell.commit(), None);
        assert_eq!(cell.text(), "25");
    }

    #[test]
    fn test_numeric_input_refuses_letters() {
        let mut input = TextInput::new("2", true);
        assert!(!input.apply(EditKey::Char('x')));
        assert!(input.apply(EditKey::Char('5')));
        assert!(input.apply(EditKey::Char('.')));
        assert_eq!(input.value(), "25.");
    }

    #[test]
    fn test_text_input_cursor_editing() {
        let mut input = TextInput::new("abc", false);
        input.apply(EditKey::Home);
        input.apply(EditKey::Delete);
        assert_eq!(input.value(), "bc");
        input.apply(EditKey::End);
        input.apply(EditKey::Backspace);
        assert_eq!(input.value(), "b");
        assert_eq!(input.cursor(), 1);
        assert!(!input.apply(EditKey::Right));
    }

    #[test]
    fn test_text_input_handles_multibyte() {
        let mut input = TextInput::new("日本", false);
        input.apply(EditKey::Left);
        input.apply(EditKey::Char('の'));
        assert_eq!(input.value(), "日の本");
    }

    #[test]
    fn test_choice_preselects_matching_value() {
        assert_eq!(ChoiceInput::new("Female").selected(), Some(Gender::Female));
        assert_eq!(ChoiceInput::new("female").selected(), None);
        assert_eq!(ChoiceInput::new("").selected(), None);
    }

    #[test]
    fn test_choice_cycles_options() {
        let mut choice = ChoiceInput::new("");
        assert_eq!(choice.value(), "");
        choice.apply(EditKey::Down);
        assert_eq!(choice.value(), "Male");
        choice.apply(EditKey::Up);
        assert_eq!(choice.value(), "Other");
        choice.apply(EditKey::Char('f'));
        assert_eq!(choice.value(), "Female");
    }

    #[test]
    fn test_gender_cell_commits_empty_without_selection() {
        let mut cell = Cell::new(Field::Gender, "unknown");
        cell.begin_edit();
        assert_eq!(cell.commit().as_deref(), Some(""));
    }

    #[test]
    fn test_choice_label_is_capitalized() {
        assert_eq!(ChoiceInput::label(Gender::Other), "Other");
    }
}
