//! キーバインドシステム
//!
//! 入力モードごとにキー入力をアクションへ変換する

use crate::table::{EditKey, Field};
use crossterm::event::{KeyCode as CrosstermKeyCode, KeyEvent, KeyEventKind, KeyModifiers as CrosstermModifiers};
use std::collections::HashMap;

/// キー入力の内部表現
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// 修飾キー
    pub modifiers: KeyModifiers,
    /// 基本キー
    pub code: KeyCode,
}

/// 修飾キーの組み合わせ
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
}

/// 基本キーコード
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Esc,
    Unknown,
}

impl Key {
    pub fn plain(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers::default(),
            code,
        }
    }

    pub fn ctrl(ch: char) -> Self {
        Self {
            modifiers: KeyModifiers { ctrl: true, alt: false },
            code: KeyCode::Char(ch),
        }
    }

    /// 挿入可能な文字かどうかを判定
    pub fn is_insertable_char(&self) -> bool {
        matches!(self.code, KeyCode::Char(_)) && !self.modifiers.ctrl && !self.modifiers.alt
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let code = match event.code {
            CrosstermKeyCode::Char(ch) => KeyCode::Char(ch),
            CrosstermKeyCode::Enter => KeyCode::Enter,
            CrosstermKeyCode::Backspace => KeyCode::Backspace,
            CrosstermKeyCode::Delete => KeyCode::Delete,
            CrosstermKeyCode::Tab => KeyCode::Tab,
            CrosstermKeyCode::BackTab => KeyCode::BackTab,
            CrosstermKeyCode::Up => KeyCode::Up,
            CrosstermKeyCode::Down => KeyCode::Down,
            CrosstermKeyCode::Left => KeyCode::Left,
            CrosstermKeyCode::Right => KeyCode::Right,
            CrosstermKeyCode::Home => KeyCode::Home,
            CrosstermKeyCode::End => KeyCode::End,
            CrosstermKeyCode::Esc => KeyCode::Esc,
            _ => KeyCode::Unknown,
        };
        // SHIFT は文字自体に反映済みなので保持しない
        Self {
            modifiers: KeyModifiers {
                ctrl: event.modifiers.contains(CrosstermModifiers::CONTROL),
                alt: event.modifiers.contains(CrosstermModifiers::ALT),
            },
            code,
        }
    }
}

/// 選択移動の方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// 入力モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputMode {
    /// 行・セルの選択
    Browse,
    /// セル編集中
    Editing,
    /// 検索欄に入力中
    Search,
    /// 削除確認中
    Confirm,
}

/// キーが起動するアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    MoveSelection(Direction),
    EnterEdit,
    AddRow,
    RequestDelete,
    SortBy(Field),
    FocusSearch,
    LeaveSearch,
    SearchInput(char),
    SearchBackspace,
    /// 編集ウィジェットへの入力
    Edit(EditKey),
    /// 編集確定（取り消し操作は存在しない）
    Commit,
    ConfirmAccept,
    ConfirmDecline,
    Quit,
}

/// キー処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyProcessResult {
    Action(KeyAction),
    NoMatch,
}

/// モード別キーマップ
#[derive(Debug, Clone)]
pub struct KeyMap {
    browse: HashMap<Key, KeyAction>,
    editing: HashMap<Key, KeyAction>,
    search: HashMap<Key, KeyAction>,
    confirm: HashMap<Key, KeyAction>,
}

impl KeyMap {
    pub fn new() -> Self {
        let mut keymap = Self {
            browse: HashMap::new(),
            editing: HashMap::new(),
            search: HashMap::new(),
            confirm: HashMap::new(),
        };
        keymap.setup_browse_bindings();
        keymap.setup_editing_bindings();
        keymap.setup_search_bindings();
        keymap.setup_confirm_bindings();
        keymap
    }

    fn setup_browse_bindings(&mut self) {
        use KeyCode::*;
        let moves = [
            (Up, Direction::Up),
            (Char('k'), Direction::Up),
            (Down, Direction::Down),
            (Char('j'), Direction::Down),
            (Left, Direction::Left),
            (Char('h'), Direction::Left),
            (Right, Direction::Right),
            (Char('l'), Direction::Right),
            (BackTab, Direction::Left),
            (Tab, Direction::Right),
        ];
        for (code, direction) in moves {
            self.browse.insert(Key::plain(code), KeyAction::MoveSelection(direction));
        }

        self.browse.insert(Key::plain(Enter), KeyAction::EnterEdit);
        self.browse.insert(Key::plain(Char('e')), KeyAction::EnterEdit);
        self.browse.insert(Key::plain(Char('a')), KeyAction::AddRow);
        self.browse.insert(Key::plain(Char('d')), KeyAction::RequestDelete);
        self.browse.insert(Key::plain(Delete), KeyAction::RequestDelete);
        self.browse.insert(Key::plain(Char('/')), KeyAction::FocusSearch);
        for field in Field::ALL {
            let digit = char::from(b'1' + field.index() as u8);
            self.browse.insert(Key::plain(Char(digit)), KeyAction::SortBy(field));
        }
        self.browse.insert(Key::plain(Char('q')), KeyAction::Quit);
        self.browse.insert(Key::ctrl('c'), KeyAction::Quit);
    }

    fn setup_editing_bindings(&mut self) {
        use KeyCode::*;
        // Enter が確定キー。Tab と Esc もフォーカス喪失と同じく確定扱い
        self.editing.insert(Key::plain(Enter), KeyAction::Commit);
        self.editing.insert(Key::plain(Tab), KeyAction::Commit);
        self.editing.insert(Key::plain(Esc), KeyAction::Commit);

        let keys = [
            (Backspace, EditKey::Backspace),
            (Delete, EditKey::Delete),
            (Left, EditKey::Left),
            (Right, EditKey::Right),
            (Up, EditKey::Up),
            (Down, EditKey::Down),
            (Home, EditKey::Home),
            (End, EditKey::End),
        ];
        for (code, key) in keys {
            self.editing.insert(Key::plain(code), KeyAction::Edit(key));
        }
        self.editing.insert(Key::ctrl('a'), KeyAction::Edit(EditKey::Home));
        self.editing.insert(Key::ctrl('e'), KeyAction::Edit(EditKey::End));
        self.editing.insert(Key::ctrl('c'), KeyAction::Quit);
    }

    fn setup_search_bindings(&mut self) {
        self.search.insert(Key::plain(KeyCode::Backspace), KeyAction::SearchBackspace);
        self.search.insert(Key::plain(KeyCode::Esc), KeyAction::LeaveSearch);
        self.search.insert(Key::plain(KeyCode::Enter), KeyAction::LeaveSearch);
        self.search.insert(Key::plain(KeyCode::Down), KeyAction::LeaveSearch);
        self.search.insert(Key::ctrl('c'), KeyAction::Quit);
    }

    fn setup_confirm_bindings(&mut self) {
        for ch in ['y', 'Y'] {
            self.confirm.insert(Key::plain(KeyCode::Char(ch)), KeyAction::ConfirmAccept);
        }
        for ch in ['n', 'N'] {
            self.confirm.insert(Key::plain(KeyCode::Char(ch)), KeyAction::ConfirmDecline);
        }
        self.confirm.insert(Key::plain(KeyCode::Esc), KeyAction::ConfirmDecline);
    }

    /// キーイベントを処理
    pub fn process_key_event(&self, mode: InputMode, event: KeyEvent) -> KeyProcessResult {
        if event.kind == KeyEventKind::Release {
            return KeyProcessResult::NoMatch;
        }
        self.process_key(mode, &Key::from(event))
    }

    pub fn process_key(&self, mode: InputMode, key: &Key) -> KeyProcessResult {
        let table = match mode {
            InputMode::Browse => &self.browse,
            InputMode::Editing => &self.editing,
            InputMode::Search => &self.search,
            InputMode::Confirm => &self.confirm,
        };

        if let Some(action) = table.get(key) {
            return KeyProcessResult::Action(*action);
        }

        // 文字入力は各モードの入力先へ
        match (mode, &key.code) {
            (InputMode::Editing, KeyCode::Char(ch)) if key.is_insertable_char() => {
                KeyProcessResult::Action(KeyAction::Edit(EditKey::Char(*ch)))
            }
            (InputMode::Search, KeyCode::Char(ch)) if key.is_insertable_char() => {
                KeyProcessResult::Action(KeyAction::SearchInput(*ch))
            }
            _ => KeyProcessResult::NoMatch,
        }
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}
