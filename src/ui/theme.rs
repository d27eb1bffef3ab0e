//! テーマシステム
//!
//! UIコンポーネントごとのスタイル定義

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use std::collections::HashMap;

/// テーマの種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeType {
    #[default]
    Dark,
    Light,
}

/// UIコンポーネントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// 検索欄
    SearchField,
    /// 入力中の検索欄
    SearchFieldFocused,
    /// 行追加ボタン
    AddButton,
    /// 列見出し
    Heading,
    /// ソート中の列見出し
    HeadingActive,
    /// 通常の行
    Row,
    /// 選択中の行
    RowSelected,
    /// 選択中のセル
    CellSelected,
    /// 編集アイコン
    EditIcon,
    /// 編集ウィジェット
    Editor,
    /// 編集ウィジェットのカーソル
    EditorCursor,
    /// 選択された選択肢
    ChoiceSelected,
    /// 削除ボタン
    DeleteButton,
    /// ステータスライン
    StatusLine,
    /// エラーメッセージ
    Error,
    /// 警告メッセージ
    Warning,
    /// 情報メッセージ
    Info,
    /// 確認ダイアログ
    Modal,
    /// ボーダー
    Border,
}

/// テーマ
#[derive(Debug, Clone)]
pub struct Theme {
    theme_type: ThemeType,
    styles: HashMap<ComponentType, Style>,
}

impl Theme {
    pub fn new(theme_type: ThemeType) -> Self {
        let styles = match theme_type {
            ThemeType::Dark => Self::dark_styles(),
            ThemeType::Light => Self::light_styles(),
        };
        Self { theme_type, styles }
    }

    pub fn theme_type(&self) -> ThemeType {
        self.theme_type
    }

    /// コンポーネントのスタイルを取得（未定義なら既定スタイル）
    pub fn style(&self, component: ComponentType) -> Style {
        self.styles.get(&component).copied().unwrap_or_default()
    }

    fn dark_styles() -> HashMap<ComponentType, Style> {
        use ComponentType::*;
        HashMap::from([
            (SearchField, Style::default().fg(Color::Gray)),
            (SearchFieldFocused, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            (AddButton, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            (Heading, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            (HeadingActive, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            (Row, Style::default().fg(Color::White)),
            (RowSelected, Style::default().fg(Color::White).bg(Color::DarkGray)),
            (CellSelected, Style::default().add_modifier(Modifier::UNDERLINED)),
            (EditIcon, Style::default().fg(Color::DarkGray)),
            (Editor, Style::default().fg(Color::Black).bg(Color::Cyan)),
            (EditorCursor, Style::default().add_modifier(Modifier::REVERSED)),
            (ChoiceSelected, Style::default().fg(Color::Black).bg(Color::Yellow)),
            (DeleteButton, Style::default().fg(Color::Red)),
            (StatusLine, Style::default().fg(Color::Black).bg(Color::Gray)),
            (Error, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            (Warning, Style::default().fg(Color::Yellow)),
            (Info, Style::default().fg(Color::Green)),
            (Modal, Style::default().fg(Color::White).bg(Color::Black)),
            (Border, Style::default().fg(Color::Gray)),
        ])
    }

    fn light_styles() -> HashMap<ComponentType, Style> {
        use ComponentType::*;
        let mut styles = Self::dark_styles();
        styles.insert(SearchFieldFocused, Style::default().fg(Color::Black).add_modifier(Modifier::BOLD));
        styles.insert(Heading, Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD));
        styles.insert(HeadingActive, Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD));
        styles.insert(Row, Style::default().fg(Color::Black));
        styles.insert(RowSelected, Style::default().fg(Color::Black).bg(Color::Gray));
        styles.insert(Editor, Style::default().fg(Color::White).bg(Color::Blue));
        styles.insert(StatusLine, Style::default().fg(Color::White).bg(Color::DarkGray));
        styles.insert(Modal, Style::default().fg(Color::Black).bg(Color::White));
        styles.insert(Border, Style::default().fg(Color::DarkGray));
        styles
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeType::default())
    }
}
