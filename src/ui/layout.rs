//! TUIレイアウト管理
//!
//! 画面を検索バー・列見出し・行領域・下部ボタン・ステータスラインに分割する

use crate::error::{RowEditError, UiError};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// 最小画面サイズ
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;

/// 行追加ボタンのラベル
pub const ADD_ROW_LABEL: &str = "[+ Add Row]";

/// 画面全体のレイアウト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// 検索欄（上部左）
    pub search: Rect,
    /// 行追加ボタン（上部右）
    pub add_top: Rect,
    /// 列見出し
    pub headings: Rect,
    /// 行表示領域
    pub body: Rect,
    /// 行追加ボタン（下部）
    pub add_bottom: Rect,
    /// ステータスライン
    pub status: Rect,
    /// 全体
    pub total: Rect,
}

/// レイアウトマネージャー
#[derive(Debug, Clone)]
pub struct LayoutManager {
    min_width: u16,
    min_height: u16,
}

impl LayoutManager {
    pub fn new() -> Self {
        Self {
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        }
    }

    /// 画面サイズからレイアウトを計算
    pub fn calculate_layout(&self, area: Rect) -> Result<TableLayout, RowEditError> {
        if area.width < self.min_width || area.height < self.min_height {
            return Err(RowEditError::Ui(UiError::ScreenTooSmall {
                width: area.width,
                height: area.height,
            }));
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // 検索欄と追加ボタン
                Constraint::Length(1), // 区切り
                Constraint::Length(1), // 列見出し
                Constraint::Min(1),    // 行
                Constraint::Length(1), // 下部追加ボタン
                Constraint::Length(1), // ステータスライン
            ])
            .split(area);

        let button_width = ADD_ROW_LABEL.len() as u16;
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(button_width)])
            .split(chunks[0]);

        let add_bottom = Rect {
            width: button_width.min(chunks[4].width),
            ..chunks[4]
        };

        Ok(TableLayout {
            search: top[0],
            add_top: top[2],
            headings: chunks[2],
            body: chunks[3],
            add_bottom,
            status: chunks[5],
            total: area,
        })
    }

    /// 1行分の領域を列に分割（名前・年齢・性別・操作）
    pub fn columns(&self, line: Rect) -> [Rect; 4] {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(15),
                Constraint::Percentage(25),
                Constraint::Min(8),
            ])
            .split(line);
        [chunks[0], chunks[1], chunks[2], chunks[3]]
    }

    /// 画面中央に置くダイアログ領域
    pub fn centered(&self, area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_regions() {
        let manager = LayoutManager::new();
        let layout = manager.calculate_layout(Rect::new(0, 0, 80, 24)).unwrap();

        assert_eq!(layout.search.y, 0);
        assert_eq!(layout.headings.y, 2);
        assert_eq!(layout.body.y, 3);
        assert_eq!(layout.body.height, 19);
        assert_eq!(layout.add_bottom.y, 22);
        assert_eq!(layout.status.y, 23);
        assert_eq!(layout.add_top.width, ADD_ROW_LABEL.len() as u16);
        assert_eq!(layout.add_top.x + layout.add_top.width, 80);
    }

    #[test]
    fn test_small_screen_is_rejected() {
        let manager = LayoutManager::new();
        let result = manager.calculate_layout(Rect::new(0, 0, 30, 8));
        assert!(matches!(
            result,
            Err(RowEditError::Ui(UiError::ScreenTooSmall { width: 30, height: 8 }))
        ));
    }

    #[test]
    fn test_columns_cover_line() {
        let manager = LayoutManager::new();
        let line = Rect::new(0, 5, 80, 1);
        let columns = manager.columns(line);
        assert_eq!(columns[0].x, 0);
        let total: u16 = columns.iter().map(|rect| rect.width).sum();
        assert_eq!(total, 80);
    }

    #[test]
    fn test_centered_dialog() {
        let manager = LayoutManager::new();
        let rect = manager.centered(Rect::new(0, 0, 80, 24), 50, 5);
        assert_eq!(rect, Rect::new(15, 9, 50, 5));
    }
}
