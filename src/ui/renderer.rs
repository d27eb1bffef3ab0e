//! テーブル描画
//!
//! テーブルの状態を ratatui で描画し、同時にマウス判定用の `HitMap` を作る。

use crate::error::{ErrorDisplay, ErrorLevel};
use crate::input::InputMode;
use crate::table::{ChoiceInput, EditWidget, EditableTable, Field, Row, RowId, Target, TextInput};
use crate::ui::layout::{LayoutManager, TableLayout, ADD_ROW_LABEL};
use crate::ui::theme::{ComponentType, Theme};
use ratatui::{
    backend::Backend,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const EDIT_ICON: &str = " ✎";
const DELETE_LABEL: &str = "[Delete]";

/// 描画に必要な状態のスナップショット
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    pub table: &'a EditableTable,
    pub selection: Option<(RowId, Field)>,
    pub search_input: &'a str,
    pub search_focused: bool,
    pub status: Option<&'a ErrorDisplay>,
    pub pending_delete: Option<RowId>,
    /// 直近の検索からの経過時間
    pub reveal_elapsed: Duration,
    pub mode: InputMode,
}

/// 画面上の領域と操作対象の対応
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Target)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 後から登録した領域ほど優先される
    pub fn push(&mut self, area: Rect, target: Target) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    pub fn target_at(&self, column: u16, row: u16) -> Target {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| {
                column >= area.x
                    && column < area.x.saturating_add(area.width)
                    && row >= area.y
                    && row < area.y.saturating_add(area.height)
            })
            .map(|(_, target)| *target)
            .unwrap_or(Target::Background)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// テーブルレンダラー
#[derive(Debug, Clone)]
pub struct TableRenderer {
    layout_manager: LayoutManager,
    theme: Theme,
    /// 行領域の先頭に表示している表示行インデックス
    scroll: usize,
}

impl TableRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            layout_manager: LayoutManager::new(),
            theme,
            scroll: 0,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// 端末へ描画してヒットマップを返す
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>, view: &TableView<'_>) -> io::Result<HitMap> {
        let mut hit_map = HitMap::new();
        terminal.draw(|frame| {
            hit_map = self.render(frame, view);
        })?;
        Ok(hit_map)
    }

    /// 1フレーム分を描画
    pub fn render(&mut self, frame: &mut Frame<'_>, view: &TableView<'_>) -> HitMap {
        let mut hits = HitMap::new();
        let area = frame.area();

        let layout = match self.layout_manager.calculate_layout(area) {
            Ok(layout) => layout,
            Err(err) => {
                let message = Paragraph::new(err.to_string())
                    .style(self.theme.style(ComponentType::Error))
                    .wrap(Wrap { trim: true });
                frame.render_widget(message, area);
                return hits;
            }
        };

        self.render_top_bar(frame, &layout, view, &mut hits);
        self.render_headings(frame, &layout, view, &mut hits);
        self.render_rows(frame, &layout, view, &mut hits);

        let add_bottom = Paragraph::new(ADD_ROW_LABEL).style(self.theme.style(ComponentType::AddButton));
        frame.render_widget(add_bottom, layout.add_bottom);
        hits.push(layout.add_bottom, Target::AddRowBottom);

        self.render_status(frame, &layout, view);

        if view.pending_delete.is_some() {
            self.render_confirm(frame, area, view);
        }

        hits
    }

    fn render_top_bar(&self, frame: &mut Frame<'_>, layout: &TableLayout, view: &TableView<'_>, hits: &mut HitMap) {
        let style = if view.search_focused {
            self.theme.style(ComponentType::SearchFieldFocused)
        } else {
            self.theme.style(ComponentType::SearchField)
        };

        let mut spans = vec![Span::styled("Search: ", style), Span::styled(view.search_input.to_string(), style)];
        if view.search_focused {
            spans.push(Span::styled(" ", self.theme.style(ComponentType::EditorCursor)));
        } else if view.search_input.is_empty() {
            spans.push(Span::styled("(press / to search)", self.theme.style(ComponentType::EditIcon)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), layout.search);
        hits.push(layout.search, Target::SearchField);

        let add_top = Paragraph::new(ADD_ROW_LABEL).style(self.theme.style(ComponentType::AddButton));
        frame.render_widget(add_top, layout.add_top);
        hits.push(layout.add_top, Target::AddRowTop);
    }

    fn render_headings(&self, frame: &mut Frame<'_>, layout: &TableLayout, view: &TableView<'_>, hits: &mut HitMap) {
        let columns = self.layout_manager.columns(layout.headings);
        let sort = view.table.sort_state();

        for field in Field::ALL {
            let indicator = sort.indicator(field);
            let style = if indicator.is_active() {
                self.theme.style(ComponentType::HeadingActive)
            } else {
                self.theme.style(ComponentType::Heading)
            };
            let text = format!("{} {}", field.label(), indicator.glyph());
            let rect = columns[field.index()];
            frame.render_widget(Paragraph::new(text).style(style), rect);
            hits.push(rect, Target::Heading(field));
        }

        let separator = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(self.theme.style(ComponentType::Border));
        let separator_area = Rect {
            y: layout.headings.y.saturating_sub(1),
            height: 1,
            ..layout.headings
        };
        frame.render_widget(separator, separator_area);
    }

    fn render_rows(&mut self, frame: &mut Frame<'_>, layout: &TableLayout, view: &TableView<'_>, hits: &mut HitMap) {
        let visible: Vec<&Row> = view.table.visible_rows().collect();
        let height = layout.body.height as usize;
        self.adjust_scroll(&visible, view.selection.map(|(id, _)| id), height);

        for (line, row) in visible.iter().skip(self.scroll).take(height).enumerate() {
            let revealed = view
                .table
                .visibility(row.id())
                .reveal_delay
                .map_or(true, |delay| delay <= view.reveal_elapsed);
            if !revealed {
                continue;
            }

            let line_area = Rect {
                y: layout.body.y + line as u16,
                height: 1,
                ..layout.body
            };
            self.render_row(frame, line_area, row, view, hits);
        }
    }

    /// 選択行が行領域に収まるようスクロール位置を調整
    fn adjust_scroll(&mut self, visible: &[&Row], selected: Option<RowId>, height: usize) {
        let max_scroll = visible.len().saturating_sub(height);
        if let Some(position) = selected.and_then(|id| visible.iter().position(|row| row.id() == id)) {
            if position < self.scroll {
                self.scroll = position;
            } else if height > 0 && position >= self.scroll + height {
                self.scroll = position + 1 - height;
            }
        }
        self.scroll = self.scroll.min(max_scroll);
    }

    fn render_row(&self, frame: &mut Frame<'_>, area: Rect, row: &Row, view: &TableView<'_>, hits: &mut HitMap) {
        let selected_row = view.selection.is_some_and(|(id, _)| id == row.id());
        let row_style = if selected_row {
            self.theme.style(ComponentType::RowSelected)
        } else {
            self.theme.style(ComponentType::Row)
        };
        frame.render_widget(Block::default().style(row_style), area);

        let columns = self.layout_manager.columns(area);
        for cell in row.cells() {
            let field = cell.field();
            let rect = columns[field.index()];

            if let Some(widget) = cell.widget() {
                let line = self.editor_line(widget, rect.width as usize);
                frame.render_widget(Paragraph::new(line).style(self.theme.style(ComponentType::Editor)), rect);
                hits.push(rect, Target::Editor);
                continue;
            }

            let mut style = row_style;
            if view.selection == Some((row.id(), field)) {
                style = style.patch(self.theme.style(ComponentType::CellSelected));
            }
            let icon_width = EDIT_ICON.width() as u16;
            let text_width = rect.width.saturating_sub(icon_width + 1) as usize;
            let text = fit_width(cell.text(), text_width);
            let icon_x = rect.x + text.width() as u16;
            let line = Line::from(vec![
                Span::styled(text, style),
                Span::styled(EDIT_ICON, row_style.patch(self.theme.style(ComponentType::EditIcon))),
            ]);
            frame.render_widget(Paragraph::new(line), rect);

            hits.push(rect, Target::Cell(row.id(), field));
            hits.push(
                Rect {
                    x: icon_x,
                    width: icon_width.min(rect.width),
                    ..rect
                },
                Target::EditIcon(row.id(), field),
            );
        }

        let actions = columns[3];
        let delete = Rect {
            width: (DELETE_LABEL.len() as u16).min(actions.width),
            ..actions
        };
        frame.render_widget(
            Paragraph::new(DELETE_LABEL).style(row_style.patch(self.theme.style(ComponentType::DeleteButton))),
            delete,
        );
        hits.push(delete, Target::DeleteButton(row.id()));
    }

    fn editor_line(&self, widget: &EditWidget, width: usize) -> Line<'static> {
        match widget {
            EditWidget::Text(input) => self.text_input_line(input, width),
            EditWidget::Choice(choice) => self.choice_line(choice),
        }
    }

    /// カーソル位置を反転表示したテキスト入力
    fn text_input_line(&self, input: &TextInput, width: usize) -> Line<'static> {
        let chars: Vec<char> = input.value().chars().collect();
        let cursor = input.cursor().min(chars.len());

        // カーソルが見える位置まで先頭を削る
        let span_width = |from: usize| {
            chars[from..cursor]
                .iter()
                .map(|ch| ch.width().unwrap_or(0))
                .sum::<usize>()
                + 1
        };
        let mut start = 0;
        while start < cursor && span_width(start) > width {
            start += 1;
        }

        let before: String = chars[start..cursor].iter().collect();
        let at: String = chars.get(cursor).map(|ch| ch.to_string()).unwrap_or_else(|| " ".to_string());
        let after: String = chars.iter().skip(cursor + 1).collect();

        Line::from(vec![
            Span::raw(before),
            Span::styled(at, self.theme.style(ComponentType::EditorCursor)),
            Span::raw(after),
        ])
    }

    fn choice_line(&self, choice: &ChoiceInput) -> Line<'static> {
        let mut spans = Vec::new();
        for (idx, option) in ChoiceInput::options().iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" "));
            }
            let style = if choice.selected() == Some(*option) {
                self.theme.style(ComponentType::ChoiceSelected)
            } else {
                Style::default()
            };
            spans.push(Span::styled(ChoiceInput::label(*option), style));
        }
        Line::from(spans)
    }

    fn render_status(&self, frame: &mut Frame<'_>, layout: &TableLayout, view: &TableView<'_>) {
        let base = self.theme.style(ComponentType::StatusLine);

        let line = match view.status {
            Some(status) => {
                let component = match status.level {
                    ErrorLevel::Info => ComponentType::Info,
                    ErrorLevel::Warning => ComponentType::Warning,
                    ErrorLevel::Error => ComponentType::Error,
                };
                Line::from(Span::styled(status.message.clone(), base.patch(self.theme.style(component))))
            }
            None => {
                let shown = view.table.visible_rows().count();
                let counts = if shown == view.table.len() {
                    format!("{} rows", shown)
                } else {
                    format!("{}/{} rows", shown, view.table.len())
                };
                Line::from(Span::styled(format!(" {} | {}", counts, mode_hint(view.mode)), base))
            }
        };
        frame.render_widget(Paragraph::new(line).style(base), layout.status);
    }

    fn render_confirm(&self, frame: &mut Frame<'_>, area: Rect, view: &TableView<'_>) {
        let message = view.table.confirm_message();
        let width = (message.width() as u16 + 4).max(30);
        let dialog = self.layout_manager.centered(area, width, 5);

        let block = Block::default()
            .title(" Delete ")
            .borders(Borders::ALL)
            .border_style(self.theme.style(ComponentType::Border))
            .style(self.theme.style(ComponentType::Modal));
        let text = vec![
            Line::from(message.to_string()),
            Line::from(""),
            Line::from("[y] Yes    [n] No"),
        ];

        frame.render_widget(Clear, dialog);
        frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), dialog);
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

fn mode_hint(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Browse => "a:add  d:delete  e/Enter:edit  1-3:sort  /:search  q:quit",
        InputMode::Editing => "Enter/Tab/Esc:commit",
        InputMode::Search => "type to filter  Enter/Esc:done",
        InputMode::Confirm => "y:delete  n:keep",
    }
}

/// 表示幅に収まるよう末尾を切り詰める
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        // 省略記号の1桁を残す
        if used + ch_width + 1 > width {
            break;
        }
        result.push(ch);
        used += ch_width;
    }
    result.push('…');
    result
}
