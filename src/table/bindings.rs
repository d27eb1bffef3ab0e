//! 操作対象とアクションの対応表
//!
//! 描画面の要素（`Target`）ごとにクリック時のアクションを登録する。
//! 行の要素は行の生成時に登録し、削除時に解除する。
//! ダブルクリックはセル全体への委譲ハンドラ1つで処理するため、
//! 後から追加された行にも登録なしで効く。

use super::record::Field;
use super::row::RowId;
use std::collections::HashMap;

/// 操作対象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    SearchField,
    AddRowTop,
    AddRowBottom,
    Heading(Field),
    Cell(RowId, Field),
    EditIcon(RowId, Field),
    DeleteButton(RowId),
    /// 編集中のウィジェット
    Editor,
    /// どの要素にも当たらない位置
    Background,
}

/// 対象が起動するアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FocusSearch,
    AddRow,
    SortBy(Field),
    EnterEdit(RowId, Field),
    DeleteRow(RowId),
    /// 編集ウィジェット外のクリック（フォーカス解除）
    ClickOutside,
}

/// ポインタ操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Click,
    DoubleClick,
}

/// クリックハンドラの登録表
#[derive(Debug, Clone, Default)]
pub struct BindingRegistry {
    clicks: HashMap<Target, Action>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, target: Target, action: Action) {
        self.clicks.insert(target, action);
    }

    pub fn unregister(&mut self, target: &Target) -> Option<Action> {
        self.clicks.remove(target)
    }

    pub fn lookup(&self, target: &Target) -> Option<Action> {
        self.clicks.get(target).copied()
    }

    pub fn len(&self) -> usize {
        self.clicks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clicks.is_empty()
    }

    /// 検索欄・追加ボタン・列見出しを登録
    pub fn register_globals(&mut self) {
        self.register(Target::SearchField, Action::FocusSearch);
        self.register(Target::AddRowTop, Action::AddRow);
        self.register(Target::AddRowBottom, Action::AddRow);
        for field in Field::ALL {
            self.register(Target::Heading(field), Action::SortBy(field));
        }
    }

    /// 行の編集アイコンと削除ボタンを登録
    pub fn register_row(&mut self, id: RowId) {
        for field in Field::ALL {
            self.register(Target::EditIcon(id, field), Action::EnterEdit(id, field));
        }
        self.register(Target::DeleteButton(id), Action::DeleteRow(id));
    }

    pub fn unregister_row(&mut self, id: RowId) {
        self.clicks.retain(|target, _| match target {
            Target::EditIcon(row, _) | Target::DeleteButton(row) | Target::Cell(row, _) => *row != id,
            _ => true,
        });
    }

    /// ポインタ操作を実行すべきアクション列に変換
    ///
    /// クリックは編集中ウィジェットの外なら先に `ClickOutside` を出す。
    pub fn resolve(&self, target: Target, gesture: Gesture, editing: bool) -> Vec<Action> {
        let mut actions = Vec::new();
        match gesture {
            Gesture::Click => {
                if editing && target != Target::Editor {
                    actions.push(Action::ClickOutside);
                }
                actions.extend(self.lookup(&target));
            }
            Gesture::DoubleClick => {
                if let Target::Cell(id, field) | Target::EditIcon(id, field) = target {
                    // 未登録（削除済み）の行は無視
                    if self.lookup(&Target::DeleteButton(id)).is_some() {
                        actions.push(Action::EnterEdit(id, field));
                    }
                }
            }
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::row::RowIdGenerator;

    #[test]
    fn test_globals_cover_headings_and_buttons() {
        let mut registry = BindingRegistry::new();
        registry.register_globals();
        assert_eq!(registry.lookup(&Target::AddRowTop), Some(Action::AddRow));
        assert_eq!(registry.lookup(&Target::AddRowBottom), Some(Action::AddRow));
        assert_eq!(
            registry.lookup(&Target::Heading(Field::Age)),
            Some(Action::SortBy(Field::Age))
        );
    }

    #[test]
    fn test_row_registration_lifecycle() {
        let mut ids = RowIdGenerator::new();
        let id = ids.next_id();
        let mut registry = BindingRegistry::new();
        registry.register_row(id);
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.lookup(&Target::EditIcon(id, Field::Gender)),
            Some(Action::EnterEdit(id, Field::Gender))
        );

        registry.unregister_row(id);
        assert!(registry.is_empty());
        assert!(registry
            .resolve(Target::DeleteButton(id), Gesture::Click, false)
            .is_empty());
    }

    #[test]
    fn test_click_outside_editor_commits_first() {
        let mut registry = BindingRegistry::new();
        registry.register_globals();
        let actions = registry.resolve(Target::Heading(Field::Name), Gesture::Click, true);
        assert_eq!(actions, vec![Action::ClickOutside, Action::SortBy(Field::Name)]);

        assert!(registry.resolve(Target::Editor, Gesture::Click, true).is_empty());
        assert_eq!(
            registry.resolve(Target::Background, Gesture::Click, true),
            vec![Action::ClickOutside]
        );
    }

    #[test]
    fn test_double_click_is_delegated_to_cells() {
        let mut ids = RowIdGenerator::new();
        let id = ids.next_id();
        let mut registry = BindingRegistry::new();
        registry.register_row(id);

        assert_eq!(
            registry.resolve(Target::Cell(id, Field::Age), Gesture::DoubleClick, false),
            vec![Action::EnterEdit(id, Field::Age)]
        );
        assert!(registry
            .resolve(Target::Background, Gesture::DoubleClick, false)
            .is_empty());
    }
}
