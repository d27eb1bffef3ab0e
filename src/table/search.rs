//! 行検索フィルタ
//!
//! 行全体のテキストに対する大文字小文字を無視した部分一致。
//! 非表示の行は破棄せず、次回の検索で再評価される。

use super::row::{Row, RowId};
use std::collections::HashMap;
use std::time::Duration;

/// 表示段階ずらしの既定値（1行あたり）
pub const DEFAULT_REVEAL_STEP: Duration = Duration::from_millis(40);

/// 行ごとの表示状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowVisibility {
    pub visible: bool,
    /// 表示順をずらすための遅延（表示行のみ）
    pub reveal_delay: Option<Duration>,
}

/// 検索フィルタの状態
#[derive(Debug, Clone)]
pub struct SearchFilter {
    term: String,
    reveal_step: Duration,
    visibility: HashMap<RowId, RowVisibility>,
    /// 検索実行回数（表示演出の再開判定用）
    generation: u64,
}

impl SearchFilter {
    pub fn new(reveal_step: Duration) -> Self {
        Self {
            term: String::new(),
            reveal_step,
            visibility: HashMap::new(),
            generation: 0,
        }
    }

    /// 現在の検索語（小文字化済み）
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reveal_step(&self) -> Duration {
        self.reveal_step
    }

    /// `index` 行目の表示遅延。桁あふれは最大値に丸める
    fn reveal_delay_at(&self, index: usize) -> Duration {
        u32::try_from(index)
            .ok()
            .and_then(|index| self.reveal_step.checked_mul(index))
            .unwrap_or(Duration::MAX)
    }

    /// 検索語を更新して全行の表示状態を再計算
    pub fn apply(&mut self, term: &str, rows: &[Row]) -> usize {
        self.term = term.to_lowercase();
        self.generation += 1;
        self.visibility.clear();

        let mut shown = 0;
        for (index, row) in rows.iter().enumerate() {
            let visible = matches(&row.text(), &self.term);
            let reveal_delay = visible.then(|| self.reveal_delay_at(index));
            if visible {
                shown += 1;
            }
            self.visibility
                .insert(row.id(), RowVisibility { visible, reveal_delay });
        }

        log::debug!(
            "search {:?}: {} of {} rows visible",
            self.term,
            shown,
            rows.len()
        );
        shown
    }

    /// 未評価の行（検索後に追加された行）は表示扱い
    pub fn visibility(&self, id: RowId) -> RowVisibility {
        self.visibility.get(&id).copied().unwrap_or(RowVisibility {
            visible: true,
            reveal_delay: None,
        })
    }

    pub fn is_visible(&self, id: RowId) -> bool {
        self.visibility(id).visible
    }

    /// 削除された行の状態を破棄
    pub fn forget(&mut self, id: RowId) {
        self.visibility.remove(&id);
    }
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_STEP)
    }
}

/// `term` は小文字化済みであること
pub fn matches(text: &str, term: &str) -> bool {
    term.is_empty() || text.to_lowercase().contains(term)
}
