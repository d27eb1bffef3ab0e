//! 列ソート
//!
//! 有効なソート列は常に高々1つ。年齢列は数値として、
//! それ以外はロケール風の文字列順で比較する。

use super::record::Field;
use super::row::Row;
use std::cmp::Ordering;

/// ソート方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// 見出しのソート表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Inactive,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn glyph(self) -> &'static str {
        match self {
            SortIndicator::Ascending => "↓",
            SortIndicator::Inactive | SortIndicator::Descending => "↑",
        }
    }

    pub fn is_active(self) -> bool {
        !matches!(self, SortIndicator::Inactive)
    }
}

/// 現在のソート列
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<(Field, SortDirection)>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<(Field, SortDirection)> {
        self.active
    }

    /// 次にこの列をソートしたときの方向
    ///
    /// 昇順中の列なら降順、それ以外（他の列・降順中）は昇順。
    pub fn next_direction(&self, field: Field) -> SortDirection {
        match self.active {
            Some((active, SortDirection::Ascending)) if active == field => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    /// ソート列を切り替え（他の列の表示は解除される）
    pub fn activate(&mut self, field: Field, direction: SortDirection) {
        self.active = Some((field, direction));
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn indicator(&self, field: Field) -> SortIndicator {
        match self.active {
            Some((active, SortDirection::Ascending)) if active == field => SortIndicator::Ascending,
            Some((active, SortDirection::Descending)) if active == field => SortIndicator::Descending,
            _ => SortIndicator::Inactive,
        }
    }
}

/// 行を並べ替える（安定ソート、行は作り直さない）
pub fn sort_rows(rows: &mut [Row], field: Field, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare_values(field, a.cell(field).text(), b.cell(field).text());
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// 列の比較規則
pub fn compare_values(field: Field, a: &str, b: &str) -> Ordering {
    match field {
        Field::Age => numeric_key(a).total_cmp(&numeric_key(b)),
        Field::Name | Field::Gender => locale_compare(a, b),
    }
}

/// 空文字は0、数値でなければ NaN（昇順で末尾）
fn numeric_key(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    // "-nan" の符号付き NaN も正の NaN に揃える
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
        .unwrap_or(f64::NAN)
}

/// 大文字小文字を無視して比較し、同綴りなら小文字を先にする
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let case_ranks = |s: &str| {
        s.chars()
            .map(|ch| u8::from(ch.is_uppercase()))
            .collect::<Vec<_>>()
    };

    folded(a)
        .cmp(&folded(b))
        .then_with(|| case_ranks(a).cmp(&case_ranks(b)))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_toggles_on_same_column() {
        let mut state = SortState::new();
        let first = state.next_direction(Field::Age);
        assert_eq!(first, SortDirection::Ascending);
        state.activate(Field::Age, first);

        let second = state.next_direction(Field::Age);
        assert_eq!(second, SortDirection::Descending);
        state.activate(Field::Age, second);

        assert_eq!(state.next_direction(Field::Age), SortDirection::Ascending);
        assert_eq!(state.next_direction(Field::Name), SortDirection::Ascending);
    }

    #[test]
    fn test_only_one_indicator_is_active() {
        let mut state = SortState::new();
        state.activate(Field::Age, SortDirection::Ascending);
        state.activate(Field::Name, SortDirection::Ascending);

        let active: Vec<_> = Field::ALL
            .into_iter()
            .filter(|field| state.indicator(*field).is_active())
            .collect();
        assert_eq!(active, vec![Field::Name]);
    }

    #[test]
    fn test_indicator_glyphs() {
        assert_eq!(SortIndicator::Inactive.glyph(), "↑");
        assert_eq!(SortIndicator::Ascending.glyph(), "↓");
        assert_eq!(SortIndicator::Descending.glyph(), "↑");
    }

    #[test]
    fn test_age_compares_numerically() {
        assert_eq!(compare_values(Field::Age, "9", "10"), Ordering::Less);
        assert_eq!(compare_values(Field::Age, "", "1"), Ordering::Less);
        assert_eq!(compare_values(Field::Age, "abc", "1000"), Ordering::Greater);
        assert_eq!(compare_values(Field::Age, "25", "25.0"), Ordering::Equal);
    }

    #[test]
    fn test_locale_compare() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("Zoe", "adam"), Ordering::Greater);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }
}
