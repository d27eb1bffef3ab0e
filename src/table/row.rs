//! 行と行ID
//!
//! 行IDは単調増加カウンタから払い出す。同一時刻に複数行を作っても衝突しない。

use super::editor::Cell;
use super::record::{Field, Gender, Record};
use std::fmt;

/// 行の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// 行ID払い出し用カウンタ
#[derive(Debug, Clone)]
pub struct RowIdGenerator {
    next: u64,
}

impl RowIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> RowId {
        let id = RowId(self.next);
        self.next += 1;
        id
    }
}

impl Default for RowIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// テーブルの1行
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    cells: [Cell; 3],
}

impl Row {
    pub fn from_record(id: RowId, record: &Record) -> Self {
        Self {
            id,
            cells: Field::ALL.map(|field| Cell::new(field, record.cell_text(field))),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn cells(&self) -> &[Cell; 3] {
        &self.cells
    }

    pub fn cell(&self, field: Field) -> &Cell {
        &self.cells[field.index()]
    }

    pub fn cell_mut(&mut self, field: Field) -> &mut Cell {
        &mut self.cells[field.index()]
    }

    /// 検索対象となる行全体のテキスト
    pub fn text(&self) -> String {
        self.cells
            .iter()
            .map(Cell::text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 表示値からレコードを復元（解釈できない値は欠損扱い）
    pub fn to_record(&self) -> Record {
        Record {
            name: self.cell(Field::Name).text().to_string(),
            age: self.cell(Field::Age).text().trim().parse().ok(),
            gender: Gender::parse(self.cell(Field::Gender).text()),
        }
    }
}
