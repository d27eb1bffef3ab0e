//! レコード定義
//!
//! テーブル1行が表すデータ（名前・年齢・性別）とフィールド種別

use serde::{Deserialize, Serialize};
use std::fmt;

/// セルのフィールド種別（列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Age,
    Gender,
}

impl Field {
    /// 列の表示順
    pub const ALL: [Field; 3] = [Field::Name, Field::Age, Field::Gender];

    /// 列インデックス
    pub fn index(self) -> usize {
        match self {
            Field::Name => 0,
            Field::Age => 1,
            Field::Gender => 2,
        }
    }

    /// インデックスから列を取得
    pub fn from_index(index: usize) -> Option<Field> {
        Self::ALL.get(index).copied()
    }

    /// 見出しテキスト
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Age => "Age",
            Field::Gender => "Gender",
        }
    }

    /// 種別タグ（`name` / `age` / `gender`）
    pub fn tag(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Age => "age",
            Field::Gender => "gender",
        }
    }

    pub fn parse(tag: &str) -> Option<Field> {
        Self::ALL.into_iter().find(|field| field.tag() == tag)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 性別（選択肢は固定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// 選択肢（この順で表示）
    pub const OPTIONS: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    /// 選択肢の値と完全一致する場合のみ変換
    pub fn parse(value: &str) -> Option<Gender> {
        Self::OPTIONS.into_iter().find(|gender| gender.as_str() == value)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1行分のデータ
///
/// 欠けているフィールドは空文字として表示される。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub name: String,
    pub age: Option<f64>,
    pub gender: Option<Gender>,
}

impl Record {
    pub fn new(name: impl Into<String>, age: f64, gender: Gender) -> Self {
        Self {
            name: name.into(),
            age: Some(age),
            gender: Some(gender),
        }
    }

    /// フィールドの表示文字列
    pub fn cell_text(&self, field: Field) -> String {
        match field {
            Field::Name => self.name.clone(),
            // f64 の Display は整数値を `25` と出力する
            Field::Age => self.age.map(|age| age.to_string()).unwrap_or_default(),
            Field::Gender => self
                .gender
                .map(|gender| gender.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}
