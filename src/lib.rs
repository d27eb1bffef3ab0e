//! rowedit - 端末で動く編集可能レコードテーブル
//!
//! 行の追加・削除、ダブルクリックによるセル編集、全文検索、列ソート

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// テーブル本体（描画方式に非依存）
pub mod table;

// 入力層
pub mod input;

// 表示層
pub mod frontend;
pub mod ui;

// 公開API
pub use config::{CliOptions, Config};
pub use error::{Result, RowEditError};
pub use frontend::{Session, TuiApplication};
pub use table::{Confirm, DeleteOutcome, EditableTable, Field, Gender, Record, RowId};
