//! UIモジュール
//!
//! ratatuiベースのターミナル描画

pub mod layout;
pub mod renderer;
pub mod theme;

// 公開API
pub use layout::{LayoutManager, TableLayout};
pub use renderer::{HitMap, TableRenderer, TableView};
pub use theme::{ComponentType, Theme, ThemeType};
