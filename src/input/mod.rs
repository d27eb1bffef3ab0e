//! 入力処理モジュール
//!
//! キーバインドとマウスのクリック判定を提供

pub mod keybinding;
pub mod mouse;

// 公開API
pub use keybinding::{Direction, InputMode, Key, KeyAction, KeyCode, KeyMap, KeyModifiers, KeyProcessResult};
pub use mouse::{ClickTracker, DEFAULT_DOUBLE_CLICK_INTERVAL};
