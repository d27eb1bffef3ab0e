//! エラーハンドリングシステム
//!
//! rowedit 全体で使用される統一されたエラー型とユーティリティを定義

use crate::table::RowId;
use std::time::{Duration, Instant};
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum RowEditError {
    /// テーブル操作エラー
    #[error("Table operation failed: {0}")]
    Table(#[from] TableError),

    /// UI操作エラー
    #[error("UI operation failed: {0}")]
    Ui(#[from] UiError),

    /// 入力処理エラー
    #[error("Input processing failed: {0}")]
    Input(#[from] InputError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 入出力エラー
    #[error("IO error: {0}")]
    Io(String),

    /// アプリケーション論理エラー
    #[error("Application error: {0}")]
    Application(String),
}

/// テーブル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Unknown row: {id}")]
    UnknownRow { id: RowId },

    #[error("Table is already initialized")]
    AlreadyInitialized,
}

/// UI操作固有のエラー
#[derive(Error, Debug, Clone)]
pub enum UiError {
    #[error("Terminal initialization failed: {reason}")]
    TerminalInit { reason: String },

    #[error("Screen size too small: {width}x{height}")]
    ScreenTooSmall { width: u16, height: u16 },

    #[error("Rendering failed: {component}")]
    RenderingFailed { component: String },
}

/// 入力処理固有のエラー
#[derive(Error, Debug, Clone)]
pub enum InputError {
    #[error("Invalid argument: {arg}")]
    InvalidArgument { arg: String },

    #[error("Missing value for {flag}")]
    MissingValue { flag: String },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Path expansion failed for {path}: {message}")]
    PathExpansion { path: String, message: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

/// ステータスラインに表示するメッセージ
#[derive(Debug, Clone)]
pub struct ErrorDisplay {
    /// メッセージ
    pub message: String,
    /// レベル
    pub level: ErrorLevel,
    /// 表示開始時刻
    pub start_time: Instant,
    /// 表示持続時間（5秒）
    pub duration: Duration,
}

impl ErrorDisplay {
    pub fn new(error: &RowEditError) -> Self {
        let (message, level) = Self::format_error(error);
        Self::with_level(message, level)
    }

    /// 情報メッセージ
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(message.into(), ErrorLevel::Info)
    }

    fn with_level(message: String, level: ErrorLevel) -> Self {
        Self {
            message,
            level,
            start_time: Instant::now(),
            duration: Duration::from_secs(5),
        }
    }

    fn format_error(error: &RowEditError) -> (String, ErrorLevel) {
        match error {
            RowEditError::Table(TableError::UnknownRow { id }) => {
                (format!("行が見つかりません: {}", id), ErrorLevel::Warning)
            }
            RowEditError::Ui(UiError::ScreenTooSmall { width, height }) => {
                (format!("画面サイズが小さすぎます: {}x{}", width, height), ErrorLevel::Error)
            }
            RowEditError::Config(err) => (format!("設定エラー: {}", err), ErrorLevel::Error),
            _ => (format!("エラーが発生しました: {}", error), ErrorLevel::Error),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.start_time.elapsed() >= self.duration
    }
}

/// パニックハンドラの設定
///
/// 端末を通常モードに戻してから位置とメッセージを出力し、即座に終了する。
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut out = std::io::stdout();
        let _ = crossterm::execute!(
            out,
            crossterm::event::DisableMouseCapture,
            crossterm::terminal::LeaveAlternateScreen
        );

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        log::error!("PANIC at {}: {}", location, message);
        eprintln!("PANIC at {}: {}", location, message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, RowEditError>;

// std::io::Error から RowEditError への変換
impl From<std::io::Error> for RowEditError {
    fn from(error: std::io::Error) -> Self {
        RowEditError::Io(error.to_string())
    }
}
