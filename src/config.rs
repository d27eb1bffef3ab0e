//! 設定とコマンドライン
//!
//! `<config_dir>/rowedit/config.json` を読み込み、コマンドライン指定で上書きする。
//! どの項目も省略可能で、省略時は既定値を使う。

use crate::error::{ConfigError, InputError, Result};
use crate::table::{Gender, Record, TableOptions, DEFAULT_CONFIRM_MESSAGE, DEFAULT_REVEAL_STEP};
use crate::ui::ThemeType;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 設定ファイルの内容
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// 初期レコードのJSONファイル（`~` と環境変数を展開）
    pub seed_file: Option<String>,
    /// 検索後の行表示を1行ずつずらす間隔
    pub reveal_step_ms: u64,
    /// ダブルクリックとみなす最大間隔
    pub double_click_ms: u64,
    /// 削除確認メッセージ
    pub confirm_message: String,
    pub theme: ThemeType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_file: None,
            reveal_step_ms: DEFAULT_REVEAL_STEP.as_millis() as u64,
            double_click_ms: 400,
            confirm_message: DEFAULT_CONFIRM_MESSAGE.to_string(),
            theme: ThemeType::Dark,
        }
    }
}

impl Config {
    /// 設定を読み込む
    ///
    /// パス指定時はファイルが必須。未指定時は既定の場所にあれば読み、なければ既定値。
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text).map_err(|err| match err {
            crate::RowEditError::Config(ConfigError::InvalidFile { message, .. }) => {
                ConfigError::InvalidFile {
                    path: path.display().to_string(),
                    message,
                }
                .into()
            }
            other => other,
        })?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Config> {
        let config: Config = serde_json::from_str(text).map_err(|err| ConfigError::InvalidFile {
            path: "<inline>".to_string(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.double_click_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "double_click_ms".to_string(),
                value: self.double_click_ms.to_string(),
            }
            .into());
        }
        if self.confirm_message.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "confirm_message".to_string(),
                value: format!("{:?}", self.confirm_message),
            }
            .into());
        }
        Ok(())
    }

    /// コマンドライン指定を反映
    pub fn apply_options(mut self, options: &CliOptions) -> Self {
        if let Some(seed) = &options.seed {
            self.seed_file = Some(seed.display().to_string());
        }
        self
    }

    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            reveal_step: Duration::from_millis(self.reveal_step_ms),
            confirm_message: self.confirm_message.clone(),
        }
    }

    pub fn double_click_interval(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// 初期レコードを取得
    pub fn seed_records(&self) -> Result<Vec<Record>> {
        let Some(seed_file) = &self.seed_file else {
            return Ok(default_seeds());
        };
        let path = expand_path(seed_file)?;
        let text = std::fs::read_to_string(&path).map_err(|err| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let records: Vec<Record> = serde_json::from_str(&text).map_err(|err| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        log::info!("loaded {} seed records from {}", records.len(), path.display());
        Ok(records)
    }
}

/// 既定の初期レコード
pub fn default_seeds() -> Vec<Record> {
    vec![Record::new("John Doe", 25.0, Gender::Male)]
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rowedit").join("config.json"))
}

pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".rowedit-log").join("debug.log"))
}

/// `~` と環境変数を展開
pub fn expand_path(path: &str) -> Result<PathBuf> {
    shellexpand::full(path)
        .map(|expanded| PathBuf::from(expanded.into_owned()))
        .map_err(|err| {
            ConfigError::PathExpansion {
                path: path.to_string(),
                message: err.to_string(),
            }
            .into()
        })
}

/// コマンドライン引数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub seed: Option<PathBuf>,
    /// デバッグログの出力先（`--debug-log` のみなら既定パス）
    pub debug_log: Option<PathBuf>,
    pub show_help: bool,
    pub show_version: bool,
}

pub const USAGE: &str = "\
Usage: rowedit [OPTIONS]

Options:
  --config <path>       Read configuration from <path>
  --seed <path>         Load initial records from a JSON array file
  --debug-log [path]    Write debug logs (default: ~/.rowedit-log/debug.log)
  -h, --help            Show this help
  -V, --version         Show version
";

impl CliOptions {
    pub fn parse(args: &[String]) -> Result<CliOptions> {
        let mut options = CliOptions::default();
        let mut iter = args.iter().peekable();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" | "--seed" => {
                    let value = iter.next().ok_or_else(|| InputError::MissingValue { flag: arg.clone() })?;
                    let path = expand_path(value)?;
                    if arg == "--config" {
                        options.config = Some(path);
                    } else {
                        options.seed = Some(path);
                    }
                }
                "--debug-log" => {
                    let explicit = iter.next_if(|next| !next.starts_with('-'));
                    let path = match explicit {
                        Some(value) => Some(expand_path(value)?),
                        None => default_log_path(),
                    };
                    options.debug_log = Some(path.unwrap_or_else(|| PathBuf::from("debug.log")));
                }
                "-h" | "--help" => options.show_help = true,
                "-V" | "--version" => options.show_version = true,
                other => {
                    return Err(InputError::InvalidArgument { arg: other.to_string() }.into());
                }
            }
        }

        Ok(options)
    }
}
