//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid session transition: cannot {action} while {from}")]
    InvalidTransition { from: &'static str, action: &'static str },

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Process name already exists: {0}")]
    DuplicateName(String),

    #[error("Process name must not be empty")]
    EmptyName,

    #[error("Export error: {0}")]
    Export(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
