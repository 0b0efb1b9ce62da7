//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("No photo id available after {0}")]
    IdsExhausted(i64),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
