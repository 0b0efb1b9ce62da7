//! Photo Album
//!
//! 写真を日付付きで取り込み、年ごとに4枚ずつのページへ割り付けて
//! 見開き（左右2ページ）で閲覧するアルバム。

pub mod album;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod render;
pub mod scanner;
pub mod store;

pub use album::{Album, AlbumOptions, Command, Frame, Outcome, UploadItem, UploadReport};
pub use error::{AlbumError, Result};
