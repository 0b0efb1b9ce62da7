use crate::album::UploadReport;
use photo_album_common::PhotoId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("入力エラー: {0}")]
    UserInput(String),

    #[error("画像デコードエラー: {0}")]
    Decode(String),

    #[error("保存に失敗しました: {0}")]
    Persistence(String),

    /// 取り込みは反映済みだが保存に失敗した
    #[error("保存に失敗しました: {reason}（{}枚は反映済み、{}枚スキップ）", .report.processed(), .report.skipped.len())]
    UploadNotPersisted { report: UploadReport, reason: String },

    #[error("写真が見つかりません: id={0}")]
    NotFound(PhotoId),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] photo_album_common::Error),
}

impl AlbumError {
    /// ユーザーに即時表示すべき入力エラーか
    pub fn is_user_input(&self) -> bool {
        matches!(self, AlbumError::UserInput(_))
    }

    /// 保存失敗か（メモリ上の状態は残っており `retry_persist` で再試行できる）
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            AlbumError::Persistence(_) | AlbumError::UploadNotPersisted { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AlbumError>;
