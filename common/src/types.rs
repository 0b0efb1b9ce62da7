//! 写真レコードの型定義
//!
//! - PhotoDraft: アップロード直後（ID未割当）のデータ
//! - Photo: カタログ・ストアで保持する確定レコード
//! - EncodedImage: 埋め込み可能なData URL

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{Error, Result};

/// 写真ID（割当後は不変）
pub type PhotoId = i64;

/// 画面表示用の日付フォーマット（例: "Jan 5, 2024"）
const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

/// Data URL形式のエンコード済み画像
///
/// 中身は共有参照なので、ページ割りのたびにクローンしてもコピーは発生しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(Arc<str>);

impl EncodedImage {
    /// MIMEタイプとバイト列からData URLを構築（base64済みの文字列を受け取る）
    pub fn from_base64(mime: &str, base64_data: &str) -> Self {
        Self(Arc::from(format!("data:{};base64,{}", mime, base64_data)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// MIMEタイプを抽出（"data:image/jpeg;base64,..." → "image/jpeg"）
    pub fn mime_type(&self) -> Option<&str> {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|mime| !mime.is_empty())
    }

    /// base64データ部分を抽出
    pub fn payload(&self) -> Option<&str> {
        self.0.split_once(',').map(|(_, data)| data)
    }

    /// 同一バッファを指しているか（再読み込み判定用）
    pub fn same_buffer(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for EncodedImage {
    fn default() -> Self {
        Self(Arc::from(""))
    }
}

impl From<String> for EncodedImage {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

/// アップロードで生成された、ID割当前の写真データ
#[derive(Debug, Clone)]
pub struct PhotoDraft {
    pub filename: String,
    pub date: NaiveDate,
    pub thumbnail: EncodedImage,
    pub original: EncodedImage,
}

/// 写真レコード
///
/// `year` は常に `date` から導出される。日付の変更は `set_date` 経由のみ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    id: PhotoId,
    #[serde(rename = "src")]
    thumbnail: EncodedImage,
    #[serde(rename = "originalSrc", default)]
    original: EncodedImage,
    date: NaiveDate,
    year: i32,
    filename: String,
}

impl Photo {
    pub fn new(id: PhotoId, draft: PhotoDraft) -> Self {
        Self {
            id,
            thumbnail: draft.thumbnail,
            original: draft.original,
            year: draft.date.year(),
            date: draft.date,
            filename: draft.filename,
        }
    }

    pub fn id(&self) -> PhotoId {
        self.id
    }

    pub fn thumbnail(&self) -> &EncodedImage {
        &self.thumbnail
    }

    pub fn original(&self) -> &EncodedImage {
        &self.original
    }

    /// プレビュー用画像（オリジナルが空ならサムネイル）
    pub fn preview_image(&self) -> &EncodedImage {
        if self.original.is_empty() {
            &self.thumbnail
        } else {
            &self.original
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn display_date(&self) -> String {
        format_display_date(self.date)
    }

    /// 日付を変更し、年を再導出
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.year = date.year();
    }

    /// 同名ファイルの再アップロード: IDを残して中身を置換
    pub(crate) fn replace_with(&mut self, draft: PhotoDraft) {
        let id = self.id;
        *self = Photo::new(id, draft);
    }

    /// ストアから読み込んだレコードの年を日付に合わせる
    pub(crate) fn normalized(mut self) -> Self {
        self.year = self.date.year();
        self
    }
}

/// "YYYY-MM-DD" 形式の日付をパース
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

/// 表示用日付文字列
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}
