//! 写真カタログ
//!
//! メモリ上の写真レコード列。描画の唯一の情報源。
//! 変更操作は「変更があったか」を返し、並べ替え・保存・再描画は呼び出し側が行う。

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::types::{Photo, PhotoDraft, PhotoId};

/// upsertの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    /// 新規追加（新しいIDを割当）
    Inserted(PhotoId),
    /// 同名ファイルを置換（IDは維持）
    Replaced(PhotoId),
}

impl Upserted {
    pub fn id(&self) -> PhotoId {
        match self {
            Upserted::Inserted(id) | Upserted::Replaced(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    photos: Vec<Photo>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// ストアから読み込んだレコードでカタログを再構築
    pub fn from_records(records: Vec<Photo>) -> Self {
        let mut catalog = Self {
            photos: records.into_iter().map(Photo::normalized).collect(),
        };
        catalog.reorder();
        catalog
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn get(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id() == id)
    }

    /// 同名ファイルがあれば置換、なければ末尾に追加
    ///
    /// `id_seed` は新規IDの候補値。既存の最大IDより大きい値に繰り上げて割り当てる。
    /// 並べ替えは行わない（バッチ完了後に `reorder` を呼ぶこと）。
    /// 既存IDが `PhotoId::MAX` に達していて新規IDを割り当てられない場合はエラー。
    pub fn upsert(&mut self, draft: PhotoDraft, id_seed: PhotoId) -> Result<Upserted> {
        if let Some(existing) = self
            .photos
            .iter_mut()
            .find(|p| p.filename() == draft.filename)
        {
            existing.replace_with(draft);
            return Ok(Upserted::Replaced(existing.id()));
        }

        let id = self.next_id(id_seed)?;
        self.photos.push(Photo::new(id, draft));
        Ok(Upserted::Inserted(id))
    }

    /// IDで削除。存在しなければ何もしない
    pub fn remove(&mut self, id: PhotoId) -> bool {
        let before = self.photos.len();
        self.photos.retain(|p| p.id() != id);
        self.photos.len() != before
    }

    /// 日付（と年）を更新。存在しなければ何もしない
    pub fn update_date(&mut self, id: PhotoId, date: NaiveDate) -> bool {
        match self.photos.iter_mut().find(|p| p.id() == id) {
            Some(photo) => {
                photo.set_date(date);
                true
            }
            None => false,
        }
    }

    /// (日付, ID) 昇順で並べ替え
    pub fn reorder(&mut self) {
        self.photos.sort_by_key(|p| (p.date(), p.id()));
    }

    pub fn is_sorted(&self) -> bool {
        self.photos
            .windows(2)
            .all(|w| (w[0].date(), w[0].id()) <= (w[1].date(), w[1].id()))
    }

    fn next_id(&self, seed: PhotoId) -> Result<PhotoId> {
        match self.photos.iter().map(Photo::id).max() {
            Some(max) => max
                .checked_add(1)
                .map(|next| seed.max(next))
                .ok_or(Error::IdsExhausted(max)),
            None => Ok(seed),
        }
    }
}
