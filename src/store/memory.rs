//! メモリ上のストア実装（テスト・一時利用向け）

use super::PhotoStore;
use crate::error::{AlbumError, Result};
use photo_album_common::{Photo, PhotoId};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<BTreeMap<PhotoId, Photo>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(photos: Vec<Photo>) -> Self {
        let store = Self::new();
        store
            .records
            .borrow_mut()
            .extend(photos.into_iter().map(|p| (p.id(), p)));
        store
    }

    /// 書き込みを失敗させる（保存失敗の経路確認用）
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// 書き込みが試行された回数（失敗含む）
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl PhotoStore for MemoryStore {
    async fn replace_all(&self, photos: &[Photo]) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(AlbumError::Persistence("ストアが利用できません".into()));
        }

        let mut records = self.records.borrow_mut();
        records.clear();
        records.extend(photos.iter().map(|p| (p.id(), p.clone())));
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Photo>> {
        Ok(self.records.borrow().values().cloned().collect())
    }
}
