//! 写真ストア
//!
//! 写真IDをキーにしたレコード集合の永続化。保存は常に全件置換。

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use photo_album_common::Photo;

/// コレクション名
pub const COLLECTION_NAME: &str = "photos";

#[allow(async_fn_in_trait)]
pub trait PhotoStore {
    /// コレクションを空にして全レコードを書き込む（原子的）
    async fn replace_all(&self, photos: &[Photo]) -> Result<()>;

    /// 全レコードを取得（順序は保証しない）
    async fn load_all(&self) -> Result<Vec<Photo>>;
}
