//! ページ割りエンジン
//!
//! カタログ順の写真列を、年ごと・最大4枚のページ列に変換する純粋関数。
//! 見開き（左右2ページ）単位で表示するため、ページ数は常に偶数。

use std::collections::BTreeMap;

use crate::types::Photo;

/// 1ページあたりの写真スロット数（2x2グリッド）
pub const PAGE_CAPACITY: usize = 4;

/// 1ページ分の内容
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// カタログ順を保った写真（最大 `PAGE_CAPACITY` 枚）
    pub photos: Vec<Photo>,
    /// このページの年。`None` は空白ページ
    pub year: Option<i32>,
}

impl Page {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.year.is_none()
    }

    /// 固定4スロット（空きは `None`）
    pub fn slots(&self) -> [Option<&Photo>; PAGE_CAPACITY] {
        std::array::from_fn(|i| self.photos.get(i))
    }
}

/// 写真列をページ列に変換
pub fn paginate(photos: &[Photo]) -> Vec<Page> {
    if photos.is_empty() {
        return vec![Page::blank(), Page::blank()];
    }

    // 年ごとにグループ化（グループ内はカタログ順のまま）
    let mut by_year: BTreeMap<i32, Vec<&Photo>> = BTreeMap::new();
    for photo in photos {
        by_year.entry(photo.year()).or_default().push(photo);
    }

    let mut pages = Vec::new();
    for (year, group) in by_year {
        for chunk in group.chunks(PAGE_CAPACITY) {
            pages.push(Page {
                photos: chunk.iter().map(|&p| p.clone()).collect(),
                year: Some(year),
            });
        }
    }

    if pages.len() % 2 != 0 {
        pages.push(Page::blank());
    }

    pages
}
