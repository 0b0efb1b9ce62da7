//! 年別デコレーション
//!
//! 年 → 装飾画像パスの固定テーブル。未登録の年や空白ページには装飾なし。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 標準で登録される年の範囲
pub const DEFAULT_YEARS: std::ops::RangeInclusive<i32> = 2020..=2026;

/// 解決済みデコレーション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub year: i32,
    /// 共有参照。同じ年なら常に同じバッファを指す
    pub asset: Arc<str>,
}

impl Decoration {
    /// 読み込み済みアセットと同一か（再読み込み不要の判定）
    pub fn same_asset(&self, other: &Decoration) -> bool {
        Arc::ptr_eq(&self.asset, &other.asset)
    }

    pub fn caption(&self) -> String {
        format!("Year {} Decoration", self.year)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecorationTable {
    entries: BTreeMap<i32, Arc<str>>,
}

impl DecorationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{dir}/{year}/decoration.png` を `DEFAULT_YEARS` 分登録
    pub fn with_defaults(dir: &str) -> Self {
        let mut table = Self::new();
        let dir = dir.trim_end_matches('/');
        for year in DEFAULT_YEARS {
            table.register(year, format!("{}/{}/decoration.png", dir, year));
        }
        table
    }

    pub fn register(&mut self, year: i32, asset: impl Into<String>) {
        self.entries.insert(year, Arc::from(asset.into()));
    }

    pub fn resolve(&self, year: Option<i32>) -> Option<Decoration> {
        let year = year?;
        self.entries.get(&year).map(|asset| Decoration {
            year,
            asset: Arc::clone(asset),
        })
    }

    /// 登録済みの (年, パス)
    pub fn entries(&self) -> impl Iterator<Item = (i32, &str)> {
        self.entries.iter().map(|(year, asset)| (*year, asset.as_ref()))
    }

    /// `root` 基準で見つからないアセットを (年, パス) で列挙
    ///
    /// 絶対パスで登録されたアセットは `root` を無視する。
    pub fn preload_check(&self, root: &Path) -> Vec<(i32, PathBuf)> {
        self.entries
            .iter()
            .map(|(year, asset)| (*year, root.join(asset.as_ref())))
            .filter(|(_, path)| !path.exists())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
