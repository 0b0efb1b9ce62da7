//! アルバムコントローラ
//!
//! カタログ・ページ列・ビューポート・ストアを1つの状態として保持する。
//! ユーザー操作は `Command` として1回ずつ適用し、呼び出し側はその後 `frame()` で
//! 描画内容を1回取得する。バッチ処理の途中状態が描画されることはない。

use chrono::{NaiveDate, Utc};
use photo_album_common::{
    paginate, Bounds, Catalog, Decoration, DecorationTable, EncodedImage, Page, Photo,
    PhotoDraft, PhotoId, Upserted, Viewport, PAGE_CAPACITY,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::codec::{self, ThumbnailOptions};
use crate::error::{AlbumError, Result};
use crate::store::PhotoStore;

/// 新規IDの候補値をファイルごとにずらす間隔
const ID_STRIDE: i64 = 10;

/// アップロード対象の1ファイル
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub path: PathBuf,
    /// 表示名（同名ファイルの置換判定にも使う）
    pub filename: String,
    pub date: Option<NaiveDate>,
}

impl UploadItem {
    pub fn from_path(path: impl Into<PathBuf>, date: Option<NaiveDate>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, filename, date }
    }
}

/// アップロード結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub added: usize,
    pub replaced: usize,
    /// 読み込み・デコードに失敗してスキップしたファイル名
    pub skipped: Vec<String>,
}

impl UploadReport {
    /// 実際にアルバムへ反映された枚数
    pub fn processed(&self) -> usize {
        self.added + self.replaced
    }
}

/// ユーザー操作
#[derive(Debug, Clone)]
pub enum Command {
    Upload(Vec<UploadItem>),
    Delete(PhotoId),
    EditDate(PhotoId, NaiveDate),
    Next,
    Previous,
}

/// 操作の結果。`changed` が false なら何も起きていない
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Uploaded(UploadReport),
    Deleted { changed: bool },
    DateEdited { changed: bool },
    Navigated { changed: bool },
}

impl Outcome {
    /// 再描画が必要か
    pub fn is_dirty(&self) -> bool {
        match self {
            Outcome::Uploaded(_) => true,
            Outcome::Deleted { changed }
            | Outcome::DateEdited { changed }
            | Outcome::Navigated { changed } => *changed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// ページ内の写真1枠
#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub id: PhotoId,
    pub filename: String,
    pub display_date: String,
    pub thumbnail: EncodedImage,
}

impl From<&Photo> for SlotView {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id(),
            filename: photo.filename().to_string(),
            display_date: photo.display_date(),
            thumbnail: photo.thumbnail().clone(),
        }
    }
}

/// 表示中の1ページ
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub index: usize,
    pub side: Side,
    pub year: Option<i32>,
    pub slots: [Option<SlotView>; PAGE_CAPACITY],
    pub decoration: Option<Decoration>,
}

/// 1回の描画で必要なすべて
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub left: Option<PageView>,
    pub right: Option<PageView>,
    pub bounds: Bounds,
}

/// 拡大表示の内容
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// Data URLまたはアセットパス
    pub source: String,
    pub title: String,
    pub subtitle: String,
}

/// アルバム生成時の設定
#[derive(Debug, Clone)]
pub struct AlbumOptions {
    pub thumbnail: ThumbnailOptions,
    pub decorations: DecorationTable,
}

impl Default for AlbumOptions {
    fn default() -> Self {
        Self {
            thumbnail: ThumbnailOptions::default(),
            decorations: DecorationTable::with_defaults("decorations"),
        }
    }
}

pub struct Album<S: PhotoStore> {
    store: S,
    catalog: Catalog,
    pages: Vec<Page>,
    viewport: Viewport,
    options: AlbumOptions,
}

impl<S: PhotoStore> Album<S> {
    /// ストアからカタログを再構築してアルバムを開く
    pub async fn open(store: S, options: AlbumOptions) -> Result<Self> {
        let records = store.load_all().await?;
        let catalog = Catalog::from_records(records);
        info!(photos = catalog.len(), "album loaded");

        let mut album = Self {
            store,
            catalog,
            pages: Vec::new(),
            viewport: Viewport::default(),
            options,
        };
        album.rebuild();
        Ok(album)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn decorations(&self) -> &DecorationTable {
        &self.options.decorations
    }

    /// 操作を1つ適用
    pub async fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Upload(items) => self.upload(items).await.map(Outcome::Uploaded),
            Command::Delete(id) => self.delete(id).await.map(|changed| Outcome::Deleted { changed }),
            Command::EditDate(id, date) => self
                .edit_date(id, date)
                .await
                .map(|changed| Outcome::DateEdited { changed }),
            Command::Next => Ok(Outcome::Navigated {
                changed: self.viewport.advance(),
            }),
            Command::Previous => Ok(Outcome::Navigated {
                changed: self.viewport.retreat(),
            }),
        }
    }

    pub async fn upload(&mut self, items: Vec<UploadItem>) -> Result<UploadReport> {
        self.upload_with_progress(items, |_, _, _| {}).await
    }

    /// 1ファイルずつ順番に取り込む
    ///
    /// `on_progress(完了数, 総数, ファイル名)` はファイルごとに呼ばれる。
    /// 入力エラーは何も変更せずに返す。保存失敗はカタログを変更したまま
    /// `UploadNotPersisted`（取り込み結果つき）で返す。
    pub async fn upload_with_progress<F>(
        &mut self,
        items: Vec<UploadItem>,
        mut on_progress: F,
    ) -> Result<UploadReport>
    where
        F: FnMut(usize, usize, &str),
    {
        let batch = validate_batch(items)?;
        let total = batch.len();
        let id_seed = Utc::now().timestamp_millis();
        let mut report = UploadReport::default();

        for (index, (item, date)) in batch.into_iter().enumerate() {
            debug!(file = %item.filename, index, total, "processing upload");

            let seed = id_seed.saturating_add(index as i64 * ID_STRIDE);
            let upserted = encode_item(&item, date, self.options.thumbnail)
                .await
                .and_then(|draft| Ok(self.catalog.upsert(draft, seed)?));

            match upserted {
                Ok(Upserted::Inserted(_)) => report.added += 1,
                Ok(Upserted::Replaced(_)) => report.replaced += 1,
                Err(e) => {
                    warn!(file = %item.filename, error = %e, "skipping file");
                    report.skipped.push(item.filename.clone());
                }
            }

            on_progress(index + 1, total, &item.filename);
        }

        info!(
            added = report.added,
            replaced = report.replaced,
            skipped = report.skipped.len(),
            "upload batch finished"
        );
        match self.commit().await {
            Ok(()) => Ok(report),
            Err(AlbumError::Persistence(reason)) => {
                Err(AlbumError::UploadNotPersisted { report, reason })
            }
            Err(e) => Err(e),
        }
    }

    /// 削除。存在しないIDは何もしない
    pub async fn delete(&mut self, id: PhotoId) -> Result<bool> {
        if !self.catalog.remove(id) {
            debug!(id, "delete ignored: photo not found");
            return Ok(false);
        }
        self.commit().await?;
        Ok(true)
    }

    /// 日付変更。存在しないIDは何もしない
    pub async fn edit_date(&mut self, id: PhotoId, date: NaiveDate) -> Result<bool> {
        if !self.catalog.update_date(id, date) {
            debug!(id, "date edit ignored: photo not found");
            return Ok(false);
        }
        self.commit().await?;
        Ok(true)
    }

    /// 現在のカタログで保存を再試行（再アップロード不要）
    pub async fn retry_persist(&self) -> Result<()> {
        self.store.replace_all(self.catalog.photos()).await
    }

    /// 保存失敗 `failure` から、成功するか `confirm` が false を返すまで再試行
    ///
    /// 保存失敗以外のエラーは確認せずにそのまま返す。
    pub async fn persist_with_retry<F>(&self, failure: AlbumError, mut confirm: F) -> Result<()>
    where
        F: FnMut(&AlbumError) -> bool,
    {
        let mut last = failure;
        while last.is_persistence() && confirm(&last) {
            match self.retry_persist().await {
                Ok(()) => {
                    info!("album persisted after retry");
                    return Ok(());
                }
                Err(e) => last = e,
            }
        }
        Err(last)
    }

    /// 表示中の見開き
    pub fn frame(&self) -> Frame {
        let (left, right) = self.viewport.visible();
        Frame {
            left: self.page_view(left, Side::Left),
            right: self.page_view(right, Side::Right),
            bounds: self.viewport.bounds(),
        }
    }

    /// 写真の拡大表示
    pub fn preview(&self, id: PhotoId) -> Option<Preview> {
        self.catalog.get(id).map(|photo| Preview {
            source: photo.preview_image().as_str().to_string(),
            title: photo.filename().to_string(),
            subtitle: photo.display_date(),
        })
    }

    /// 見開きの左右どちらかの装飾を拡大表示
    pub fn decoration_preview(&self, side: Side) -> Option<Preview> {
        let (left, right) = self.viewport.visible();
        let index = match side {
            Side::Left => left,
            Side::Right => right,
        };
        let page = self.pages.get(index)?;
        self.options.decorations.resolve(page.year).map(|decoration| Preview {
            source: decoration.asset.to_string(),
            title: decoration.caption(),
            subtitle: "Illustration".to_string(),
        })
    }

    /// 並べ替え → 保存 → ページ再構築
    ///
    /// 保存に失敗してもページは再構築する（メモリ上の状態が正）。
    async fn commit(&mut self) -> Result<()> {
        self.catalog.reorder();
        let persisted = self.store.replace_all(self.catalog.photos()).await;
        if let Err(e) = &persisted {
            warn!(error = %e, "failed to persist album");
        }
        self.rebuild();
        persisted
    }

    fn rebuild(&mut self) {
        self.pages = paginate(self.catalog.photos());
        self.viewport.reset(self.pages.len());
    }

    fn page_view(&self, index: usize, side: Side) -> Option<PageView> {
        let page = self.pages.get(index)?;
        let slots = page.slots().map(|slot| slot.map(SlotView::from));
        Some(PageView {
            index,
            side,
            year: page.year,
            slots,
            decoration: self.options.decorations.resolve(page.year),
        })
    }
}

/// 空のバッチや日付未指定のファイルを、変更前に弾く
fn validate_batch(items: Vec<UploadItem>) -> Result<Vec<(UploadItem, NaiveDate)>> {
    if items.is_empty() {
        return Err(AlbumError::UserInput("写真を選択してください".into()));
    }

    items
        .into_iter()
        .map(|item| match item.date {
            Some(date) => Ok((item, date)),
            None => Err(AlbumError::UserInput(format!(
                "日付が指定されていません: {}",
                item.filename
            ))),
        })
        .collect()
}

/// オリジナルとサムネイルを並行に生成
async fn encode_item(
    item: &UploadItem,
    date: NaiveDate,
    thumbnail: ThumbnailOptions,
) -> Result<PhotoDraft> {
    let path: &Path = &item.path;
    let (original, thumbnail) = tokio::join!(
        codec::encode_original(path),
        codec::encode_thumbnail(path, thumbnail)
    );

    Ok(PhotoDraft {
        filename: item.filename.clone(),
        date,
        thumbnail: thumbnail?,
        original: original?,
    })
}
