//! Photo Album Common Library
//!
//! CLI・ライブラリ双方で共有される型とページ割りロジック（IOなし）

pub mod types;
pub mod catalog;
pub mod pagination;
pub mod viewport;
pub mod decoration;
pub mod error;

pub use types::{EncodedImage, Photo, PhotoDraft, PhotoId, format_display_date, parse_date};
pub use catalog::{Catalog, Upserted};
pub use pagination::{paginate, Page, PAGE_CAPACITY};
pub use viewport::{Bounds, Viewport};
pub use decoration::{Decoration, DecorationTable};
pub use error::{Error, Result};
