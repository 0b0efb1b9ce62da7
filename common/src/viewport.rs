//! 見開きビューポート
//!
//! 表示中の左右ページ（`current` と `current + 1`）を管理する。
//! `current` は常に偶数で、`0 <= current <= page_count - 2`（ページなしなら0）。

/// ナビゲーション可否とページ番号表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub can_advance: bool,
    pub can_retreat: bool,
    /// 1始まりの見開き番号
    pub display_page: usize,
    /// 見開き総数（最低1）
    pub display_total: usize,
}

impl Bounds {
    /// "Page 1 of 3" 形式
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.display_page, self.display_total)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    current: usize,
    page_count: usize,
}

impl Viewport {
    pub fn new(page_count: usize) -> Self {
        Self { current: 0, page_count }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// ページ再構築時に呼ぶ。先頭の見開きへ戻す
    pub fn reset(&mut self, page_count: usize) {
        self.page_count = page_count;
        self.current = 0;
    }

    /// 次の見開きへ。末尾なら何もしない
    pub fn advance(&mut self) -> bool {
        if self.can_advance() {
            self.current += 2;
            true
        } else {
            false
        }
    }

    /// 前の見開きへ。先頭なら何もしない
    pub fn retreat(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 2;
            true
        } else {
            false
        }
    }

    /// 表示中の左右ページのインデックス
    pub fn visible(&self) -> (usize, usize) {
        (self.current, self.current + 1)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            can_advance: self.can_advance(),
            can_retreat: self.current > 0,
            display_page: self.current / 2 + 1,
            display_total: self.page_count.div_ceil(2).max(1),
        }
    }

    fn can_advance(&self) -> bool {
        self.current + 2 < self.page_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_at_start() {
        let viewport = Viewport::new(6);
        let bounds = viewport.bounds();
        assert!(bounds.can_advance);
        assert!(!bounds.can_retreat);
        assert_eq!(bounds.label(), "Page 1 of 3");
    }

    #[test]
    fn test_advance_stops_at_last_spread() {
        let mut viewport = Viewport::new(4);
        assert!(viewport.advance());
        assert_eq!(viewport.current_index(), 2);
        assert!(!viewport.advance());
        assert_eq!(viewport.current_index(), 2);
        assert_eq!(viewport.visible(), (2, 3));
        assert_eq!(viewport.bounds().label(), "Page 2 of 2");
    }

    #[test]
    fn test_retreat_at_zero_is_noop() {
        let mut viewport = Viewport::new(4);
        assert!(!viewport.retreat());
        assert_eq!(viewport.current_index(), 0);
    }

    #[test]
    fn test_advance_then_retreat_round_trip() {
        for page_count in (0..12).step_by(2) {
            let mut viewport = Viewport::new(page_count);
            loop {
                let before = viewport.current_index();
                if viewport.advance() {
                    viewport.retreat();
                    assert_eq!(viewport.current_index(), before);
                    viewport.advance();
                } else {
                    break;
                }
            }
            assert_eq!(viewport.current_index(), page_count.saturating_sub(2));
        }
    }

    #[test]
    fn test_zero_pages_displays_one() {
        let mut viewport = Viewport::new(0);
        let bounds = viewport.bounds();
        assert!(!bounds.can_advance);
        assert!(!bounds.can_retreat);
        assert_eq!(bounds.display_total, 1);
        assert!(!viewport.advance());
    }

    #[test]
    fn test_reset_returns_to_first_spread() {
        let mut viewport = Viewport::new(8);
        viewport.advance();
        viewport.advance();
        viewport.reset(2);
        assert_eq!(viewport.current_index(), 0);
        assert_eq!(viewport.page_count(), 2);
        assert!(!viewport.bounds().can_advance);
    }
}
