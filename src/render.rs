//! 見開きのテキスト描画（ターミナル出力用）

use crate::album::{Frame, PageView, Side};
use std::fmt::Write;

const EMPTY_SLOT: &str = "(空き)";

pub fn render_frame(frame: &Frame) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", frame.bounds.label());

    for page in [&frame.left, &frame.right].into_iter().flatten() {
        render_page(&mut out, page);
    }

    let mut nav = Vec::new();
    if frame.bounds.can_retreat {
        nav.push("◀ 前へ");
    }
    if frame.bounds.can_advance {
        nav.push("次へ ▶");
    }
    if !nav.is_empty() {
        let _ = writeln!(out, "{}", nav.join("  "));
    }
    out
}

fn render_page(out: &mut String, page: &PageView) {
    let side = match page.side {
        Side::Left => "左",
        Side::Right => "右",
    };
    let heading = match page.year {
        Some(year) => year.to_string(),
        None => "-".to_string(),
    };
    let _ = writeln!(out, "[{}] p.{} {}", side, page.index + 1, heading);

    if let Some(decoration) = &page.decoration {
        let _ = writeln!(out, "    装飾: {}", decoration.asset);
    }

    for slot in &page.slots {
        match slot {
            Some(photo) => {
                let _ = writeln!(
                    out,
                    "    #{} {} ({})",
                    photo.id, photo.filename, photo.display_date
                );
            }
            None => {
                let _ = writeln!(out, "    {}", EMPTY_SLOT);
            }
        }
    }
}
