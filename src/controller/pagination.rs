//! Pagination window and result-range helpers.
//!
//! Two window policies are supported:
//!
//! - [`PageWindow::Sliding`]: always three page buttons, no ellipsis. Pages
//!   1 and 2 show `[1, 2, 3]`; later pages show `[p-1, p, p+1]`, even past
//!   the last real page.
//! - [`PageWindow::Compressed`]: the full range when it has at most seven
//!   pages; otherwise the first and last page, a window around the current
//!   page, and an ellipsis for each gap.

use serde::{Deserialize, Serialize, Serializer};

/// Ranges at or below this many pages are never compressed.
const COMPRESS_THRESHOLD: u32 = 7;

/// Which pagination window policy a renderer shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageWindow {
    #[default]
    Sliding,
    Compressed,
}

/// One entry in a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Ellipsis,
}

/// Serialized as the page number, or the string `"..."`.
impl Serialize for PageSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u32(*n),
            Self::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Visible page slots for `current` under `window`.
///
/// `total_pages` is ignored by the sliding policy.
pub fn visible_pages(window: PageWindow, current: u32, total_pages: u32) -> Vec<PageSlot> {
    match window {
        PageWindow::Sliding => sliding_window(current)
            .into_iter()
            .map(PageSlot::Page)
            .collect(),
        PageWindow::Compressed => compressed_window(current, total_pages),
    }
}

/// Fixed three-wide window.
///
/// The middle entry is clamped to `2..=u32::MAX - 1`, so the first pages pin
/// to `[1, 2, 3]` and the window never runs past `u32::MAX`.
pub fn sliding_window(current: u32) -> [u32; 3] {
    let mid = current.clamp(2, u32::MAX - 1);
    [mid - 1, mid, mid + 1]
}

/// Ellipsis-compressed full range.
///
/// The window around `current` is `current ± 1`, widened at either end so
/// the first and last page always show two neighbours.
pub fn compressed_window(current: u32, total_pages: u32) -> Vec<PageSlot> {
    let total = total_pages.max(1);
    let current = current.max(1);

    if total <= COMPRESS_THRESHOLD {
        return (1..=total).map(PageSlot::Page).collect();
    }

    let start = (current - 1).min(total - 2).max(2);
    let end = current.saturating_add(1).max(3).min(total - 1);

    let mut slots = Vec::with_capacity(7);
    slots.push(PageSlot::Page(1));
    if start > 2 {
        slots.push(PageSlot::Ellipsis);
    }
    slots.extend((start..=end).map(PageSlot::Page));
    if end < total - 1 {
        slots.push(PageSlot::Ellipsis);
    }
    slots.push(PageSlot::Page(total));
    slots
}

/// Number of pages needed for `total_results`, never less than 1.
pub fn total_pages(total_results: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total_results.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// 1-based, inclusive range of results shown on a page, for
/// "showing X–Y of Z" text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultRange {
    pub start: u64,
    pub end: u64,
}

/// Compute the range shown on `page`.
///
/// With a known total the end is capped by it. With an unknown total the
/// end counts the results actually on the page.
pub fn result_range(page: u32, per_page: u32, total: Option<u64>, shown: usize) -> ResultRange {
    let page = u64::from(page.max(1));
    let per_page = u64::from(per_page);
    let offset = (page - 1) * per_page;
    let end = match total {
        Some(total) => (page * per_page).min(total),
        None => offset + shown as u64,
    };
    ResultRange {
        start: offset + 1,
        end,
    }
}
