//! Page-number button window for listing navigation.

pub const DEFAULT_MAX_BUTTONS: u32 = 5;

/// Page indices (0-based) to render as buttons.
///
/// With `total_pages <= max_buttons` every page is listed. Otherwise each
/// slot `i` holds `clamp(current_page - max_buttons / 2 + i, 0, total_pages - 1)`.
/// Slots are clamped one by one rather than shifting the window, so the edges
/// repeat the first or last page.
pub fn pagination_window(current_page: u32, total_pages: u32, max_buttons: u32) -> Vec<u32> {
    if total_pages <= max_buttons {
        return (0..total_pages).collect();
    }

    let start = i64::from(current_page) - i64::from(max_buttons / 2);
    let last = i64::from(total_pages) - 1;
    (0..i64::from(max_buttons))
        .map(|i| (start + i).clamp(0, last) as u32)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationControls {
    pub pages: Vec<u32>,
    pub current: u32,
    pub total_pages: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PaginationControls {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self::with_max_buttons(current_page, total_pages, DEFAULT_MAX_BUTTONS)
    }

    pub fn with_max_buttons(current_page: u32, total_pages: u32, max_buttons: u32) -> Self {
        Self {
            pages: pagination_window(current_page, total_pages, max_buttons),
            current: current_page,
            total_pages,
            prev_enabled: current_page != 0,
            next_enabled: current_page.saturating_add(1) < total_pages,
        }
    }

    /// Controls are only rendered when there is more than one page.
    pub fn visible(&self) -> bool {
        self.total_pages > 1
    }

    pub fn prev(&self) -> Option<u32> {
        self.prev_enabled.then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.next_enabled.then(|| self.current + 1)
    }
}
