/// Paginated gallery over the active media list
use super::data::FileNode;

/// Page size used when no setting overrides it
pub const DEFAULT_ITEMS_PER_PAGE: usize = 9;

#[derive(Debug, Clone)]
pub struct Gallery {
    media: Vec<FileNode>,
    /// 1-based
    current_page: usize,
    items_per_page: usize,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl Gallery {
    /// Create an empty gallery. A zero page size falls back to the default.
    pub fn new(items_per_page: usize) -> Self {
        Self {
            media: Vec::new(),
            current_page: 1,
            items_per_page: if items_per_page == 0 {
                DEFAULT_ITEMS_PER_PAGE
            } else {
                items_per_page
            },
        }
    }

    /// Replace the active media list and go back to page 1
    pub fn set_media(&mut self, media: Vec<FileNode>) {
        self.media = media;
        self.current_page = 1;
        self.clamp();
    }

    pub fn media(&self) -> &[FileNode] {
        &self.media
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// `ceil(len / items_per_page)`, never less than 1
    pub fn total_pages(&self) -> usize {
        self.media.len().div_ceil(self.items_per_page).max(1)
    }

    fn clamp(&mut self) {
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    /// Items on the current page
    pub fn visible(&self) -> &[FileNode] {
        let start = (self.current_page - 1) * self.items_per_page;
        let end = (start + self.items_per_page).min(self.media.len());
        if start >= end {
            return &[];
        }
        &self.media[start..end]
    }

    /// Change the page size. Zero is rejected; any other value resets to page 1.
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> bool {
        if items_per_page == 0 {
            return false;
        }
        self.items_per_page = items_per_page;
        self.current_page = 1;
        self.clamp();
        true
    }

    pub fn first_page(&mut self) {
        self.current_page = 1;
    }

    pub fn previous_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
    }

    pub fn last_page(&mut self) {
        self.current_page = self.total_pages();
    }

    /// Square-ish grid: `floor(sqrt(items_per_page))` columns
    pub fn grid_columns(&self) -> usize {
        ((self.items_per_page as f64).sqrt().floor() as usize).max(1)
    }

    pub fn grid_rows(&self) -> usize {
        self.items_per_page.div_ceil(self.grid_columns())
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {} pages", self.current_page, self.total_pages())
    }
}
