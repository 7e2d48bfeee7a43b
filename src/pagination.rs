//! Planning of the paged requests needed to read an address's transaction
//! history past the service's per-request cap.

/// Hard cap on transactions the service returns in one address request
pub const MAX_PAGE_SIZE: u64 = 50;

/// One bounded request covering `limit` transactions starting at `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

/// The pages that follow the first full page when collecting `target`
/// transactions. Offsets are strictly ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePlan {
    pages: Vec<Page>,
}

impl PagePlan {
    /// Plans full pages at offsets `50, 100, ...` and a final partial page
    /// for any remainder. The first page (offset 0) is always fetched
    /// separately and is not part of the plan.
    pub fn new(target: u64) -> PagePlan {
        let mut pages = vec![];
        let mut offset = MAX_PAGE_SIZE;
        while offset + MAX_PAGE_SIZE <= target {
            pages.push(Page {
                offset,
                limit: MAX_PAGE_SIZE,
            });
            offset += MAX_PAGE_SIZE;
        }
        if offset < target {
            pages.push(Page {
                offset,
                limit: target - offset,
            });
        }
        PagePlan { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of requests including the first page
    pub fn request_count(&self) -> usize {
        self.pages.len() + 1
    }
}
