use serde::{Deserialize, Serialize};

/// One page of list results.
///
/// `total` counts every match before pagination; `items.len()` is the size
/// of the returned page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub offset: usize,
    pub total: usize,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, offset: usize, total: usize) -> Self {
        Self {
            items,
            offset,
            total,
        }
    }

    /// Number of items on this page.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether matches exist beyond this page.
    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }

    /// Offset of the page following this one.
    pub fn next_offset(&self) -> usize {
        self.offset + self.items.len()
    }

    /// Offset of the page preceding this one, for pages of `page_size`.
    pub fn previous_offset(&self, page_size: usize) -> usize {
        self.offset.saturating_sub(page_size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResponse<U> {
        ListResponse {
            items: self.items.into_iter().map(f).collect(),
            offset: self.offset,
            total: self.total,
        }
    }
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self::new(Vec::new(), 0, 0)
    }
}
