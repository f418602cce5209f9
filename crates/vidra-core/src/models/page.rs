use serde::{Deserialize, Serialize};

/// One page of a listing, with the total match count for the whole query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: u32, per_page: u32) -> Self {
        Page {
            items,
            total,
            page,
            per_page,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
