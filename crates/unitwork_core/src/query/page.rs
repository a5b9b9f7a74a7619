//! Page requests and paginated results.

use rust_decimal::Decimal;

/// A request for one page of a filtered result set.
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// 1-based page index.
    pub page_index: usize,
    /// Maximum number of items per page.
    pub page_size: usize,
    /// Optional dotted order path (e.g. `contract.length`).
    pub order_by: Option<String>,
    /// Whether to order descending.
    pub descending: bool,
}

impl PageRequest {
    /// Creates a request, normalizing `page_index` and `page_size` to
    /// at least 1.
    #[must_use]
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index: page_index.max(1),
            page_size: page_size.max(1),
            order_by: None,
            descending: false,
        }
    }

    /// Sets the order clause.
    #[must_use]
    pub fn order_by(mut self, path: impl Into<String>, descending: bool) -> Self {
        self.order_by = Some(path.into());
        self.descending = descending;
        self
    }

    /// Returns the number of items to skip before this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page_index - 1) * self.page_size
    }
}

/// One page of a filtered result set.
///
/// `total_count` and `aggregate_sum` are computed over the filtered
/// but unpaged set; they do not change as the page window moves.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items of this page, at most `page_size` of them.
    pub items: Vec<T>,
    /// Count of the whole filtered set.
    pub total_count: usize,
    /// Sum of the aggregate field over the whole filtered set, when
    /// requested. Zero for an empty set.
    pub aggregate_sum: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_degenerate_values() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page_index, 1);
        assert_eq!(request.page_size, 1);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(4, 10).offset(), 30);
    }
}
