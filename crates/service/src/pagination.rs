//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub limit: u32,
}

impl Pagination {
    /// Clamp to sane values: page 0 becomes 1, limit is bounded to 1..=100
    pub fn normalized(self) -> Self {
        Self {
            page: if self.page == 0 { 1 } else { self.page },
            limit: self.limit.clamp(1, 100),
        }
    }

    /// Offset/limit pair for the query: skip `(page-1)*limit`, take `limit`
    pub fn to_offset_limit(self) -> (u64, u64) {
        let n = self.normalized();
        (((n.page - 1) as u64) * (n.limit as u64), n.limit as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, limit: 20 } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn normalized_clamps_zero_to_defaults() {
        let n = Pagination { page: 0, limit: 0 }.normalized();
        assert_eq!(n.page, 1);
        assert_eq!(n.limit, 1);
    }

    #[test]
    fn normalized_clamps_upper_bound() {
        let n = Pagination { page: 5, limit: 1000 }.normalized();
        assert_eq!(n.page, 5);
        assert_eq!(n.limit, 100);
    }

    #[test]
    fn offset_skips_prior_pages() {
        let (offset, limit) = Pagination { page: 3, limit: 10 }.to_offset_limit();
        assert_eq!(offset, 20);
        assert_eq!(limit, 10);

        let (offset, _) = Pagination { page: 1, limit: 25 }.to_offset_limit();
        assert_eq!(offset, 0);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.limit, 20);
    }
}
