pub mod cv;
pub mod job;

use serde::Deserialize;

use crate::errors::AppError;

pub const MAX_PAGE_SIZE: i64 = 100;

/// `?skip=&limit=` for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    /// Returns `(skip, limit)`, defaulting to the first full page.
    pub fn resolve(&self) -> Result<(i64, i64), AppError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(MAX_PAGE_SIZE);
        if skip < 0 {
            return Err(AppError::Validation("skip cannot be negative".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}, got {limit}"
            )));
        }
        Ok((skip, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(Pagination::default().resolve().unwrap(), (0, 100));
    }

    #[test]
    fn test_pagination_rejects_out_of_range() {
        let negative = Pagination { skip: Some(-1), limit: None };
        assert!(negative.resolve().is_err());
        let too_big = Pagination { skip: None, limit: Some(101) };
        assert!(too_big.resolve().is_err());
        let zero = Pagination { skip: None, limit: Some(0) };
        assert!(zero.resolve().is_err());
    }
}
