//! Response envelopes and query parameters shared by every feature area

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// `{"data": ...}` envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Returned by every create endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: Uuid,
}

/// Pagination parameters
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PaginationParams {
    /// Page number, at least 1
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }

    /// Rows to skip for the requested page
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }
}

/// One page of results
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        let page_size = params.page_size();

        Self {
            data,
            page: params.page(),
            page_size,
            total,
            total_pages: (total + page_size - 1) / page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_clamps_input() {
        let params = PaginationParams {
            page: Some(0),
            page_size: Some(1_000),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 100);

        let params = PaginationParams {
            page: Some(3),
            page_size: Some(-5),
        };
        assert_eq!(params.page_size(), 10);
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let params = PaginationParams {
            page: Some(1),
            page_size: Some(10),
        };

        assert_eq!(PaginatedResponse::<u8>::new(vec![], &params, 0).total_pages, 0);
        assert_eq!(PaginatedResponse::<u8>::new(vec![], &params, 10).total_pages, 1);
        assert_eq!(PaginatedResponse::<u8>::new(vec![], &params, 11).total_pages, 2);
    }
}
