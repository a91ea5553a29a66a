//! Page slicing for resolved listings.
//!
//! Pagination always runs after visibility filtering and annotation;
//! slicing first would silently under-fill pages.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Reject zero page numbers and zero page sizes.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.page < 1 {
            return Err(DomainError::Validation(
                "page numbers start at 1".to_string(),
            ));
        }
        if self.page_size < 1 {
            return Err(DomainError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of an ordered result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
}

impl<T> Page<T> {
    /// Slice an already ordered, fully filtered collection.
    ///
    /// Pages past the end come back empty, never as an error.
    pub fn slice(all: Vec<T>, request: &PageRequest) -> Self {
        let total = all.len() as u64;
        let start = request
            .page
            .saturating_sub(1)
            .saturating_mul(request.page_size);

        let items = if start >= total {
            Vec::new()
        } else {
            all.into_iter()
                .skip(start as usize)
                .take(request.page_size as usize)
                .collect()
        };

        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total,
        }
    }

    /// Whether later pages hold more items.
    pub fn has_more(&self) -> bool {
        self.page.saturating_mul(self.page_size) < self.total
    }
}
