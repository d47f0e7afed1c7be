//! Page windows over ordered result collections.
//!
//! A [`PageRequest`] is validated once from raw request parameters. Windows
//! are taken from a [`PageSource`], which may be a materialized vector or a
//! lazily expanded traversal. `next` is always computed by probing the source
//! for the following window, never from the total count, because lazy sources
//! cannot report one cheaply.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::{PaginationConfig, DEFAULT_PAGE};
use crate::error::QueryError;

/// A validated `(page, size)` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        let limits = PaginationConfig::default();
        Self {
            page: DEFAULT_PAGE,
            size: limits.default_page_size,
        }
    }
}

impl PageRequest {
    /// Validate raw `page`/`size` parameters, applying defaults when absent.
    pub fn from_params(
        page: Option<&str>,
        size: Option<&str>,
        limits: &PaginationConfig,
    ) -> Result<Self, QueryError> {
        let page_raw = page.map(str::trim).unwrap_or("");
        let size_raw = size.map(str::trim).unwrap_or("");

        let page_value = if page_raw.is_empty() {
            Ok(DEFAULT_PAGE as i64)
        } else {
            page_raw.parse::<i64>()
        };
        let size_value = if size_raw.is_empty() {
            Ok(limits.default_page_size as i64)
        } else {
            size_raw.parse::<i64>()
        };

        let (page, size) = match (page_value, size_value) {
            (Ok(page), Ok(size)) => (page, size),
            _ => {
                return Err(QueryError::bad_request(format!(
                    "Page number and page size must be integers. page no. is {} and page size is {}.",
                    page.unwrap_or_default(),
                    size.unwrap_or_default()
                )))
            }
        };

        Self::new(page, size, limits)
    }

    /// Validate numeric `page`/`size` values.
    pub fn new(page: i64, size: i64, limits: &PaginationConfig) -> Result<Self, QueryError> {
        if page < 1 || size < 1 {
            return Err(QueryError::bad_request(format!(
                "Page number and page size must be positive integers. page no. is {} and page size is {}.",
                page, size
            )));
        }
        if size as u64 > limits.max_page_size as u64 {
            return Err(QueryError::bad_request(format!(
                "Limit page size is {}. Page size in request is {}.",
                limits.max_page_size, size
            )));
        }
        Ok(Self {
            page: page as usize,
            size: size as usize,
        })
    }

    /// Index of the first item of this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.size)
    }

    /// Index of the first item of the following page.
    pub fn next_offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// One window of a result collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    /// Size of the underlying collection (see the individual operations).
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<usize>,
}

impl<T> Page<T> {
    /// Window a materialized slice.
    pub fn from_slice(items: &[T], request: PageRequest, count: usize) -> Self
    where
        T: Clone,
    {
        let window = slice_window(items, request.offset(), request.size);
        let has_next = !slice_window(items, request.next_offset(), 1).is_empty();
        Self {
            items: window,
            page: request.page,
            size: request.size,
            count,
            next: has_next.then_some(request.page + 1),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            count: self.count,
            next: self.next,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn slice_window<T: Clone>(items: &[T], offset: usize, limit: usize) -> Vec<T> {
    items.iter().skip(offset).take(limit).cloned().collect()
}

/// A collection that can hand out windows, possibly computing them lazily.
#[async_trait]
pub trait PageSource: Send {
    type Item: Send;

    /// Items `offset..offset + limit`, fewer when the collection ends earlier.
    async fn window(&mut self, offset: usize, limit: usize)
        -> Result<Vec<Self::Item>, QueryError>;
}

/// A fully materialized source.
pub struct VecSource<T>(pub Vec<T>);

#[async_trait]
impl<T: Clone + Send + Sync> PageSource for VecSource<T> {
    type Item = T;

    async fn window(&mut self, offset: usize, limit: usize) -> Result<Vec<T>, QueryError> {
        Ok(slice_window(&self.0, offset, limit))
    }
}

/// Take the requested window from `source` and probe for a following one.
pub async fn paginate<S: PageSource>(
    source: &mut S,
    request: PageRequest,
    count: usize,
) -> Result<Page<S::Item>, QueryError> {
    let items = source.window(request.offset(), request.size).await?;
    let has_next = !source.window(request.next_offset(), 1).await?.is_empty();

    Ok(Page {
        items,
        page: request.page,
        size: request.size,
        count,
        next: has_next.then_some(request.page + 1),
    })
}
