//! Pagination metadata for list responses
//!
//! The metadata travels in the `X-Pagination` response header as a JSON
//! object; the response body stays a plain array.

use serde::Serialize;

/// Name of the response header carrying [`PaginationHeader`]
pub const PAGINATION_HEADER: &str = "x-pagination";

/// A validated 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Creates a page request; `None` if either value is zero
    pub fn new(page: u32, page_size: u32) -> Option<Self> {
        (page >= 1 && page_size >= 1).then_some(Self { page, page_size })
    }

    /// Number of items before this page
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }

    /// Returns the items of this page
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.page_size as usize)
            .collect()
    }
}

/// `ceil(total_count / page_size)`
pub fn total_pages(total_count: usize, page_size: u32) -> usize {
    total_count.div_ceil(page_size.max(1) as usize)
}

/// Query parameters reproduced in page links
#[derive(Debug, Clone, Serialize)]
pub struct LinkParams<'a> {
    pub sort: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'a str>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

#[derive(Serialize)]
struct LinkQuery<'a> {
    #[serde(flatten)]
    params: &'a LinkParams<'a>,
    page: u32,
    #[serde(rename = "pageSize")]
    page_size: u32,
}

/// The `X-Pagination` header value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationHeader {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: usize,
    pub total_pages: usize,
    /// Empty on the first page
    pub previous_page_link: String,
    /// Empty on the last page and beyond
    pub next_page_link: String,
}

impl PaginationHeader {
    /// Builds the header for `request` over `total_count` matches
    ///
    /// `list_url` is the absolute URL of the list route without a query.
    pub fn new(
        request: PageRequest,
        total_count: usize,
        list_url: &str,
        params: &LinkParams<'_>,
    ) -> Result<Self, serde_urlencoded::ser::Error> {
        let total_pages = total_pages(total_count, request.page_size);

        let link = |page: u32| -> Result<String, serde_urlencoded::ser::Error> {
            let query = serde_urlencoded::to_string(LinkQuery {
                params,
                page,
                page_size: request.page_size,
            })?;
            Ok(format!("{}?{}", list_url, query))
        };

        let previous_page_link = if request.page > 1 {
            link(request.page - 1)?
        } else {
            String::new()
        };

        let next_page_link = if (request.page as usize) < total_pages {
            link(request.page + 1)?
        } else {
            String::new()
        };

        Ok(Self {
            current_page: request.page,
            page_size: request.page_size,
            total_count,
            total_pages,
            previous_page_link,
            next_page_link,
        })
    }
}
