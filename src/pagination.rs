//! This modules defines the common functionality for paging records.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of records per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_pages: 5,
        }
    }
}

/// A validated, one-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The page number, starting at 1.
    pub page: u64,
    /// The maximum number of records on a page, at least 1.
    pub limit: u64,
}

impl PageRequest {
    /// Parse the raw `page` and `limit` query parameters.
    ///
    /// Missing or empty parameters fall back to the defaults in `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidPagination] if either parameter is not a positive integer.
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            page: parse_positive("page", page, config.default_page)?,
            limit: parse_positive("limit", limit, config.default_page_size)?,
        })
    }

    /// The number of records to skip before this page.
    pub fn offset(self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// The number of pages needed to show `total` records, at least one.
    pub fn page_count(self, total: u64) -> u64 {
        total.div_ceil(self.limit).max(1)
    }
}

fn parse_positive(name: &str, value: Option<&str>, default: u64) -> Result<u64, Error> {
    let value = match value.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(value) => value,
    };

    match value.parse::<u64>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(Error::InvalidPagination(format!(
            "{name} must be a positive integer, got \"{value}\""
        ))),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// Build the controls for navigating between pages.
///
/// At most `max_pages` consecutive page numbers are shown around `curr_page`.
/// The first and last pages are always reachable, with an ellipsis standing in
/// for any pages that are skipped.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let half = max_pages / 2;
    let (first, last) = if page_count <= max_pages {
        (1, page_count)
    } else if curr_page <= half {
        (1, max_pages)
    } else if curr_page > page_count - half {
        (page_count - max_pages + 1, page_count)
    } else {
        (curr_page - half, curr_page + half)
    };

    let mut indicators = Vec::new();

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(curr_page - 1));
    }

    if first > 1 {
        indicators.push(PaginationIndicator::Page(1));
        indicators.push(PaginationIndicator::Ellipsis);
    }

    indicators.extend((first..=last).map(|page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    }));

    if last < page_count {
        indicators.push(PaginationIndicator::Ellipsis);
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
