//! List queries: free-text search, facet filters, and pagination.
//!
//! Every list screen runs the same query against a snapshot of its
//! collection. A [`ListQueryEngine`] is configured with the collection's
//! search fields; [`QueryParams`] carries the caller-held search text,
//! facet selections, and page position. Evaluation is pure: the filtered
//! sequence keeps the collection's order, then gets paginated.

mod facet;
mod matcher;
mod paginate;

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use facet::{ANY, Facet, Facets};
pub use matcher::FieldMatcher;
pub use paginate::{Page, paginate};

/// A record whose string attributes can be addressed by name.
pub trait Record {
    /// The attribute's string value, or `None` if the record has no such attribute.
    fn field(&self, name: &str) -> Option<&str>;
}

/// A record type with a list screen: which fields search covers and which
/// attributes can be faceted.
pub trait Listing: Record {
    const SEARCH_FIELDS: &'static [&'static str];
    const FACET_FIELDS: &'static [&'static str];
}

/// Rows per page, from the fixed set list screens offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    #[default]
    Five,
    Ten,
    Fifteen,
    Twenty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("page size must be one of 5, 10, 15, 20 (got {0})")]
pub struct InvalidPageSize(pub usize);

impl PageSize {
    pub const ALL: [Self; 4] = [Self::Five, Self::Ten, Self::Fifteen, Self::Twenty];

    pub fn rows(self) -> usize {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::Fifteen => 15,
            Self::Twenty => 20,
        }
    }

    fn non_zero(self) -> NonZeroUsize {
        NonZeroUsize::new(self.rows()).unwrap_or(NonZeroUsize::MIN)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = InvalidPageSize;

    fn try_from(rows: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|size| size.rows() == rows)
            .ok_or(InvalidPageSize(rows))
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.rows()
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: usize = s
            .parse()
            .map_err(|_| format!("invalid page size '{s}'"))?;
        Self::try_from(rows).map_err(|e| e.to_string())
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows())
    }
}

/// Caller-held list state: what to search, how to filter, which page.
///
/// Changing the page size always returns to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub search_text: String,
    pub facets: Facets,
    page_size: PageSize,
    page_number: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            facets: Facets::new(),
            page_size: PageSize::default(),
            page_number: 1,
        }
    }
}

impl QueryParams {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Constrains facet `name` to `value`; [`ANY`] lifts the constraint.
    #[must_use]
    pub fn facet(mut self, name: impl Into<String>, value: &str) -> Self {
        self.facets.set(name, Facet::parse(value));
        self
    }

    #[must_use]
    pub fn page(mut self, page_number: usize) -> Self {
        self.page_number = page_number;
        self
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page_number = 1;
    }

    pub fn set_page(&mut self, page_number: usize) {
        self.page_number = page_number;
    }
}

/// The current page plus how many records matched overall.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub page: Page<T>,
    pub total_matches: usize,
    /// Size of the unfiltered collection the query ran over.
    pub collection_len: usize,
}

impl<T> QueryResult<T> {
    /// One-based `(first, last)` positions shown on this page, or `None` when
    /// nothing matched.
    pub fn showing(&self) -> Option<(usize, usize)> {
        if self.page.items.is_empty() {
            return None;
        }
        Some((
            self.page.start_index + 1,
            self.page.start_index + self.page.items.len(),
        ))
    }
}

impl<T: Clone> QueryResult<&T> {
    pub fn cloned(self) -> QueryResult<T> {
        QueryResult {
            page: self.page.map(Clone::clone),
            total_matches: self.total_matches,
            collection_len: self.collection_len,
        }
    }
}

/// Runs list queries for one collection shape.
#[derive(Debug, Clone, Copy)]
pub struct ListQueryEngine {
    search_fields: &'static [&'static str],
}

impl ListQueryEngine {
    pub const fn new(search_fields: &'static [&'static str]) -> Self {
        Self { search_fields }
    }

    pub const fn for_listing<R: Listing>() -> Self {
        Self::new(R::SEARCH_FIELDS)
    }

    /// Filters `collection` by search text and facets, preserving order, then
    /// returns the requested page.
    pub fn query<'a, R: Record>(
        &self,
        collection: &'a [R],
        params: &QueryParams,
    ) -> QueryResult<&'a R> {
        let matcher = FieldMatcher::new(&params.search_text, self.search_fields);
        let filtered: Vec<&R> = collection
            .iter()
            .filter(|r| matcher.matches(*r) && facet::matches(*r, &params.facets))
            .collect();

        tracing::debug!(
            total = collection.len(),
            matched = filtered.len(),
            "evaluated list query"
        );

        QueryResult {
            total_matches: filtered.len(),
            collection_len: collection.len(),
            page: paginate(&filtered, params.page_size.non_zero(), params.page_number),
        }
    }
}

/// Distinct values of a facet attribute in first-seen order.
pub fn facet_options<R: Record>(collection: &[R], name: &str) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for value in collection.iter().filter_map(|r| r.field(name)) {
        if !options.iter().any(|o| o == value) {
            options.push(value.to_string());
        }
    }
    options
}
