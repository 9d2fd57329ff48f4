//! Query descriptors for the repository layer.
//!
//! # Responsibility
//! - Describe member queries as data: typed filters, sort directives and
//!   pagination, decoupled from any finder method name.
//! - Provide the page envelope carrying slice content plus count metadata.
//!
//! # Invariants
//! - Descriptors never contain SQL fragments; translation to SQL is owned
//!   by the execution adapter.
//! - `PageRequest::size` is always at least 1.

use crate::model::team::TeamId;

/// Comparison applied to the member `age` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeFilter {
    /// `age = value`.
    Exactly(i64),
    /// `age > value` (strictly greater).
    Above(i64),
    /// `age >= value`.
    AtLeast(i64),
}

/// Sortable member fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Username,
    Age,
}

/// Sort direction for one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One ordering directive. Rows are additionally tie-broken by id so that
/// repeated queries are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    /// Ascending sort on `key`.
    pub fn asc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on `key`.
    pub fn desc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }
}

/// Declarative member query: every populated field becomes one predicate.
///
/// Named finder methods on the repository façade are thin wrappers that
/// fill in a descriptor and delegate to the generic list operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberQuery {
    /// Exact username match.
    pub username: Option<String>,
    /// Age comparison.
    pub age: Option<AgeFilter>,
    /// Exact team match.
    pub team_id: Option<TeamId>,
    /// Ordering directives, applied in sequence.
    pub sort: Vec<Sort>,
    /// Maximum rows to return. `None` means unbounded.
    pub limit: Option<u32>,
    /// Rows to skip before the first returned row.
    pub offset: u32,
}

impl MemberQuery {
    /// Descriptor matching every row with `username`.
    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }
}

/// Bounded-slice request: zero-based page number, page size and ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
    sort: Vec<Sort>,
}

impl PageRequest {
    /// Builds a page request. A zero `size` is clamped to 1.
    pub fn of(number: u32, size: u32) -> Self {
        Self::with_sort(number, size, Vec::new())
    }

    /// Builds a page request with ordering directives.
    pub fn with_sort(number: u32, size: u32, sort: Vec<Sort>) -> Self {
        Self {
            number,
            size: size.max(1),
            sort,
        }
    }

    /// Zero-based page index.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Rows per page, at least 1.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Ordering directives for the content query.
    pub fn sort(&self) -> &[Sort] {
        &self.sort
    }

    /// Rows to skip: `number * size`.
    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }
}

/// One page of query results plus total-count metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    content: Vec<T>,
    number: u32,
    size: u32,
    total_elements: u64,
}

impl<T> Page<T> {
    /// Wraps slice content with the request it answered and the total
    /// matching row count.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.number(),
            size: request.size(),
            total_elements,
        }
    }

    /// Rows of this page.
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Consumes the page, yielding its rows.
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Zero-based page index.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Requested page size (the last page may hold fewer rows).
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total rows matching the query across all pages.
    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Total page count: `ceil(total_elements / size)`.
    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.size))
    }

    /// Whether this is the first page.
    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    /// Whether this is the last page.
    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Whether a page with a higher index exists.
    pub fn has_next(&self) -> bool {
        u64::from(self.number) + 1 < self.total_pages()
    }

    /// Whether a page with a lower index exists.
    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    /// Projects page content through `f`, keeping count metadata intact.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}
