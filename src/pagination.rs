//! Paginated, filtered listings.
//!
//! Every service exposes a `search(term, request)` operation that returns a
//! [`Page`]: one slice of the filtered, deterministically ordered result
//! set plus the size of the whole filtered set.

use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait,
    QuerySelect, Select,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Which page to fetch. Pages are numbered from 1.
///
/// Deserializing runs the same checks as [`PageRequest::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: u64,
    page_size: u64,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = StoreError;

    fn try_from(raw: RawPageRequest) -> Result<Self> {
        Self::new(raw.page, raw.page_size)
    }
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u64 = 20;
    pub const MAX_PAGE_SIZE: u64 = 1000;

    /// `page` must be positive and `page_size` within
    /// `1..=`[`PageRequest::MAX_PAGE_SIZE`].
    pub fn new(page: u64, page_size: u64) -> Result<Self> {
        if page == 0 {
            return Err(StoreError::invalid("page numbers start at 1"));
        }
        if page_size == 0 {
            return Err(StoreError::invalid("page size must be positive"));
        }
        if page_size > Self::MAX_PAGE_SIZE {
            return Err(StoreError::invalid(format!(
                "page size must not exceed {}",
                Self::MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Index of the first row of this page in the full result set.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// The row offset as SQL can take it, or `None` when it lies beyond
    /// any table (past `i64::MAX`).
    fn sql_offset(&self) -> Option<u64> {
        (self.page - 1)
            .checked_mul(self.page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..*self
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results together with the total count of matching rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    /// Number of pages needed for `total_count` rows. Never less than 1, so
    /// an empty listing still has a page to show.
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size).max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Counts everything `select` matches, then fetches the requested slice.
///
/// `select` must already carry its ordering; without one the slices are not
/// stable between calls.
pub(crate) async fn fetch_page<E, C>(
    select: Select<E>,
    request: PageRequest,
    db: &C,
) -> Result<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    let total_count = select.clone().count(db).await?;
    let items = match request.sql_offset() {
        Some(offset) => {
            select
                .offset(offset)
                .limit(request.page_size())
                .all(db)
                .await?
        }
        None => Vec::new(),
    };

    tracing::debug!(
        page = request.page(),
        page_size = request.page_size(),
        total_count,
        returned = items.len(),
        "fetched page"
    );

    Ok(Page {
        items,
        total_count,
        page: request.page(),
        page_size: request.page_size(),
    })
}

/// Case-insensitive substring match of `term` against any of `columns`.
///
/// Returns `None` for a blank term, meaning "no filter".
pub(crate) fn search_condition<C>(term: &str, columns: &[C]) -> Option<Condition>
where
    C: ColumnTrait,
{
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let pattern = format!("%{}%", escape_like(&term.to_uppercase()));

    let condition = columns.iter().fold(Condition::any(), |cond, column| {
        cond.add(
            Expr::expr(Func::upper(Expr::col(column.as_column_ref())))
                .like(LikeExpr::new(pattern.clone()).escape('\\')),
        )
    });
    Some(condition)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
