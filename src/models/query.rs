//! Sorting and offset pagination shared by list endpoints

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Page size used when the caller does not supply `take`
pub const DEFAULT_TAKE: i64 = 10;
/// Upper bound accepted for `take`
pub const MAX_TAKE: i64 = 1000;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Apply this direction to an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AppError::Validation(format!("Invalid sort direction: {}", s))),
        }
    }
}

/// A closed set of sortable fields for one entity
pub trait SortField: Copy + Default + fmt::Debug {
    /// Look up a field by its normalized name (lowercase, no underscores)
    fn from_normalized(name: &str) -> Option<Self>;
}

/// A validated sort: one field plus a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> Sort<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parse an optional sort string, falling back to the field's default
    /// ascending order when absent or blank.
    pub fn parse_or_default(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse(),
            None => Ok(Self::default()),
        }
    }
}

impl<F: SortField> FromStr for Sort<F> {
    type Err = AppError;

    /// Accepts `field` or `field direction`, e.g. `name`, `birthDate DESC`,
    /// `birth_date asc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let field_name = parts
            .next()
            .ok_or_else(|| AppError::Validation("Sort field cannot be empty".to_string()))?;

        let normalized: String = field_name
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        let field = F::from_normalized(&normalized)
            .ok_or_else(|| AppError::Validation(format!("Unknown sort field: {}", field_name)))?;

        let direction = match parts.next() {
            Some(dir) => dir.parse()?,
            None => SortDirection::Asc,
        };

        if parts.next().is_some() {
            return Err(AppError::Validation(format!("Invalid sort: {}", s)));
        }

        Ok(Self { field, direction })
    }
}

/// Offset pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: i64,
    pub take: i64,
}

impl PageRequest {
    pub fn new(skip: Option<i64>, take: Option<i64>) -> AppResult<Self> {
        let skip = skip.unwrap_or(0);
        let take = take.unwrap_or(DEFAULT_TAKE);

        if skip < 0 {
            return Err(AppError::Validation("skip must not be negative".to_string()));
        }
        if !(1..=MAX_TAKE).contains(&take) {
            return Err(AppError::Validation(format!(
                "take must be between 1 and {}",
                MAX_TAKE
            )));
        }

        Ok(Self { skip, take })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            take: DEFAULT_TAKE,
        }
    }
}

/// One page of results plus the number of rows matching the query
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    AuthorPage = PagedResult<crate::models::author::AuthorDto>,
    BookPage = PagedResult<crate::models::book::BookDto>
)]
pub struct PagedResult<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Total number of matching rows across all pages
    pub total_count: i64,
    /// Rows on this page
    pub items: Vec<T>,
}
