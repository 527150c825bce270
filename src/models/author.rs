//! Author model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::query::{PageRequest, Sort, SortField};

/// Maximum length of an author name, in characters
pub const AUTHOR_MAX_NAME_LENGTH: u64 = 64;

/// Author entity as persisted.
///
/// The name is only reachable through [`Author::name`]; new authors and
/// renames go through `AuthorManager`, which owns the uniqueness check.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Author {
    pub id: Uuid,
    name: String,
    pub birth_date: NaiveDate,
    pub short_bio: Option<String>,
    pub creation_time: DateTime<Utc>,
    pub last_modification_time: Option<DateTime<Utc>>,
}

impl Author {
    pub(crate) fn new(
        id: Uuid,
        name: String,
        birth_date: NaiveDate,
        short_bio: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            birth_date,
            short_bio,
            creation_time: Utc::now(),
            last_modification_time: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// Author as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub short_bio: Option<String>,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            birth_date: author.birth_date,
            short_bio: author.short_bio,
        }
    }
}

/// Create author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = AUTHOR_MAX_NAME_LENGTH, message = "Name length is out of range"))]
    pub name: String,
    pub birth_date: NaiveDate,
    pub short_bio: Option<String>,
}

/// Update author request; `birth_date` and `short_bio` are always overwritten
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = AUTHOR_MAX_NAME_LENGTH, message = "Name length is out of range"))]
    pub name: String,
    pub birth_date: NaiveDate,
    pub short_bio: Option<String>,
}

/// Author list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    /// Rows to skip (default: 0)
    pub skip: Option<i64>,
    /// Rows to return (default: 10, max: 1000)
    pub take: Option<i64>,
    /// `name` or `birth_date`, optionally followed by `asc` / `desc`
    pub sort: Option<String>,
    /// Case-insensitive substring of the author name
    pub filter: Option<String>,
}

/// Sortable author fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorSortField {
    #[default]
    Name,
    BirthDate,
}

impl AuthorSortField {
    /// ORDER BY expression; text compares bytewise, as the memory store does
    pub fn order_by(&self) -> &'static str {
        match self {
            AuthorSortField::Name => "name COLLATE \"C\"",
            AuthorSortField::BirthDate => "birth_date",
        }
    }
}

impl SortField for AuthorSortField {
    fn from_normalized(name: &str) -> Option<Self> {
        match name {
            "name" => Some(AuthorSortField::Name),
            "birthdate" => Some(AuthorSortField::BirthDate),
            _ => None,
        }
    }
}

pub type AuthorSort = Sort<AuthorSortField>;

/// Validated author search handed to the repository
#[derive(Debug, Clone, Default)]
pub struct AuthorSearch {
    pub page: PageRequest,
    pub sort: AuthorSort,
    /// Substring match on name, case-insensitive
    pub filter: Option<String>,
}

impl AuthorSearch {
    pub fn from_query(query: &AuthorQuery) -> crate::error::AppResult<Self> {
        Ok(Self {
            page: PageRequest::new(query.skip, query.take)?,
            sort: AuthorSort::parse_or_default(query.sort.as_deref())?,
            filter: query
                .filter
                .as_ref()
                .filter(|f| !f.trim().is_empty())
                .cloned(),
        })
    }

    /// Whether `name` passes this search's filter
    pub fn matches(&self, name: &str) -> bool {
        match &self.filter {
            Some(filter) => name.to_lowercase().contains(&filter.to_lowercase()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(name: String) -> CreateAuthor {
        CreateAuthor {
            name,
            birth_date: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap(),
            short_bio: None,
        }
    }

    #[test]
    fn test_create_name_length_bounds() {
        let max = AUTHOR_MAX_NAME_LENGTH as usize;
        assert!(create_input("x".repeat(max)).validate().is_ok());
        assert!(create_input("x".repeat(max + 1)).validate().is_err());
        assert!(create_input(String::new()).validate().is_err());
    }

    #[test]
    fn test_name_sort_is_bytewise() {
        assert_eq!(AuthorSortField::Name.order_by(), "name COLLATE \"C\"");
        assert_eq!(AuthorSortField::BirthDate.order_by(), "birth_date");
    }

    #[test]
    fn test_update_name_length_bounds() {
        let update = |name: String| UpdateAuthor {
            name,
            birth_date: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap(),
            short_bio: None,
        };
        let max = AUTHOR_MAX_NAME_LENGTH as usize;
        assert!(update("x".repeat(max)).validate().is_ok());
        assert!(update("x".repeat(max + 1)).validate().is_err());
    }
}
