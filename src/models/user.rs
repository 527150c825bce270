//! Authenticated user claims and permission tags

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Permission tags checked per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Authors,
    AuthorsCreate,
    AuthorsEdit,
    AuthorsDelete,
    Books,
    BooksCreate,
    BooksEdit,
    BooksDelete,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Authors => "BookStore.Authors",
            Permission::AuthorsCreate => "BookStore.Authors.Create",
            Permission::AuthorsEdit => "BookStore.Authors.Edit",
            Permission::AuthorsDelete => "BookStore.Authors.Delete",
            Permission::Books => "BookStore.Books",
            Permission::BooksCreate => "BookStore.Books.Create",
            Permission::BooksEdit => "BookStore.Books.Edit",
            Permission::BooksDelete => "BookStore.Books.Delete",
        }
    }

    /// Every permission tag, in declaration order
    pub fn all() -> [Permission; 8] {
        [
            Permission::Authors,
            Permission::AuthorsCreate,
            Permission::AuthorsEdit,
            Permission::AuthorsDelete,
            Permission::Books,
            Permission::BooksCreate,
            Permission::BooksEdit,
            Permission::BooksDelete,
        ]
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    /// Granted permission tags; unknown tags are carried but never match
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(sub: impl Into<String>, permissions: &[Permission], expiration_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            permissions: permissions.iter().map(|p| p.as_str().to_string()).collect(),
            exp: (now + Duration::hours(expiration_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.iter().any(|p| p == permission.as_str())
    }

    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.has(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Missing permission {}",
                permission
            )))
        }
    }
}
