//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pawshop_core::{Email, UserId};

use super::RepositoryError;
use crate::models::{User, user::UserWithPassword};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, email, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, email, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a new user with email, password hash, and API key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        api_key: &str,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (email, password_hash, api_key)
            VALUES ($1, $2, $3)
            RETURNING id, email, created_at
            ",
        )
        .bind(email)
        .bind(password_hash)
        .bind(api_key)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "email already exists"))?;

        Ok(user)
    }

    /// Get a user with their password hash by email.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<UserWithPassword>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithPassword>(
            r"
            SELECT id, email, password_hash
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Store a password reset token with its expiry on a user row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_reset_token(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET reset_token = $1, reset_token_expires_at = $2
            WHERE id = $3
            ",
        )
        .bind(token)
        .bind(expires_at)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Find the user holding an unexpired reset token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_reset_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, email, created_at
            FROM users
            WHERE reset_token = $1 AND reset_token_expires_at > NOW()
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Replace a user's password and clear any reset token.
    ///
    /// The token is matched again in the UPDATE so a stale form submission
    /// for a different user id cannot overwrite someone else's password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matches the id/token
    /// pair or the token has expired.
    pub async fn complete_password_reset(
        &self,
        user_id: UserId,
        token: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = $1, reset_token = NULL, reset_token_expires_at = NULL
            WHERE id = $2 AND reset_token = $3 AND reset_token_expires_at > NOW()
            ",
        )
        .bind(password_hash)
        .bind(user_id)
        .bind(token)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Persist an issued API token on the user row.
    ///
    /// Only the most recently issued token is valid; storing a new one
    /// revokes the previous token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_api_token(&self, user_id: UserId, token: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET api_token = $1
            WHERE id = $2
            ",
        )
        .bind(token)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Get the stored API token for a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn get_api_token(&self, user_id: UserId) -> Result<Option<String>, RepositoryError> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            r"
            SELECT api_token
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some((token,)) => Ok(token),
            None => Err(RepositoryError::NotFound),
        }
    }
}
