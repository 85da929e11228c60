//! User repository for Nestly.
//!
//! CRUD operations for user accounts. Uniqueness of username and email is
//! enforced by the store's unique indexes; a constraint violation surfaces
//! as `NestlyError::Duplicate` rather than being pre-checked, so concurrent
//! signups for the same email cannot race past a check-then-insert.

use sqlx::{QueryBuilder, SqlitePool};

use super::user::{AccountUpdate, NewAccount, UserAccount};
use crate::{NestlyError, Result};

const ACCOUNT_COLUMNS: &str = "id, username, email, password, avatar, created_at, updated_at";

/// Repository for user account CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// Returns the created account with its assigned ID, or
    /// `NestlyError::Duplicate` when the username or email already exists.
    pub async fn create(&self, new_account: &NewAccount) -> Result<UserAccount> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password, avatar) VALUES (?, ?, ?, ?)",
        )
        .bind(&new_account.username)
        .bind(&new_account.email)
        .bind(&new_account.password)
        .bind(&new_account.avatar)
        .execute(self.pool)
        .await
        .map_err(NestlyError::from)?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| NestlyError::NotFound("user".to_string()))
    }

    /// Get an account by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<UserAccount>> {
        let result = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Find an account by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let result = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Find an account by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let result = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Apply a partial update to an account.
    ///
    /// Only fields set in the update are modified; `updated_at` is always
    /// refreshed. Fails with `NotFound` when the ID is absent and with
    /// `Duplicate` when the new username or email is already taken.
    pub async fn update_fields(&self, id: i64, update: &AccountUpdate) -> Result<UserAccount> {
        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref username) = update.username {
            separated.push("username = ");
            separated.push_bind_unseparated(username);
        }
        if let Some(ref email) = update.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email);
        }
        if let Some(ref password) = update.password {
            separated.push("password = ");
            separated.push_bind_unseparated(password);
        }
        if let Some(ref avatar) = update.avatar {
            separated.push("avatar = ");
            separated.push_bind_unseparated(avatar);
        }
        separated.push("updated_at = datetime('now')");

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(NestlyError::from)?;

        if result.rows_affected() == 0 {
            return Err(NestlyError::NotFound("user".to_string()));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| NestlyError::NotFound("user".to_string()))
    }

    /// Delete an account by ID.
    ///
    /// Fails with `NotFound` when the ID is absent.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(NestlyError::NotFound("user".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let account = repo
            .create(&NewAccount::new("jane", "jane@example.com", "hash"))
            .await
            .unwrap();

        assert!(account.id > 0);
        assert_eq!(account.username, "jane");
        assert_eq!(account.email, "jane@example.com");
        assert!(!account.created_at.is_empty());
        assert_eq!(account.created_at, account.updated_at);

        let found = repo.get_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(found.username, "jane");
    }

    #[tokio::test]
    async fn test_find_by_email_and_username() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewAccount::new("jane", "jane@example.com", "hash"))
            .await
            .unwrap();

        assert!(repo
            .find_by_email("jane@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(repo.find_by_username("jane").await.unwrap().is_some());
        assert!(repo.find_by_username("john").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewAccount::new("jane", "jane@example.com", "hash"))
            .await
            .unwrap();

        let result = repo
            .create(&NewAccount::new("janedoe", "jane@example.com", "hash2"))
            .await;
        assert!(matches!(result, Err(NestlyError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewAccount::new("jane", "jane@example.com", "hash"))
            .await
            .unwrap();

        let result = repo
            .create(&NewAccount::new("jane", "other@example.com", "hash2"))
            .await;
        assert!(matches!(result, Err(NestlyError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_update_fields_partial() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let account = repo
            .create(&NewAccount::new("jane", "jane@example.com", "hash"))
            .await
            .unwrap();

        let updated = repo
            .update_fields(
                account.id,
                &AccountUpdate::new().avatar("https://example.com/jane.png"),
            )
            .await
            .unwrap();

        assert_eq!(updated.avatar, "https://example.com/jane.png");
        // Untouched fields survive
        assert_eq!(updated.username, "jane");
        assert_eq!(updated.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let result = repo
            .update_fields(9999, &AccountUpdate::new().username("ghost"))
            .await;
        assert!(matches!(result, Err(NestlyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_duplicate_email() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewAccount::new("jane", "jane@example.com", "hash"))
            .await
            .unwrap();
        let john = repo
            .create(&NewAccount::new("john", "john@example.com", "hash"))
            .await
            .unwrap();

        let result = repo
            .update_fields(john.id, &AccountUpdate::new().email("jane@example.com"))
            .await;
        assert!(matches!(result, Err(NestlyError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool());

        let account = repo
            .create(&NewAccount::new("jane", "jane@example.com", "hash"))
            .await
            .unwrap();

        repo.delete(account.id).await.unwrap();
        assert!(repo.get_by_id(account.id).await.unwrap().is_none());

        let result = repo.delete(account.id).await;
        assert!(matches!(result, Err(NestlyError::NotFound(_))));
    }
}
