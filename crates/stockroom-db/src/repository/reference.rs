//! # Reference Repository
//!
//! Categories, suppliers and users. These exist so postings and imports
//! have something real to point at, and so analytics can label groups.
//! Only create and lookup are offered.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{Category, Supplier, User};

#[derive(Debug, Clone)]
pub struct ReferenceRepository {
    pool: SqlitePool,
}

impl ReferenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReferenceRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    pub async fn create_category(&self, name: &str) -> DbResult<Category> {
        debug!(name = %name, "Creating category");

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES (?1) RETURNING id, name",
        )
        .bind(name.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn get_category(&self, id: i64) -> DbResult<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(category)
    }

    // -------------------------------------------------------------------------
    // Suppliers
    // -------------------------------------------------------------------------

    pub async fn create_supplier(&self, first_name: &str, last_name: &str) -> DbResult<Supplier> {
        debug!(first_name = %first_name, last_name = %last_name, "Creating supplier");

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (first_name, last_name) VALUES (?1, ?2)
            RETURNING id, first_name, last_name
            "#,
        )
        .bind(first_name.trim())
        .bind(last_name.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn get_supplier(&self, id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT id, first_name, last_name FROM suppliers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    pub async fn create_user(&self, user_name: &str) -> DbResult<User> {
        debug!(user_name = %user_name, "Creating user");

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (user_name) VALUES (?1) RETURNING id, user_name",
        )
        .bind(user_name.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, user_name FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Whether a user exists, checked on a caller's connection.
    pub async fn user_exists_in(conn: &mut SqliteConnection, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(found.is_some())
    }
}
