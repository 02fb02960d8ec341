//! Cart repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use minimart_core::{CartId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem};

/// Database row for a cart.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i32,
    user_id: i32,
    items: Json<Vec<CartItem>>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            user_id: UserId::new(row.user_id),
            items: row.items.0,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for cart persistence operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new repository backed by `pool`.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the cart for `user_id`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, user_id, items, version, created_at, updated_at
             FROM carts
             WHERE user_id = $1",
        )
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    /// Get the cart for `user_id`, creating an empty one if none exists.
    ///
    /// Safe under concurrent calls: the insert is an `ON CONFLICT DO
    /// NOTHING` against the unique `user_id` constraint, and the loser of
    /// the race reads the winner's row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        if let Some(cart) = self.get_by_user(user_id).await? {
            return Ok(cart);
        }

        let inserted = sqlx::query_as::<_, CartRow>(
            "INSERT INTO carts (user_id)
             VALUES ($1)
             ON CONFLICT (user_id) DO NOTHING
             RETURNING id, user_id, items, version, created_at, updated_at",
        )
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok(Cart::from(row));
        }

        // Lost the race; the other writer's row must exist now.
        self.get_by_user(user_id)
            .await?
            .ok_or_else(|| RepositoryError::DataCorruption("cart vanished after insert".into()))
    }

    /// Replace the items of cart `cart_id`, guarded by `expected_version`.
    ///
    /// Bumps the version and `updated_at` on success.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::VersionConflict` if the row was modified
    /// (or deleted) since it was read at `expected_version`.
    pub async fn update_items(
        &self,
        cart_id: CartId,
        expected_version: i32,
        items: &[CartItem],
    ) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "UPDATE carts
             SET items = $3, version = version + 1, updated_at = now()
             WHERE id = $1 AND version = $2
             RETURNING id, user_id, items, version, created_at, updated_at",
        )
        .bind(cart_id.as_i32())
        .bind(expected_version)
        .bind(Json(items))
        .fetch_optional(self.pool)
        .await?;

        row.map(Cart::from).ok_or(RepositoryError::VersionConflict)
    }
}
