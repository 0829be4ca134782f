//! Bid repository for database operations

use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use common::error::{DatabaseError, DatabaseResult};

use crate::models::BidView;

/// Bid repository
#[derive(Clone)]
pub struct BidRepository {
    pool: SqlitePool,
}

impl BidRepository {
    /// Create a new bid repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Place a bid, replacing any earlier bid by the same user on the same
    /// listing. A single upsert keyed on (user_id, listing_id), so two
    /// concurrent bids cannot produce two rows.
    pub async fn place(
        &self,
        listing_id: Uuid,
        amount: i64,
        user_id: Uuid,
    ) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bids (id, listing_id, user_id, amount)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (user_id, listing_id) DO UPDATE SET amount = excluded.amount
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(listing_id.to_string())
        .bind(user_id.to_string())
        .bind(amount)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        info!(
            "Recorded bid of {} on listing {} by user {}",
            amount, listing_id, user_id
        );
        Ok(())
    }

    /// Bids on a listing with each bidder's display name, highest amount
    /// first. Ties break on bid id so the order is stable.
    pub async fn list_for_listing(&self, listing_id: Uuid) -> DatabaseResult<Vec<BidView>> {
        let rows = sqlx::query(
            r#"
            SELECT b.amount, u.name
            FROM bids b
            INNER JOIN users u ON u.id = b.user_id
            WHERE b.listing_id = ?1
            ORDER BY b.amount DESC, b.id ASC
            "#,
        )
        .bind(listing_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(rows
            .iter()
            .map(|row| BidView {
                amount_bid: row.get("amount"),
                username: row.get("name"),
            })
            .collect())
    }
}
