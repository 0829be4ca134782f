//! Listing repository for database operations

use chrono::Utc;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::info;
use uuid::Uuid;

use common::error::{DatabaseError, DatabaseResult};

use super::parse_uuid;
use crate::models::{CreateListingRequest, Listing, ListingOrdering};

const LISTING_COLUMNS: &str = "id, title, price, price_type, condition, location, picture, \
     description, make, model, vehicle_type, year_of_manufacture, fuel_or_power, weight, \
     views, user_id, created_at";

fn map_listing(row: &SqliteRow) -> DatabaseResult<Listing> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let price_type: String = row.get("price_type");
    let condition: String = row.get("condition");

    Ok(Listing {
        id: parse_uuid("listings.id", &id)?,
        title: row.get("title"),
        price: row.get("price"),
        price_type: price_type.parse().map_err(|message| DatabaseError::Decode {
            column: "listings.price_type",
            message,
        })?,
        condition: condition.parse().map_err(|message| DatabaseError::Decode {
            column: "listings.condition",
            message,
        })?,
        location: row.get("location"),
        picture: row.get("picture"),
        description: row.get("description"),
        make: row.get("make"),
        model: row.get("model"),
        vehicle_type: row.get("vehicle_type"),
        year_of_manufacture: row.get("year_of_manufacture"),
        fuel_or_power: row.get("fuel_or_power"),
        weight: row.get("weight"),
        views: row.get("views"),
        user_id: parse_uuid("listings.user_id", &user_id)?,
        created_at: row.get("created_at"),
    })
}

/// Outcome of a listing deletion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteListingOutcome {
    Deleted,
    NotFound,
    NotOwner,
}

/// Listing repository
#[derive(Clone)]
pub struct ListingRepository {
    pool: SqlitePool,
}

impl ListingRepository {
    /// Create a new listing repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a listing owned by a user. Views start at zero.
    pub async fn create(
        &self,
        owner_id: Uuid,
        fields: &CreateListingRequest,
    ) -> DatabaseResult<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO listings (id, title, price, price_type, condition, location, picture,
                description, make, model, vehicle_type, year_of_manufacture, fuel_or_power,
                weight, views, user_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            "#,
        )
        .bind(id.to_string())
        .bind(&fields.title)
        .bind(fields.price)
        .bind(fields.price_type.as_str())
        .bind(fields.condition.as_str())
        .bind(&fields.location)
        .bind(&fields.picture)
        .bind(&fields.description)
        .bind(&fields.make)
        .bind(&fields.model)
        .bind(&fields.vehicle_type)
        .bind(fields.year_of_manufacture)
        .bind(&fields.fuel_or_power)
        .bind(fields.weight)
        .bind(0i64)
        .bind(owner_id.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        info!("Created listing {} for user {}", id, owner_id);
        Ok(id)
    }

    /// All listings in the requested order.
    pub async fn list(&self, ordering: ListingOrdering) -> DatabaseResult<Vec<Listing>> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM listings {}",
            ordering.order_clause()
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        rows.iter().map(map_listing).collect()
    }

    /// Count one view. A single arithmetic update, so concurrent views
    /// cannot lose counts. Unknown ids match zero rows and pass silently.
    pub async fn increment_views(&self, id: Uuid) -> DatabaseResult<()> {
        sqlx::query("UPDATE listings SET views = views + 1 WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(())
    }

    /// Delete a listing on behalf of a requester. Only the owner may
    /// delete; the outcome tells the caller what happened.
    pub async fn delete(
        &self,
        id: Uuid,
        requester_id: Uuid,
    ) -> DatabaseResult<DeleteListingOutcome> {
        let row = sqlx::query("SELECT user_id FROM listings WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        let Some(row) = row else {
            return Ok(DeleteListingOutcome::NotFound);
        };

        let owner_id: String = row.get("user_id");
        if parse_uuid("listings.user_id", &owner_id)? != requester_id {
            return Ok(DeleteListingOutcome::NotOwner);
        }

        sqlx::query("DELETE FROM listings WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        info!("Deleted listing {} for user {}", id, requester_id);
        Ok(DeleteListingOutcome::Deleted)
    }
}
