//! Favourite repository for database operations

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use common::error::{DatabaseError, DatabaseResult};

use super::parse_uuid;
use crate::models::{Favourite, FavouriteListing, Listing};

/// Favourite repository
#[derive(Clone)]
pub struct FavouriteRepository {
    pool: SqlitePool,
}

impl FavouriteRepository {
    /// Create a new favourite repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Bookmark a listing for a user. The conflict clause keeps the
    /// (user, listing) pair unique even when identical requests race, so
    /// repeating an add is a no-op.
    pub async fn add(&self, user_id: Uuid, listing_id: Uuid) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO favourites (id, user_id, listing_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (user_id, listing_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(listing_id.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(())
    }

    /// Drop a bookmark. Removing an absent favourite is a no-op.
    pub async fn remove(&self, user_id: Uuid, listing_id: Uuid) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM favourites WHERE user_id = ?1 AND listing_id = ?2")
            .bind(user_id.to_string())
            .bind(listing_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(())
    }

    /// A user's favourites, each paired with its listing. The left join
    /// keeps favourites whose listing has disappeared; those come back with
    /// no listing attached.
    pub async fn list_for_user(&self, user_id: Uuid) -> DatabaseResult<Vec<FavouriteListing>> {
        info!("Listing favourites for user: {}", user_id);

        let rows = sqlx::query(
            r#"
            SELECT f.id AS favourite_id, f.user_id AS favourite_user_id, f.listing_id,
                   f.created_at AS favourited_at,
                   l.id AS l_id, l.title, l.price, l.price_type, l.condition, l.location,
                   l.picture, l.description, l.make, l.model, l.vehicle_type,
                   l.year_of_manufacture, l.fuel_or_power, l.weight, l.views,
                   l.user_id AS l_user_id, l.created_at AS l_created_at
            FROM favourites f
            LEFT JOIN listings l ON l.id = f.listing_id
            WHERE f.user_id = ?1
            ORDER BY f.created_at DESC, f.id ASC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        rows.iter()
            .map(|row| {
                let favourite = Favourite {
                    id: parse_uuid("favourites.id", &row.get::<String, _>("favourite_id"))?,
                    user_id: parse_uuid(
                        "favourites.user_id",
                        &row.get::<String, _>("favourite_user_id"),
                    )?,
                    listing_id: parse_uuid(
                        "favourites.listing_id",
                        &row.get::<String, _>("listing_id"),
                    )?,
                    created_at: row.get("favourited_at"),
                };

                let listing = match row.get::<Option<String>, _>("l_id") {
                    Some(l_id) => {
                        let price_type: String = row.get("price_type");
                        let condition: String = row.get("condition");
                        let l_user_id: String = row.get("l_user_id");

                        Some(Listing {
                            id: parse_uuid("listings.id", &l_id)?,
                            title: row.get("title"),
                            price: row.get("price"),
                            price_type: price_type.parse().map_err(|message| {
                                DatabaseError::Decode {
                                    column: "listings.price_type",
                                    message,
                                }
                            })?,
                            condition: condition.parse().map_err(|message| {
                                DatabaseError::Decode {
                                    column: "listings.condition",
                                    message,
                                }
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
                            user_id: parse_uuid("listings.user_id", &l_user_id)?,
                            created_at: row.get("l_created_at"),
                        })
                    }
                    None => None,
                };

                Ok(FavouriteListing { favourite, listing })
            })
            .collect()
    }
}
