//! Shared helpers for the integration tests

#![allow(dead_code)]

use api::database::run_migrations;
use api::models::{Condition, CreateListingRequest, NewUser, PriceType, User};
use api::state::AppState;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// In-memory database with the schema applied. A single connection keeps
/// every query on the same memory instance.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    run_migrations(&pool).await.expect("failed to apply schema");
    pool
}

/// Application state over a fresh in-memory database.
pub async fn test_state() -> AppState {
    AppState::new(test_pool().await)
}

/// Insert a user directly; repository tests do not need a real hash.
pub async fn seeded_user(state: &AppState, name: &str, email: &str) -> User {
    state
        .user_repository
        .create(&NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "unused-hash".to_string(),
        })
        .await
        .expect("failed to seed user")
}

/// A realistic listing payload.
pub fn listing_fields(title: &str) -> CreateListingRequest {
    CreateListingRequest {
        title: title.to_string(),
        price: Some(32_500),
        price_type: PriceType::Negotiable,
        condition: Condition::Used,
        location: "Springfield, MO".to_string(),
        picture: Some("johndeere-5075e.jpg".to_string()),
        description: Some("2018 model with 450 engine hours.".to_string()),
        make: "John Deere".to_string(),
        model: "5075E".to_string(),
        vehicle_type: "Utility Tractor".to_string(),
        year_of_manufacture: 2018,
        fuel_or_power: "Diesel".to_string(),
        weight: Some(5075.0),
    }
}
