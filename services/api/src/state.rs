//! Application state shared across handlers

use sqlx::SqlitePool;

use crate::repositories::{
    BidRepository, FavouriteRepository, ListingRepository, SessionRepository, UserRepository,
};
use crate::session::SessionService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub user_repository: UserRepository,
    pub session_service: SessionService,
    pub listing_repository: ListingRepository,
    pub favourite_repository: FavouriteRepository,
    pub bid_repository: BidRepository,
}

impl AppState {
    /// Wire every repository to a connected pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            session_service: SessionService::new(SessionRepository::new(pool.clone())),
            listing_repository: ListingRepository::new(pool.clone()),
            favourite_repository: FavouriteRepository::new(pool.clone()),
            bid_repository: BidRepository::new(pool.clone()),
            db_pool: pool,
        }
    }
}
