//! Favourite model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Listing;

/// Favourite entity: a user's bookmark of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favourite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A favourite joined with its listing. The listing side stays optional: a
/// dangling favourite still shows up, with no listing attached, so callers
/// can detect it.
#[derive(Debug, Clone, Serialize)]
pub struct FavouriteListing {
    pub favourite: Favourite,
    pub listing: Option<Listing>,
}
