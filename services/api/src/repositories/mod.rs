//! Repositories for database operations
//!
//! Each repository owns the SQL for one entity and maps storage rows to
//! typed domain records at this boundary. Identifiers are stored as TEXT
//! and parsed back into `Uuid` here.

use common::error::{DatabaseError, DatabaseResult};
use uuid::Uuid;

pub mod bid;
pub mod favourite;
pub mod listing;
pub mod session;
pub mod user;

// Re-export for convenience
pub use bid::BidRepository;
pub use favourite::FavouriteRepository;
pub use listing::{DeleteListingOutcome, ListingRepository};
pub use session::SessionRepository;
pub use user::UserRepository;

/// Parse a stored TEXT identifier back into a `Uuid`.
pub(crate) fn parse_uuid(column: &'static str, value: &str) -> DatabaseResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| DatabaseError::Decode {
        column,
        message: e.to_string(),
    })
}
