//! Marketplace service models

pub mod bid;
pub mod favourite;
pub mod listing;
pub mod session;
pub mod user;

// Re-export for convenience
pub use bid::{Bid, BidView, PlaceBidRequest};
pub use favourite::{Favourite, FavouriteListing};
pub use listing::{
    Condition, CreateListingRequest, Listing, ListingOrdering, PriceType,
};
pub use session::Session;
pub use user::{
    LoginRequest, NewUser, SignupRequest, UpdateCredentialsRequest, User, UserChanges,
};
