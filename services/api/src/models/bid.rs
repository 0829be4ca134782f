//! Bid model and related payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bid entity. At most one bid exists per (user, listing) pair; a newer
/// bid replaces the amount of the old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
}

/// A bid as shown on a listing, with the bidder's display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidView {
    pub amount_bid: i64,
    pub username: String,
}

/// Request for placing a bid
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBidRequest {
    pub listing_id: Option<String>,
    pub amount: i64,
}
