//! Listing model, field enums, and browse orderings

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pricing mode of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceType {
    #[serde(rename = "fixed")]
    Fixed,
    #[serde(rename = "negotiable")]
    Negotiable,
    #[serde(rename = "on request")]
    OnRequest,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Fixed => "fixed",
            PriceType::Negotiable => "negotiable",
            PriceType::OnRequest => "on request",
        }
    }
}

impl FromStr for PriceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(PriceType::Fixed),
            "negotiable" => Ok(PriceType::Negotiable),
            "on request" => Ok(PriceType::OnRequest),
            other => Err(format!("unknown price type: {other}")),
        }
    }
}

/// Wear state of a listed machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "good as new")]
    GoodAsNew,
    #[serde(rename = "used")]
    Used,
    #[serde(rename = "heavily used")]
    HeavilyUsed,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::GoodAsNew => "good as new",
            Condition::Used => "used",
            Condition::HeavilyUsed => "heavily used",
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Condition::New),
            "good as new" => Ok(Condition::GoodAsNew),
            "used" => Ok(Condition::Used),
            "heavily used" => Ok(Condition::HeavilyUsed),
            other => Err(format!("unknown condition: {other}")),
        }
    }
}

/// Listing entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    /// None means "price on request".
    pub price: Option<i64>,
    pub price_type: PriceType,
    pub condition: Condition,
    pub location: String,
    pub picture: Option<String>,
    pub description: Option<String>,
    pub make: String,
    pub model: String,
    pub vehicle_type: String,
    pub year_of_manufacture: i32,
    pub fuel_or_power: String,
    pub weight: Option<f64>,
    pub views: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a listing
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListingRequest {
    pub title: String,
    pub price: Option<i64>,
    pub price_type: PriceType,
    pub condition: Condition,
    pub location: String,
    pub picture: Option<String>,
    pub description: Option<String>,
    pub make: String,
    pub model: String,
    pub vehicle_type: String,
    pub year_of_manufacture: i32,
    pub fuel_or_power: String,
    pub weight: Option<f64>,
}

/// Sort order for browsing listings. Unknown values fall back to the
/// default (most viewed first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingOrdering {
    PriceAsc,
    PriceDesc,
    DateDesc,
    #[default]
    ViewsDesc,
}

impl ListingOrdering {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("price_asc") => ListingOrdering::PriceAsc,
            Some("price_desc") => ListingOrdering::PriceDesc,
            Some("date_desc") => ListingOrdering::DateDesc,
            _ => ListingOrdering::ViewsDesc,
        }
    }

    /// ORDER BY clause for this ordering. Ties always break on id ascending
    /// so result order is stable across identical queries.
    pub(crate) fn order_clause(&self) -> &'static str {
        match self {
            ListingOrdering::PriceAsc => "ORDER BY price ASC, id ASC",
            ListingOrdering::PriceDesc => "ORDER BY price DESC, id ASC",
            ListingOrdering::DateDesc => "ORDER BY created_at DESC, id ASC",
            ListingOrdering::ViewsDesc => "ORDER BY views DESC, id ASC",
        }
    }
}
