//! GearXchange marketplace service
//!
//! HTTP backend for a machinery marketplace: account signup and login with
//! durable cookie sessions, equipment listings with sortable browsing and
//! view counting, per-user favourites, and replace-on-rebid bidding.

pub mod cookies;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;
