//! Marketplace service routes

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use common::error::DatabaseError;

use crate::cookies::{SESSION_COOKIE, removal_cookie, session_cookie};
use crate::error::ApiError;
use crate::middleware::{AuthUser, auth_middleware};
use crate::models::{
    BidView, CreateListingRequest, FavouriteListing, ListingOrdering, LoginRequest, NewUser,
    PlaceBidRequest, SignupRequest, UpdateCredentialsRequest, UserChanges,
};
use crate::repositories::DeleteListingOutcome;
use crate::state::AppState;
use crate::{password, validation};

/// Create the router for the marketplace service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
        .route("/update-credentials", post(update_credentials))
        .route(
            "/listings",
            get(get_listings).post(create_listing).delete(delete_listing),
        )
        .route("/view", post(record_view))
        .route(
            "/favourites",
            get(get_favourites).post(add_favourite).delete(remove_favourite),
        )
        .route("/biddings", get(get_biddings).post(place_bid))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// Map a storage conflict on the users table to the identity taxonomy.
fn identity_error(err: DatabaseError) -> ApiError {
    match err {
        DatabaseError::UniqueViolation(_) => ApiError::DuplicateIdentity,
        other => ApiError::Database(other),
    }
}

/// Parse a client-sent listing id. Absent and empty values are rejected
/// before the opaque id shape is checked.
fn parse_listing_id(value: Option<String>) -> Result<Uuid, ApiError> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing listing_id".to_string()))?;

    Uuid::parse_str(&value).map_err(|_| ApiError::Validation("Invalid listing_id".to_string()))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gearxchange-api"
    }))
}

/// Register a new account and open a session for it.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_name(&payload.name).map_err(ApiError::Validation)?;
    validation::validate_email(&payload.email).map_err(ApiError::Validation)?;
    validation::validate_password(&payload.password).map_err(ApiError::Validation)?;

    let password_hash = password::hash(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::Hashing(e.to_string())
    })?;

    let user = state
        .user_repository
        .create(&NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
        })
        .await
        .map_err(identity_error)?;

    let session = state.session_service.create_session(user.id).await?;
    let jar = jar.add(session_cookie(&session.id, session.expires_at));

    Ok((jar, Json(json!({ "success": true }))))
}

/// Log in with email and password.
///
/// An unknown email and a wrong password produce the same response, so the
/// caller cannot tell which field was wrong.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_repository.find_by_email(&payload.email).await?;

    let user = match user {
        Some(user) if password::verify(&user.password_hash, &payload.password) => user,
        _ => return Err(ApiError::InvalidCredentials),
    };

    let session = state.session_service.create_session(user.id).await?;
    let jar = jar.add(session_cookie(&session.id, session.expires_at));

    Ok((jar, Json(json!({ "success": true }))))
}

/// Close the current session. Succeeds even without one.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token = cookie.value().to_string();
        state.session_service.revoke(&token).await?;
    }

    let jar = jar.add(removal_cookie());
    Ok((jar, Json(json!({ "success": true }))))
}

/// Update the account's name, email, location or password.
///
/// Only fields that are present and differ from the stored values are
/// written; an effectively empty patch reports that nothing changed.
pub async fn update_credentials(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<UpdateCredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Extension(auth)) = user else {
        return Err(ApiError::Unauthenticated);
    };

    if let Some(name) = &payload.name {
        validation::validate_name(name).map_err(ApiError::Validation)?;
    }
    if let Some(email) = &payload.email {
        validation::validate_email(email).map_err(ApiError::Validation)?;
    }
    if let Some(password) = &payload.password {
        validation::validate_password(password).map_err(ApiError::Validation)?;
    }

    let current = state
        .user_repository
        .find_by_id(auth.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut changes = UserChanges::default();
    if let Some(name) = payload.name {
        if name != current.name {
            changes.name = Some(name);
        }
    }
    if let Some(email) = payload.email {
        if email != current.email {
            changes.email = Some(email);
        }
    }
    if let Some(location) = payload.location {
        if current.location.as_deref() != Some(location.as_str()) {
            changes.location = Some(location);
        }
    }
    if let Some(password) = payload.password {
        let hashed = password::hash(&password).map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::Hashing(e.to_string())
        })?;
        changes.password_hash = Some(hashed);
    }

    if changes.is_empty() {
        return Ok(Json(json!({ "success": true, "message": "No changes made." })));
    }

    state
        .user_repository
        .update_credentials(auth.user_id, &changes)
        .await
        .map_err(identity_error)?;

    Ok(Json(json!({ "success": true })))
}

/// Query for browsing listings
#[derive(Deserialize)]
pub struct ListingsQuery {
    pub ordering: Option<String>,
}

/// Browse listings, optionally sorted.
pub async fn get_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ordering = ListingOrdering::parse(query.ordering.as_deref());
    let listings = state.listing_repository.list(ordering).await?;

    Ok(Json(listings))
}

/// Put a piece of machinery up for sale.
pub async fn create_listing(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<CreateListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Extension(auth)) = user else {
        return Err(ApiError::Unauthenticated);
    };

    validation::validate_listing(&payload).map_err(ApiError::Validation)?;

    state
        .listing_repository
        .create(auth.user_id, &payload)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Payload carrying a listing id
#[derive(Deserialize)]
pub struct ListingIdPayload {
    pub listing_id: Option<String>,
}

/// Take a listing down. Only its owner may do so.
pub async fn delete_listing(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<ListingIdPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Extension(auth)) = user else {
        return Err(ApiError::Unauthenticated);
    };

    let listing_id = parse_listing_id(payload.listing_id)?;

    match state
        .listing_repository
        .delete(listing_id, auth.user_id)
        .await?
    {
        DeleteListingOutcome::Deleted => Ok(Json(json!({ "success": true }))),
        DeleteListingOutcome::NotFound => Err(ApiError::NotFound),
        DeleteListingOutcome::NotOwner => Err(ApiError::Forbidden),
    }
}

/// Count one view of a listing. Anyone can trigger this.
pub async fn record_view(
    State(state): State<AppState>,
    Json(payload): Json<ListingIdPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let listing_id = parse_listing_id(payload.listing_id)?;

    state.listing_repository.increment_views(listing_id).await?;

    Ok(Json(json!({ "success": true })))
}

/// The requester's favourites, each paired with its listing. Anonymous
/// requests get an empty list rather than an error.
pub async fn get_favourites(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Extension(auth)) = user else {
        return Ok(Json(Vec::<FavouriteListing>::new()));
    };

    let favourites = state
        .favourite_repository
        .list_for_user(auth.user_id)
        .await?;

    Ok(Json(favourites))
}

/// Bookmark a listing. Adding the same favourite twice is a no-op.
pub async fn add_favourite(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<ListingIdPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Extension(auth)) = user else {
        return Err(ApiError::Unauthenticated);
    };

    let listing_id = parse_listing_id(payload.listing_id)?;

    state
        .favourite_repository
        .add(auth.user_id, listing_id)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Drop a bookmark. Removing an absent favourite is a no-op.
pub async fn remove_favourite(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<ListingIdPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Extension(auth)) = user else {
        return Err(ApiError::Unauthenticated);
    };

    let listing_id = parse_listing_id(payload.listing_id)?;

    state
        .favourite_repository
        .remove(auth.user_id, listing_id)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Query for reading bids
#[derive(Deserialize)]
pub struct BiddingsQuery {
    pub listing_id: Option<String>,
}

/// Bids on a listing, highest first. An empty listing id means "no query"
/// and returns null rather than an empty list.
pub async fn get_biddings(
    State(state): State<AppState>,
    Query(query): Query<BiddingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let listing_id = match query.listing_id.as_deref() {
        None | Some("") => return Ok(Json(None::<Vec<BidView>>)),
        Some(value) => Uuid::parse_str(value)
            .map_err(|_| ApiError::Validation("Invalid listing_id".to_string()))?,
    };

    let bids = state.bid_repository.list_for_listing(listing_id).await?;

    Ok(Json(Some(bids)))
}

/// Place or replace the requester's bid on a listing. A second bid from
/// the same user overwrites the first.
pub async fn place_bid(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<PlaceBidRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Extension(auth)) = user else {
        return Err(ApiError::Unauthenticated);
    };

    let listing_id = parse_listing_id(payload.listing_id)?;

    state
        .bid_repository
        .place(listing_id, payload.amount, auth.user_id)
        .await?;

    Ok(Json(json!({ "success": true })))
}
