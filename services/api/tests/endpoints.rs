//! HTTP-level tests driving the full router, cookie round-trips included

mod support;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use api::routes::create_router;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request_with_cookie(method: &str, uri: &str, cookie: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `session=<token>` pair from a response's Set-Cookie header.
fn session_cookie_of(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing set-cookie header")
        .to_str()
        .unwrap();

    set_cookie.split(';').next().unwrap().to_string()
}

async fn signup(app: &Router, name: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/signup",
            json!({ "name": name, "email": email, "password": "tractor-blue-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    session_cookie_of(&response)
}

fn listing_body() -> Value {
    json!({
        "title": "John Deere 5075E Tractor",
        "price": 32500,
        "price_type": "negotiable",
        "condition": "used",
        "location": "Springfield, MO",
        "picture": "johndeere-5075e.jpg",
        "description": "2018 model with 450 engine hours.",
        "make": "John Deere",
        "model": "5075E",
        "vehicle_type": "Utility Tractor",
        "year_of_manufacture": 2018,
        "fuel_or_power": "Diesel",
        "weight": 5075.0
    })
}

#[tokio::test]
async fn mutating_endpoints_reject_anonymous_requests() {
    let app = create_router(support::test_state().await);
    let id = Uuid::new_v4();

    let cases = [
        ("POST", "/listings", listing_body()),
        ("DELETE", "/listings", json!({ "listing_id": id })),
        ("POST", "/favourites", json!({ "listing_id": id })),
        ("DELETE", "/favourites", json!({ "listing_id": id })),
        ("POST", "/biddings", json!({ "listing_id": id, "amount": 100 })),
        ("POST", "/update-credentials", json!({ "name": "intruder" })),
    ];

    for (method, uri, body) in cases {
        let response = app
            .clone()
            .oneshot(json_request(method, uri, body))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should require a session"
        );
    }
}

#[tokio::test]
async fn signup_login_logout_session_round_trip() {
    let app = create_router(support::test_state().await);

    let cookie = signup(&app, "alice", "alice@example.com").await;
    assert!(cookie.starts_with("session="));

    // The cookie authenticates a mutating request.
    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            "/favourites",
            &cookie,
            json!({ "listing_id": Uuid::new_v4() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Logging back in with the right password works.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "email": "alice@example.com", "password": "tractor-blue-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The wrong password is rejected with the same shape as an unknown email.
    let wrong_password = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "email": "alice@example.com", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "email": "nobody@example.com", "password": "tractor-blue-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(wrong_password).await,
        body_json(unknown_email).await
    );

    // Logout clears the cookie...
    let response = app
        .clone()
        .oneshot(json_request_with_cookie("POST", "/logout", &cookie, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cleared.starts_with("session="));
    assert!(cleared.contains("Max-Age=0"));

    // ...and the old token no longer authenticates.
    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            "/favourites",
            &cookie,
            json!({ "listing_id": Uuid::new_v4() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_signup_is_rejected() {
    let app = create_router(support::test_state().await);

    signup(&app, "alice", "alice@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/signup",
            json!({ "name": "alice", "email": "other@example.com", "password": "tractor-blue-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/signup",
            json!({ "name": "other", "email": "alice@example.com", "password": "tractor-blue-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_validates_input_shape() {
    let app = create_router(support::test_state().await);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/signup",
            json!({ "name": "alice", "email": "not-an-email", "password": "tractor-blue-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/signup",
            json!({ "name": "alice", "email": "alice@example.com", "password": "short" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn anonymous_favourites_read_as_empty_but_writes_are_rejected() {
    let app = create_router(support::test_state().await);

    let response = app.clone().oneshot(get_request("/favourites")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/favourites",
            json!({ "listing_id": Uuid::new_v4() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The rejected write left nothing behind.
    let cookie = signup(&app, "alice", "alice@example.com").await;
    let response = app
        .clone()
        .oneshot(json_request_with_cookie("GET", "/favourites", &cookie, json!({})))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn biddings_empty_query_returns_the_null_sentinel() {
    let app = create_router(support::test_state().await);

    let response = app
        .clone()
        .oneshot(get_request("/biddings?listing_id="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, Value::Null);

    // A real query with no bids is an empty list, not null.
    let uri = format!("/biddings?listing_id={}", Uuid::new_v4());
    let response = app.clone().oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn bid_replacement_shows_one_leaderboard_entry() {
    let state = support::test_state().await;
    let app = create_router(state);

    let owner = signup(&app, "bob", "bob@example.com").await;
    let bidder = signup(&app, "alice", "alice@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request_with_cookie("POST", "/listings", &owner, listing_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get_request("/listings")).await.unwrap();
    let listings = body_json(response).await;
    let listing_id = listings[0]["id"].as_str().unwrap().to_string();

    for amount in [100, 150] {
        let response = app
            .clone()
            .oneshot(json_request_with_cookie(
                "POST",
                "/biddings",
                &bidder,
                json!({ "listing_id": listing_id, "amount": amount }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let uri = format!("/biddings?listing_id={listing_id}");
    let response = app.clone().oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(
        body_json(response).await,
        json!([{ "amount_bid": 150, "username": "alice" }])
    );
}

#[tokio::test]
async fn views_count_through_the_endpoint() {
    let app = create_router(support::test_state().await);

    let cookie = signup(&app, "alice", "alice@example.com").await;
    let response = app
        .clone()
        .oneshot(json_request_with_cookie("POST", "/listings", &cookie, listing_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get_request("/listings")).await.unwrap();
    let listings = body_json(response).await;
    let listing_id = listings[0]["id"].as_str().unwrap().to_string();
    assert_eq!(listings[0]["views"], json!(0));

    // A view needs no session.
    let response = app
        .clone()
        .oneshot(json_request("POST", "/view", json!({ "listing_id": listing_id })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A missing id is a bad request.
    let response = app
        .clone()
        .oneshot(json_request("POST", "/view", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.clone().oneshot(get_request("/listings")).await.unwrap();
    assert_eq!(body_json(response).await[0]["views"], json!(1));
}

#[tokio::test]
async fn listing_deletion_is_owner_gated_over_http() {
    let app = create_router(support::test_state().await);

    let owner = signup(&app, "owner", "owner@example.com").await;
    let intruder = signup(&app, "intruder", "intruder@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request_with_cookie("POST", "/listings", &owner, listing_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get_request("/listings")).await.unwrap();
    let listing_id = body_json(response).await[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "DELETE",
            "/listings",
            &intruder,
            json!({ "listing_id": listing_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "DELETE",
            "/listings",
            &owner,
            json!({ "listing_id": listing_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "DELETE",
            "/listings",
            &owner,
            json!({ "listing_id": listing_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_credentials_distinguishes_no_changes() {
    let app = create_router(support::test_state().await);

    let cookie = signup(&app, "alice", "alice@example.com").await;

    // The same name again is an effectively empty patch.
    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            "/update-credentials",
            &cookie,
            json!({ "name": "alice" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "message": "No changes made." })
    );

    // A new location is applied.
    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            "/update-credentials",
            &cookie,
            json!({ "location": "Green Valley Farm, KS" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));

    // A malformed email in the patch is rejected.
    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            "/update-credentials",
            &cookie,
            json!({ "email": "not-an-email" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A password change takes effect at the next login.
    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            "/update-credentials",
            &cookie,
            json!({ "password": "combine-harvester-7" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "email": "alice@example.com", "password": "combine-harvester-7" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn stale_session_cookie_is_cleared_by_the_middleware() {
    let app = create_router(support::test_state().await);

    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "GET",
            "/favourites",
            "session=0000000000000000000000000000000000000000000000000000000000000000",
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("stale cookie should be cleared")
        .to_str()
        .unwrap();
    assert!(cleared.starts_with("session="));
    assert!(cleared.contains("Max-Age=0"));

    assert_eq!(body_json(response).await, json!([]));
}
