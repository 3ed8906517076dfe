use std::sync::Arc;

use adapter::repository::memory::{
    InMemoryAttendeeRepository, InMemoryAuthRepository, InMemoryEventRepository,
    InMemoryHealthCheckRepository, InMemoryStore, InMemoryUserRepository,
};
use api::route::v1;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use kernel::model::id::UserId;
use kernel::model::role::Role;
use kernel::model::user::User;
use registry::AppRegistry;
use serde_json::{json, Value};
use tower::ServiceExt;

const ADMIN_TOKEN: &str = "admin-token";
const MEMBER_TOKEN: &str = "member-token";
const OTHER_MEMBER_TOKEN: &str = "other-member-token";

async fn test_app() -> Router {
    let store = InMemoryStore::new();

    let admin = User {
        id: UserId::new(),
        name: "Site Admin".into(),
        email: "admin@example.com".into(),
        role: Role::Admin,
    };
    let member = User {
        id: UserId::new(),
        name: "Member".into(),
        email: "member@example.com".into(),
        role: Role::User,
    };
    let other_member = User {
        id: UserId::new(),
        name: "Other Member".into(),
        email: "other@example.com".into(),
        role: Role::User,
    };
    store.insert_token(ADMIN_TOKEN, admin.id).await;
    store.insert_token(MEMBER_TOKEN, member.id).await;
    store.insert_token(OTHER_MEMBER_TOKEN, other_member.id).await;
    store.insert_user(admin).await;
    store.insert_user(member).await;
    store.insert_user(other_member).await;

    let registry = AppRegistry::from_parts(
        Arc::new(InMemoryHealthCheckRepository),
        Arc::new(InMemoryEventRepository(store.clone())),
        Arc::new(InMemoryAttendeeRepository(store.clone())),
        Arc::new(InMemoryUserRepository(store.clone())),
        Arc::new(InMemoryAuthRepository(store.clone())),
    );

    v1::routes().with_state(registry)
}

async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn event_body(title: &str, capacity: i32) -> Value {
    json!({
        "title": title,
        "description": "An event",
        "date": "2030-09-15T09:00:00Z",
        "location": "Convention Center",
        "capacity": capacity,
    })
}

async fn create_event(app: &Router, title: &str, capacity: i32) -> String {
    let (status, body) = request(
        app,
        Method::POST,
        "/api/v1/events",
        Some(ADMIN_TOKEN),
        Some(event_body(title, capacity)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn register(
    app: &Router,
    event_id: &str,
    name: &str,
    email: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    request(
        app,
        Method::POST,
        &format!("/api/v1/events/{event_id}/attendees"),
        token,
        Some(json!({ "name": name, "email": email })),
    )
    .await
}

#[tokio::test]
async fn health_check_works() {
    let app = test_app().await;
    let (status, _) = request(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_requires_authentication() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/events",
        None,
        Some(event_body("Tech Conference", 10)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn create_by_non_admin_is_forbidden_and_persists_nothing() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/events",
        Some(MEMBER_TOKEN),
        Some(event_body("Tech Conference", 10)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (_, body) = request(&app, Method::GET, "/api/v1/events", None, None).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_validates_fields() {
    let app = test_app().await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/events",
        Some(ADMIN_TOKEN),
        Some(event_body("", 10)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
    assert_eq!(body["field"], "title");

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/events",
        Some(ADMIN_TOKEN),
        Some(event_body("Tech Conference", 0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
    assert_eq!(body["field"], "capacity");
}

#[tokio::test]
async fn created_events_start_unpublished() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/v1/events",
        Some(ADMIN_TOKEN),
        Some(event_body("Tech Conference", 10)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isPublished"], false);
}

#[tokio::test]
async fn publish_flag_controls_published_listing() {
    let app = test_app().await;
    let event_id = create_event(&app, "Tech Conference", 10).await;

    let (_, body) = request(
        &app,
        Method::GET,
        "/api/v1/events?onlyPublished=true",
        None,
        None,
    )
    .await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    let (status, body) = request(
        &app,
        Method::PATCH,
        &format!("/api/v1/events/{event_id}/publish"),
        Some(ADMIN_TOKEN),
        Some(json!({ "isPublished": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isPublished"], true);

    let (_, body) = request(
        &app,
        Method::GET,
        "/api/v1/events?onlyPublished=true",
        None,
        None,
    )
    .await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn publish_requires_admin_role() {
    let app = test_app().await;
    let event_id = create_event(&app, "Tech Conference", 10).await;

    let (status, body) = request(
        &app,
        Method::PATCH,
        &format!("/api/v1/events/{event_id}/publish"),
        Some(MEMBER_TOKEN),
        Some(json!({ "isPublished": true })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}

#[tokio::test]
async fn listing_is_ordered_by_date() {
    let app = test_app().await;
    for (title, date) in [
        ("Later", "2031-01-01T09:00:00Z"),
        ("Sooner", "2030-01-01T09:00:00Z"),
    ] {
        let (status, _) = request(
            &app,
            Method::POST,
            "/api/v1/events",
            Some(ADMIN_TOKEN),
            Some(json!({
                "title": title,
                "description": "An event",
                "date": date,
                "location": "Convention Center",
                "capacity": 5,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = request(&app, Method::GET, "/api/v1/events", None, None).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["title"], "Sooner");
    assert_eq!(items[1]["title"], "Later");
}

#[tokio::test]
async fn capacity_two_admits_alice_and_bob_but_not_carol() {
    let app = test_app().await;
    let event_id = create_event(&app, "Tech Conference", 2).await;

    let (status, _) = register(&app, &event_id, "Alice", "alice@x.com", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = register(&app, &event_id, "Bob", "bob@x.com", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, &event_id, "Carol", "carol@x.com", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "capacity_exceeded");

    let (_, body) = request(
        &app,
        Method::GET,
        "/api/v1/events?onlyPublished=false",
        None,
        None,
    )
    .await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["attendeeCount"], 2);
}

#[tokio::test]
async fn same_identity_cannot_register_twice() {
    let app = test_app().await;
    let event_id = create_event(&app, "Tech Conference", 10).await;

    let (status, _) = register(
        &app,
        &event_id,
        "Member",
        "member@example.com",
        Some(MEMBER_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(
        &app,
        &event_id,
        "Member",
        "member@example.com",
        Some(MEMBER_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "duplicate_registration");

    let (_, body) = request(
        &app,
        Method::GET,
        &format!("/api/v1/events/{event_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(body["attendees"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn freed_slot_admits_the_next_registration() {
    let app = test_app().await;
    let event_id = create_event(&app, "Tech Conference", 1).await;

    let (status, body) = register(
        &app,
        &event_id,
        "Member",
        "member@example.com",
        Some(MEMBER_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let attendee_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = register(
        &app,
        &event_id,
        "Other",
        "other@example.com",
        Some(OTHER_MEMBER_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "capacity_exceeded");

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/api/v1/attendees/{attendee_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = register(
        &app,
        &event_id,
        "Other",
        "other@example.com",
        Some(OTHER_MEMBER_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn registration_validates_name_and_email() {
    let app = test_app().await;
    let event_id = create_event(&app, "Tech Conference", 10).await;

    let (status, body) = register(&app, &event_id, "Alice", "not-an-email", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
    assert_eq!(body["field"], "email");

    let (status, body) = register(&app, &event_id, "", "alice@x.com", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
    assert_eq!(body["field"], "name");
}

#[tokio::test]
async fn registration_against_unknown_event_is_not_found() {
    let app = test_app().await;
    let (status, body) = register(
        &app,
        "0190c3c5-9f3c-7a5a-8b3e-5a1d4c2b1a99",
        "Alice",
        "alice@x.com",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn registration_with_unknown_token_is_rejected() {
    let app = test_app().await;
    let event_id = create_event(&app, "Tech Conference", 10).await;

    let (status, body) = register(
        &app,
        &event_id,
        "Alice",
        "alice@x.com",
        Some("stale-token"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn deleting_an_event_cascades_to_attendees() {
    let app = test_app().await;
    let event_id = create_event(&app, "Tech Conference", 10).await;

    register(&app, &event_id, "Alice", "alice@x.com", None).await;
    let (_, body) = register(&app, &event_id, "Bob", "bob@x.com", None).await;
    let attendee_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/api/v1/events/{event_id}"),
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = request(
        &app,
        Method::GET,
        &format!("/api/v1/events/{event_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    // A registration against the deleted event cannot resurrect it.
    let (status, _) = register(&app, &event_id, "Carol", "carol@x.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Removing an attendee of the deleted event is still a success.
    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/api/v1/attendees/{attendee_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn deleting_a_missing_event_is_not_found() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        Method::DELETE,
        "/api/v1/events/0190c3c5-9f3c-7a5a-8b3e-5a1d4c2b1a99",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn delete_requires_admin_role() {
    let app = test_app().await;
    let event_id = create_event(&app, "Tech Conference", 10).await;

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/api/v1/events/{event_id}"),
        Some(MEMBER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn current_user_is_exposed_for_valid_tokens() {
    let app = test_app().await;

    let (status, body) = request(&app, Method::GET, "/api/v1/users/me", Some(MEMBER_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "user");
    assert_eq!(body["email"], "member@example.com");

    let (status, _) = request(&app, Method::GET, "/api/v1/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
