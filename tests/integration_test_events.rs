mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::{json, Value};

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn event_payload() -> Value {
    json!({
        "title": "Community Concert",
        "description": "An evening of local music",
        "location": "Town Hall",
        "starts_at": (Utc::now() + Duration::days(30)).to_rfc3339(),
        "sales_open_at": (Utc::now() - Duration::hours(1)).to_rfc3339(),
        "sales_close_at": (Utc::now() + Duration::days(29)).to_rfc3339(),
        "ticket_price": 10.0,
        "max_tickets": 100,
        "per_user_limit": 5,
        "promo_codes": [{ "code": "SUMMER50", "discount_percent": 50.0 }]
    })
}

async fn create_event(app: &TestApp, organizer: &str, payload: Value) -> String {
    let res = app.request("POST", "/api/v1/events", Some(organizer), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_event_returns_full_event() {
    let app = TestApp::new().await;

    let res = app.request("POST", "/api/v1/events", Some("org-1"), Some(event_payload())).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert!(body["id"].as_str().is_some());
    assert_eq!(body["organizer_id"], "org-1");
    assert_eq!(body["title"], "Community Concert");
    assert_eq!(body["tickets_booked"], 0);
    assert_eq!(body["max_tickets"], 100);
    assert_eq!(body["promo_codes"][0]["code"], "SUMMER50");
}

#[tokio::test]
async fn test_create_event_requires_user_context() {
    let app = TestApp::new().await;

    let res = app.request("POST", "/api/v1/events", None, Some(event_payload())).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    // Same envelope as every other error, not a bare status.
    let body = parse_body(res).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_get_event_hides_promo_codes_from_public() {
    let app = TestApp::new().await;
    let event_id = create_event(&app, "org-1", event_payload()).await;

    let res = app.request("GET", &format!("/api/v1/events/{}", event_id), None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert!(body.get("promo_codes").is_none());
    assert_eq!(body["tickets_remaining"], 100);

    let res = app.request("GET", &format!("/api/v1/events/{}", event_id), Some("someone-else"), None).await;
    let body = parse_body(res).await;
    assert!(body.get("promo_codes").is_none());

    let res = app.request("GET", &format!("/api/v1/events/{}", event_id), Some("org-1"), None).await;
    let body = parse_body(res).await;
    assert_eq!(body["promo_codes"][0]["code"], "SUMMER50");
}

#[tokio::test]
async fn test_get_missing_event_returns_404() {
    let app = TestApp::new().await;

    let res = app.request("GET", "/api/v1/events/no-such-event", None, None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "EVENT_NOT_FOUND");
}

#[tokio::test]
async fn test_list_events_includes_remaining_capacity() {
    let app = TestApp::new().await;
    create_event(&app, "org-1", event_payload()).await;

    let mut second = event_payload();
    second["title"] = json!("Second Show");
    create_event(&app, "org-2", second).await;

    let res = app.request("GET", "/api/v1/events", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 2);
    for event in events {
        assert_eq!(event["tickets_remaining"], 100);
        assert!(event.get("promo_codes").is_none());
    }
}

#[tokio::test]
async fn test_event_validation_rules() {
    let app = TestApp::new().await;

    let mut payload = event_payload();
    payload["title"] = json!("   ");
    let res = app.request("POST", "/api/v1/events", Some("org-1"), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut payload = event_payload();
    payload["ticket_price"] = json!(-1.0);
    let res = app.request("POST", "/api/v1/events", Some("org-1"), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut payload = event_payload();
    payload["max_tickets"] = json!(0);
    let res = app.request("POST", "/api/v1/events", Some("org-1"), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut payload = event_payload();
    payload["per_user_limit"] = json!(0);
    let res = app.request("POST", "/api/v1/events", Some("org-1"), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut payload = event_payload();
    payload["sales_close_at"] = json!((Utc::now() - Duration::days(2)).to_rfc3339());
    payload["sales_open_at"] = json!((Utc::now() - Duration::days(1)).to_rfc3339());
    let res = app.request("POST", "/api/v1/events", Some("org-1"), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_promo_code_rules() {
    let app = TestApp::new().await;

    let mut payload = event_payload();
    payload["promo_codes"] = json!([
        { "code": "SUMMER50", "discount_percent": 50.0 },
        { "code": "summer50", "discount_percent": 20.0 }
    ]);
    let res = app.request("POST", "/api/v1/events", Some("org-1"), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert_eq!(body["code"], "INVALID_INPUT");

    let mut payload = event_payload();
    payload["promo_codes"] = json!([{ "code": "TOOMUCH", "discount_percent": 150.0 }]);
    let res = app.request("POST", "/api/v1/events", Some("org-1"), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut payload = event_payload();
    payload["promo_codes"] = json!([{ "code": "  ", "discount_percent": 10.0 }]);
    let res = app.request("POST", "/api/v1/events", Some("org-1"), Some(payload)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_event_requires_organizer() {
    let app = TestApp::new().await;
    let event_id = create_event(&app, "org-1", event_payload()).await;

    let res = app.request(
        "PUT",
        &format!("/api/v1/events/{}", event_id),
        Some("intruder"),
        Some(json!({ "title": "Hijacked" })),
    ).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.request(
        "PUT",
        &format!("/api/v1/events/{}", event_id),
        Some("org-1"),
        Some(json!({ "title": "Renamed Concert", "ticket_price": 12.5 })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["title"], "Renamed Concert");
    assert_eq!(body["ticket_price"], 12.5);
}

#[tokio::test]
async fn test_update_event_rejects_inverted_window() {
    let app = TestApp::new().await;
    let event_id = create_event(&app, "org-1", event_payload()).await;

    let res = app.request(
        "PUT",
        &format!("/api/v1/events/{}", event_id),
        Some("org-1"),
        Some(json!({ "sales_close_at": (Utc::now() - Duration::days(10)).to_rfc3339() })),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_capacity_below_booked_rejected() {
    let app = TestApp::new().await;
    let event_id = create_event(&app, "org-1", event_payload()).await;

    let res = app.request(
        "POST",
        &format!("/api/v1/events/{}/tickets", event_id),
        Some("buyer-1"),
        Some(json!({ "quantity": 3 })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request(
        "PUT",
        &format!("/api/v1/events/{}", event_id),
        Some("org-1"),
        Some(json!({ "max_tickets": 2 })),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Shrinking while staying above the booked count is fine.
    let res = app.request(
        "PUT",
        &format!("/api/v1/events/{}", event_id),
        Some("org-1"),
        Some(json!({ "max_tickets": 3 })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["max_tickets"], 3);
}

#[tokio::test]
async fn test_delete_event() {
    let app = TestApp::new().await;
    let event_id = create_event(&app, "org-1", event_payload()).await;

    let res = app.request("DELETE", &format!("/api/v1/events/{}", event_id), Some("intruder"), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.request("DELETE", &format!("/api/v1/events/{}", event_id), Some("org-1"), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("GET", &format!("/api/v1/events/{}", event_id), None, None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_event_with_sold_tickets_rejected() {
    let app = TestApp::new().await;
    let event_id = create_event(&app, "org-1", event_payload()).await;

    let res = app.request(
        "POST",
        &format!("/api/v1/events/{}/tickets", event_id),
        Some("buyer-1"),
        Some(json!({ "quantity": 1 })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("DELETE", &format!("/api/v1/events/{}", event_id), Some("org-1"), None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}
