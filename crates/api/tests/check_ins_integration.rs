//! Integration tests for the admission endpoint.
//!
//! These tests run against a real PostgreSQL database and are ignored by
//! default. Set `TEST_DATABASE_URL` and run with `cargo test -- --ignored`.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_check_in_success_returns_configured_message() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let organizer_id = seed_organizer(&pool).await;

    let portal = create_test_portal(
        &app,
        organizer_id,
        json!({"successMessage": "Welcome to the gala!"}),
    )
    .await;
    let portal_id = portal["id"].as_str().unwrap().to_string();

    let attendee_id = register_test_attendee(&app, &unique_test_email()).await;

    let response = submit_check_in(&app, &portal_id, attendee_id, None).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Welcome to the gala!");
    assert_eq!(body["portalId"].as_str().unwrap(), portal_id);
    assert!(body["id"].as_str().is_some());

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_duplicate_check_in_returns_conflict() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let organizer_id = seed_organizer(&pool).await;

    let portal = create_test_portal(&app, organizer_id, json!({})).await;
    let portal_id = portal["id"].as_str().unwrap().to_string();
    let attendee_id = register_test_attendee(&app, &unique_test_email()).await;

    let first = submit_check_in(&app, &portal_id, attendee_id, None).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = submit_check_in(&app, &portal_id, attendee_id, None).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body = parse_response_body(second).await;
    assert_eq!(body["error"], "DUPLICATE");
    assert_eq!(
        body["message"],
        "Duplicate check-in detected. You are already registered for this event."
    );

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_capacity_boundary_rejects_overflow() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let organizer_id = seed_organizer(&pool).await;

    let portal = create_test_portal(&app, organizer_id, json!({"capacity": 3})).await;
    let portal_id = portal["id"].as_str().unwrap().to_string();

    for _ in 0..3 {
        let attendee_id = register_test_attendee(&app, &unique_test_email()).await;
        let response = submit_check_in(&app, &portal_id, attendee_id, None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let overflow_attendee = register_test_attendee(&app, &unique_test_email()).await;
    let response = submit_check_in(&app, &portal_id, overflow_attendee, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "CAPACITY_REACHED");
    assert_eq!(
        body["message"],
        "Event capacity reached. No more check-ins allowed."
    );

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_concurrent_check_ins_for_last_seat_admit_exactly_one() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let organizer_id = seed_organizer(&pool).await;

    let portal = create_test_portal(&app, organizer_id, json!({"capacity": 1})).await;
    let portal_id = portal["id"].as_str().unwrap().to_string();

    let first = register_test_attendee(&app, &unique_test_email()).await;
    let second = register_test_attendee(&app, &unique_test_email()).await;

    let (a, b) = tokio::join!(
        submit_check_in(&app, &portal_id, first, None),
        submit_check_in(&app, &portal_id, second, None),
    );

    let statuses = [a.status(), b.status()];
    let admitted = statuses
        .iter()
        .filter(|s| **s == StatusCode::CREATED)
        .count();
    let rejected = statuses
        .iter()
        .filter(|s| **s == StatusCode::FORBIDDEN)
        .count();

    assert_eq!(admitted, 1, "exactly one attendee gets the last seat");
    assert_eq!(rejected, 1, "the other is turned away");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_concurrent_duplicate_check_ins_admit_exactly_one() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let organizer_id = seed_organizer(&pool).await;

    let portal = create_test_portal(&app, organizer_id, json!({})).await;
    let portal_id = portal["id"].as_str().unwrap().to_string();
    let attendee_id = register_test_attendee(&app, &unique_test_email()).await;

    let (a, b) = tokio::join!(
        submit_check_in(&app, &portal_id, attendee_id, None),
        submit_check_in(&app, &portal_id, attendee_id, None),
    );

    let statuses = [a.status(), b.status()];
    assert!(statuses.contains(&StatusCode::CREATED));
    assert!(statuses.contains(&StatusCode::CONFLICT));

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_inactive_portal_rejects_check_in() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let organizer_id = seed_organizer(&pool).await;

    let portal = create_test_portal(&app, organizer_id, json!({"isActive": false})).await;
    let portal_id = portal["id"].as_str().unwrap().to_string();
    let attendee_id = register_test_attendee(&app, &unique_test_email()).await;

    let response = submit_check_in(&app, &portal_id, attendee_id, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "INACTIVE");
    assert_eq!(body["message"], "This check-in portal is currently inactive.");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_recurring_portal_allows_one_check_in_per_day() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let organizer_id = seed_organizer(&pool).await;

    let portal = create_test_portal(
        &app,
        organizer_id,
        json!({"isRecurring": true, "recurrencePattern": "DAILY"}),
    )
    .await;
    let portal_id = portal["id"].as_str().unwrap().to_string();
    let attendee_id = register_test_attendee(&app, &unique_test_email()).await;

    let first = submit_check_in(&app, &portal_id, attendee_id, None).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = submit_check_in(&app, &portal_id, attendee_id, None).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body = parse_response_body(second).await;
    assert_eq!(body["error"], "DUPLICATE");
    assert_eq!(
        body["message"],
        "You have already checked in for today's session."
    );

    // The admission record is scoped to today's UTC day.
    let scope_day: Option<chrono::NaiveDate> =
        sqlx::query_scalar("SELECT scope_day FROM check_ins WHERE portal_id = $1")
            .bind(portal_id.parse::<uuid::Uuid>().unwrap())
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(scope_day, Some(chrono::Utc::now().date_naive()));

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_geofence_enforcement() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let organizer_id = seed_organizer(&pool).await;

    let portal = create_test_portal(
        &app,
        organizer_id,
        json!({
            "requireLocation": true,
            "latitude": 40.0,
            "longitude": -74.0,
            "radiusMeters": 100
        }),
    )
    .await;
    let portal_id = portal["id"].as_str().unwrap().to_string();

    // No coordinates supplied
    let attendee_id = register_test_attendee(&app, &unique_test_email()).await;
    let response = submit_check_in(&app, &portal_id, attendee_id, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "LOCATION_REQUIRED");

    // Too far from the venue (~500m north)
    let response = submit_check_in(&app, &portal_id, attendee_id, Some((40.0045, -74.0))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "PROXIMITY_FAILED");
    assert_eq!(
        body["message"],
        "Proximity check failed. You must be within 100m of the venue."
    );

    // At the venue
    let response = submit_check_in(&app, &portal_id, attendee_id, Some((40.0, -74.0))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_check_in_against_unknown_portal_returns_404() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let attendee_id = register_test_attendee(&app, &unique_test_email()).await;

    let response = submit_check_in(
        &app,
        &uuid::Uuid::new_v4().to_string(),
        attendee_id,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_organizer_lists_portal_check_ins() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let organizer_id = seed_organizer(&pool).await;

    let portal = create_test_portal(&app, organizer_id, json!({})).await;
    let portal_id = portal["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let attendee_id = register_test_attendee(&app, &unique_test_email()).await;
        let response = submit_check_in(&app, &portal_id, attendee_id, None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let request = request_with_organizer(
        axum::http::Method::GET,
        &format!("/api/v1/portals/{}/check-ins", portal_id),
        organizer_id,
    );
    let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["checkIns"].as_array().unwrap().len(), 2);

    // Another organizer sees the portal as missing.
    let other_organizer = seed_organizer(&pool).await;
    let request = request_with_organizer(
        axum::http::Method::GET,
        &format!("/api/v1/portals/{}/check-ins", portal_id),
        other_organizer,
    );
    let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    cleanup_all_test_data(&pool).await;
}
