mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::TestApp;
use event_backend::domain::models::event::RegistrationOutcome;

#[tokio::test]
async fn test_register_and_withdraw() {
    let app = TestApp::new().await;
    let token_a = app.signup_and_login("Alice", "alice@example.com").await;
    let event_id = app.create_event(&token_a, "Workshop", 10).await;

    let token_b = app.signup_and_login("Bob", "bob@example.com").await;

    let response = app
        .request("POST", &format!("/events/{}/register", event_id), Some(&token_b), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            "POST",
            &format!("/events/{}/cancel-registration", event_id),
            Some(&token_b),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Withdrawing twice fails: no registration left to cancel.
    let response = app
        .request(
            "POST",
            &format!("/events/{}/cancel-registration", event_id),
            Some(&token_b),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = TestApp::new().await;
    let token_a = app.signup_and_login("Alice", "alice@example.com").await;
    let event_id = app.create_event(&token_a, "Workshop", 10).await;

    let token_b = app.signup_and_login("Bob", "bob@example.com").await;

    let response = app
        .request("POST", &format!("/events/{}/register", event_id), Some(&token_b), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request("POST", &format!("/events/{}/register", event_id), Some(&token_b), None)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_attendees WHERE event_id = ?")
        .bind(&event_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_sold_out_event_rejects_registration() {
    let app = TestApp::new().await;
    let token_a = app.signup_and_login("Alice", "alice@example.com").await;
    let event_id = app.create_event(&token_a, "Tiny Workshop", 1).await;

    let token_b = app.signup_and_login("Bob", "bob@example.com").await;
    let token_c = app.signup_and_login("Carol", "carol@example.com").await;

    let response = app
        .request("POST", &format!("/events/{}/register", event_id), Some(&token_b), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request("POST", &format!("/events/{}/register", event_id), Some(&token_c), None)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_withdrawal_frees_a_seat() {
    let app = TestApp::new().await;
    let token_a = app.signup_and_login("Alice", "alice@example.com").await;
    let event_id = app.create_event(&token_a, "Tiny Workshop", 1).await;

    let token_b = app.signup_and_login("Bob", "bob@example.com").await;
    let token_c = app.signup_and_login("Carol", "carol@example.com").await;

    app.request("POST", &format!("/events/{}/register", event_id), Some(&token_b), None)
        .await;

    let response = app
        .request("POST", &format!("/events/{}/register", event_id), Some(&token_c), None)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    app.request(
        "POST",
        &format!("/events/{}/cancel-registration", event_id),
        Some(&token_b),
        None,
    )
    .await;

    let response = app
        .request("POST", &format!("/events/{}/register", event_id), Some(&token_c), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_canceled_event_blocks_registration_and_withdrawal() {
    let app = TestApp::new().await;
    let token_a = app.signup_and_login("Alice", "alice@example.com").await;
    let event_id = app.create_event(&token_a, "Doomed Workshop", 10).await;

    let token_b = app.signup_and_login("Bob", "bob@example.com").await;
    app.request("POST", &format!("/events/{}/register", event_id), Some(&token_b), None)
        .await;

    let response = app
        .request("DELETE", &format!("/events/{}", event_id), Some(&token_a), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let token_c = app.signup_and_login("Carol", "carol@example.com").await;
    let response = app
        .request("POST", &format!("/events/{}/register", event_id), Some(&token_c), None)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .request(
            "POST",
            &format!("/events/{}/cancel-registration", event_id),
            Some(&token_b),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// A registration that slips past the handler's pre-check while a cancellation
// lands must still lose at the store.
#[tokio::test]
async fn test_store_rejects_registration_after_cancellation() {
    let app = TestApp::new().await;
    let token_a = app.signup_and_login("Alice", "alice@example.com").await;
    let event_id = app.create_event(&token_a, "Doomed Workshop", 5).await;

    let response = app
        .request("DELETE", &format!("/events/{}", event_id), Some(&token_a), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let outcome = app
        .state
        .event_repo
        .register_attendee(&event_id, "late-caller", Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome, RegistrationOutcome::Canceled);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_attendees WHERE event_id = ?")
        .bind(&event_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_register_on_missing_event_is_not_found() {
    let app = TestApp::new().await;
    let token = app.signup_and_login("Alice", "alice@example.com").await;

    let response = app
        .request("POST", "/events/no-such-event/register", Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
