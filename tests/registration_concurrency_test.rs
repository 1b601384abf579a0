mod common;

use axum::http::StatusCode;
use common::TestApp;

// Two simultaneous registrations against a single seat: exactly one wins.
#[tokio::test]
async fn test_concurrent_registration_never_overshoots_capacity_one() {
    let app = TestApp::new().await;
    let token_a = app.signup_and_login("Alice", "alice@example.com").await;
    let event_id = app.create_event(&token_a, "Single Seat", 1).await;

    let token_b = app.signup_and_login("Bob", "bob@example.com").await;
    let token_c = app.signup_and_login("Carol", "carol@example.com").await;

    let uri = format!("/events/{}/register", event_id);
    let (res_b, res_c) = tokio::join!(
        app.request("POST", &uri, Some(&token_b), None),
        app.request("POST", &uri, Some(&token_c), None),
    );

    let statuses = [res_b.status(), res_c.status()];
    let successes = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let conflicts = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();

    assert_eq!(successes, 1, "exactly one of two simultaneous callers may win");
    assert_eq!(conflicts, 1, "the loser gets a sold-out conflict");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_attendees WHERE event_id = ?")
        .bind(&event_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_concurrent_burst_respects_capacity() {
    let app = TestApp::new().await;
    let token_a = app.signup_and_login("Alice", "alice@example.com").await;
    let event_id = app.create_event(&token_a, "Three Seats", 3).await;

    let mut tokens = Vec::new();
    for i in 0..8 {
        let email = format!("user{}@example.com", i);
        tokens.push(app.signup_and_login(&format!("User {}", i), &email).await);
    }

    let uri = format!("/events/{}/register", event_id);
    let responses = futures::future::join_all(
        tokens.iter().map(|token| app.request("POST", &uri, Some(token), None)),
    )
    .await;

    let successes = responses.iter().filter(|r| r.status() == StatusCode::OK).count();
    assert_eq!(successes, 3, "winners must match capacity exactly");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_attendees WHERE event_id = ?")
        .bind(&event_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 3);

    // No duplicate rows either.
    let distinct: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT user_id) FROM event_attendees WHERE event_id = ?",
    )
    .bind(&event_id)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(distinct, 3);
}
