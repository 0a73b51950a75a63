//! API integration tests against a running server
//!
//! Start the server with the default bootstrap librarian, then run:
//! `cargo test -- --ignored`

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const LIBRARIAN_EMAIL: &str = "librarian@lib.com";
const LIBRARIAN_PASSWORD: &str = "Test123!";

async fn login(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["data"]["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

/// Register a fresh member and return (token, user id)
async fn new_member(client: &Client) -> (String, i64) {
    let email = format!(
        "member-{}@lib.com",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    );
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "email": email, "password": "Secret1!" }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    (
        body["data"]["token"].as_str().unwrap().to_string(),
        body["data"]["user"]["id"].as_i64().unwrap(),
    )
}

async fn new_book(client: &Client, librarian: &str, title: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(librarian)
        .json(&json!({ "title": title, "author": "Mesa Selimovic", "year": 1966, "genre": "Novel" }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_i64().unwrap()
}

async fn get_book(client: &Client, id: i64) -> Value {
    let body: Value = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["data"].clone()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": LIBRARIAN_EMAIL, "password": LIBRARIAN_PASSWORD }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers().get("set-cookie").is_some());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["user"]["role"], "Librarian");
}

#[tokio::test]
#[ignore]
async fn test_wrong_password() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": LIBRARIAN_EMAIL, "password": "nope" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
#[ignore]
async fn test_loan_and_return() {
    let client = Client::new();
    let librarian = login(&client, LIBRARIAN_EMAIL, LIBRARIAN_PASSWORD).await;
    let (_, member_id) = new_member(&client).await;
    let book_id = new_book(&client, &librarian, "Dervis i smrt").await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&librarian)
        .json(&json!({ "book_id": book_id, "user_id": member_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let loan: Value = response.json().await.unwrap();
    let loan_id = loan["data"]["id"].as_i64().unwrap();
    assert_eq!(loan["data"]["status"], "Active");
    assert_eq!(get_book(&client, book_id).await["is_available"], false);

    // A second loan of the same copy is refused
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&librarian)
        .json(&json!({ "book_id": book_id, "user_id": member_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Book is not available");

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .bearer_auth(&librarian)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["status"], "Returned");
    assert!(body["data"]["return_date"].is_string());
    assert_eq!(get_book(&client, book_id).await["is_available"], true);

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .bearer_auth(&librarian)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Loan already returned");
}

#[tokio::test]
#[ignore]
async fn test_reservation_approval_creates_loan() {
    let client = Client::new();
    let librarian = login(&client, LIBRARIAN_EMAIL, LIBRARIAN_PASSWORD).await;
    let (member, member_id) = new_member(&client).await;
    let book_id = new_book(&client, &librarian, "Na Drini cuprija").await;

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .bearer_auth(&member)
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let reservation: Value = response.json().await.unwrap();
    let reservation_id = reservation["data"]["id"].as_i64().unwrap();
    assert_eq!(reservation["data"]["is_approved"], false);

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .bearer_auth(&member)
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/reservations/{}/approve", BASE_URL, reservation_id))
        .bearer_auth(&librarian)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let loan: Value = response.json().await.unwrap();
    assert_eq!(loan["data"]["status"], "Active");
    assert_eq!(loan["data"]["user"]["id"].as_i64(), Some(member_id));
    assert_eq!(loan["data"]["book"]["id"].as_i64(), Some(book_id));
    assert_eq!(get_book(&client, book_id).await["is_available"], false);

    let response = client
        .post(format!("{}/reservations/{}/approve", BASE_URL, reservation_id))
        .bearer_auth(&librarian)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Reservation already approved");

    let my_loans: Value = client
        .get(format!("{}/loans/my", BASE_URL))
        .bearer_auth(&member)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let open_for_book = my_loans["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|l| l["book"]["id"].as_i64() == Some(book_id) && l["status"] == "Active")
        .count();
    assert_eq!(open_for_book, 1);
}

#[tokio::test]
#[ignore]
async fn test_member_cancels_own_reservation() {
    let client = Client::new();
    let librarian = login(&client, LIBRARIAN_EMAIL, LIBRARIAN_PASSWORD).await;
    let (member, _) = new_member(&client).await;
    let (other, _) = new_member(&client).await;
    let book_id = new_book(&client, &librarian, "Prokleta avlija").await;

    let reservation: Value = client
        .post(format!("{}/reservations", BASE_URL))
        .bearer_auth(&member)
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let reservation_id = reservation["data"]["id"].as_i64().unwrap();

    let response = client
        .delete(format!("{}/reservations/{}", BASE_URL, reservation_id))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .delete(format!("{}/reservations/{}", BASE_URL, reservation_id))
        .bearer_auth(&member)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_review_rejected() {
    let client = Client::new();
    let librarian = login(&client, LIBRARIAN_EMAIL, LIBRARIAN_PASSWORD).await;
    let (member, _) = new_member(&client).await;
    let book_id = new_book(&client, &librarian, "Tvrdjava").await;

    let review = json!({ "book_id": book_id, "rating": 4, "comment": "Worth it" });
    let response = client
        .post(format!("{}/reviews", BASE_URL))
        .bearer_auth(&member)
        .json(&review)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/reviews", BASE_URL))
        .bearer_auth(&member)
        .json(&review)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "You have already reviewed this book");

    let rating: Value = client
        .get(format!("{}/books/{}/rating", BASE_URL, book_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rating["data"]["review_count"], 1);
    assert_eq!(rating["data"]["average_rating"], 4.0);
}

#[tokio::test]
#[ignore]
async fn test_fine_paid_once() {
    let client = Client::new();
    let librarian = login(&client, LIBRARIAN_EMAIL, LIBRARIAN_PASSWORD).await;
    let (_, member_id) = new_member(&client).await;

    let fine: Value = client
        .post(format!("{}/fines", BASE_URL))
        .bearer_auth(&librarian)
        .json(&json!({ "user_id": member_id, "amount": "3.50", "reason": "Late return" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let fine_id = fine["data"]["id"].as_i64().unwrap();
    assert_eq!(fine["data"]["is_paid"], false);

    let response = client
        .post(format!("{}/fines/{}/pay", BASE_URL, fine_id))
        .bearer_auth(&librarian)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{}/fines/{}/pay", BASE_URL, fine_id))
        .bearer_auth(&librarian)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Fine is already paid");
}

#[tokio::test]
#[ignore]
async fn test_overdue_sweep_skips_current_loans() {
    let client = Client::new();
    let librarian = login(&client, LIBRARIAN_EMAIL, LIBRARIAN_PASSWORD).await;
    let (_, member_id) = new_member(&client).await;
    let book_id = new_book(&client, &librarian, "Kameni spavac").await;

    let loan: Value = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&librarian)
        .json(&json!({ "book_id": book_id, "user_id": member_id, "days": 14 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let loan_id = loan["data"]["id"].as_i64().unwrap();

    let sweep: Value = client
        .post(format!("{}/loans/check-overdue", BASE_URL))
        .bearer_auth(&librarian)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let swept = sweep["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|l| l["id"].as_i64() == Some(loan_id));
    assert!(!swept, "a loan due in two weeks must stay Active");
}
