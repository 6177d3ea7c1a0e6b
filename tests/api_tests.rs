//! HTTP API integration tests
//!
//! Each test spawns the real server on its own port and drives it with
//! reqwest, so the bearer scheme is exercised end to end over the wire.

use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use wecrm::api::run_server;
use wecrm::config::Config;

async fn start_test_server(port: u16) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let _ = run_server(Config::default(), "127.0.0.1", port).await;
    })
}

async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = reqwest::Client::new();
    for attempt in 0..max_attempts {
        match client
            .get(format!("http://127.0.0.1:{}/api/health", port))
            .timeout(Duration::from_secs(1))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => return true,
            _ => {
                if attempt < max_attempts - 1 {
                    sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
    false
}

async fn register_and_login(client: &reqwest::Client, port: u16, email: &str) -> String {
    let status = client
        .post(format!("http://127.0.0.1:{}/api/agents", port))
        .json(&json!({"name": "Agent", "email": email, "password": "hunter2"}))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, 201);

    let body: Value = client
        .post(format!("http://127.0.0.1:{}/api/login", port))
        .json(&json!({"email": email, "password": "hunter2"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let port = 4771;
    let _server = start_test_server(port).await;
    assert!(wait_for_server(port, 50).await, "server failed to start");

    let body: Value = reqwest::get(format!("http://127.0.0.1:{}/api/health", port))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "healthy");
}

#[tokio::test]
async fn test_login_and_customer_crud_over_http() {
    let port = 4772;
    let _server = start_test_server(port).await;
    assert!(wait_for_server(port, 50).await, "server failed to start");

    let client = reqwest::Client::new();
    let token = register_and_login(&client, port, "alice@example.com").await;

    // Bearer token shape: selector:validator, both hex
    let (selector, validator) = token.split_once(':').unwrap();
    assert_eq!(selector.len(), 10);
    assert_eq!(validator.len(), 40);

    // Create a customer
    let response = client
        .post(format!("http://127.0.0.1:{}/api/customers", port))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "firstname": "Jane",
            "lastname": "Doe",
            "email": "jane@customers.example.com",
            "phone": "555-0100"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    let customer_id = created["data"]["id"].as_i64().unwrap();

    // List is scoped to the agent and contains it
    let listed: Value = client
        .get(format!("http://127.0.0.1:{}/api/customers", port))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    // Update it
    let response = client
        .put(format!("http://127.0.0.1:{}/api/customers/{}", port, customer_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "firstname": "Jane",
            "lastname": "Doe",
            "email": "jane@customers.example.com",
            "phone": "555-0199"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["data"]["phone"], "555-0199");

    // Delete it
    let response = client
        .delete(format!("http://127.0.0.1:{}/api/customers/{}", port, customer_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("http://127.0.0.1:{}/api/customers/{}", port, customer_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_requests_without_bearer_are_401() {
    let port = 4773;
    let _server = start_test_server(port).await;
    assert!(wait_for_server(port, 50).await, "server failed to start");

    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/api/customers", port))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("http://127.0.0.1:{}/api/agent", port))
        .header("Authorization", "Bearer garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_login_with_bad_credentials_is_401() {
    let port = 4774;
    let _server = start_test_server(port).await;
    assert!(wait_for_server(port, 50).await, "server failed to start");

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/api/login", port))
        .json(&json!({"email": "nobody@example.com", "password": "nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_duplicate_registration_is_409() {
    let port = 4775;
    let _server = start_test_server(port).await;
    assert!(wait_for_server(port, 50).await, "server failed to start");

    let client = reqwest::Client::new();
    let _token = register_and_login(&client, port, "alice@example.com").await;

    let response = client
        .post(format!("http://127.0.0.1:{}/api/agents", port))
        .json(&json!({"name": "Impostor", "email": "alice@example.com", "password": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_read_and_update_own_profile() {
    let port = 4776;
    let _server = start_test_server(port).await;
    assert!(wait_for_server(port, 50).await, "server failed to start");

    let client = reqwest::Client::new();
    let token = register_and_login(&client, port, "alice@example.com").await;

    let profile: Value = client
        .get(format!("http://127.0.0.1:{}/api/agent", port))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["data"]["email"], "alice@example.com");
    // The password hash never leaves the server
    assert!(profile["data"].get("password_hash").is_none());

    let response = client
        .put(format!("http://127.0.0.1:{}/api/agent", port))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Alice Smith",
            "email": "alice@example.com",
            "password": "correcthorse"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Old password no longer works, new one does
    let response = client
        .post(format!("http://127.0.0.1:{}/api/login", port))
        .json(&json!({"email": "alice@example.com", "password": "hunter2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .post(format!("http://127.0.0.1:{}/api/login", port))
        .json(&json!({"email": "alice@example.com", "password": "correcthorse"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}
