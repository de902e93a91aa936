//! Integration tests per gli endpoints di autenticazione
//!
//! Test per:
//! - POST /auth/register
//! - POST /auth/login
//! - GET /

mod common;

#[cfg(test)]
mod auth_tests {
    use super::common::*;
    use axum_test::http::{HeaderName, StatusCode};
    use chrono::Utc;
    use messagely::AppError;
    use messagely::dtos::CreateUserDTO;
    use serde_json::{Value, json};

    fn registration(username: &str) -> Value {
        json!({
            "username": username,
            "password": "Password123",
            "first_name": "Test",
            "last_name": "User",
            "phone": "+39 333 1234567"
        })
    }

    #[tokio::test]
    async fn test_root_health_check() {
        let server = create_test_server(create_test_state());

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_text("Server is running!");
    }

    // ============================================================
    // Test per POST /auth/register - register_user
    // ============================================================

    #[tokio::test]
    async fn test_register_success() {
        let state = create_test_state();
        let server = create_test_server(state.clone());

        let response = server.post("/auth/register").json(&registration("newuser")).await;

        response.assert_status_ok();
        let user: Value = response.json();
        assert_eq!(user["username"], "newuser", "Username should match");
        assert_eq!(user["first_name"], "Test");
        assert!(user.get("password").is_none(), "Password must never be exposed");

        // la password salvata è un hash, non il testo in chiaro
        let stored = state
            .user
            .read(&"newuser".to_string())
            .await
            .unwrap()
            .expect("user should be stored");
        assert_ne!(stored.password, "Password123");
        assert!(stored.verify_password("Password123"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let state = create_test_state();
        seed_user(&state, "alice").await;
        let server = create_test_server(state);

        let response = server.post("/auth/register").json(&registration("alice")).await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_duplicate_insert_in_store_maps_to_conflict() {
        let state = create_test_state();
        seed_user(&state, "alice").await;

        // stesso username inserito direttamente, come farebbe una registrazione concorrente
        let duplicate = CreateUserDTO {
            username: "alice".to_string(),
            password: "another-hash".to_string(),
            first_name: "Other".to_string(),
            last_name: "Alice".to_string(),
            phone: "555-0199".to_string(),
            join_at: Utc::now(),
        };
        let err = state
            .user
            .create(&duplicate)
            .await
            .expect_err("duplicate username must be rejected");

        let app_error = AppError::from(err);
        assert_eq!(app_error.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_missing_fields_returns_json_error() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/auth/register")
            .json(&json!({ "username": "incomplete" }))
            .await;

        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body["status"], 422);
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_register_invalid_username() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/auth/register")
            .json(&registration("Deleted User"))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Validation error");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let server = create_test_server(create_test_state());
        let mut body = registration("shorty");
        body["password"] = json!("abc");

        let response = server.post("/auth/register").json(&body).await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/auth/register")
            .json(&json!({ "username": "incomplete", "password": "Password123" }))
            .await;

        // 422 Unprocessable Entity quando manca un campo obbligatorio
        response.assert_status_unprocessable_entity();
    }

    // ============================================================
    // Test per POST /auth/login - login_user
    // ============================================================

    #[tokio::test]
    async fn test_login_success() {
        let state = create_test_state();
        let server = create_test_server(state.clone());

        server
            .post("/auth/register")
            .json(&registration("logintest"))
            .await
            .assert_status_ok();

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "logintest", "password": "Password123" }))
            .await;

        response.assert_status_ok();

        let headers = response.headers();
        assert!(
            headers.get("set-cookie").is_some(),
            "Set-Cookie header should be present"
        );
        let auth_header = headers
            .get("authorization")
            .expect("Authorization header should be present")
            .to_str()
            .unwrap()
            .to_string();
        assert!(
            auth_header.starts_with("Bearer "),
            "Authorization should start with 'Bearer '"
        );

        let body: Value = response.json();
        assert_eq!(
            body["token"].as_str().unwrap(),
            auth_header.trim_start_matches("Bearer ")
        );

        let stored = state
            .user
            .read(&"logintest".to_string())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_login_token_grants_access_to_messages() {
        let state = create_test_state();
        seed_user(&state, "bob").await;
        let server = create_test_server(state);

        server
            .post("/auth/register")
            .json(&registration("alice"))
            .await
            .assert_status_ok();

        let login: Value = server
            .post("/auth/login")
            .json(&json!({ "username": "alice", "password": "Password123" }))
            .await
            .json();
        let token = login["token"].as_str().unwrap();

        let response = server
            .post("/messages")
            .add_header(
                HeaderName::from_static("authorization"),
                format!("Bearer {}", token),
            )
            .json(&json!({ "to_username": "bob", "body": "hello bob" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"]["from_username"], "alice");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let state = create_test_state();
        let server = create_test_server(state);

        server
            .post("/auth/register")
            .json(&registration("alice"))
            .await
            .assert_status_ok();

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "alice", "password": "wrongpassword" }))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_login_nonexistent_user() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/auth/login")
            .json(&json!({ "username": "nonexistent", "password": "password123" }))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_login_empty_body() {
        let server = create_test_server(create_test_state());

        let response = server.post("/auth/login").json(&json!({})).await;

        // 422 Unprocessable Entity quando manca un campo obbligatorio
        response.assert_status_unprocessable_entity();
    }
}
