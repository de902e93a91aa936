#![allow(dead_code)]

use axum_test::TestServer;
use axum_test::http::{HeaderName, HeaderValue};
use chrono::Utc;
use messagely::core::AppState;
use messagely::dtos::{CreateMessageDTO, CreateUserDTO};
use messagely::entities::{Message, User};
use std::sync::Arc;

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Crea un AppState in memoria per i test (bcrypt al costo minimo)
pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::in_memory(JWT_SECRET.to_string(), 4))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = messagely::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Inserisce direttamente nello store un utente (password non hashata, non serve per il login)
pub async fn seed_user(state: &AppState, username: &str) -> User {
    let dto = CreateUserDTO {
        username: username.to_string(),
        password: "not-a-real-hash".to_string(),
        first_name: format!("{}-first", username),
        last_name: format!("{}-last", username),
        phone: "555-0100".to_string(),
        join_at: Utc::now(),
    };
    state.user.create(&dto).await.expect("Failed to seed user")
}

/// Stato con alice, bob e charlie già registrati
pub async fn create_seeded_state() -> Arc<AppState> {
    let state = create_test_state();
    for username in ["alice", "bob", "charlie"] {
        seed_user(&state, username).await;
    }
    state
}

/// Inserisce direttamente nello store un messaggio
pub async fn seed_message(state: &AppState, from: &str, to: &str, body: &str) -> Message {
    let dto = CreateMessageDTO {
        from_username: from.to_string(),
        to_username: to.to_string(),
        body: body.to_string(),
        sent_at: Utc::now(),
    };
    state.msg.create(&dto).await.expect("Failed to seed message")
}

/// Genera un JWT token per testing, valido per 24 ore
pub fn create_test_jwt(username: &str, jwt_secret: &str) -> String {
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        username: String,
        exp: usize,
        iat: usize,
    }

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        username: username.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

/// Header Authorization con il token dell'utente indicato
pub fn auth_header(username: &str) -> (HeaderName, HeaderValue) {
    let token = create_test_jwt(username, JWT_SECRET);
    (
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header"),
    )
}
