//! Auth services - Gestione autenticazione e registrazione utenti

use crate::core::{AppError, AppJson, AppState, encode_jwt};
use crate::dtos::{CreateUserDTO, LoginDTO, RegisterUserDTO, TokenDTO, UserSummaryDTO};
use crate::entities::User;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<LoginDTO>, // JSON body
) -> Result<impl IntoResponse, AppError> {
    debug!("Login attempt");
    // 1. Cercare l'utente nello store tramite username, UNAUTHORIZED se non esiste
    // 2. Verificare la password contro l'hash memorizzato, UNAUTHORIZED se non corrisponde
    // 3. Aggiornare last_login_at
    // 4. Generare il token JWT e restituirlo via header Authorization, cookie e body

    let user = match state.user.read(&body.username).await? {
        Some(user) => user,
        None => {
            warn!("Login for unknown user");
            return Err(AppError::unauthorized("Username or password are not correct."));
        }
    };

    if !user.verify_password(&body.password) {
        warn!("Wrong password");
        return Err(AppError::unauthorized("Username or password are not correct."));
    }

    state.user.record_login(&user.username, Utc::now()).await?;

    let token = encode_jwt(user.username, &state.jwt_secret)?;

    let cookie_value = format!(
        "token={}; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
        token,
        24 * 60 * 60
    );

    let mut headers = HeaderMap::new();
    headers.insert("Set-Cookie", header_value(&cookie_value)?);
    headers.insert("Authorization", header_value(&format!("Bearer {}", token))?);

    info!("User logged in");
    Ok((StatusCode::OK, headers, Json(TokenDTO { token })))
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value).map_err(|e| {
        error!("Invalid header value: {:?}", e);
        AppError::internal_server_error("Failed to build response headers")
    })
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<RegisterUserDTO>, // JSON body
) -> Result<Json<UserSummaryDTO>, AppError> {
    debug!("Registering new user");
    // 1. Validare il DTO con validator (formato username, password, nomi e telefono)
    // 2. Se esiste già un utente con lo stesso username ritornare CONFLICT
    // 3. Hashare la password e salvare il nuovo utente
    // 4. Ritornare il riepilogo pubblico dell'utente creato
    body.validate()?;

    if state.user.read(&body.username).await?.is_some() {
        warn!("Username already taken");
        return Err(AppError::conflict("Username already exists"));
    }

    let password_hash = User::hash_password(&body.password, state.bcrypt_cost).map_err(|e| {
        error!("Failed to hash password: {:?}", e);
        AppError::internal_server_error("Failed to hash password")
    })?;

    let new_user = CreateUserDTO {
        username: body.username,
        password: password_hash,
        first_name: body.first_name,
        last_name: body.last_name,
        phone: body.phone,
        join_at: Utc::now(),
    };

    let created_user = state.user.create(&new_user).await?;

    info!("User registered");
    Ok(Json(UserSummaryDTO::from(created_user)))
}
