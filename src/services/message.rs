//! Message services - Lettura, invio e conferma di lettura dei messaggi
//!
//! L'utente corrente arriva dall'`authentication_middleware` come `Extension<User>`
//! e viene passato esplicitamente ai controlli di autorizzazione.
//! Chi non è parte del messaggio riceve lo stesso 404 di un id inesistente.

use crate::core::{AppError, AppJson, AppPath, AppState};
use crate::dtos::{
    CreateMessageDTO, CreatedMessageDTO, MarkReadDTO, MessageDetailDTO, MessageEnvelope,
    ReadReceiptDTO, SendMessageDTO,
};
use crate::entities::User;
use axum::{
    Extension,
    extract::{Json, State},
};
use axum_macros::debug_handler;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, current_user), fields(message_id = %message_id, username = %current_user.username))]
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>, // ottenuto dall'autenticazione tramite token jwt
    AppPath(message_id): AppPath<i32>,
) -> Result<Json<MessageEnvelope<MessageDetailDTO>>, AppError> {
    debug!("Fetching message");
    // 1. Leggere il messaggio con mittente e destinatario, NOT_FOUND se non esiste
    // 2. Verificare che l'utente corrente sia mittente o destinatario, altrimenti NOT_FOUND
    // 3. Ritornare il dettaglio completo
    let detail = state
        .msg
        .find_with_users(&message_id)
        .await?
        .ok_or_else(|| {
            warn!("Message not found");
            AppError::message_not_found()
        })?;

    if !detail.is_party(&current_user.username) {
        warn!("User is not a party to the message");
        return Err(AppError::message_not_found());
    }

    info!("Message retrieved");
    Ok(Json(MessageEnvelope::new(MessageDetailDTO::from(detail))))
}

#[debug_handler]
#[instrument(skip(state, current_user, body), fields(username = %current_user.username, to = %body.to_username))]
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    AppJson(body): AppJson<SendMessageDTO>,
) -> Result<Json<MessageEnvelope<CreatedMessageDTO>>, AppError> {
    debug!("Sending message");
    // 1. Validare il body (non vuoto, max 5000 caratteri) e il destinatario
    // 2. Verificare che il destinatario esista, altrimenti NOT_FOUND
    // 3. Salvare il messaggio con mittente = utente corrente e sent_at = adesso
    body.validate()?;
    if body.body.trim().is_empty() {
        warn!("Blank message body");
        return Err(AppError::bad_request("Validation error")
            .with_details("body: Message body must not be blank"));
    }

    if state.user.read(&body.to_username).await?.is_none() {
        warn!("Recipient not found");
        return Err(AppError::not_found("Recipient not found"));
    }

    let new_message = CreateMessageDTO {
        from_username: current_user.username,
        to_username: body.to_username,
        body: body.body,
        sent_at: Utc::now(),
    };
    let message = state.msg.create(&new_message).await?;

    info!(message_id = message.id, "Message sent");
    Ok(Json(MessageEnvelope::new(CreatedMessageDTO::from(message))))
}

#[instrument(skip(state, current_user), fields(message_id = %message_id, username = %current_user.username))]
pub async fn mark_message_read(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    AppPath(message_id): AppPath<i32>,
) -> Result<Json<MessageEnvelope<ReadReceiptDTO>>, AppError> {
    debug!("Marking message as read");
    // 1. Leggere il messaggio, NOT_FOUND se non esiste
    // 2. Solo il destinatario può marcarlo come letto, altrimenti NOT_FOUND
    // 3. Impostare read_at se ancora assente (update condizionale nello store)
    let message = state.msg.read(&message_id).await?.ok_or_else(|| {
        warn!("Message not found");
        AppError::message_not_found()
    })?;

    if !message.is_recipient(&current_user.username) {
        warn!("User is not the recipient of the message");
        return Err(AppError::message_not_found());
    }

    let updated = state
        .msg
        .update(&message_id, &MarkReadDTO { read_at: Utc::now() })
        .await?;

    info!(read_at = ?updated.read_at, "Message marked as read");
    Ok(Json(MessageEnvelope::new(ReadReceiptDTO::from(updated))))
}
