//! Message DTOs - Data Transfer Objects per messaggi

use super::UserSummaryDTO;
use crate::entities::{Message, MessageWithUsers};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tutte le risposte delle route /messages sono avvolte in `{"message": ...}`
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageEnvelope<T> {
    pub message: T,
}

impl<T> MessageEnvelope<T> {
    pub fn new(message: T) -> Self {
        Self { message }
    }
}

/// Body di POST /messages. Il mittente non è mai preso dal client.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SendMessageDTO {
    #[validate(length(min = 1, max = 64, message = "Recipient username must not be empty"))]
    pub to_username: String,

    #[validate(length(min = 1, max = 5000, message = "Message body must be between 1 and 5000 characters"))]
    pub body: String,
}

/// DTO per creare un nuovo messaggio nello store (senza id)
#[derive(Debug, Clone)]
pub struct CreateMessageDTO {
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// DTO per l'unico aggiornamento ammesso: impostare read_at se ancora assente
#[derive(Debug, Clone)]
pub struct MarkReadDTO {
    pub read_at: DateTime<Utc>,
}

/// Risposta di GET /messages/{id}
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageDetailDTO {
    pub id: i32,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub from_user: UserSummaryDTO,
    pub to_user: UserSummaryDTO,
}

impl From<MessageWithUsers> for MessageDetailDTO {
    fn from(value: MessageWithUsers) -> Self {
        Self {
            id: value.message.id,
            body: value.message.body,
            sent_at: value.message.sent_at,
            read_at: value.message.read_at,
            from_user: value.from_user.into(),
            to_user: value.to_user.into(),
        }
    }
}

/// Risposta di POST /messages
#[derive(Serialize, Deserialize, Debug)]
pub struct CreatedMessageDTO {
    pub id: i32,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl From<Message> for CreatedMessageDTO {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            from_username: value.from_username,
            to_username: value.to_username,
            body: value.body,
            sent_at: value.sent_at,
        }
    }
}

/// Risposta di POST /messages/{id}/read
#[derive(Serialize, Deserialize, Debug)]
pub struct ReadReceiptDTO {
    pub id: i32,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<Message> for ReadReceiptDTO {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            read_at: value.read_at,
        }
    }
}
