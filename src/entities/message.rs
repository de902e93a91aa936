//! Message entity - Entità messaggio

use super::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: i32,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    // mittente, destinatario e sent_at sono fissati alla creazione
    pub sent_at: DateTime<Utc>,
    // None finché il destinatario non marca il messaggio come letto
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    /// `true` se `username` è il mittente o il destinatario del messaggio
    pub fn is_party(&self, username: &str) -> bool {
        self.from_username == username || self.to_username == username
    }

    /// `true` se `username` è il destinatario del messaggio
    pub fn is_recipient(&self, username: &str) -> bool {
        self.to_username == username
    }
}

/// Messaggio con i record completi di mittente e destinatario
#[derive(Debug, Clone)]
pub struct MessageWithUsers {
    pub message: Message,
    pub from_user: User,
    pub to_user: User,
}

impl MessageWithUsers {
    pub fn is_party(&self, username: &str) -> bool {
        self.message.is_party(username)
    }
}
