//! MemoryStore - Store in memoria per utenti e messaggi
//!
//! Usato dai test di integrazione e con `STORAGE=memory`. Le mappe concorrenti
//! di `dashmap` danno a ogni entry il proprio lock, quindi l'aggiornamento di
//! read_at avviene sotto un unico write guard.

use super::{Create, MessageStore, Read, Update, UserStore};
use crate::dtos::{CreateMessageDTO, CreateUserDTO, MarkReadDTO};
use crate::entities::{Message, MessageWithUsers, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sqlx::Error;
use sqlx::error::{DatabaseError, ErrorKind};
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};

/// Chiave duplicata nello store in memoria, riportata come `sqlx::Error::Database`
/// così da essere mappata come quella di MySQL
#[derive(Debug)]
pub struct DuplicateKey {
    message: String,
}

impl DuplicateKey {
    fn error(message: String) -> Error {
        Error::Database(Box::new(Self { message }))
    }
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DuplicateKey {}

impl DatabaseError for DuplicateKey {
    fn message(&self) -> &str {
        &self.message
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        // stesso SQLSTATE di MySQL per "Duplicate entry"
        Some(Cow::Borrowed("23000"))
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

pub struct MemoryStore {
    users: DashMap<String, User>,
    messages: DashMap<i32, Message>,
    next_message_id: AtomicI32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            messages: DashMap::new(),
            next_message_id: AtomicI32::new(1),
        }
    }

    fn user(&self, username: &str) -> Option<User> {
        self.users.get(username).map(|u| u.value().clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Create<User, CreateUserDTO> for MemoryStore {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        match self.users.entry(data.username.clone()) {
            Entry::Occupied(_) => Err(DuplicateKey::error(format!(
                "Duplicate entry '{}' for key 'users.PRIMARY'",
                data.username
            ))),
            Entry::Vacant(slot) => {
                let user = User {
                    username: data.username.clone(),
                    password: data.password.clone(),
                    first_name: data.first_name.clone(),
                    last_name: data.last_name.clone(),
                    phone: data.phone.clone(),
                    join_at: data.join_at,
                    last_login_at: None,
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }
}

#[async_trait]
impl Read<User, String> for MemoryStore {
    async fn read(&self, username: &String) -> Result<Option<User>, Error> {
        Ok(self.user(username))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn record_login(&self, username: &str, at: DateTime<Utc>) -> Result<(), Error> {
        let mut user = self.users.get_mut(username).ok_or(Error::RowNotFound)?;
        user.last_login_at = Some(at);
        Ok(())
    }
}

#[async_trait]
impl Create<Message, CreateMessageDTO> for MemoryStore {
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        // stesso vincolo delle foreign key della tabella messages
        if !self.users.contains_key(&data.from_username)
            || !self.users.contains_key(&data.to_username)
        {
            return Err(Error::RowNotFound);
        }

        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        let message = Message {
            id,
            from_username: data.from_username.clone(),
            to_username: data.to_username.clone(),
            body: data.body.clone(),
            sent_at: data.sent_at,
            read_at: None,
        };
        self.messages.insert(id, message.clone());
        Ok(message)
    }
}

#[async_trait]
impl Read<Message, i32> for MemoryStore {
    async fn read(&self, id: &i32) -> Result<Option<Message>, Error> {
        Ok(self.messages.get(id).map(|m| m.value().clone()))
    }
}

#[async_trait]
impl Update<Message, MarkReadDTO, i32> for MemoryStore {
    async fn update(&self, id: &i32, data: &MarkReadDTO) -> Result<Message, Error> {
        let mut message = self.messages.get_mut(id).ok_or(Error::RowNotFound)?;
        if message.read_at.is_none() {
            message.read_at = Some(data.read_at);
        }
        Ok(message.clone())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn find_with_users(&self, id: &i32) -> Result<Option<MessageWithUsers>, Error> {
        let Some(message) = self.messages.get(id).map(|m| m.value().clone()) else {
            return Ok(None);
        };
        let from_user = self.user(&message.from_username).ok_or(Error::RowNotFound)?;
        let to_user = self.user(&message.to_username).ok_or(Error::RowNotFound)?;
        Ok(Some(MessageWithUsers {
            message,
            from_user,
            to_user,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_user(username: &str) -> CreateUserDTO {
        CreateUserDTO {
            username: username.to_string(),
            password: "hash".to_string(),
            first_name: username.to_uppercase(),
            last_name: "Test".to_string(),
            phone: "5551234".to_string(),
            join_at: Utc::now(),
        }
    }

    async fn store_with_users() -> MemoryStore {
        let store = MemoryStore::new();
        store.create(&new_user("alice")).await.unwrap();
        store.create(&new_user("bob")).await.unwrap();
        store
    }

    fn new_message(from: &str, to: &str) -> CreateMessageDTO {
        CreateMessageDTO {
            from_username: from.to_string(),
            to_username: to.to_string(),
            body: "hi".to_string(),
            sent_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let store = store_with_users().await;
        let result = Create::<User, _>::create(&store, &new_user("alice")).await;
        match result {
            Err(Error::Database(db_err)) => assert!(db_err.is_unique_violation()),
            other => panic!("expected a unique violation, got {:?}", other.map(|u| u.username)),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_maps_to_conflict() {
        let store = store_with_users().await;
        let err = Create::<User, _>::create(&store, &new_user("bob"))
            .await
            .unwrap_err();
        assert_eq!(
            crate::core::AppError::from(err).status(),
            axum::http::StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_message_ids_are_unique() {
        let store = store_with_users().await;
        let first = store.create(&new_message("alice", "bob")).await.unwrap();
        let second = store.create(&new_message("bob", "alice")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(first.read_at.is_none());
    }

    #[tokio::test]
    async fn test_message_to_unknown_user_is_rejected() {
        let store = store_with_users().await;
        let result = store.create(&new_message("alice", "nobody")).await;
        assert!(matches!(result, Err(Error::RowNotFound)));
    }

    #[tokio::test]
    async fn test_mark_read_keeps_first_timestamp() {
        let store = store_with_users().await;
        let msg = store.create(&new_message("alice", "bob")).await.unwrap();

        let first_read = Utc::now();
        let updated = store
            .update(&msg.id, &MarkReadDTO { read_at: first_read })
            .await
            .unwrap();
        assert_eq!(updated.read_at, Some(first_read));

        let later = first_read + Duration::minutes(5);
        let again = store
            .update(&msg.id, &MarkReadDTO { read_at: later })
            .await
            .unwrap();
        assert_eq!(again.read_at, Some(first_read));
    }

    #[tokio::test]
    async fn test_mark_read_missing_message() {
        let store = store_with_users().await;
        let result = store.update(&42, &MarkReadDTO { read_at: Utc::now() }).await;
        assert!(matches!(result, Err(Error::RowNotFound)));
    }

    #[tokio::test]
    async fn test_find_with_users_joins_both_parties() {
        let store = store_with_users().await;
        let msg = store.create(&new_message("alice", "bob")).await.unwrap();

        let detail = store.find_with_users(&msg.id).await.unwrap().unwrap();
        assert_eq!(detail.from_user.username, "alice");
        assert_eq!(detail.to_user.username, "bob");
        assert_eq!(detail.to_user.first_name, "BOB");

        assert!(store.find_with_users(&999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_login() {
        let store = store_with_users().await;
        let at = Utc::now();
        store.record_login("alice", at).await.unwrap();
        let alice = store.read(&"alice".to_string()).await.unwrap().unwrap();
        assert_eq!(alice.last_login_at, Some(at));
        assert!(store.record_login("nobody", at).await.is_err());
    }
}
