//! MessageRepository - Repository MySQL per la gestione dei messaggi

use super::{Create, MessageStore, Read, Update};
use crate::dtos::{CreateMessageDTO, MarkReadDTO};
use crate::entities::{Message, MessageWithUsers, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Error, MySqlPool};

// MESSAGE REPO
pub struct MessageRepository {
    connection_pool: MySqlPool,
}

impl MessageRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

/// Riga della join messages ⨝ users ⨝ users
#[derive(sqlx::FromRow)]
struct MessageWithUsersRow {
    id: i32,
    body: String,
    sent_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
    from_username: String,
    from_password: String,
    from_first_name: String,
    from_last_name: String,
    from_phone: String,
    from_join_at: DateTime<Utc>,
    from_last_login_at: Option<DateTime<Utc>>,
    to_username: String,
    to_password: String,
    to_first_name: String,
    to_last_name: String,
    to_phone: String,
    to_join_at: DateTime<Utc>,
    to_last_login_at: Option<DateTime<Utc>>,
}

impl From<MessageWithUsersRow> for MessageWithUsers {
    fn from(row: MessageWithUsersRow) -> Self {
        Self {
            message: Message {
                id: row.id,
                from_username: row.from_username.clone(),
                to_username: row.to_username.clone(),
                body: row.body,
                sent_at: row.sent_at,
                read_at: row.read_at,
            },
            from_user: User {
                username: row.from_username,
                password: row.from_password,
                first_name: row.from_first_name,
                last_name: row.from_last_name,
                phone: row.from_phone,
                join_at: row.from_join_at,
                last_login_at: row.from_last_login_at,
            },
            to_user: User {
                username: row.to_username,
                password: row.to_password,
                first_name: row.to_first_name,
                last_name: row.to_last_name,
                phone: row.to_phone,
                join_at: row.to_join_at,
                last_login_at: row.to_last_login_at,
            },
        }
    }
}

/// La colonna id è INT: un last_insert_id fuori range è un errore, non va troncato
fn message_id_from(last_insert_id: u64) -> Result<i32, Error> {
    i32::try_from(last_insert_id).map_err(|e| Error::Decode(Box::new(e)))
}

#[async_trait]
impl Create<Message, CreateMessageDTO> for MessageRepository {
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO messages (from_username, to_username, body, sent_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&data.from_username)
        .bind(&data.to_username)
        .bind(&data.body)
        .bind(data.sent_at)
        .execute(&self.connection_pool)
        .await?;

        // Get the last inserted ID
        let new_id = message_id_from(result.last_insert_id())?;

        Ok(Message {
            id: new_id,
            from_username: data.from_username.clone(),
            to_username: data.to_username.clone(),
            body: data.body.clone(),
            sent_at: data.sent_at,
            read_at: None,
        })
    }
}

#[async_trait]
impl Read<Message, i32> for MessageRepository {
    async fn read(&self, id: &i32) -> Result<Option<Message>, Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, from_username, to_username, body, sent_at, read_at
            FROM messages
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(message)
    }
}

#[async_trait]
impl Update<Message, MarkReadDTO, i32> for MessageRepository {
    async fn update(&self, id: &i32, data: &MarkReadDTO) -> Result<Message, Error> {
        // Un solo UPDATE condizionale: se read_at è già valorizzato resta invariato.
        // rows_affected() conta solo le righe modificate, quindi l'esistenza si verifica con la read
        sqlx::query("UPDATE messages SET read_at = COALESCE(read_at, ?) WHERE id = ?")
            .bind(data.read_at)
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn find_with_users(&self, id: &i32) -> Result<Option<MessageWithUsers>, Error> {
        let row = sqlx::query_as::<_, MessageWithUsersRow>(
            r#"
            SELECT
                m.id, m.body, m.sent_at, m.read_at,
                f.username AS from_username, f.password AS from_password,
                f.first_name AS from_first_name, f.last_name AS from_last_name,
                f.phone AS from_phone, f.join_at AS from_join_at,
                f.last_login_at AS from_last_login_at,
                t.username AS to_username, t.password AS to_password,
                t.first_name AS to_first_name, t.last_name AS to_last_name,
                t.phone AS to_phone, t.join_at AS to_join_at,
                t.last_login_at AS to_last_login_at
            FROM messages AS m
            JOIN users AS f ON m.from_username = f.username
            JOIN users AS t ON m.to_username = t.username
            WHERE m.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(row.map(MessageWithUsers::from))
    }
}
