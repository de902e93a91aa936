//! UserRepository - Repository MySQL per la gestione degli utenti

use super::{Create, Read, UserStore};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Error, MySqlPool};

// USER REPO
pub struct UserRepository {
    connection_pool: MySqlPool,
}

impl UserRepository {
    pub fn new(connection_pool: MySqlPool) -> UserRepository {
        Self { connection_pool }
    }
}

#[async_trait]
impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        sqlx::query(
            r#"
            INSERT INTO users (username, password, first_name, last_name, phone, join_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.username)
        .bind(&data.password)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.phone)
        .bind(data.join_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(User {
            username: data.username.clone(),
            password: data.password.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            phone: data.phone.clone(),
            join_at: data.join_at,
            last_login_at: None,
        })
    }
}

///considero l'username univoco
#[async_trait]
impl Read<User, String> for UserRepository {
    async fn read(&self, username: &String) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, password, first_name, last_name, phone, join_at, last_login_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn record_login(&self, username: &str, at: DateTime<Utc>) -> Result<(), Error> {
        let result = sqlx::query("UPDATE users SET last_login_at = ? WHERE username = ?")
            .bind(at)
            .bind(username)
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        Ok(())
    }
}
