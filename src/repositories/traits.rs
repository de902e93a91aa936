//! Common repository traits
//!
//! This module defines generic interfaces for store operations. They are
//! object safe (through `async_trait`) so handlers can work with any backend
//! held in `AppState`.

use crate::dtos::{CreateMessageDTO, CreateUserDTO, MarkReadDTO};
use crate::entities::{Message, MessageWithUsers, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for creating new entities in the store
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the store)
/// * `CreateDTO` - DTO for creation (without ID, will be automatically generated)
#[async_trait]
pub trait Create<Entity, CreateDTO> {
    /// Creates a new entity in the store
    ///
    /// # Returns
    /// * `Ok(Entity)` - Created entity with ID assigned by the store
    /// * `Err(sqlx::Error)` - Error during insertion
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Trait for reading a single entity by primary key
///
/// # Type Parameters
/// * `Entity` - Type of the entity to read
/// * `Id` - Type of the primary key (e.g. `i32`, `String`)
#[async_trait]
pub trait Read<Entity, Id: Sync> {
    /// Reads an entity from the store by its primary key
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    /// * `Err(sqlx::Error)` - Error during reading
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Trait for updating existing entities
///
/// # Type Parameters
/// * `Entity` - Type of the updated entity
/// * `UpdateDTO` - DTO describing the update
/// * `Id` - Type of the primary key
#[async_trait]
pub trait Update<Entity, UpdateDTO, Id: Sync> {
    /// Updates an existing entity in the store
    ///
    /// # Returns
    /// * `Ok(Entity)` - Updated entity
    /// * `Err(sqlx::Error)` - Error during update (`RowNotFound` if the entity does not exist)
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Persistence of users, keyed by username
#[async_trait]
pub trait UserStore: Create<User, CreateUserDTO> + Read<User, String> + Send + Sync {
    /// Sets `last_login_at` for the given user
    async fn record_login(&self, username: &str, at: DateTime<Utc>) -> Result<(), sqlx::Error>;
}

/// Persistence of messages.
///
/// `Update<Message, MarkReadDTO, i32>` must set `read_at` only when it is still
/// absent, in a single atomic step, and return the stored message.
#[async_trait]
pub trait MessageStore:
    Create<Message, CreateMessageDTO> + Read<Message, i32> + Update<Message, MarkReadDTO, i32> + Send + Sync
{
    /// Reads a message together with its sender and recipient
    async fn find_with_users(&self, id: &i32) -> Result<Option<MessageWithUsers>, sqlx::Error>;
}
