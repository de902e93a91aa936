//! User DTOs - Data Transfer Objects per utenti

use crate::entities::User;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9 ()-]{5,20}$").unwrap();
}

/// Riepilogo pubblico di un utente, annidato nei dettagli dei messaggi
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSummaryDTO {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl From<User> for UserSummaryDTO {
    fn from(value: User) -> Self {
        Self {
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
        }
    }
}

/// Body di POST /auth/register
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct RegisterUserDTO {
    #[validate(regex(
        path = *USERNAME_RE,
        message = "Username must be 3-30 characters: letters, digits or underscore"
    ))]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,

    #[validate(regex(path = *PHONE_RE, message = "Phone number is not valid"))]
    pub phone: String,
}

/// DTO per creare un nuovo utente nello store (password già hashata)
#[derive(Debug, Clone)]
pub struct CreateUserDTO {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: DateTime<Utc>,
}

/// DTO per il login (solo username e password)
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDTO {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenDTO {
    pub token: String,
}
