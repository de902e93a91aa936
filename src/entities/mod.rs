//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene le entità (models) che rappresentano i dati persistiti.
//! Ogni entity corrisponde a una tabella nel database (o a una join tra tabelle).

pub mod message;
pub mod user;

// Re-exports per facilitare l'import
pub use message::{Message, MessageWithUsers};
pub use user::User;
