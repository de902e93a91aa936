//! Application State - Stato globale dell'applicazione
//!
//! Contiene gli store e le configurazioni condivise necessarie per gestire
//! le richieste. È immutabile: tutto lo stato mutabile vive negli store.

use crate::repositories::{MemoryStore, MessageRepository, MessageStore, UserRepository, UserStore};
use sqlx::MySqlPool;
use std::sync::Arc;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Store per la gestione degli utenti
    pub user: Arc<dyn UserStore>,

    /// Store per la gestione dei messaggi
    pub msg: Arc<dyn MessageStore>,

    /// Secret key per JWT token
    pub jwt_secret: String,

    /// Costo bcrypt usato per hashare le password in registrazione
    pub bcrypt_cost: u32,
}

impl AppState {
    /// Crea una nuova istanza di AppState con i repository MySQL
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni MySQL condiviso
    /// * `jwt_secret` - Chiave segreta per la firma dei token JWT
    /// * `bcrypt_cost` - Costo bcrypt per le nuove password
    pub fn new(pool: MySqlPool, jwt_secret: String, bcrypt_cost: u32) -> Self {
        Self {
            user: Arc::new(UserRepository::new(pool.clone())),
            msg: Arc::new(MessageRepository::new(pool)),
            jwt_secret,
            bcrypt_cost,
        }
    }

    /// Crea un AppState su un unico `MemoryStore` condiviso da utenti e messaggi
    pub fn in_memory(jwt_secret: String, bcrypt_cost: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            user: store.clone(),
            msg: store,
            jwt_secret,
            bcrypt_cost,
        }
    }
}
