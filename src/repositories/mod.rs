//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Ogni repository gestisce la persistenza di una specifica entità. Le
//! implementazioni MySQL usano query runtime di sqlx (`query_as` + `bind`),
//! quella in memoria serve per i test e per `STORAGE=memory`.

pub mod memory;
pub mod message;
pub mod traits;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, MessageStore, Read, Update, UserStore};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use memory::MemoryStore;
pub use message::MessageRepository;
pub use user::UserRepository;
