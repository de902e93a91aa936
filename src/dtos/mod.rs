//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod message;
pub mod user;

pub use message::{
    CreateMessageDTO, CreatedMessageDTO, MarkReadDTO, MessageDetailDTO, MessageEnvelope,
    ReadReceiptDTO, SendMessageDTO,
};
pub use user::{CreateUserDTO, LoginDTO, RegisterUserDTO, TokenDTO, UserSummaryDTO};
