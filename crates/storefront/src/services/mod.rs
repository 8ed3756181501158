//! Outbound service clients.
//!
//! # Services
//!
//! - `chat` - Support chat webhook relay

pub mod chat;

pub use chat::{ChatClient, ChatError};
