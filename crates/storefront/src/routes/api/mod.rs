//! JSON API route handlers.

pub mod chat;
pub mod products;
