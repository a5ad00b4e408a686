//! Conversation turns and backend responses.
//!
//! - [`entities::Message`]: a single turn (system, user, assistant, tool)
//! - [`response::LlmResponse`]: what a model backend returns for one request

pub mod entities;
pub mod response;
