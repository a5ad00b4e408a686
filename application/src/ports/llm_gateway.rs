//! LLM Gateway port
//!
//! Defines the interface for communicating with a model backend.

use async_trait::async_trait;
use thiserror::Error;
use toolbox_domain::{LlmResponse, Message, ToolDescriptor};

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for model backend communication
///
/// One call is one complete request/response exchange: the full conversation
/// goes in, one [`LlmResponse`] comes out. Implementations (adapters) live in
/// the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send the conversation and get the next response.
    ///
    /// `tools` is the catalogue to advertise for native function calling;
    /// an empty slice means the text protocol only.
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<LlmResponse, GatewayError>;

    /// Get available models
    async fn available_models(&self) -> Result<Vec<String>, GatewayError> {
        Ok(Vec::new())
    }
}
