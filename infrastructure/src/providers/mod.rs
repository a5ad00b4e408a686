//! Model backend adapters implementing [`LlmGateway`](toolbox_application::LlmGateway).

pub mod openai;

pub use openai::{OpenAiCompatConfig, OpenAiCompatGateway};
