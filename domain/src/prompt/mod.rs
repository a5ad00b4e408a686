//! Prompt domain
//!
//! Templates for the ReAct system prompt and the function-calling probe.

pub mod react;

pub use react::ReactPromptTemplate;
