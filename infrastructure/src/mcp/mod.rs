//! MCP (Model Context Protocol) server surface.

mod stdio_server;

pub use stdio_server::{PROTOCOL_VERSION, StdioServer};
