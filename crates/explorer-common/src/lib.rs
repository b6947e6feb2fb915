pub mod error;
pub mod http;
pub mod mcp_api;
