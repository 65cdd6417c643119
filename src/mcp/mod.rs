//! JSON-RPC tool server
//!
//! Protocol message types and the stdio request loop that routes tool calls
//! to the ledger.

pub mod protocol;
pub mod server;

// Re-export main types
pub use server::McpServer;
