//! MCP stdio server for the `cascade_thinking` tool.
//!
//! ```text
//! stdin -> LineReader -> Server::handle_frame -> Engine::process_thought
//!                                  |
//!                                  v
//!                     LineWriter -> stdout (replies only)
//! ```
//!
//! Diagnostics, including the boxed thought log, go to stderr through `tracing`.

pub mod protocol;
pub mod server;
pub mod transport;

pub use server::Server;
