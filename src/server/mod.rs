//! Server Module
//!
//! TCP front end for the cache: accept loop and per-client command handling.

mod connection;
mod listener;

pub use connection::serve_connection;
pub use listener::Server;
