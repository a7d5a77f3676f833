//! lrukv - An in-memory key-value cache server
//!
//! Bounded capacity with LRU eviction, per-entry TTL expiry reaped in the
//! background, and a line-oriented text protocol over TCP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod protocol;
pub mod server;
pub mod tasks;

pub use api::AppState;
pub use cache::Cache;
pub use config::Config;
pub use server::Server;
