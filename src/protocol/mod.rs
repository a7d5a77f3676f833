//! Protocol Module
//!
//! Line-oriented text protocol spoken over TCP.
//!
//! # Commands
//! - `SET key value [ttl_seconds]` -> `OK`
//! - `GET key` -> `<value>` or `(nil)`
//! - `DEL key` -> `OK`
//! - `EXISTS key` -> `1` or `0`
//!
//! Anything else is answered with `ERROR <reason>`.

pub mod command;
pub mod dispatch;
pub mod reply;

pub use command::Command;
pub use dispatch::{execute, handle_line};
pub use reply::Reply;
