//! Command dispatch
//!
//! Maps each command 1:1 onto a cache operation.

use tracing::trace;

use crate::cache::Cache;
use crate::protocol::{Command, Reply};

/// Runs a parsed command against the cache.
pub fn execute(cache: &Cache, command: Command) -> Reply {
    trace!(command = command.name(), "executing");
    match command {
        Command::Set { key, value, ttl } => {
            cache.set(key, value, ttl);
            Reply::Ok
        }
        Command::Get { key } => cache.get(&key).into(),
        Command::Del { key } => {
            cache.del(&key);
            Reply::Ok
        }
        Command::Exists { key } => Reply::Bool(cache.exists(&key)),
    }
}

/// Parses and executes one input line.
///
/// Returns `None` for a blank line, which gets no reply at all.
pub fn handle_line(cache: &Cache, line: &str) -> Option<Reply> {
    match Command::parse(line) {
        Ok(Some(command)) => Some(execute(cache, command)),
        Ok(None) => None,
        Err(err) => Some(err.into()),
    }
}
