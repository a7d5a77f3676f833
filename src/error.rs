//! Error types for the cache server
//!
//! Provides unified error handling using thiserror. The cache engine itself
//! is infallible; these types cover the wire protocol, the network layer and
//! structural self-checks.

use std::net::SocketAddr;

use thiserror::Error;

// == Protocol Error Enum ==
/// A command line that could not be executed.
///
/// The `Display` text is the `<reason>` part of an `ERROR <reason>` reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Wrong number of arguments; carries the usage line for the verb
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Verb is not one of SET, GET, DEL, EXISTS
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// TTL argument is not an integer
    #[error("invalid ttl: {0}")]
    InvalidTtl(String),

    /// Line exceeded the configured maximum length and was discarded
    #[error("line too long")]
    LineTooLong,

    /// Line bytes are not valid UTF-8
    #[error("invalid utf-8")]
    InvalidEncoding,

    /// Connection refused because the server is at its connection limit
    #[error("too many connections")]
    TooManyConnections,
}

// == Server Error Enum ==
/// Failures of the listening side of the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Listening socket could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Any other socket error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == Integrity Error Enum ==
/// A violated structural invariant of the cache store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("{len} entries exceed capacity {capacity}")]
    OverCapacity { len: usize, capacity: usize },

    #[error("map holds {entries} entries but recency list holds {tracked}")]
    LengthMismatch { entries: usize, tracked: usize },

    #[error("key '{0}' appears more than once in the recency list")]
    DuplicateKey(String),

    #[error("key '{0}' is in the recency list but not in the map")]
    UntrackedKey(String),

    #[error("entry '{0}' holds a handle to a node with a different key")]
    DanglingHandle(String),
}

// == Result Type Alias ==
/// Convenience Result type for the network layer.
pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_reasons() {
        assert_eq!(
            ProtocolError::Usage("GET key").to_string(),
            "usage: GET key"
        );
        assert_eq!(
            ProtocolError::UnknownCommand("PING".to_string()).to_string(),
            "unknown command: PING"
        );
        assert_eq!(
            ProtocolError::InvalidTtl("abc".to_string()).to_string(),
            "invalid ttl: abc"
        );
        assert_eq!(ProtocolError::LineTooLong.to_string(), "line too long");
        assert_eq!(ProtocolError::InvalidEncoding.to_string(), "invalid utf-8");
    }

    #[test]
    fn test_bind_error_mentions_address() {
        let err = ServerError::Bind {
            addr: SocketAddr::from(([127, 0, 0, 1], 6379)),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(err.to_string().contains("127.0.0.1:6379"));
    }
}
