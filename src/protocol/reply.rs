//! Replies
//!
//! Server responses and their line encoding.

use std::fmt;

use crate::error::ProtocolError;

// == Reply ==
/// One response line sent back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `OK`
    Ok,
    /// The stored value, verbatim
    Value(String),
    /// `(nil)` for an absent or expired key
    Nil,
    /// `1` or `0`
    Bool(bool),
    /// `ERROR <reason>`
    Error(ProtocolError),
}

impl Reply {
    /// Encodes the reply as a newline-terminated line.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("OK"),
            Reply::Value(value) => f.write_str(value),
            Reply::Nil => f.write_str("(nil)"),
            Reply::Bool(true) => f.write_str("1"),
            Reply::Bool(false) => f.write_str("0"),
            Reply::Error(err) => write!(f, "ERROR {}", err),
        }
    }
}

impl From<Option<String>> for Reply {
    fn from(value: Option<String>) -> Self {
        value.map_or(Reply::Nil, Reply::Value)
    }
}

impl From<ProtocolError> for Reply {
    fn from(err: ProtocolError) -> Self {
        Reply::Error(err)
    }
}
