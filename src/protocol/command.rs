//! Command parsing
//!
//! Turns one line of client input into a [`Command`].

use crate::error::ProtocolError;

pub const SET_USAGE: &str = "SET key value [ttl]";
pub const GET_USAGE: &str = "GET key";
pub const DEL_USAGE: &str = "DEL key";
pub const EXISTS_USAGE: &str = "EXISTS key";

// == Command ==
/// A parsed client command, one per cache operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set {
        key: String,
        value: String,
        /// Seconds until expiry, None = never
        ttl: Option<u64>,
    },
    Get {
        key: String,
    },
    Del {
        key: String,
    },
    Exists {
        key: String,
    },
}

impl Command {
    /// Parses a whitespace-separated command line.
    ///
    /// Verbs are case-sensitive. Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, ProtocolError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match verb {
            "SET" => match args {
                [key, value] => Command::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                    ttl: None,
                },
                [key, value, ttl] => Command::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                    ttl: Some(parse_ttl(ttl)?),
                },
                _ => return Err(ProtocolError::Usage(SET_USAGE)),
            },
            "GET" => Command::Get {
                key: single_key(args, GET_USAGE)?,
            },
            "DEL" => Command::Del {
                key: single_key(args, DEL_USAGE)?,
            },
            "EXISTS" => Command::Exists {
                key: single_key(args, EXISTS_USAGE)?,
            },
            other => return Err(ProtocolError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }

    /// The verb as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
        }
    }
}

fn single_key(args: &[&str], usage: &'static str) -> Result<String, ProtocolError> {
    match args {
        [key] => Ok(key.to_string()),
        _ => Err(ProtocolError::Usage(usage)),
    }
}

/// Negative TTLs clamp to zero: the entry is stored already expired.
fn parse_ttl(token: &str) -> Result<u64, ProtocolError> {
    let ttl: i64 = token
        .parse()
        .map_err(|_| ProtocolError::InvalidTtl(token.to_string()))?;
    Ok(u64::try_from(ttl).unwrap_or(0))
}
