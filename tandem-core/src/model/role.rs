use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two fixed positions in a room.
///
/// `caller` and `callee` are accepted on input as the older names for
/// `initiator` and `responder`.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "caller")]
    Initiator,
    #[serde(alias = "callee")]
    Responder,
}

impl Role {
    pub fn other(self) -> Self {
        match self {
            Role::Initiator => Role::Responder,
            Role::Responder => Role::Initiator,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Initiator => "initiator",
            Role::Responder => "responder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "initiator" | "caller" => Ok(Role::Initiator),
            "responder" | "callee" => Ok(Role::Responder),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}
