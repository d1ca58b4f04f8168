//! # User Identifier Representations
//!
//! A verifier binds a proof to one of its users. The identifier arrives as a
//! string plus a representation tag; each tag maps to exactly one integer
//! encoding (see `zkpp-inputs::encoding`).

use serde::{Deserialize, Serialize};

/// How a user identifier string is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserIdType {
    /// RFC 4122 UUID; hyphens are dropped and the 32 hex digits read as one integer.
    #[default]
    Uuid,
    /// Hexadecimal integer, optional `0x` prefix.
    Hex,
    /// Raw ASCII, encoded with the same rule as scopes.
    Ascii,
}

impl UserIdType {
    /// Returns the tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Hex => "hex",
            Self::Ascii => "ascii",
        }
    }
}

impl std::fmt::Display for UserIdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
