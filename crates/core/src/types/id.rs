//! Store-generated document identifiers.
//!
//! A [`DocumentId`] is 12 bytes laid out the way document stores
//! conventionally do it:
//!
//! ```text
//! | 4 bytes: seconds since epoch (BE) | 5 bytes: per-process random | 3 bytes: counter (BE) |
//! ```
//!
//! The byte form is the storage representation. Everything that leaves the
//! persistence layer uses the 24-character lowercase hex form from
//! [`DocumentId::to_hex`].

use core::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;

/// Length of a document identifier in bytes.
pub const DOCUMENT_ID_LEN: usize = 12;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// Errors that can occur when parsing a [`DocumentId`] from hex.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is not exactly 24 characters.
    #[error("document id must be {expected} hex characters (got {actual})")]
    InvalidLength {
        /// Required number of characters.
        expected: usize,
        /// Number of characters supplied.
        actual: usize,
    },
    /// The input contains a non-hex character.
    #[error("document id contains a non-hex character at position {0}")]
    InvalidCharacter(usize),
}

/// A store-generated unique document key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; DOCUMENT_ID_LEN]);

impl DocumentId {
    /// Generate a fresh identifier.
    ///
    /// Identifiers generated within one process are unique: the trailing
    /// counter advances on every call and only wraps after 2^24 ids in the
    /// same second.
    #[must_use]
    pub fn generate() -> Self {
        let seconds = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let count = next_count();

        let mut bytes = [0u8; DOCUMENT_ID_LEN];
        let (time, rest) = bytes.split_at_mut(4);
        let (process, counter) = rest.split_at_mut(5);
        time.copy_from_slice(&seconds.to_be_bytes());
        process.copy_from_slice(process_bytes());
        counter.copy_from_slice(&count.to_be_bytes()[1..]);

        Self(bytes)
    }

    /// Build an identifier from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; DOCUMENT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw storage bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DOCUMENT_ID_LEN] {
        &self.0
    }

    /// Seconds since the Unix epoch at which the identifier was generated.
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// The portable 24-character lowercase hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the hex form produced by [`DocumentId::to_hex`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 24 hex characters.
    pub fn parse_hex(s: &str) -> Result<Self, IdError> {
        let expected = DOCUMENT_ID_LEN * 2;
        if s.len() != expected {
            return Err(IdError::InvalidLength {
                expected,
                actual: s.len(),
            });
        }

        let mut bytes = [0u8; DOCUMENT_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { index, .. } => IdError::InvalidCharacter(index),
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                IdError::InvalidLength {
                    expected,
                    actual: s.len(),
                }
            }
        })?;

        Ok(Self(bytes))
    }
}

fn process_bytes() -> &'static [u8; 5] {
    static PROCESS: OnceLock<[u8; 5]> = OnceLock::new();
    PROCESS.get_or_init(rand::random)
}

fn next_count() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK));
    counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for DocumentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

// SQLx support (with postgres feature). Stored as BYTEA.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for DocumentId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Vec<u8> as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Vec<u8> as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for DocumentId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <Vec<u8> as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        let bytes: [u8; DOCUMENT_ID_LEN] = raw.try_into().map_err(|raw: Vec<u8>| {
            format!(
                "document id must be {DOCUMENT_ID_LEN} bytes (got {})",
                raw.len()
            )
        })?;
        Ok(Self(bytes))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for DocumentId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&[u8] as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0.as_slice(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_hex_is_24_lowercase_chars() {
        let hex = DocumentId::generate().to_hex();
        assert_eq!(hex.len(), 24);
        assert!(
            hex.chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_generate_is_unique() {
        let ids: HashSet<DocumentId> = (0..10_000).map(|_| DocumentId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_timestamp_is_recent() {
        let id = DocumentId::generate();
        let now = u32::try_from(Utc::now().timestamp()).unwrap();
        assert!(now - id.timestamp() < 5);
    }

    #[test]
    fn test_parse_hex() {
        let id = DocumentId::generate();
        let parsed = DocumentId::parse_hex(&id.to_hex()).unwrap();
        assert_eq!(parsed, id);

        let upper: DocumentId = "65A1B2C3D4E5F60718293A4B".parse().unwrap();
        assert_eq!(upper.to_hex(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_parse_hex_wrong_length() {
        assert_eq!(
            DocumentId::parse_hex("abc"),
            Err(IdError::InvalidLength {
                expected: 24,
                actual: 3
            })
        );
    }

    #[test]
    fn test_parse_hex_bad_character() {
        assert_eq!(
            DocumentId::parse_hex("65a1b2c3d4e5f60718293a4z"),
            Err(IdError::InvalidCharacter(23))
        );
    }

    #[test]
    fn test_parse_hex_bad_character_first_position() {
        assert_eq!(
            DocumentId::parse_hex("g5a1b2c3d4e5f60718293a4b"),
            Err(IdError::InvalidCharacter(0))
        );
    }

    #[test]
    fn test_to_hex_known_bytes() {
        let id = DocumentId::from_bytes([
            0x65, 0xa1, 0xb2, 0xc3, 0xd4, 0xe5, 0xf6, 0x07, 0x18, 0x29, 0x3a, 0x4b,
        ]);
        assert_eq!(id.to_hex(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_display_matches_hex() {
        let id = DocumentId::from_bytes([0xab; DOCUMENT_ID_LEN]);
        assert_eq!(id.to_string(), "ab".repeat(12));
    }
}
