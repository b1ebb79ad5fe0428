//! Shared deserialization helpers for backend shape drift.
//!
//! Different backend variants serialize the same logical field with
//! different JSON types. These helpers fold every observed representation
//! into one canonical Rust type at the boundary.

use serde::{Deserialize, Deserializer};

/// Message id as it appears on the wire: a number in some backend variants,
/// a string in others.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Num(i64),
    Text(String),
}

impl IdRepr {
    fn into_string(self) -> String {
        match self {
            Self::Num(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Adoption flag as it appears on the wire: bool, integer, or null.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Num(i64),
}

/// Deserialize a message id, normalizing numbers to their decimal string.
pub(crate) fn message_id<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(IdRepr::deserialize(de)?.into_string())
}

/// Deserialize a list of message ids with the same normalization.
pub(crate) fn message_id_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = Vec::<IdRepr>::deserialize(de)?;
    Ok(ids.into_iter().map(IdRepr::into_string).collect())
}

/// Deserialize an adoption flag, normalizing integers (nonzero = adopted)
/// and null (= not adopted) to `bool`.
pub(crate) fn adopted_flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagRepr>::deserialize(de)? {
        Some(FlagRepr::Bool(b)) => b,
        Some(FlagRepr::Num(n)) => n != 0,
        None => false,
    })
}
