//! Serde helpers for byte fields
//!
//! Structured transaction input arrives as JSON with byte fields carried as
//! hex strings. An optional `0x` prefix is accepted on input; output is
//! always bare lowercase hex.

use serde::{Deserialize, Deserializer, Serializer};

fn decode_hex<E: serde::de::Error>(s: &str) -> Result<Vec<u8>, E> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(E::custom)
}

fn decode_fixed<const N: usize, E: serde::de::Error>(s: &str) -> Result<[u8; N], E> {
    decode_hex::<E>(s)?
        .try_into()
        .map_err(|_| E::custom(format!("expected {} bytes", N)))
}

/// Serialize/deserialize Vec<u8> as hex string
pub mod hex_vec {
    use super::*;

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode_hex(&s)
    }
}

/// Serialize/deserialize Vec<Vec<u8>> as a list of hex strings
pub mod hex_vec_list {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&hex::encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings: Vec<String> = Vec::deserialize(deserializer)?;
        strings.iter().map(|s| decode_hex(s)).collect()
    }
}

/// Serialize/deserialize [u8; 20] as hex string
pub mod hex20 {
    use super::*;

    pub fn serialize<S>(bytes: &[u8; 20], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 20], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode_fixed(&s)
    }
}

/// Serialize/deserialize Option<[u8; 20]> as hex string
pub mod hex20_option {
    use super::*;

    pub fn serialize<S>(bytes: &Option<[u8; 20]>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(b) => serializer.serialize_some(&hex::encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<[u8; 20]>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        opt.map(|s| decode_fixed(&s)).transpose()
    }
}

/// Serialize/deserialize [u8; 32] as hex string
pub mod hex32 {
    use super::*;

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode_fixed(&s)
    }
}

/// Serialize/deserialize Vec<[u8; 32]> as a list of hex strings
pub mod hex32_list {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S>(items: &[[u8; 32]], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&hex::encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<[u8; 32]>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings: Vec<String> = Vec::deserialize(deserializer)?;
        strings.iter().map(|s| decode_fixed(s)).collect()
    }
}
