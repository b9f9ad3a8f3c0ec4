//! EIP-2930 access list encoding

use super::types::AccessListEntry;
use crate::codec::rlp::{encode_bytes, encode_list};

/// Encode one `[address, [storageKey, ...]]` entry
pub fn encode_entry(entry: &AccessListEntry) -> Vec<u8> {
    let address = encode_bytes(&entry.address);
    let keys: Vec<Vec<u8>> = entry.storage_keys.iter().map(|k| encode_bytes(k)).collect();
    encode_list(&[address, encode_list(&keys)])
}

/// Encode the whole access list; an empty list encodes as `0xc0`
pub fn encode_access_list(list: &[AccessListEntry]) -> Vec<u8> {
    let entries: Vec<Vec<u8>> = list.iter().map(encode_entry).collect();
    encode_list(&entries)
}
