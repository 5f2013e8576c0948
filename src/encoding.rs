//! Canonical byte encoding for content hashes
//!
//! Every hashed structure is written with fixed-width fields or a varint
//! length prefix, so two different values never share an encoding.

use sha2::{Digest, Sha256};

use crate::types::{hash_from_digest, hash_to_bytes, Arg, Hash256};

/// Presence tags for optional fields
pub const TAG_ABSENT: u8 = 0x00;
pub const TAG_PRESENT: u8 = 0x01;

const ARG_INT: u8 = 0x01;
const ARG_BYTES: u8 = 0x02;
const ARG_TEXT: u8 = 0x03;

/// Encode a number as a Bitcoin varint
pub fn encode_varint(value: u64) -> Vec<u8> {
    if value < 0xfd {
        vec![value as u8]
    } else if value <= 0xffff {
        let mut result = vec![0xfd];
        result.extend_from_slice(&(value as u16).to_le_bytes());
        result
    } else if value <= 0xffffffff {
        let mut result = vec![0xfe];
        result.extend_from_slice(&(value as u32).to_le_bytes());
        result
    } else {
        let mut result = vec![0xff];
        result.extend_from_slice(&value.to_le_bytes());
        result
    }
}

/// Append a varint-prefixed byte string
pub fn write_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&encode_varint(bytes.len() as u64));
    buf.extend_from_slice(bytes);
}

/// Append a hash as 32 big-endian bytes
pub fn write_hash(buf: &mut Vec<u8>, hash: &Hash256) {
    buf.extend_from_slice(&hash_to_bytes(hash));
}

/// Append a single satisfier argument
pub fn write_arg(buf: &mut Vec<u8>, arg: &Arg) {
    match arg {
        Arg::Int(value) => {
            buf.push(ARG_INT);
            buf.extend_from_slice(&value.to_le_bytes());
        }
        Arg::Bytes(bytes) => {
            buf.push(ARG_BYTES);
            write_bytes(buf, bytes);
        }
        Arg::Text(text) => {
            buf.push(ARG_TEXT);
            write_bytes(buf, text.as_bytes());
        }
    }
}

/// Append a counted list of satisfier arguments
pub fn write_args(buf: &mut Vec<u8>, args: &[Arg]) {
    buf.extend_from_slice(&encode_varint(args.len() as u64));
    for arg in args {
        write_arg(buf, arg);
    }
}

/// SHA-256 of `data` as a big-endian integer
pub fn sha256(data: &[u8]) -> Hash256 {
    let digest = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    hash_from_digest(&bytes)
}

/// SHA-256 of two 32-byte big-endian hashes laid side by side
pub fn sha256_pair(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut combined = Vec::with_capacity(64);
    write_hash(&mut combined, left);
    write_hash(&mut combined, right);
    sha256(&combined)
}
