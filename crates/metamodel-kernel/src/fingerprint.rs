//! Deterministic identifiers for validation failures and built metamodels.
//!
//! Algorithm:
//! 1. Build a canonical key object (schema plus the contributing fields)
//! 2. Serialize with sorted keys and no whitespace (JCS)
//! 3. id = prefix || base32hex_lower(SHA256(keyBytes))

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

const FAILURE_ID_PREFIX: &str = "vf1_";
const DIGEST_PREFIX: &str = "mm1_";

/// Failure id keyed on failure class, origin identifier and message.
pub fn compute_failure_id(failure_class: &str, origin: &str, message: &str) -> String {
    let mut key = Map::new();
    key.insert("schema".to_string(), Value::Number(1.into()));
    key.insert("failureClass".to_string(), Value::String(failure_class.to_string()));
    key.insert("origin".to_string(), Value::String(origin.to_string()));
    key.insert("message".to_string(), Value::String(message.to_string()));
    fingerprint(FAILURE_ID_PREFIX, &Value::Object(key))
}

/// Digest of an exported metamodel document.
pub fn compute_metamodel_digest(document: &Value) -> String {
    let mut key = Map::new();
    key.insert("schema".to_string(), Value::Number(1.into()));
    key.insert("metamodel".to_string(), document.clone());
    fingerprint(DIGEST_PREFIX, &Value::Object(key))
}

fn fingerprint(prefix: &str, key: &Value) -> String {
    let mut bytes = Vec::new();
    jcs_serialize(key, &mut bytes);
    let hash = Sha256::digest(&bytes);
    format!("{prefix}{}", base32hex_lower_no_pad(&hash))
}

fn jcs_serialize(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => {
            buf.extend_from_slice(value.to_string().as_bytes());
        }
        Value::String(_) => buf.extend_from_slice(value.to_string().as_bytes()),
        Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                jcs_serialize(item, buf);
            }
            buf.push(b']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            buf.push(b'{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                buf.extend_from_slice(Value::String((*key).clone()).to_string().as_bytes());
                buf.push(b':');
                jcs_serialize(&map[key.as_str()], buf);
            }
            buf.push(b'}');
        }
    }
}

/// RFC 4648 base32hex, lowercase, without padding.
fn base32hex_lower_no_pad(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuv";

    let mut result = String::with_capacity(data.len() * 8 / 5 + 1);
    let mut bits: u64 = 0;
    let mut num_bits: u32 = 0;
    for &byte in data {
        bits = (bits << 8) | u64::from(byte);
        num_bits += 8;
        while num_bits >= 5 {
            num_bits -= 5;
            result.push(ALPHABET[((bits >> num_bits) & 0x1f) as usize] as char);
        }
    }
    if num_bits > 0 {
        result.push(ALPHABET[((bits << (5 - num_bits)) & 0x1f) as usize] as char);
    }
    result
}
