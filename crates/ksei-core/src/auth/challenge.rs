//! Password challenge encoding for the login protocol.
//!
//! The portal does not accept the plaintext password. The client sends
//! `base64(sha1_hex(password) + "@@!!@@" + unix_timestamp)` to the
//! challenge endpoint and logs in with the hash the server returns.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use sha1::{Digest, Sha1};

/// Separator between the password digest and the timestamp.
const CHALLENGE_SEPARATOR: &str = "@@!!@@";

/// Build the challenge parameter for a given UNIX timestamp (seconds).
pub fn encode_challenge(password: &str, timestamp: i64) -> String {
    let digest = hex::encode(Sha1::digest(password.as_bytes()));
    let param = format!("{}{}{}", digest, CHALLENGE_SEPARATOR, timestamp);
    STANDARD.encode(param)
}

/// Build the challenge parameter stamped with the current time.
///
/// Must be called once per login attempt; the timestamp is part of the
/// server's anti-replay check.
pub fn fresh_challenge(password: &str) -> String {
    encode_challenge(password, Utc::now().timestamp())
}
