//! Collision-resistant object key generation.
//!
//! Key format: `{folder}/{millis}-{token}.{extension}`, where `token` is 16
//! random alphanumeric characters. All backends use this format.

use rand::distr::Alphanumeric;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

const TOKEN_LEN: usize = 16;

/// Generate a fresh object key under `folder`.
///
/// The millisecond timestamp plus a 62^16 random token makes collisions
/// between concurrent uploads statistically negligible. Keys are never
/// reused: a failed upload rolls back its keys and a retry generates new
/// ones.
pub fn object_key(folder: &str, extension: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();

    format!("{}/{}-{}.{}", folder, millis, token, extension)
}
