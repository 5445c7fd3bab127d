//! Request nonces
//!
//! Every request carries a fresh 32 character token. It is sent both as
//! `X-Nonce` and as `X-Request-Id` and is part of the signed payload.

use rand::Rng;

/// Length of a generated nonce
pub const NONCE_LEN: usize = 32;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a new nonce
///
/// The result is exactly [`NONCE_LEN`] characters drawn from `[0-9a-z]`.
pub fn generate_nonce() -> String {
    let mut rng = rand::thread_rng();
    (0..NONCE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
