//! Secret generation and hashing for API keys and license keys.

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Unambiguous alphabet for license key segments (no 0/O/1/I).
const KEY_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a brand API key with an `lk_` prefix.
pub fn generate_api_key() -> String {
    format!("lk_{}", Uuid::new_v4().simple())
}

/// Generate an opaque license key: LIC-XXXX-XXXX-XXXX-XXXX.
/// 20 characters from a 32-char alphabet (~100 bits), collision-resistant
/// and unguessable; the UNIQUE column backs uniqueness.
pub fn generate_license_key() -> String {
    let mut rng = rand::thread_rng();
    let mut part = || -> String {
        (0..4)
            .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
            .collect()
    };

    format!("LIC-{}-{}-{}-{}", part(), part(), part(), part())
}

/// Hash a secret for storage/lookup. Domain-prefixed so hashes are not
/// portable across contexts.
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"latchkey-secret-v1:");
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time comparison of a candidate secret against a stored hash.
pub fn verify_secret(secret: &str, stored_hash: &str) -> bool {
    let candidate = hash_secret(secret);
    candidate.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}
