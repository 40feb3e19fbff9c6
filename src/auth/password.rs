//! PBKDF2-SHA256 password hashing.
//!
//! Hashes use the modular crypt format
//! `$pbkdf2-sha256$<rounds>$<salt>$<checksum>`, where salt and checksum are
//! encoded with the "adapted base64" alphabet (`.` instead of `+`, no
//! padding). This is the format written by the passlib library, so hashes
//! stored by earlier deployments keep verifying.

use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::Sha256;

use crate::error::{HrError, HrResult};

/// Identifier of the hash scheme in the encoded form.
pub const SCHEME: &str = "pbkdf2-sha256";
/// Default number of PBKDF2 iterations.
pub const DEFAULT_ROUNDS: u32 = 29_000;

const SALT_LEN: usize = 16;
const CHECKSUM_LEN: usize = 32;

/// Hashes a password with a fresh random salt.
///
/// # Example
///
/// ```
/// use hr_system::auth::{hash_password, verify_password};
///
/// let hash = hash_password("admin@123", 1_000).unwrap();
/// assert!(hash.starts_with("$pbkdf2-sha256$1000$"));
/// assert!(verify_password("admin@123", &hash));
/// assert!(!verify_password("admin@124", &hash));
/// ```
pub fn hash_password(password: &str, rounds: u32) -> HrResult<String> {
    if rounds == 0 {
        return Err(HrError::PasswordHash {
            message: "rounds must be positive".to_string(),
        });
    }
    let salt: [u8; SALT_LEN] = rand::random();
    Ok(hash_with_salt(password, &salt, rounds))
}

fn hash_with_salt(password: &str, salt: &[u8], rounds: u32) -> String {
    let checksum = derive(password, salt, rounds);
    format!(
        "${}${}${}${}",
        SCHEME,
        rounds,
        ab64_encode(salt),
        ab64_encode(&checksum)
    )
}

/// Checks a password against an encoded hash.
///
/// Returns `false` for a wrong password and for any hash that cannot be
/// parsed; it never fails.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let Some(parsed) = ParsedHash::parse(encoded) else {
        return false;
    };
    let candidate = derive(password, &parsed.salt, parsed.rounds);
    constant_time_eq(&candidate, &parsed.checksum)
}

struct ParsedHash {
    rounds: u32,
    salt: Vec<u8>,
    checksum: Vec<u8>,
}

impl ParsedHash {
    fn parse(encoded: &str) -> Option<Self> {
        let mut parts = encoded.split('$');
        // Leading '$' yields an empty first segment.
        if !parts.next()?.is_empty() || parts.next()? != SCHEME {
            return None;
        }
        let rounds: u32 = parts.next()?.parse().ok().filter(|r| *r > 0)?;
        let salt = ab64_decode(parts.next()?)?;
        let checksum = ab64_decode(parts.next()?)?;
        if parts.next().is_some() || checksum.len() != CHECKSUM_LEN {
            return None;
        }
        Some(Self {
            rounds,
            salt,
            checksum,
        })
    }
}

fn derive(password: &str, salt: &[u8], rounds: u32) -> [u8; CHECKSUM_LEN] {
    let mut out = [0u8; CHECKSUM_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut out);
    out
}

fn ab64_encode(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes).replace('+', ".")
}

fn ab64_decode(text: &str) -> Option<Vec<u8>> {
    STANDARD_NO_PAD.decode(text.replace('.', "+")).ok()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Produced by passlib-compatible PBKDF2-SHA256 with salt "hr-system-salt!!".
    const KNOWN_HASH: &str =
        "$pbkdf2-sha256$29000$aHItc3lzdGVtLXNhbHQhIQ$dYuGXwxbOiEUDjLZnRKHfq.a03Br78kZ8OSbbvBMoHQ";

    #[test]
    fn test_known_hash_verifies() {
        assert!(verify_password("admin@123", KNOWN_HASH));
        assert!(!verify_password("Admin@123", KNOWN_HASH));
    }

    #[test]
    fn test_fixed_salt_reproduces_known_hash() {
        assert_eq!(
            hash_with_salt("admin@123", b"hr-system-salt!!", 29_000),
            KNOWN_HASH
        );
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("secret", 1_000).unwrap();
        let second = hash_password("secret", 1_000).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("secret", &first));
        assert!(verify_password("secret", &second));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(matches!(
            hash_password("secret", 0),
            Err(HrError::PasswordHash { .. })
        ));
    }

    #[test]
    fn test_malformed_hashes_do_not_verify() {
        for bad in [
            "",
            "plaintext",
            "$pbkdf2-sha256$",
            "$pbkdf2-sha256$abc$c2FsdA$c2FsdA",
            "$pbkdf2-sha256$0$aHItc3lzdGVtLXNhbHQhIQ$dYuGXwxbOiEUDjLZnRKHfq.a03Br78kZ8OSbbvBMoHQ",
            "$pbkdf2-sha512$29000$aHItc3lzdGVtLXNhbHQhIQ$dYuGXwxbOiEUDjLZnRKHfq.a03Br78kZ8OSbbvBMoHQ",
            "$pbkdf2-sha256$29000$aHItc3lzdGVtLXNhbHQhIQ$short",
            "$pbkdf2-sha256$29000$!!!$dYuGXwxbOiEUDjLZnRKHfq.a03Br78kZ8OSbbvBMoHQ",
        ] {
            assert!(!verify_password("admin@123", bad), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_empty_password_round_trips() {
        let hash = hash_password("", 1_000).unwrap();
        assert!(verify_password("", &hash));
        assert!(!verify_password(" ", &hash));
    }
}
