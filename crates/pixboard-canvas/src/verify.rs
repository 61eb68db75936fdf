//! Human-verification oracle
//!
//! Pixel writes are gated by a solved challenge. Issuing challenges happens
//! elsewhere; the core only asks a [`ChallengeVerifier`] whether an answer
//! matches the token handed out with the challenge.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Pass/fail check for a solved challenge
pub trait ChallengeVerifier: Send + Sync {
    /// Whether `answer` solves the challenge identified by `token`
    fn verify(&self, answer: &str, token: &str) -> bool;

    /// Get the verifier name (for logging)
    fn name(&self) -> &str;
}

/// Verifier for tokens of the form `hex(hmac_sha256(secret, lowercase(trim(answer))))`
pub struct HashChallengeVerifier {
    secret: String,
}

impl HashChallengeVerifier {
    /// Create a verifier bound to a shared secret
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Token that [`HashChallengeVerifier::verify`] accepts for `answer`
    #[must_use]
    pub fn token_for(&self, answer: &str) -> String {
        hex::encode(self.signature(answer))
    }

    fn signature(&self, answer: &str) -> Vec<u8> {
        // HMAC takes keys of any length, including empty
        match HmacSha256::new_from_slice(self.secret.as_bytes()) {
            Ok(mut mac) => {
                mac.update(answer.trim().to_lowercase().as_bytes());
                mac.finalize().into_bytes().to_vec()
            }
            Err(_) => Vec::new(),
        }
    }
}

impl ChallengeVerifier for HashChallengeVerifier {
    fn verify(&self, answer: &str, token: &str) -> bool {
        if answer.trim().is_empty() {
            return false;
        }
        let Ok(presented) = hex::decode(token.trim()) else {
            return false;
        };
        let expected = self.signature(answer);
        !expected.is_empty() && bool::from(expected.ct_eq(&presented))
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// Accepts every answer; for local development only
pub struct AllowAllVerifier;

impl ChallengeVerifier for AllowAllVerifier {
    fn verify(&self, _answer: &str, _token: &str) -> bool {
        true
    }

    fn name(&self) -> &str {
        "allow_all"
    }
}
