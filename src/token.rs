use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("ROUND_TOKEN_SECRET is not set")]
    MissingSecret,
    #[error("invalid HMAC key")]
    InvalidKey,
}

/// Issues and verifies opaque round tokens. Only the HMAC of
/// `roundId:userId:token` is persisted; the raw token lives client-side
/// and must accompany every answer/finish call.
#[derive(Clone)]
pub struct TokenKeeper {
    key: Vec<u8>,
}

impl TokenKeeper {
    /// The secret is mandatory. A missing value fails startup rather than
    /// silently falling back to a development key.
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("ROUND_TOKEN_SECRET").map_err(|_| TokenError::MissingSecret)?;
        if secret.trim().is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(Self {
            key: secret.into_bytes(),
        })
    }

    #[cfg(test)]
    pub fn from_key(key: &[u8]) -> Self {
        Self { key: key.to_vec() }
    }

    /// Random opaque token handed to the client at round start.
    pub fn issue(&self) -> String {
        let mut bytes = [0u8; 24];
        rand::thread_rng().fill_bytes(&mut bytes);
        general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    }

    pub fn hash(&self, round_id: Uuid, user_id: Uuid, token: &str) -> Result<String, TokenError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::InvalidKey)?;
        mac.update(format!("{round_id}:{user_id}:{token}").as_bytes());
        Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Constant-time comparison of a supplied token against the stored hash.
    pub fn verify(&self, round_id: Uuid, user_id: Uuid, token: &str, stored_hash: &str) -> bool {
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.key) else {
            return false;
        };
        mac.update(format!("{round_id}:{user_id}:{token}").as_bytes());
        let Ok(expected) = general_purpose::STANDARD.decode(stored_hash) else {
            return false;
        };
        mac.verify_slice(&expected).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keeper() -> TokenKeeper {
        TokenKeeper::from_key(b"unit-test-secret")
    }

    #[test]
    fn issued_token_verifies_against_its_hash() {
        let k = keeper();
        let round = Uuid::new_v4();
        let user = Uuid::new_v4();
        let token = k.issue();
        let hash = k.hash(round, user, &token).unwrap();
        assert!(k.verify(round, user, &token, &hash));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let k = keeper();
        let round = Uuid::new_v4();
        let user = Uuid::new_v4();
        let token = k.issue();
        let hash = k.hash(round, user, &token).unwrap();
        assert!(!k.verify(round, user, "forged-token", &hash));
        assert!(!k.verify(round, user, &token, "bm90LWEtcmVhbC1oYXNo"));
    }

    #[test]
    fn hash_is_bound_to_round_and_user() {
        let k = keeper();
        let round = Uuid::new_v4();
        let user = Uuid::new_v4();
        let token = k.issue();
        let hash = k.hash(round, user, &token).unwrap();
        assert!(!k.verify(Uuid::new_v4(), user, &token, &hash));
        assert!(!k.verify(round, Uuid::new_v4(), &token, &hash));
    }
}
