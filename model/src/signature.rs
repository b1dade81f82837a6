use std::fmt;

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use serde::{de, Deserialize, Serialize};

/// A Curve25519 (Ed25519) public key, 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(pub [u8; 32]);

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

/// A Curve25519 (Ed25519) signature, 64 bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

/// `verify(sig, message, pubkey) -> bool` from §6. Never panics: a
/// malformed public key simply fails to verify rather than erroring, since
/// callers treat verification failure and malformed input identically.
pub fn verify(signature: &Signature, message: &[u8], pubkey: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&pubkey.0) else {
        return false;
    };
    let sig = DalekSignature::from_bytes(&signature.0);
    verifying_key.verify(message, &sig).is_ok()
}

macro_rules! impl_base58_serde {
    ($ty:ident, $len:expr) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                let bytes = bs58::decode(&s)
                    .into_vec()
                    .map_err(|e| de::Error::custom(format!("invalid base58: {e}")))?;
                let array: [u8; $len] = bytes.try_into().map_err(|v: Vec<u8>| {
                    de::Error::custom(format!(
                        "expected {} bytes, got {}",
                        $len,
                        v.len()
                    ))
                })?;
                Ok($ty(array))
            }
        }
    };
}

impl_base58_serde!(PublicKey, 32);
impl_base58_serde!(Signature, 64);
