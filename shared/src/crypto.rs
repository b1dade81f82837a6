//! Auxiliary cryptography from §6: the codecs and hash functions used
//! alongside the Ed25519 signing already provided by `model::signature`,
//! plus a Merkle proof verifier for settlement batch inclusion proofs.

use blake2::Blake2b512;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::error::{DomainErrorKind, Error};

pub fn base58_encode(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

pub fn base58_decode(s: &str) -> Result<Vec<u8>, Error> {
    bs58::decode(s)
        .into_vec()
        .map_err(|_| Error::Domain(DomainErrorKind::InvalidDecimals))
}

pub fn base64_encode(bytes: &[u8]) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    STANDARD.encode(bytes)
}

pub fn base64_decode(s: &str) -> Result<Vec<u8>, Error> {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    STANDARD
        .decode(s)
        .map_err(|_| Error::Domain(DomainErrorKind::InvalidDecimals))
}

pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    Keccak256::digest(bytes).into()
}

/// Truncated to 32 bytes; Waves-style blocks and ledgers identify entries
/// by the first half of a Blake2b-512 digest.
pub fn blake2b256(bytes: &[u8]) -> [u8; 32] {
    let full: [u8; 64] = Blake2b512::digest(bytes).into();
    let mut out = [0u8; 32];
    out.copy_from_slice(&full[..32]);
    out
}

/// Merkle proof verification over SHA-256, left-right ordered: a `true`
/// flag on a sibling means it is hashed on the left of the running hash.
pub mod merkle {
    use super::sha256;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ProofStep {
        pub sibling: [u8; 32],
        pub sibling_is_left: bool,
    }

    pub fn verify(leaf: [u8; 32], proof: &[ProofStep], root: [u8; 32]) -> bool {
        let mut running = leaf;
        for step in proof {
            let mut buf = [0u8; 64];
            if step.sibling_is_left {
                buf[..32].copy_from_slice(&step.sibling);
                buf[32..].copy_from_slice(&running);
            } else {
                buf[..32].copy_from_slice(&running);
                buf[32..].copy_from_slice(&step.sibling);
            }
            running = sha256(&buf);
        }
        running == root
    }

    /// Builds a root and, for each input leaf, the proof path to it.
    /// Intended for tests and tooling, not the matching hot path.
    pub fn build(leaves: &[[u8; 32]]) -> ([u8; 32], Vec<Vec<ProofStep>>) {
        if leaves.is_empty() {
            return ([0u8; 32], Vec::new());
        }
        let mut level: Vec<[u8; 32]> = leaves.to_vec();
        let mut proofs: Vec<Vec<ProofStep>> = leaves.iter().map(|_| Vec::new()).collect();
        // `position[i]` tracks where leaf `i`'s hash currently sits within `level`.
        let mut position: Vec<usize> = (0..leaves.len()).collect();

        while level.len() > 1 {
            let mut next_level = Vec::with_capacity(level.len().div_ceil(2));
            let mut pair_index = 0;
            while pair_index < level.len() {
                if pair_index + 1 < level.len() {
                    let mut buf = [0u8; 64];
                    buf[..32].copy_from_slice(&level[pair_index]);
                    buf[32..].copy_from_slice(&level[pair_index + 1]);
                    next_level.push(sha256(&buf));
                } else {
                    next_level.push(level[pair_index]);
                }
                pair_index += 2;
            }

            for (leaf_idx, pos) in position.iter_mut().enumerate() {
                let pair_start = *pos - (*pos % 2);
                if pair_start + 1 < level.len() {
                    let (sibling, sibling_is_left) = if *pos % 2 == 0 {
                        (level[pair_start + 1], false)
                    } else {
                        (level[pair_start], true)
                    };
                    proofs[leaf_idx].push(ProofStep {
                        sibling,
                        sibling_is_left,
                    });
                }
                *pos /= 2;
            }
            level = next_level;
        }
        (level[0], proofs)
    }

}
