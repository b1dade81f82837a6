//! The settlement record (§3, §6): `ExchangeTransaction`, its canonical
//! byte encoding for signing/hashing, and signature verification.

use model::encoding::encode_order;
use model::signature::{verify, PublicKey, Signature};
use model::Order;
use sha2::{Digest, Sha256};

/// `order1` is always the buy order, `order2` the sell order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeTransaction {
    pub order1: Order,
    pub order2: Order,
    pub price: u64,
    pub amount: u64,
    pub matcher_fee: u64,
    pub fee: u64,
    pub timestamp: u64,
    pub signature: Signature,
}

impl ExchangeTransaction {
    /// `len(order1)(4 BE) ∥ len(order2)(4 BE) ∥ order1_bytes ∥ order2_bytes
    /// ∥ price(8 BE) ∥ amount(8 BE) ∥ matcherFee(8 BE) ∥ fee(8 BE) ∥
    /// timestamp(8 BE)` — the message both signed and hashed.
    pub fn to_sign_bytes(&self) -> Vec<u8> {
        let order1_bytes = encode_order(&self.order1);
        let order2_bytes = encode_order(&self.order2);
        let mut buf = Vec::with_capacity(8 + order1_bytes.len() + order2_bytes.len() + 40);
        buf.extend_from_slice(&(order1_bytes.len() as u32).to_be_bytes());
        buf.extend_from_slice(&(order2_bytes.len() as u32).to_be_bytes());
        buf.extend_from_slice(&order1_bytes);
        buf.extend_from_slice(&order2_bytes);
        buf.extend_from_slice(&self.price.to_be_bytes());
        buf.extend_from_slice(&self.amount.to_be_bytes());
        buf.extend_from_slice(&self.matcher_fee.to_be_bytes());
        buf.extend_from_slice(&self.fee.to_be_bytes());
        buf.extend_from_slice(&self.timestamp.to_be_bytes());
        buf
    }

    /// The full wire encoding: `toSign ∥ signature(64)`.
    pub fn wire_bytes(&self) -> Vec<u8> {
        let mut buf = self.to_sign_bytes();
        buf.extend_from_slice(&self.signature.0);
        buf
    }

    /// `SHA-256(toSign)`.
    pub fn id(&self) -> [u8; 32] {
        Sha256::digest(self.to_sign_bytes()).into()
    }

    pub fn verify_signature(&self, matcher: &PublicKey) -> bool {
        verify(&self.signature, &self.to_sign_bytes(), matcher)
    }
}
