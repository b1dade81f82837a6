use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::asset::{Asset, AssetPair};
use crate::encoding::encode_order;
use crate::signature::{verify, PublicKey, Signature};
use crate::{MAX_AMOUNT, MAX_LIVE_TIME_MS};

/// Buy or sell side of an order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

/// Structural violations of an `Order` checked at construction time —
/// independent of any counter order's price (that check is
/// `AcceptedOrder::is_valid`, which needs a counter price and lives in the
/// `matcher` crate).
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("order amount must be positive")]
    ZeroAmount,
    #[error("order amount {0} must be below the configured maximum {1}")]
    AmountTooLarge(u64, u64),
    #[error("order price must be positive")]
    ZeroPrice,
    #[error("order expiration {expiration} must be after timestamp {timestamp}")]
    ExpirationNotAfterTimestamp { timestamp: u64, expiration: u64 },
    #[error("order lifetime {lifetime}ms exceeds the maximum of {max}ms")]
    LifetimeTooLong { lifetime: u64, max: u64 },
    #[error("version 1 orders must use the native asset as feeAsset")]
    VersionOneRequiresNativeFeeAsset,
}

/// An immutable signed order. Construction validates the invariants that do
/// not depend on a counter order's price; `matcher::AcceptedOrder` layers the
/// remaining, price-dependent `isValid` check on top.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Order {
    pub sender: PublicKey,
    pub matcher: PublicKey,
    pub pair: AssetPair,
    pub side: OrderSide,
    pub price: u64,
    pub amount: u64,
    pub timestamp: u64,
    pub expiration: u64,
    pub matcher_fee: u64,
    pub fee_asset: Asset,
    pub version: u8,
    pub signature: Signature,
}

impl Order {
    /// Validates the construction-time invariants of §3 and returns the
    /// order unchanged if they hold. Does not check the signature — callers
    /// that need authenticity should also call `verify_signature`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sender: PublicKey,
        matcher: PublicKey,
        pair: AssetPair,
        side: OrderSide,
        price: u64,
        amount: u64,
        timestamp: u64,
        expiration: u64,
        matcher_fee: u64,
        fee_asset: Asset,
        version: u8,
        signature: Signature,
    ) -> Result<Self, OrderValidationError> {
        if amount == 0 {
            return Err(OrderValidationError::ZeroAmount);
        }
        if amount >= MAX_AMOUNT {
            return Err(OrderValidationError::AmountTooLarge(amount, MAX_AMOUNT));
        }
        if price == 0 {
            return Err(OrderValidationError::ZeroPrice);
        }
        if expiration <= timestamp {
            return Err(OrderValidationError::ExpirationNotAfterTimestamp {
                timestamp,
                expiration,
            });
        }
        let lifetime = expiration - timestamp;
        if lifetime > MAX_LIVE_TIME_MS {
            return Err(OrderValidationError::LifetimeTooLong {
                lifetime,
                max: MAX_LIVE_TIME_MS,
            });
        }
        if version == 1 && !fee_asset.is_native() {
            return Err(OrderValidationError::VersionOneRequiresNativeFeeAsset);
        }
        Ok(Self {
            sender,
            matcher,
            pair,
            side,
            price,
            amount,
            timestamp,
            expiration,
            matcher_fee,
            fee_asset,
            version,
            signature,
        })
    }

    /// The asset this order's sender gives up.
    pub fn spent_asset(&self) -> Asset {
        match self.side {
            OrderSide::Buy => self.pair.price_asset,
            OrderSide::Sell => self.pair.amount_asset,
        }
    }

    /// The asset this order's sender receives.
    pub fn receive_asset(&self) -> Asset {
        match self.side {
            OrderSide::Buy => self.pair.amount_asset,
            OrderSide::Sell => self.pair.price_asset,
        }
    }

    /// Canonical byte encoding from §6, used for both the signature message
    /// and the order id.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        encode_order(self)
    }

    /// `SHA-256` over the canonical encoding; stable across implementations
    /// (Testable Property 6) and used as the key for duplicate-submission
    /// and match-history lookups.
    pub fn id(&self) -> [u8; 32] {
        Sha256::digest(self.canonical_bytes()).into()
    }

    pub fn verify_signature(&self) -> bool {
        verify(&self.signature, &self.canonical_bytes(), &self.sender)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expiration
    }
}
