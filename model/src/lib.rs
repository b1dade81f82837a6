//! Value types shared across the matching core: assets, asset pairs, orders,
//! signatures and their canonical byte encodings.
//!
//! This crate has no dependency on the rest of the workspace — it holds the
//! data the matcher, order book and settlement crates all pass around by
//! value, the way the teacher's own `model` crate anchors its workspace.

pub mod asset;
pub mod encoding;
pub mod order;
pub mod signature;

pub use asset::{Asset, AssetPair};
pub use order::{Order, OrderSide, OrderValidationError};
pub use signature::{PublicKey, Signature};

/// Fixed-point denominator for all price calculations (`10^8`).
pub const PRICE_CONSTANT: u64 = 100_000_000;

/// Upper bound (exclusive) on `Order::amount`.
pub const MAX_AMOUNT: u64 = 1_000_000_000_000_000; // 10^15, matches the teacher's order-of-magnitude token supply caps

/// Upper bound on `expiration - timestamp`, in milliseconds (30 days).
pub const MAX_LIVE_TIME_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Decimals used by the native asset.
pub const NATIVE_ASSET_DECIMALS: u8 = 8;
