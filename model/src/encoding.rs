//! Canonical byte encodings from §6: the order encoding used for signing
//! and ids, and the exchange-transaction encoding used by the `settlement`
//! crate. Kept alongside the types they encode, the way the teacher keeps
//! `Signature`'s EIP-712 hashing beside the `Signature` type itself.

use crate::asset::Asset;
use crate::order::{Order, OrderSide};

fn push_asset(buf: &mut Vec<u8>, asset: Asset) {
    match asset {
        Asset::Native => buf.push(0),
        Asset::Issued(id) => {
            buf.push(1);
            buf.extend_from_slice(&id);
        }
    }
}

/// `version_byte ∥ sender_pubkey(32) ∥ matcher_pubkey(32) ∥
/// amountAssetFlag(1) ∥ amountAssetId?(32) ∥ priceAssetFlag(1) ∥
/// priceAssetId?(32) ∥ side(1) ∥ price(8 BE) ∥ amount(8 BE) ∥
/// timestamp(8 BE) ∥ expiration(8 BE) ∥ matcherFee(8 BE) ∥
/// feeAssetFlag(1) ∥ feeAssetId?(32)`.
pub fn encode_order(order: &Order) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + 32 + 32 + 33 + 33 + 1 + 8 * 4 + 33);
    buf.push(order.version);
    buf.extend_from_slice(&order.sender.0);
    buf.extend_from_slice(&order.matcher.0);
    push_asset(&mut buf, order.pair.amount_asset);
    push_asset(&mut buf, order.pair.price_asset);
    buf.push(match order.side {
        OrderSide::Buy => 0,
        OrderSide::Sell => 1,
    });
    buf.extend_from_slice(&order.price.to_be_bytes());
    buf.extend_from_slice(&order.amount.to_be_bytes());
    buf.extend_from_slice(&order.timestamp.to_be_bytes());
    buf.extend_from_slice(&order.expiration.to_be_bytes());
    buf.extend_from_slice(&order.matcher_fee.to_be_bytes());
    push_asset(&mut buf, order.fee_asset);
    buf
}
