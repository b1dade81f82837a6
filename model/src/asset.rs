use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Serialize};

/// Length in bytes of an issued asset's id.
pub const ASSET_ID_LEN: usize = 32;

const NATIVE_ASSET_LITERAL: &str = "WAVES";

/// Either the chain's native asset, or an issued asset identified by a
/// 32-byte id. `Ord` is derived so assets can key a `BTreeMap` with a
/// deterministic iteration order — required for bit-identical balance
/// projections (see the Determinism property).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum Asset {
    Native,
    Issued([u8; ASSET_ID_LEN]),
}

impl Asset {
    pub fn issued(id: [u8; ASSET_ID_LEN]) -> Self {
        Asset::Issued(id)
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "{NATIVE_ASSET_LITERAL}"),
            Asset::Issued(id) => write!(f, "{}", bs58::encode(id).into_string()),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AssetParseError {
    #[error("invalid base58 asset id: {0}")]
    Base58(String),
    #[error("asset id must decode to {ASSET_ID_LEN} bytes, got {0}")]
    WrongLength(usize),
}

impl FromStr for Asset {
    type Err = AssetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == NATIVE_ASSET_LITERAL {
            return Ok(Asset::Native);
        }
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| AssetParseError::Base58(e.to_string()))?;
        let id: [u8; ASSET_ID_LEN] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| AssetParseError::WrongLength(v.len()))?;
        Ok(Asset::Issued(id))
    }
}

impl Serialize for Asset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Asset::from_str(&s).map_err(de::Error::custom)
    }
}

/// An ordered pair `(amountAsset, priceAsset)`; the two must differ.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct AssetPair {
    pub amount_asset: Asset,
    pub price_asset: Asset,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("asset pair amount asset and price asset must differ")]
pub struct SameAssetError;

impl AssetPair {
    pub fn new(amount_asset: Asset, price_asset: Asset) -> Result<Self, SameAssetError> {
        if amount_asset == price_asset {
            return Err(SameAssetError);
        }
        Ok(Self {
            amount_asset,
            price_asset,
        })
    }
}
