//! Asset & Decimals Registry (§4.0): decimals lookups the rest of the
//! workspace needs to normalize/denormalize amounts and prices.
//!
//! Modeled on the teacher's `TokenInfoFetching` trait in
//! `shared::token_info`, but synchronous — decimals are chain metadata
//! that changes at most once per asset's lifetime, so callers are expected
//! to hold a pre-fetched snapshot rather than awaiting a network call on
//! the matching hot path.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use mockall::automock;

use model::Asset;

use crate::error::{DomainErrorKind, Error};

#[automock]
pub trait AssetDecimalsRegistry: Send + Sync {
    fn decimals(&self, asset: Asset) -> Result<u8, Error>;
}

/// A fixed, in-memory snapshot of asset decimals. The native asset always
/// resolves to `model::NATIVE_ASSET_DECIMALS` regardless of what was
/// inserted for it.
#[derive(Clone, Default)]
pub struct StaticAssetDecimalsRegistry {
    decimals: Arc<Mutex<BTreeMap<Asset, u8>>>,
}

impl StaticAssetDecimalsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decimals(self, asset: Asset, decimals: u8) -> Self {
        self.insert(asset, decimals);
        self
    }

    pub fn insert(&self, asset: Asset, decimals: u8) {
        self.decimals.lock().unwrap().insert(asset, decimals);
    }
}

impl AssetDecimalsRegistry for StaticAssetDecimalsRegistry {
    fn decimals(&self, asset: Asset) -> Result<u8, Error> {
        if asset.is_native() {
            return Ok(model::NATIVE_ASSET_DECIMALS);
        }
        self.decimals
            .lock()
            .unwrap()
            .get(&asset)
            .copied()
            .ok_or(Error::Domain(DomainErrorKind::InvalidDecimals))
    }
}
