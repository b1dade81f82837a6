//! Matching core configuration (ambient stack addition, §7): the tunables
//! `model`'s constants hard-code are exposed here as an overridable,
//! TOML-loaded config, the way the teacher's binaries layer `structopt`
//! arguments over the crate's defaults in `shared::arguments`.

use serde::{Deserialize, Serialize};

use model::{MAX_AMOUNT, MAX_LIVE_TIME_MS, NATIVE_ASSET_DECIMALS, PRICE_CONSTANT};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub price_constant: u64,
    pub max_amount: u64,
    pub max_live_time_ms: u64,
    pub native_asset_decimals: u8,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            price_constant: PRICE_CONSTANT,
            max_amount: MAX_AMOUNT,
            max_live_time_ms: MAX_LIVE_TIME_MS,
            native_asset_decimals: NATIVE_ASSET_DECIMALS,
        }
    }
}

impl MatcherConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        toml::from_str(s).map_err(|_| Error::Domain(crate::error::DomainErrorKind::InvalidDecimals))
    }
}
