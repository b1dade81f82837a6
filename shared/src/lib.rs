//! Ambient stack and cross-cutting domain logic shared by the order book,
//! matcher and settlement crates: error taxonomy, money arithmetic, the
//! asset decimals registry, auxiliary cryptography, configuration and
//! logging — the same shape the teacher's own `shared` crate carries for
//! the rest of its workspace.

pub mod arithmetic;
pub mod assets;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;

pub use assets::{AssetDecimalsRegistry, StaticAssetDecimalsRegistry};
pub use config::MatcherConfig;
pub use error::Error;
