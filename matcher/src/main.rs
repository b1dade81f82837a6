//! Entry point for the matching core's per-pair actor process. Network
//! transport, persistence and the REST surface are out of scope here —
//! this binary exists to initialize logging/config and host the
//! single-threaded submission loop described in the concurrency model;
//! wiring a real transport in is left to the embedding node.

use orderbook::OrderBooks;
use shared::config::MatcherConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::logging::init("matcher=info");
    let config = MatcherConfig::default();
    tracing::info!(?config, "matching core starting");

    let _books = OrderBooks::new();

    // Submissions arrive serialized per pair from the embedding node; each
    // is run to completion through `matcher::process` before the next is
    // admitted. There is no submission source wired up in this binary.
    tracing::info!("matching core idle: no submission source configured");
    Ok(())
}
