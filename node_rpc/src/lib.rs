#![deny(missing_docs)]
//! Client-side definitions of the daemon RPC the wallet consumes
//!
//! The wallet is a thin client: it trusts the daemon for chain data but
//! re-verifies every owned output itself. Exactly four operations are used,
//! all defined here along with a blocking HTTP implementation.

mod api_definitions;
mod client;

pub use api_definitions::{
    BlockEntry, GetBlocksResponse, GetOIndexesResponse, GetRandomOutsResponse, OutEntry,
    OutsForAmount, SendRawTxResponse, CORE_RPC_STATUS_BUSY, CORE_RPC_STATUS_OK,
};
pub use client::{DaemonClient, Error, HttpDaemonClient, Result};
