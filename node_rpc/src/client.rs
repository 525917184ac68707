use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crypto::Hash256;

use crate::api_definitions::*;

// Wallet RPC calls block for up to this long before the transport gives up
const RPC_TIMEOUT: Duration = Duration::from_secs(200);

const RPC_DEFAULT_PORT: u16 = 8080;

/// Error type for daemon communication
#[derive(Error, Debug)]
pub enum Error {
    /// The daemon could not be reached or the transport failed mid-call
    #[error("No connection to daemon: {0}")]
    Connection(String),

    /// The daemon answered with bytes the wallet could not decode
    #[error("Malformed daemon response: {0}")]
    Encoding(String),
}

/// Type alias for daemon call results
pub type Result<T> = std::result::Result<T, Error>;

/// The four daemon operations the wallet consumes
///
/// Implemented over HTTP by [`HttpDaemonClient`]; tests substitute an
/// in-memory daemon.
pub trait DaemonClient {
    /// Batched chain pull starting from the divergence point implied by
    /// `block_ids`
    fn get_blocks(
        &mut self,
        block_ids: &[Hash256],
        start_height: u64,
    ) -> Result<GetBlocksResponse>;

    /// Global output indices for each output of one transaction
    fn get_o_indexes(&mut self, txid: &Hash256) -> Result<GetOIndexesResponse>;

    /// Random decoy outputs, `outs_count` candidates per requested amount
    fn get_random_outs(
        &mut self,
        amounts: &[u64],
        outs_count: u64,
    ) -> Result<GetRandomOutsResponse>;

    /// Relays a serialized transaction
    fn send_raw_transaction(&mut self, tx_as_hex: &str) -> Result<SendRawTxResponse>;
}

/// Blocking HTTP client for a Caligo daemon
///
/// Owns the reqwest client so that connections are reused across the scan
/// loop. Binary endpoints exchange bincode bodies; `/sendrawtransaction` is
/// JSON.
pub struct HttpDaemonClient {
    daemon_address: String,
    client: Option<reqwest::blocking::Client>,
}

impl HttpDaemonClient {
    /// Creates a client for the daemon at `daemon_address`
    /// (e.g. `http://localhost:8080`)
    pub fn new(daemon_address: impl Into<String>) -> Self {
        HttpDaemonClient {
            daemon_address: daemon_address.into(),
            client: None,
        }
    }

    /// Ensures the underlying HTTP client exists, filling in the default
    /// daemon port when the configured URL does not carry one
    pub fn check_connection(&mut self) -> Result<()> {
        if self.client.is_some() {
            return Ok(());
        }

        let mut url = reqwest::Url::parse(&self.daemon_address)
            .map_err(|e| Error::Connection(format!("{}: {}", self.daemon_address, e)))?;
        if url.port().is_none() {
            // Errors only for URL schemes that cannot carry a port
            url.set_port(Some(RPC_DEFAULT_PORT))
                .map_err(|_| Error::Connection(format!("cannot set port on {}", url)))?;
        }
        self.daemon_address = url.as_str().trim_end_matches('/').to_string();

        let client = reqwest::blocking::Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()
            .map_err(|e| Error::Connection(e.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    fn invoke_bin<TReq, TResp>(&mut self, endpoint: &str, request: &TReq) -> Result<TResp>
    where
        TReq: Serialize,
        TResp: DeserializeOwned,
    {
        self.check_connection()?;
        let client = self.client.as_ref().expect("client exists after check");

        let body = bincode::serialize(request).map_err(|e| Error::Encoding(e.to_string()))?;
        let url = format!("{}{}", self.daemon_address, endpoint);

        log::debug!("Invoking {}", url);
        let response = client
            .post(&url)
            .body(body)
            .send()
            .map_err(|e| Error::Connection(format!("{}: {}", endpoint, e)))?;
        let bytes = response
            .bytes()
            .map_err(|e| Error::Connection(format!("{}: {}", endpoint, e)))?;

        bincode::deserialize(&bytes).map_err(|e| Error::Encoding(format!("{}: {}", endpoint, e)))
    }

    fn invoke_json<TReq, TResp>(&mut self, endpoint: &str, request: &TReq) -> Result<TResp>
    where
        TReq: Serialize,
        TResp: DeserializeOwned,
    {
        self.check_connection()?;
        let client = self.client.as_ref().expect("client exists after check");

        let url = format!("{}{}", self.daemon_address, endpoint);

        log::debug!("Invoking {}", url);
        client
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| Error::Connection(format!("{}: {}", endpoint, e)))?
            .json()
            .map_err(|e| Error::Encoding(format!("{}: {}", endpoint, e)))
    }
}

impl DaemonClient for HttpDaemonClient {
    fn get_blocks(
        &mut self,
        block_ids: &[Hash256],
        start_height: u64,
    ) -> Result<GetBlocksResponse> {
        self.invoke_bin(
            "/getblocks.bin",
            &GetBlocksRequest {
                block_ids: block_ids.to_vec(),
                start_height,
            },
        )
    }

    fn get_o_indexes(&mut self, txid: &Hash256) -> Result<GetOIndexesResponse> {
        self.invoke_bin("/get_o_indexes.bin", &GetOIndexesRequest { txid: *txid })
    }

    fn get_random_outs(
        &mut self,
        amounts: &[u64],
        outs_count: u64,
    ) -> Result<GetRandomOutsResponse> {
        self.invoke_bin(
            "/getrandom_outs.bin",
            &GetRandomOutsRequest {
                amounts: amounts.to_vec(),
                outs_count,
            },
        )
    }

    fn send_raw_transaction(&mut self, tx_as_hex: &str) -> Result<SendRawTxResponse> {
        self.invoke_json(
            "/sendrawtransaction",
            &SendRawTxRequest {
                tx_as_hex: tx_as_hex.to_string(),
            },
        )
    }
}
