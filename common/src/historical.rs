use crypto::Hash256;

/// Repairs transaction hash lists damaged by historical consensus bugs
///
/// Block 202612 was mined while a tree-hash bug was live, so the last two of
/// its 515 transaction hashes are wrong as served. Every client pins the
/// corrected hashes so the chain agrees on that block's ID.
pub fn fix_historical_anomalies(height: u64, tx_hashes: &mut [Hash256]) {
    if height != 202_612 {
        return;
    }

    if tx_hashes.len() != 515 {
        log::error!(
            "Expected block at height 202612 to contain 515 tx hashes, found {}",
            tx_hashes.len()
        );
        return;
    }

    tx_hashes[513] =
        Hash256::from_hex("d2d714c86291781bb86df24404754df7d9811025f659c34d3c67af3634b79da6")
            .expect("pinned hash is valid hex");
    tx_hashes[514] =
        Hash256::from_hex("d59297784bfea414885d710918c1b91bce0568550cd1538311dd3f2c71edf570")
            .expect("pinned hash is valid hex");
}
