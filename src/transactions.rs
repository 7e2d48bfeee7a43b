use crate::api_client::{ApiClient, ApiError, Result};
use log::info;

impl ApiClient {
    /// Broadcasts a hex encoded raw transaction to the network.
    /// The endpoint only accepts multipart uploads and answers with plain
    /// text, so the response body is not decoded.
    pub async fn push_transaction(&self, raw_tx_hex: &str) -> Result<()> {
        if raw_tx_hex.trim().is_empty() {
            return Err(ApiError::ArgumentNull("raw_tx_hex"));
        }
        self.post_with("pushtx", raw_tx_hex, true, |_| Ok(())).await?;
        info!("Pushed transaction of {} hex chars", raw_tx_hex.len());
        Ok(())
    }
}
