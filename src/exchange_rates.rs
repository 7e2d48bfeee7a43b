/// Ticker data and fiat to BTC conversion.
use crate::api_client::{ApiClient, ApiError, Result};
use crate::query_string::QueryString;
use crate::types::Currency;
use std::collections::HashMap;

impl ApiClient {
    /// Gets the price ticker keyed by 3-letter currency symbol
    pub async fn ticker(&self) -> Result<HashMap<String, Currency>> {
        self.get("ticker", None).await
    }

    /// Converts `value` in `currency` to BTC
    pub async fn to_btc(&self, currency: &str, value: f64) -> Result<f64> {
        if currency.trim().is_empty() {
            return Err(ApiError::ArgumentNull("currency"));
        }
        if value <= 0.0 {
            return Err(ApiError::ArgumentOutOfRange {
                name: "value",
                reason: "must be greater than zero",
            });
        }
        let mut qs = QueryString::new();
        qs.add("currency", currency)?;
        qs.add("value", &value.to_string())?;
        self.get("tobtc", Some(qs)).await
    }
}
