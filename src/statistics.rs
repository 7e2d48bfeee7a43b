use crate::api_client::{ApiClient, Result};
use crate::query_string::QueryString;
use crate::types::Statistics;

impl ApiClient {
    /// Gets the network statistics
    pub async fn statistics(&self) -> Result<Statistics> {
        let mut qs = QueryString::new();
        qs.add("format", "json")?;
        self.get("stats", Some(qs)).await
    }
}
