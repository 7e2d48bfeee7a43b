#![allow(dead_code)]

use blockchain_api_client::ApiClient;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const ADDRESS: &str = "1AJbsFZ64EpEfS5UAjAfcUG8pH8Jn3rn1F";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn client_for(server: &MockServer, api_code: Option<&str>) -> ApiClient {
    init_logger();
    ApiClient::with_base_url(&server.uri(), api_code).unwrap()
}

pub fn tx_hash(position: u64) -> String {
    format!("tx-{:05}", position)
}

/// An address payload whose transactions are `tx-<position>` for every
/// position in `offset..offset + limit` that exists
pub fn address_page(total: u64, offset: u64, limit: u64) -> Value {
    let end = (offset + limit).min(total);
    let txs: Vec<Value> = (offset.min(end)..end)
        .map(|i| json!({ "hash": tx_hash(i), "ver": 1, "tx_index": i }))
        .collect();
    json!({
        "hash160": "660d4ef3a743e3e696ad990364e555c271ad504b",
        "address": ADDRESS,
        "n_tx": total,
        "total_received": 1031350000u64,
        "total_sent": 931250000u64,
        "final_balance": 100100000u64,
        "txs": txs,
    })
}

fn query_u64(request: &Request, key: &str) -> Option<u64> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| v.parse().ok())
}

/// Serves address pages from the request's `offset` and `limit`. Later
/// pages answer faster than earlier ones so completion order differs from
/// offset order.
pub struct AddressPages {
    pub total: u64,
}

impl Respond for AddressPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let (offset, limit) = match (query_u64(request, "offset"), query_u64(request, "limit")) {
            (Some(offset), Some(limit)) => (offset, limit),
            _ => return ResponseTemplate::new(400).set_body_string("missing paging"),
        };
        let delay = 5 * (self.total.saturating_sub(offset) / 50).min(20);
        ResponseTemplate::new(200)
            .set_body_json(address_page(self.total, offset, limit))
            .set_delay(Duration::from_millis(delay))
    }
}

/// Serves address pages like `AddressPages`, but every page takes the
/// same `delay` to answer
pub struct SlowAddressPages {
    pub total: u64,
    pub delay: Duration,
}

impl Respond for SlowAddressPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let offset = query_u64(request, "offset").unwrap_or(0);
        let limit = query_u64(request, "limit").unwrap_or(50);
        ResponseTemplate::new(200)
            .set_body_json(address_page(self.total, offset, limit))
            .set_delay(self.delay)
    }
}

pub async fn received_paging(server: &MockServer) -> Vec<(u64, u64)> {
    let mut paging: Vec<(u64, u64)> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|r| Some((query_u64(r, "offset")?, query_u64(r, "limit")?)))
        .collect();
    paging.sort();
    paging
}
