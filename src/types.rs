/// Result models populated from the service's JSON responses.
use crate::{AddressString, BlockHeight, Satoshi, TxHash};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SATOSHIS_PER_BITCOIN: u64 = 100_000_000;
pub const BITS_PER_BITCOIN: u64 = 1_000_000;
pub const MILLI_BITS_PER_BITCOIN: u64 = 1_000;

/// An amount of bitcoin, held in satoshis as the service reports it
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitcoinValue(Satoshi);

impl BitcoinValue {
    pub const ZERO: BitcoinValue = BitcoinValue(0);

    pub fn from_satoshis(satoshis: Satoshi) -> BitcoinValue {
        BitcoinValue(satoshis)
    }

    /// Converts from whole BTC, rounding to the nearest satoshi
    pub fn from_btc(btc: f64) -> BitcoinValue {
        BitcoinValue((btc * SATOSHIS_PER_BITCOIN as f64).round() as Satoshi)
    }

    pub fn satoshis(&self) -> Satoshi {
        self.0
    }

    pub fn btc(&self) -> f64 {
        self.0 as f64 / SATOSHIS_PER_BITCOIN as f64
    }

    pub fn bits(&self) -> f64 {
        self.btc() * BITS_PER_BITCOIN as f64
    }

    pub fn milli_bits(&self) -> f64 {
        self.btc() * MILLI_BITS_PER_BITCOIN as f64
    }
}

impl fmt::Display for BitcoinValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{:08}",
            self.0 / SATOSHIS_PER_BITCOIN,
            self.0 % SATOSHIS_PER_BITCOIN
        )
    }
}

/// An address with the page of transactions it was fetched with. When
/// returned from `ApiClient::address` the transactions are the merged
/// result of every page, oldest request first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub hash160: String,
    pub address: AddressString,
    pub total_received: BitcoinValue,
    pub total_sent: BitcoinValue,
    pub final_balance: BitcoinValue,
    #[serde(rename = "n_tx")]
    pub transaction_count: u64,
    #[serde(rename = "txs")]
    pub transactions: Vec<Transaction>,
}

impl Address {
    /// Keeps the static fields and replaces the transaction sequence
    pub fn with_transactions(self, transactions: Vec<Transaction>) -> Address {
        Address {
            transactions,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: TxHash,
    #[serde(rename = "ver", default)]
    pub version: i64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub weight: u64,
    #[serde(default)]
    pub fee: BitcoinValue,
    #[serde(default)]
    pub relayed_by: String,
    #[serde(default)]
    pub lock_time: u64,
    #[serde(rename = "tx_index", default)]
    pub index: u64,
    #[serde(default)]
    pub double_spend: bool,
    #[serde(default)]
    pub time: u64,
    #[serde(default)]
    pub block_height: Option<BlockHeight>,
    #[serde(default)]
    pub inputs: Vec<Input>,
    #[serde(rename = "out", default)]
    pub outputs: Vec<Output>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub sequence: u64,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub witness: String,
    /// Absent for coinbase inputs
    #[serde(default)]
    pub prev_out: Option<Output>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(default)]
    pub n: u32,
    pub value: BitcoinValue,
    #[serde(rename = "addr", default)]
    pub address: Option<AddressString>,
    #[serde(default)]
    pub tx_index: u64,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub spent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub hash: String,
    #[serde(rename = "ver", default)]
    pub version: i64,
    #[serde(rename = "prev_block", default)]
    pub previous_block_hash: String,
    #[serde(rename = "mrkl_root", default)]
    pub merkle_root: String,
    #[serde(default)]
    pub time: u64,
    #[serde(default)]
    pub bits: u64,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub fee: BitcoinValue,
    #[serde(rename = "n_tx", default)]
    pub transaction_count: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "block_index", default)]
    pub index: u64,
    #[serde(default)]
    pub main_chain: bool,
    pub height: BlockHeight,
    #[serde(rename = "tx", default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestBlock {
    pub hash: String,
    pub time: u64,
    #[serde(rename = "block_index")]
    pub index: u64,
    pub height: BlockHeight,
    #[serde(rename = "txIndexes", default)]
    pub transaction_indexes: Vec<u64>,
}

/// Block summary returned by the per-day and per-pool listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleBlock {
    pub height: BlockHeight,
    pub hash: String,
    pub time: u64,
    #[serde(default)]
    pub main_chain: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnspentOutput {
    #[serde(rename = "tx_output_n")]
    pub n: u32,
    #[serde(rename = "tx_hash_big_endian")]
    pub transaction_hash: TxHash,
    #[serde(rename = "tx_index", default)]
    pub transaction_index: u64,
    #[serde(default)]
    pub script: String,
    pub value: BitcoinValue,
    #[serde(default)]
    pub confirmations: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryData {
    pub hash: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub initial_time: u64,
    pub last_time: u64,
    pub initial_ip: String,
    #[serde(rename = "nconnected")]
    pub connected_count: u32,
    pub relayed_count: u32,
    pub relayed_percent: u32,
}

/// Ticker entry for one fiat currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(rename = "15m")]
    pub price_15m: f64,
    pub last: f64,
    pub buy: f64,
    pub sell: f64,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub market_price_usd: f64,
    pub hash_rate: f64,
    #[serde(rename = "total_fees_btc")]
    pub total_fees: BitcoinValue,
    #[serde(rename = "n_btc_mined")]
    pub btc_mined: BitcoinValue,
    #[serde(rename = "n_tx")]
    pub transaction_count: u64,
    #[serde(rename = "n_blocks_mined")]
    pub blocks_mined: u64,
    pub minutes_between_blocks: f64,
    #[serde(rename = "totalbc")]
    pub total_btc: BitcoinValue,
    #[serde(rename = "n_blocks_total")]
    pub total_blocks: u64,
    pub estimated_transaction_volume_usd: f64,
    pub blocks_size: u64,
    pub miners_revenue_usd: f64,
    #[serde(rename = "nextretarget")]
    pub next_retarget: u64,
    pub difficulty: f64,
    pub estimated_btc_sent: BitcoinValue,
    pub miners_revenue_btc: f64,
    pub total_btc_sent: BitcoinValue,
    pub trade_volume_btc: f64,
    pub trade_volume_usd: f64,
    pub timestamp: u64,
}
