/// Block explorer lookups: addresses (with transparent pagination of their
/// transaction history), transactions, blocks, unspent outputs and
/// inventory data.
use crate::api_client::{ApiClient, ApiError, Result};
use crate::pagination::{PagePlan, MAX_PAGE_SIZE};
use crate::query_string::QueryString;
use crate::requests::decode_json;
use crate::types::{
    Address, Block, InventoryData, LatestBlock, SimpleBlock, Transaction, UnspentOutput,
};
use futures::future::join_all;
use log::{debug, warn};
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Message the service uses when an address has no spendable outputs
pub const NO_FREE_OUTPUTS: &str = "No free outputs to spend";
/// Unix time in milliseconds of the genesis block
pub const GENESIS_BLOCK_UNIX_MILLIS: i64 = 1_231_006_505_000;

#[derive(Deserialize)]
struct BlocksPayload {
    blocks: Vec<Block>,
}

#[derive(Deserialize)]
struct SimpleBlocksPayload {
    blocks: Vec<SimpleBlock>,
}

#[derive(Deserialize)]
struct TransactionsPayload {
    txs: Vec<Transaction>,
}

#[derive(Deserialize)]
struct UnspentOutputsPayload {
    unspent_outputs: Vec<UnspentOutput>,
}

fn json_format_query() -> QueryString {
    let mut qs = QueryString::new();
    qs.add_or_replace("format", "json");
    qs
}

fn require_non_empty(value: &str, name: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::ArgumentNull(name));
    }
    Ok(())
}

impl ApiClient {
    /// Gets an address together with up to `max_transactions` of its
    /// transactions (all of them when `None`).
    ///
    /// The service returns at most 50 transactions per request, so longer
    /// histories are fetched as concurrent pages and concatenated in offset
    /// order. Every page settles before the merge; if any page failed, the
    /// failure of the earliest such page is returned and no partial result
    /// is produced.
    pub async fn address(&self, address: &str, max_transactions: Option<i64>) -> Result<Address> {
        require_non_empty(address, "address")?;
        let max_transactions = match max_transactions {
            Some(n) if n < 0 => {
                return Err(ApiError::ArgumentOutOfRange {
                    name: "max_transactions",
                    reason: "must be greater than or equal to zero",
                })
            }
            Some(n) => Some(n as u64),
            None => None,
        };

        let mut first = self.address_page(address, MAX_PAGE_SIZE, 0).await?;
        if let Some(max) = max_transactions {
            if max <= MAX_PAGE_SIZE {
                first.transactions.truncate(max as usize);
                return Ok(first);
            }
        }

        let target = max_transactions.map_or(first.transaction_count, |max| {
            max.min(first.transaction_count)
        });
        let plan = PagePlan::new(target);
        debug!(
            "Fetching {} of {} transactions for {} in {} requests",
            target,
            first.transaction_count,
            address,
            plan.request_count()
        );

        let pages = join_all(
            plan.pages()
                .iter()
                .map(|page| self.address_page(address, page.limit, page.offset)),
        )
        .await;

        let mut transactions = std::mem::take(&mut first.transactions);
        for page in pages {
            transactions.extend(page?.transactions);
        }
        transactions.truncate(target as usize);
        Ok(first.with_transactions(transactions))
    }

    /// Gets one page of an address's transactions
    async fn address_page(&self, address: &str, limit: u64, offset: u64) -> Result<Address> {
        if limit < 1 || limit > MAX_PAGE_SIZE {
            return Err(ApiError::ArgumentOutOfRange {
                name: "limit",
                reason: "must be between 1 and 50",
            });
        }
        let mut qs = QueryString::new();
        qs.add("offset", &offset.to_string())?;
        qs.add("limit", &limit.to_string())?;
        qs.add("format", "json")?;
        self.get(&format!("address/{}", address), Some(qs)).await
    }

    /// Gets a single transaction by hash or index
    pub async fn transaction(&self, hash_or_index: &str) -> Result<Transaction> {
        require_non_empty(hash_or_index, "hash_or_index")?;
        self.get(&format!("rawtx/{}", hash_or_index), None).await
    }

    pub async fn transaction_by_index(&self, index: i64) -> Result<Transaction> {
        if index < 0 {
            return Err(ApiError::ArgumentOutOfRange {
                name: "index",
                reason: "must be greater than or equal to zero",
            });
        }
        self.transaction(&index.to_string()).await
    }

    /// Gets a single block by hash or index
    pub async fn block(&self, hash_or_index: &str) -> Result<Block> {
        require_non_empty(hash_or_index, "hash_or_index")?;
        self.get(&format!("rawblock/{}", hash_or_index), None).await
    }

    pub async fn block_by_index(&self, index: i64) -> Result<Block> {
        if index < 0 {
            return Err(ApiError::ArgumentOutOfRange {
                name: "index",
                reason: "must be greater than or equal to zero",
            });
        }
        self.block(&index.to_string()).await
    }

    /// Gets the blocks at `height`. Normally there is only one, but forks
    /// can leave several.
    pub async fn blocks_at_height(&self, height: i64) -> Result<Vec<Block>> {
        if height < 0 {
            return Err(ApiError::ArgumentOutOfRange {
                name: "height",
                reason: "must be greater than or equal to zero",
            });
        }
        self.get_with(
            &format!("block-height/{}", height),
            Some(json_format_query()),
            |payload| decode_json::<BlocksPayload>(payload).map(|p| p.blocks),
        )
        .await
    }

    /// Gets the unspent outputs of an address. An address with nothing to
    /// spend yields an empty list, even though the service reports it as an
    /// error.
    pub async fn unspent_outputs(&self, address: &str) -> Result<Vec<UnspentOutput>> {
        require_non_empty(address, "address")?;
        let mut qs = QueryString::new();
        qs.add("active", address)?;
        let res = self
            .get_with("unspent", Some(qs), |payload| {
                decode_json::<UnspentOutputsPayload>(payload).map(|p| p.unspent_outputs)
            })
            .await;
        match res {
            Err(e) if e.is_server_message(NO_FREE_OUTPUTS) => {
                warn!("No free outputs for {}, returning an empty list", address);
                Ok(vec![])
            }
            other => other,
        }
    }

    pub async fn latest_block(&self) -> Result<LatestBlock> {
        self.get("latestblock", None).await
    }

    /// Gets the transactions currently in the mempool
    pub async fn unconfirmed_transactions(&self) -> Result<Vec<Transaction>> {
        self.get_with(
            "unconfirmed-transactions",
            Some(json_format_query()),
            |payload| decode_json::<TransactionsPayload>(payload).map(|p| p.txs),
        )
        .await
    }

    /// Gets recent blocks of a mining pool, or the blocks of the day a
    /// millisecond timestamp falls in
    pub async fn blocks_for_pool(&self, pool_name_or_millis: &str) -> Result<Vec<SimpleBlock>> {
        require_non_empty(pool_name_or_millis, "pool_name_or_millis")?;
        self.get_with(
            &format!("blocks/{}", pool_name_or_millis),
            Some(json_format_query()),
            |payload| decode_json::<SimpleBlocksPayload>(payload).map(|p| p.blocks),
        )
        .await
    }

    /// Gets the blocks mined on the UTC day containing `unix_millis`
    pub async fn blocks_on_day(&self, unix_millis: i64) -> Result<Vec<SimpleBlock>> {
        if unix_millis < GENESIS_BLOCK_UNIX_MILLIS {
            return Err(ApiError::ArgumentOutOfRange {
                name: "unix_millis",
                reason: "must not precede the genesis block (2009-01-03T18:15:05Z)",
            });
        }
        self.blocks_for_pool(&unix_millis.to_string()).await
    }

    /// Gets the blocks mined so far on the current UTC day
    pub async fn blocks_today(&self) -> Result<Vec<SimpleBlock>> {
        let clock_error = || ApiError::ArgumentOutOfRange {
            name: "unix_millis",
            reason: "system clock is outside the representable range",
        };
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| clock_error())?;
        let unix_millis = i64::try_from(now.as_millis()).map_err(|_| clock_error())?;
        self.blocks_on_day(unix_millis).await
    }

    pub async fn inventory_data(&self, hash: &str) -> Result<InventoryData> {
        require_non_empty(hash, "hash")?;
        self.get(&format!("inv/{}", hash), Some(json_format_query())).await
    }
}
