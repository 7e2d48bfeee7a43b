pub mod api_client;
pub mod block_explorer;
pub mod exchange_rates;
pub mod local_config;
pub mod pagination;
pub mod query_string;
pub mod requests;
pub mod statistics;
pub mod transactions;
pub mod types;

pub use api_client::{ApiClient, ApiError, ClientConfig, Result};
pub use query_string::QueryString;
pub use requests::ResponseOutcome;

pub type AddressString = String;
pub type TxHash = String;
pub type BlockHeight = u64;
pub type Satoshi = u64;
