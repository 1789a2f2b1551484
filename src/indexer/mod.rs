//! Query repository over the index service.
//!
//! # Data Flow
//! ```text
//! domain intent (e.g. "transfers sent by X after T")
//!     → filter.rs (FilterQuery<K>: typed keys, interval values, sort, limit)
//!     → repository.rs (IndexerRepository: path + query → FailoverClient)
//!     → types.rs (Envelope<T> unwrapped to plain values)
//!     → mapper.rs (IndexedTransaction → ledger::Transaction)
//! ```

pub mod filter;
pub mod mapper;
pub mod repository;
pub mod types;

pub use filter::{AuthKey, BlockKey, FilterKey, FilterQuery, FilterValue, SortOrder, TransactionKey};
pub use repository::IndexerRepository;
pub use types::{FeeEstimate, IndexedTransaction, NetworkStatus, SubmitResponse};
