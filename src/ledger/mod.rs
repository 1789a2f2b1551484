//! Ledger primitives shared by the indexer and the assembler.
//!
//! # Data Flow
//! ```text
//! index JSON      → model.rs (Block, Transaction, AccountAuth, SignaturePacket)
//! lisk32 text     → address.rs (Address, checksum verification)
//! transfer fields → codec.rs (canonical bytes for broadcast)
//! ```

pub mod address;
pub mod codec;
pub mod model;

pub use address::{Address, AddressError};
pub use codec::{CodecError, TransactionPayload, TransferParams};
pub use model::{AccountAuth, Block, SignaturePacket, Transaction};
