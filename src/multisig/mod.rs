//! Multisig transfer assembly.
//!
//! # Data Flow
//! ```text
//! TransferRequest + signature packets
//!     → quorum.rs (member filter, first packet + random T-1, member-ordered slots)
//!     → assembler.rs (canonical payload, id, broadcast via IndexerRepository)
//! ```

pub mod assembler;
pub mod quorum;

pub use assembler::{
    AssembledTransaction, AssemblyError, AssemblyResult, BroadcastReceipt, TransactionAssembler,
    TransferRequest,
};
