//! Named actions exposed to the host.
//!
//! # Data Flow
//! ```text
//! ActionRequest {"action", "params"}  (request.rs)
//!     → ChainActions (handlers.rs)
//!         → IndexerRepository | TransactionAssembler
//!     → ActionError taxonomy (error.rs)
//! ```
//!
//! # Constraints
//! - This is the only layer that turns transport errors into domain errors
//! - List actions never fail on 404; single-entity actions fail with `NotFound`

pub mod error;
pub mod handlers;
pub mod params;
pub mod request;

pub use error::{ActionError, ActionResult, EntityKind};
pub use handlers::ChainActions;
pub use params::{
    BlockTransactionsParams, HeightParams, HeightRangeParams, NoParams, TimelineParams,
    TimestampParams, WalletParams,
};
pub use request::ActionRequest;
