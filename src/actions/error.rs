//! Error taxonomy surfaced to action callers.

use std::fmt;
use thiserror::Error;

use crate::blockchain::ClientError;
use crate::multisig::AssemblyError;

/// Entity kinds a single-entity lookup can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Block,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Account => f.write_str("account"),
            EntityKind::Block => f.write_str("block"),
        }
    }
}

/// Final error kinds returned by actions.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0} not found")]
    NotFound(EntityKind),

    #[error("account {address} is not a multisig account")]
    AccountNotMultisig { address: String },

    #[error("transaction broadcast rejected: {reason}")]
    BroadcastRejected { reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Every endpoint failed; the source is the primary's error.
    #[error("{action} failed: {source}")]
    TransportFailure {
        action: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("{action} failed: {source}")]
    Failed {
        action: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ActionError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::NotFound(EntityKind::Account) => "ACCOUNT_NOT_FOUND",
            ActionError::NotFound(EntityKind::Block) => "BLOCK_NOT_FOUND",
            ActionError::AccountNotMultisig { .. } => "ACCOUNT_NOT_MULTISIG",
            ActionError::BroadcastRejected { .. } => "BROADCAST_REJECTED",
            ActionError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            ActionError::TransportFailure { .. } => "TRANSPORT_FAILURE",
            ActionError::Failed { .. } => "ACTION_FAILED",
        }
    }

    pub(crate) fn failed<E>(action: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ActionError::Failed {
            action,
            source: Box::new(source),
        }
    }

    /// Classify a repository error. Transport exhaustion keeps its own kind.
    pub(crate) fn from_client(action: &'static str, error: ClientError) -> Self {
        match error {
            e @ ClientError::TransportFailure { .. } => ActionError::TransportFailure { action, source: e },
            other => ActionError::failed(action, other),
        }
    }

    pub(crate) fn from_assembly(action: &'static str, error: AssemblyError) -> Self {
        match error {
            AssemblyError::BroadcastRejected { reason } => ActionError::BroadcastRejected { reason },
            AssemblyError::Client(e) => ActionError::from_client(action, e),
            other => ActionError::failed(action, other),
        }
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
