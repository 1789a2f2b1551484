//! Typed filter queries for the paginated index endpoints.
//!
//! Each resource has a closed set of filter keys. A [`FilterQuery`] holds at
//! most one value per key (setting a key again replaces it), plus optional
//! sort, limit and offset, and renders to query-string pairs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A filter key of one resource.
pub trait FilterKey: Copy + Ord + fmt::Debug {
    /// Query-string name of the key.
    fn as_param(&self) -> &'static str;
}

/// Filter keys of `/blocks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockKey {
    BlockId,
    Height,
    Timestamp,
    GeneratorAddress,
}

impl FilterKey for BlockKey {
    fn as_param(&self) -> &'static str {
        match self {
            BlockKey::BlockId => "blockID",
            BlockKey::Height => "height",
            BlockKey::Timestamp => "timestamp",
            BlockKey::GeneratorAddress => "generatorAddress",
        }
    }
}

/// Filter keys of `/transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionKey {
    TransactionId,
    SenderAddress,
    RecipientAddress,
    Address,
    BlockId,
    Height,
    Timestamp,
    ModuleCommand,
    Nonce,
    ExecutionStatus,
}

impl FilterKey for TransactionKey {
    fn as_param(&self) -> &'static str {
        match self {
            TransactionKey::TransactionId => "transactionID",
            TransactionKey::SenderAddress => "senderAddress",
            TransactionKey::RecipientAddress => "recipientAddress",
            TransactionKey::Address => "address",
            TransactionKey::BlockId => "blockID",
            TransactionKey::Height => "height",
            TransactionKey::Timestamp => "timestamp",
            TransactionKey::ModuleCommand => "moduleCommand",
            TransactionKey::Nonce => "nonce",
            TransactionKey::ExecutionStatus => "executionStatus",
        }
    }
}

/// Filter keys of `/auth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuthKey {
    Address,
}

impl FilterKey for AuthKey {
    fn as_param(&self) -> &'static str {
        match self {
            AuthKey::Address => "address",
        }
    }
}

/// Value of one filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Exact(String),
    /// Inclusive interval `lo:hi`; a missing side is unbounded and renders empty.
    Range { lo: Option<u64>, hi: Option<u64> },
}

impl FilterValue {
    pub fn render(&self) -> String {
        match self {
            FilterValue::Exact(v) => v.clone(),
            FilterValue::Range { lo, hi } => format!("{}:{}", render_bound(lo), render_bound(hi)),
        }
    }
}

fn render_bound(bound: &Option<u64>) -> String {
    bound.map(|b| b.to_string()).unwrap_or_default()
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}', expected asc or desc", other)),
        }
    }
}

/// A filter query against one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery<K: FilterKey> {
    filters: BTreeMap<K, FilterValue>,
    sort: Option<(K, SortOrder)>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl<K: FilterKey> Default for FilterQuery<K> {
    fn default() -> Self {
        Self {
            filters: BTreeMap::new(),
            sort: None,
            limit: None,
            offset: None,
        }
    }
}

impl<K: FilterKey> FilterQuery<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match filter. Replaces any previous value for `key`.
    pub fn exact(mut self, key: K, value: impl ToString) -> Self {
        self.filters.insert(key, FilterValue::Exact(value.to_string()));
        self
    }

    /// Inclusive interval filter. Replaces any previous value for `key`.
    pub fn range(mut self, key: K, lo: Option<u64>, hi: Option<u64>) -> Self {
        self.filters.insert(key, FilterValue::Range { lo, hi });
        self
    }

    pub fn sort(mut self, key: K, order: SortOrder) -> Self {
        self.sort = Some((key, order));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn get(&self, key: K) -> Option<&FilterValue> {
        self.filters.get(&key)
    }

    pub fn sort_order(&self) -> Option<(K, SortOrder)> {
        self.sort
    }

    /// Query-string pairs in a stable order: filters, then sort, limit, offset.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(key, value)| (key.as_param().to_string(), value.render()))
            .collect();

        if let Some((key, order)) = self.sort {
            params.push(("sort".to_string(), format!("{}:{}", key.as_param(), order)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }
}
