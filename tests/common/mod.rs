//! Shared utilities for integration tests.
//!
//! Two kinds of mock index service:
//! - a raw programmable backend (fixed status/body per request, call counting)
//! - an in-memory index on axum that honours the filter query parameters

#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing_subscriber::fmt::MakeWriter;

use indexer_bridge::blockchain::{EndpointSet, FailoverClient};
use indexer_bridge::indexer::types::{IndexedBlockRef, IndexedSender, IndexedTransferParams};
use indexer_bridge::indexer::{IndexedTransaction, IndexerRepository};
use indexer_bridge::ledger::{AccountAuth, Address, Block};

/// A request as seen by the programmable backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub body: String,
}

/// Start a programmable backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "400 Bad Request",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    Some(RecordedRequest { method, target, body })
}

/// A backend answering every request with `status`/`body`, counting hits.
pub async fn counting_backend(status: u16, body: impl Into<String>) -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let body = body.into();
    let counter = hits.clone();
    let addr = start_programmable_backend(move |_| {
        let counter = counter.clone();
        let body = body.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (status, body)
        }
    })
    .await;
    (addr, hits)
}

/// A backend that stalls for `delay` before answering.
pub async fn slow_backend(delay: Duration) -> SocketAddr {
    start_programmable_backend(move |_| async move {
        tokio::time::sleep(delay).await;
        (200, json!({"data": [], "meta": {}}).to_string())
    })
    .await
}

/// An address nothing listens on.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// A failover client over explicit endpoints, without any network default.
pub fn client_for(primary: SocketAddr, fallbacks: &[SocketAddr], timeout: Duration) -> FailoverClient {
    let fallbacks: Vec<String> = fallbacks.iter().map(|a| base_url(*a)).collect();
    let endpoints = EndpointSet::new(&base_url(primary), &fallbacks).unwrap();
    FailoverClient::new(endpoints, timeout).unwrap()
}

pub fn repository_for(primary: SocketAddr, fallbacks: &[SocketAddr]) -> IndexerRepository {
    IndexerRepository::new(client_for(primary, fallbacks, Duration::from_secs(2)))
}

// ---------------------------------------------------------------------------
// In-memory index
// ---------------------------------------------------------------------------

/// Data served by the in-memory index.
#[derive(Debug, Default)]
pub struct MockIndex {
    pub blocks: Vec<Block>,
    pub transactions: Vec<IndexedTransaction>,
    pub auth: HashMap<String, AccountAuth>,
    /// When false, POSTed transactions are answered without an id.
    pub accept_posts: bool,
    pub posted: Vec<String>,
    /// Query strings received, in order.
    pub queries: Vec<HashMap<String, String>>,
}

pub type SharedIndex = Arc<Mutex<MockIndex>>;

pub async fn spawn_index(index: MockIndex) -> (SocketAddr, SharedIndex) {
    let state: SharedIndex = Arc::new(Mutex::new(index));

    let app = Router::new()
        .route("/api/v3/blocks", get(blocks_handler))
        .route("/api/v3/transactions", get(transactions_handler).post(post_handler))
        .route("/api/v3/auth", get(auth_handler))
        .route("/api/v3/network/status", get(status_handler))
        .route("/api/v3/fees", get(fees_handler))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, state)
}

fn envelope(data: Value, total: usize) -> Json<Value> {
    let count = data.as_array().map(|a| a.len()).unwrap_or(1);
    Json(json!({ "data": data, "meta": { "count": count, "offset": 0, "total": total } }))
}

/// `lo:hi` (either side may be empty) or an exact value.
fn matches_range(value: u64, filter: Option<&String>) -> bool {
    let Some(filter) = filter else { return true };
    match filter.split_once(':') {
        Some((lo, hi)) => {
            let lo_ok = lo.is_empty() || lo.parse::<u64>().map(|lo| value >= lo).unwrap_or(false);
            let hi_ok = hi.is_empty() || hi.parse::<u64>().map(|hi| value <= hi).unwrap_or(false);
            lo_ok && hi_ok
        }
        None => filter.parse::<u64>().map(|v| v == value).unwrap_or(false),
    }
}

fn limit_of(params: &HashMap<String, String>) -> usize {
    params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10)
}

fn descending(params: &HashMap<String, String>) -> bool {
    params.get("sort").map(|s| s.ends_with(":desc")).unwrap_or(false)
}

async fn blocks_handler(
    State(state): State<SharedIndex>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut index = state.lock().unwrap();
    index.queries.push(params.clone());

    let mut blocks: Vec<Block> = index
        .blocks
        .iter()
        .filter(|b| matches_range(b.height, params.get("height")))
        .filter(|b| matches_range(b.timestamp, params.get("timestamp")))
        .filter(|b| params.get("blockID").map(|id| id == &b.id).unwrap_or(true))
        .cloned()
        .collect();
    blocks.sort_by_key(|b| b.height);
    if descending(&params) {
        blocks.reverse();
    }
    let total = blocks.len();
    blocks.truncate(limit_of(&params));
    envelope(serde_json::to_value(blocks).unwrap(), total)
}

async fn transactions_handler(
    State(state): State<SharedIndex>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut index = state.lock().unwrap();
    index.queries.push(params.clone());

    let mut txs: Vec<IndexedTransaction> = index
        .transactions
        .iter()
        .filter(|t| params.get("senderAddress").map(|a| a == &t.sender.address).unwrap_or(true))
        .filter(|t| {
            params
                .get("recipientAddress")
                .map(|a| a == &t.params.recipient_address)
                .unwrap_or(true)
        })
        .filter(|t| params.get("moduleCommand").map(|m| m == &t.module_command).unwrap_or(true))
        .filter(|t| {
            params
                .get("blockID")
                .map(|id| t.block.as_ref().map(|b| &b.id == id).unwrap_or(false))
                .unwrap_or(true)
        })
        .filter(|t| matches_range(t.timestamp(), params.get("timestamp")))
        .cloned()
        .collect();
    txs.sort_by_key(|t| t.timestamp());
    if descending(&params) {
        txs.reverse();
    }
    let total = txs.len();
    txs.truncate(limit_of(&params));
    envelope(serde_json::to_value(txs).unwrap(), total)
}

async fn auth_handler(
    State(state): State<SharedIndex>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let index = state.lock().unwrap();
    let address = params.get("address").cloned().unwrap_or_default();
    match index.auth.get(&address) {
        Some(auth) => Ok(Json(json!({
            "data": auth,
            "meta": { "address": address }
        }))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": true, "message": format!("Account {} not found", address) })),
        )),
    }
}

async fn post_handler(State(state): State<SharedIndex>, Json(body): Json<Value>) -> Json<Value> {
    let mut index = state.lock().unwrap();
    let payload = body["transaction"].as_str().unwrap_or_default().to_string();
    index.posted.push(payload.clone());

    if index.accept_posts {
        Json(json!({
            "message": "Transaction payload was successfully passed to the network node.",
            "transactionID": format!("accepted-{}", index.posted.len())
        }))
    } else {
        Json(json!({ "message": "Transaction was rejected by the node." }))
    }
}

async fn status_handler(State(state): State<SharedIndex>) -> Json<Value> {
    let index = state.lock().unwrap();
    let height = index.blocks.iter().map(|b| b.height).max().unwrap_or(0);
    Json(json!({
        "data": {
            "version": "0.7.0",
            "networkVersion": "1.0",
            "chainID": "00000000",
            "height": height,
            "finalizedHeight": height.saturating_sub(2)
        },
        "meta": { "lastUpdate": 0 }
    }))
}

async fn fees_handler() -> Json<Value> {
    Json(json!({
        "data": {
            "feeEstimatePerByte": { "low": 0, "medium": 10, "high": 20 },
            "feeTokenID": "0000000000000000",
            "minFeePerByte": 1000
        },
        "meta": {}
    }))
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn block(height: u64) -> Block {
    Block {
        id: format!("block-{}", height),
        height,
        timestamp: 1_700_000_000 + height * 10,
        number_of_transactions: 0,
    }
}

/// Public key `[seed; 32]` as hex, with its lisk32 address.
pub fn key(seed: u8) -> (String, String) {
    let bytes = [seed; 32];
    (hex::encode(bytes), Address::from_public_key(&bytes).to_lisk32())
}

pub fn transfer(
    sender_seed: u8,
    recipient: &str,
    nonce: u64,
    block_height: u64,
    signatures: Vec<String>,
) -> IndexedTransaction {
    let (public_key, address) = key(sender_seed);
    let b = block(block_height);
    IndexedTransaction {
        id: format!("remote-{}-{}", sender_seed, nonce),
        module_command: "token:transfer".into(),
        nonce,
        fee: 160_000,
        sender: IndexedSender { address, public_key },
        params: IndexedTransferParams {
            token_id: "0000000000000000".into(),
            amount: 1_000 + nonce,
            recipient_address: recipient.to_string(),
            data: format!("memo {}", nonce),
        },
        block: Some(IndexedBlockRef {
            id: b.id,
            height: b.height,
            timestamp: b.timestamp,
        }),
        signatures,
        execution_status: Some("successful".into()),
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

/// In-memory log sink for asserting on emitted warnings.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| l.contains(needle))
            .map(String::from)
            .collect()
    }
}

pub struct LogWriter(Arc<Mutex<Vec<u8>>>);

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter(self.0.clone())
    }
}

/// Capture logs on the current thread until the guard drops.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
