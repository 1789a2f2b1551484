//! indexer-bridge command line.
//!
//! Runs one action against the configured index service and prints the
//! result as JSON on stdout. Logs and errors go to stderr.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;

use indexer_bridge::actions::{
    ActionError, ActionRequest, BlockTransactionsParams, HeightParams, HeightRangeParams,
    TimelineParams, TimestampParams, WalletParams,
};
use indexer_bridge::config::loader::{check, read_config};
use indexer_bridge::config::BridgeConfig;
use indexer_bridge::indexer::SortOrder;
use indexer_bridge::ledger::{Transaction, TransactionPayload};
use indexer_bridge::lifecycle::build_actions;
use indexer_bridge::multisig::TransferRequest;
use indexer_bridge::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "indexer-bridge")]
#[command(about = "Query a ledger index service and broadcast multisig transfers", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Primary index service URL (overrides config).
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Multisig wallet address (overrides config).
    #[arg(short, long)]
    wallet: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Member public keys of a multisig wallet
    Members {
        #[arg(long)]
        address: Option<String>,
    },
    /// Signatures required by a multisig wallet
    Threshold {
        #[arg(long)]
        address: Option<String>,
    },
    /// Height of the latest block
    MaxHeight,
    /// Block at an exact height
    Block { height: u64 },
    /// Blocks with height in (from, to]
    Blocks {
        #[arg(long)]
        from: Option<u64>,
        #[arg(long)]
        to: Option<u64>,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    /// Last block at or before a timestamp
    AtTimestamp { timestamp: u64 },
    /// Transfers sent by the wallet
    Outbound {
        #[arg(long, default_value_t = 0)]
        from: u64,
        #[arg(long, default_value_t = 100)]
        limit: u32,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },
    /// Transfers received by the wallet
    Inbound {
        #[arg(long, default_value_t = 0)]
        from: u64,
        #[arg(long, default_value_t = 100)]
        limit: u32,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },
    /// Transfers sent by the wallet in one block
    OutboundFromBlock { block_id: String },
    /// Transfers received by the wallet in one block
    InboundFromBlock { block_id: String },
    /// Index service network status
    Status,
    /// Current fee estimates
    Fees,
    /// Assemble and broadcast a transfer described by a JSON file
    Post { file: PathBuf },
    /// Run any action by name with JSON params
    Invoke {
        action: String,
        #[arg(default_value = "{}")]
        params: String,
    },
    /// Compute a transaction id offline
    TxId { sender: String, nonce: u64 },
    /// Decode a hex transaction payload offline
    DecodeTx { payload: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: failed to render output: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Value, Box<dyn std::error::Error>> {
    // Offline commands need neither config nor network.
    match &cli.command {
        Commands::TxId { sender, nonce } => {
            return Ok(json!({ "id": Transaction::compute_id(sender, *nonce) }));
        }
        Commands::DecodeTx { payload } => return decode_payload(payload),
        _ => {}
    }

    let config = load(&cli)?;
    init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "indexer-bridge starting");

    let actions = build_actions(&config)?;
    let request = into_request(cli.command)?;

    actions.handle(request).await.map_err(|e| {
        tracing::error!(code = e.code(), error = %e, "Action failed");
        Box::new(CliError(e)) as Box<dyn std::error::Error>
    })
}

fn load(cli: &Cli) -> Result<BridgeConfig, Box<dyn std::error::Error>> {
    let mut config = read_config(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint_url = Some(endpoint.clone());
    }
    if let Some(wallet) = &cli.wallet {
        config.wallet_address = Some(wallet.clone());
    }
    Ok(check(config)?)
}

fn into_request(command: Commands) -> Result<ActionRequest, Box<dyn std::error::Error>> {
    let request = match command {
        Commands::Members { address } => {
            ActionRequest::GetMultisigWalletMembers(WalletParams { wallet_address: address })
        }
        Commands::Threshold { address } => {
            ActionRequest::GetMinMultisigRequiredSignatures(WalletParams { wallet_address: address })
        }
        Commands::MaxHeight => ActionRequest::GetMaxBlockHeight(Default::default()),
        Commands::Block { height } => ActionRequest::GetBlockAtHeight(HeightParams { height }),
        Commands::Blocks { from, to, limit } => ActionRequest::GetBlocksBetweenHeights(HeightRangeParams {
            from_height: from,
            to_height: to,
            limit,
        }),
        Commands::AtTimestamp { timestamp } => {
            ActionRequest::GetLastBlockAtTimestamp(TimestampParams { timestamp })
        }
        Commands::Outbound { from, limit, order } => ActionRequest::GetOutboundTransactions(TimelineParams {
            wallet_address: None,
            from_timestamp: from,
            limit,
            order,
        }),
        Commands::Inbound { from, limit, order } => ActionRequest::GetInboundTransactions(TimelineParams {
            wallet_address: None,
            from_timestamp: from,
            limit,
            order,
        }),
        Commands::OutboundFromBlock { block_id } => {
            ActionRequest::GetOutboundTransactionsFromBlock(BlockTransactionsParams {
                wallet_address: None,
                block_id,
            })
        }
        Commands::InboundFromBlock { block_id } => {
            ActionRequest::GetInboundTransactionsFromBlock(BlockTransactionsParams {
                wallet_address: None,
                block_id,
            })
        }
        Commands::Status => ActionRequest::GetNetworkStatus(Default::default()),
        Commands::Fees => ActionRequest::GetFeeEstimate(Default::default()),
        Commands::Post { file } => {
            let content = std::fs::read_to_string(&file)?;
            let transfer: TransferRequest = serde_json::from_str(&content)?;
            ActionRequest::PostTransaction(transfer)
        }
        Commands::Invoke { action, params } => {
            let params: Value = serde_json::from_str(&params)?;
            ActionRequest::from_value(json!({ "action": action, "params": params }))?
        }
        Commands::TxId { .. } | Commands::DecodeTx { .. } => {
            return Err("offline command has no action".into());
        }
    };
    Ok(request)
}

fn decode_payload(payload: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let bytes = hex::decode(payload.trim())?;
    let tx = TransactionPayload::decode(&bytes)?;
    let params = match tx.transfer_params() {
        Ok(p) => json!({
            "tokenID": hex::encode(&p.token_id),
            "amount": p.amount.to_string(),
            "recipientAddress": p.recipient_address.to_lisk32(),
            "data": p.data,
        }),
        Err(_) => Value::String(hex::encode(&tx.params)),
    };

    Ok(json!({
        "module": tx.module,
        "command": tx.command,
        "nonce": tx.nonce.to_string(),
        "fee": tx.fee.to_string(),
        "senderPublicKey": hex::encode(&tx.sender_public_key),
        "params": params,
        "signatures": tx.signatures.iter().map(hex::encode).collect::<Vec<_>>(),
    }))
}

/// Action errors printed with their stable code.
#[derive(Debug)]
struct CliError(ActionError);

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.0.code(), self.0)
    }
}

impl std::error::Error for CliError {}
