use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sika::application::executor::TransactionExecutor;
use sika::application::locks::AccountLocks;
use sika::config::AppConfig;
use sika::domain::account::Account;
use sika::domain::ledger::TransactionRecord;
use sika::domain::ports::{Identity, LedgerStore, PaymentGatewayBox};
use sika::domain::savings::SavingsPlan;
use sika::infrastructure::in_memory::{InMemoryIdentityProvider, InMemoryLedgerStore};
use sika::infrastructure::paystack::PaystackClient;
use sika::infrastructure::simulated::{SimulatedBiller, SimulatedGateway};
use sika::interfaces::json::RequestReader;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Batch file: one JSON operation envelope per line
    input: PathBuf,

    /// Seed file provisioning accounts and savings plans before the batch
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Config file enabling the live payment gateway; without it, gateway
    /// calls are fulfilled by a local simulation
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    accounts: Vec<SeedAccount>,
    #[serde(default)]
    plans: Vec<SavingsPlan>,
}

#[derive(Debug, Deserialize)]
struct SeedAccount {
    id: String,
    name: String,
    email: String,
    #[serde(default)]
    balance_ghs: Decimal,
    #[serde(default)]
    balance_ngn: Decimal,
}

#[derive(Debug, Serialize)]
struct OperationResult {
    account: String,
    kind: &'static str,
    success: bool,
    status: Option<sika::application::executor::OutcomeStatus>,
    message: String,
}

#[derive(Debug, Serialize)]
struct FinalState {
    accounts: Vec<Account>,
    records: Vec<TransactionRecord>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (gateway, log_level): (PaymentGatewayBox, String) = match &cli.config {
        Some(path) => {
            let config = AppConfig::load(Some(path)).into_diagnostic()?;
            let client = PaystackClient::new(&config.gateway).into_diagnostic()?;
            (client.into_gateway(), config.logging.level)
        }
        None => (Box::new(SimulatedGateway::new()), "info".to_string()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = &cli.db_path {
        let store =
            sika::infrastructure::rocksdb::RocksDbLedgerStore::open(db_path).into_diagnostic()?;
        return run(store, &cli, gateway).await;
    }

    run(InMemoryLedgerStore::new(), &cli, gateway).await
}

async fn run<S>(store: S, cli: &Cli, gateway: PaymentGatewayBox) -> Result<()>
where
    S: LedgerStore + Clone + 'static,
{
    let identity = InMemoryIdentityProvider::new();
    let mut seeded_ids = Vec::new();

    if let Some(seed_path) = &cli.seed {
        let seed: SeedFile =
            serde_json::from_reader(File::open(seed_path).into_diagnostic()?).into_diagnostic()?;
        for entry in seed.accounts {
            let mut account = Account::new(&entry.id, &entry.name, &entry.email);
            account.balance_ghs = entry.balance_ghs;
            account.balance_ngn = entry.balance_ngn;
            identity
                .insert(
                    &entry.id,
                    Identity {
                        name: entry.name,
                        email: entry.email,
                    },
                )
                .await;
            store.put_account(account).await.into_diagnostic()?;
            seeded_ids.push(entry.id);
        }
        for plan in seed.plans {
            store.put_plan(plan).await.into_diagnostic()?;
        }
    }

    let executor = TransactionExecutor::new(
        Box::new(store.clone()),
        gateway,
        Box::new(identity),
        Box::new(SimulatedBiller::new()),
        AccountLocks::new(),
    );

    let input = File::open(&cli.input).into_diagnostic()?;
    for envelope in RequestReader::new(input).operations() {
        match envelope {
            Ok(envelope) => {
                let kind = envelope.request.kind();
                let result = match executor.execute(&envelope.account, envelope.request).await {
                    Ok(report) => OperationResult {
                        account: envelope.account,
                        kind,
                        success: true,
                        status: Some(report.status),
                        message: report.message,
                    },
                    Err(e) => OperationResult {
                        account: envelope.account,
                        kind,
                        success: false,
                        status: None,
                        message: e.to_string(),
                    },
                };
                println!(
                    "{}",
                    serde_json::to_string(&result).into_diagnostic()?
                );
            }
            Err(e) => {
                eprintln!("Error reading operation: {e}");
            }
        }
    }

    let mut state = FinalState {
        accounts: Vec::new(),
        records: Vec::new(),
    };
    for id in &seeded_ids {
        if let Some(account) = store.get_account(id).await.into_diagnostic()? {
            state.accounts.push(account);
        }
        state
            .records
            .extend(store.records_for_account(id).await.into_diagnostic()?);
    }
    println!("{}", serde_json::to_string(&state).into_diagnostic()?);

    Ok(())
}
