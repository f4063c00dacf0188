use anyhow::Context;
use billed::config::{BilledConfig, StoreKind};
use billed::infrastructure::store;
use billed::models::{BillFields, Route, UploadedFile};
use billed::services::submission::Navigator;
use billed::AppState;
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use the in-memory store instead of the Billed API
    #[arg(long, global = true)]
    memory: bool,

    /// Employee email (overrides BILLED_USER_EMAIL)
    #[arg(long, global = true)]
    email: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a new expense bill
    Submit(SubmitArgs),
    /// List bills, most recent first
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct SubmitArgs {
    /// Expense type, e.g. "Transports"
    #[arg(long = "type")]
    expense_type: String,

    #[arg(long, default_value = "")]
    name: String,

    /// Expense date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,

    #[arg(long)]
    amount: i64,

    #[arg(long, default_value = "")]
    vat: String,

    /// VAT percentage (default: 20)
    #[arg(long)]
    pct: Option<u32>,

    #[arg(long)]
    commentary: Option<String>,

    /// Receipt image (jpg, jpeg or png)
    #[arg(long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = BilledConfig::from_env();
    if args.memory {
        config.store = StoreKind::Memory;
    }
    if let Some(email) = args.email {
        config.user_email = email;
    }

    let store = store::setup_store(&config)?;
    let state = AppState::new(store, config);

    match args.command {
        Command::Submit(submit) => run_submit(&state, submit).await,
        Command::List { json } => run_list(&state, json).await,
    }
}

async fn run_submit(state: &AppState, args: SubmitArgs) -> anyhow::Result<()> {
    let navigator: Arc<dyn Navigator> =
        Arc::new(|route: Route| info!("➡️  Back to {}", route.path()));
    let workflow = state.submission_workflow(navigator);

    let file = match args.file {
        Some(path) => {
            let file = UploadedFile::from_path(&path)
                .await
                .with_context(|| format!("Cannot read receipt {}", path.display()))?;
            Some(workflow.validate_file(file)?)
        }
        None => None,
    };

    let fields = BillFields {
        expense_type: args.expense_type,
        name: args.name,
        date: args.date,
        amount: args.amount,
        vat: args.vat,
        pct: args.pct,
        commentary: args.commentary,
    };

    let bill = workflow.submit(fields, file).await?;
    println!("{}", serde_json::to_string_pretty(&bill)?);
    Ok(())
}

async fn run_list(state: &AppState, json: bool) -> anyhow::Result<()> {
    let bills = state.bills_service().get_bills().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bills)?);
        return Ok(());
    }

    println!(
        "{:<20} {:<24} {:<12} {:>8}  {}",
        "Type", "Nom", "Date", "Montant", "Statut"
    );
    for summary in &bills {
        println!(
            "{:<20} {:<24} {:<12} {:>6} €  {}",
            summary.bill.expense_type,
            summary.bill.name,
            summary.display_date,
            summary.bill.amount,
            summary.display_status
        );
    }
    info!("📋 {} bill(s)", bills.len());
    Ok(())
}
