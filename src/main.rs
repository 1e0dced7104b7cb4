use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use pawcart::application::cart_store::CartStore;
use pawcart::application::countdown::PaymentCountdown;
use pawcart::config::Config;
use pawcart::domain::countdown::{CountdownPhase, format_seconds};
use pawcart::domain::order::{Order, OrderStatus};
use pawcart::domain::ports::{Clock, ClockHandle, SnapshotStorageBox};
use pawcart::domain::pricing::CartTotals;
use pawcart::infrastructure::clock::SystemClock;
use pawcart::infrastructure::file::FileSnapshotStorage;
use pawcart::infrastructure::in_memory::{InMemoryOrderService, InMemorySnapshotStorage};
use pawcart::infrastructure::notify::TracingNotifier;
use pawcart::interfaces::csv::action_reader::ActionReader;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct StorageArgs {
    /// Directory for the persisted cart. Without it the cart lives in memory.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Keep the cart in RocksDB at --db-path instead of plain JSON files.
    #[arg(long, requires = "db_path")]
    rocksdb: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a CSV file of cart actions and print the resulting cart
    Apply {
        /// Input actions CSV file (type, id, kind, price, quantity)
        input: PathBuf,

        #[command(flatten)]
        storage: StorageArgs,
    },
    /// Print the persisted cart
    Show {
        #[command(flatten)]
        storage: StorageArgs,
    },
    /// Run the payment countdown for an order and cancel it on expiry
    Countdown {
        #[arg(long)]
        order_id: String,

        /// Order creation time in unix seconds (defaults to now)
        #[arg(long)]
        created_at: Option<u64>,

        /// Payment window in seconds (defaults to PAWCART_PAYMENT_WINDOW_SECS or 300)
        #[arg(long)]
        window: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Apply { input, storage } => {
            let mut cart = CartStore::open(
                open_storage(storage)?,
                config.storage_key.clone(),
                config.pricing,
            );

            let file = File::open(input).into_diagnostic()?;
            let reader = ActionReader::new(file);
            for action in reader.actions() {
                match action {
                    Ok(action) => {
                        cart.dispatch(action);
                    }
                    Err(e) => {
                        eprintln!("Error reading action: {}", e);
                    }
                }
            }

            print_cart(&cart)
        }
        Command::Show { storage } => {
            let cart = CartStore::open(
                open_storage(storage)?,
                config.storage_key.clone(),
                config.pricing,
            );
            print_cart(&cart)
        }
        Command::Countdown {
            order_id,
            created_at,
            window,
        } => {
            let window = window.unwrap_or(config.payment_window_seconds);
            run_countdown(order_id, created_at, window).await
        }
    }
}

fn print_cart(cart: &CartStore) -> Result<()> {
    let json = serde_json::to_string_pretty(cart.state()).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn open_storage(args: StorageArgs) -> Result<SnapshotStorageBox> {
    match args.db_path {
        None => Ok(Box::new(InMemorySnapshotStorage::new())),
        Some(path) if args.rocksdb => open_rocksdb(path),
        Some(path) => Ok(Box::new(FileSnapshotStorage::open(path).into_diagnostic()?)),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_rocksdb(path: PathBuf) -> Result<SnapshotStorageBox> {
    use pawcart::infrastructure::rocksdb::RocksDbSnapshotStorage;
    Ok(Box::new(RocksDbSnapshotStorage::open(path).into_diagnostic()?))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_rocksdb(path: PathBuf) -> Result<SnapshotStorageBox> {
    eprintln!(
        "WARNING: RocksDB storage requested via --rocksdb, but 'storage-rocksdb' feature is not enabled. Falling back to file storage."
    );
    Ok(Box::new(FileSnapshotStorage::open(path).into_diagnostic()?))
}

async fn run_countdown(order_id: String, created_at: Option<u64>, window: u64) -> Result<()> {
    let clock: ClockHandle = Arc::new(SystemClock);
    let orders = InMemoryOrderService::with_clock(clock.clone());

    let order = Order {
        id: order_id,
        created_at: created_at.unwrap_or_else(|| clock.now()),
        status: OrderStatus::Pending,
        lines: Vec::new(),
        totals: CartTotals::default(),
    };
    orders.insert(order.clone()).await;

    let countdowns = PaymentCountdown::new(Arc::new(orders), Arc::new(TracingNotifier), clock);
    let (cancelled_tx, cancelled_rx) = oneshot::channel();
    let mut handle = countdowns.start(&order, window, move |id| {
        let _ = cancelled_tx.send(id);
    });

    match handle.phase() {
        CountdownPhase::Counting { remaining_seconds } => {
            println!("{}", format_seconds(remaining_seconds))
        }
        _ => {
            println!("payment window already closed for {}", order.id);
            return Ok(());
        }
    }

    while let Some(phase) = handle.changed().await {
        match phase {
            CountdownPhase::Counting { remaining_seconds } => {
                println!("{}", format_seconds(remaining_seconds))
            }
            CountdownPhase::Expiring => println!("00:00"),
            CountdownPhase::Expired | CountdownPhase::Hidden => break,
        }
    }

    if let Ok(id) = cancelled_rx.await {
        println!("cancelled {id}");
    }
    Ok(())
}
