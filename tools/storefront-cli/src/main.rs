//! Storefront CLI - shop a storefront backend from the terminal.
//!
//! Commands:
//! - `storefront config` - Show, create, or validate configuration
//! - `storefront auth` - Sign in with a one-time code, sign out
//! - `storefront products` - Browse the catalog
//! - `storefront cart` - Manage the local cart
//! - `storefront checkout` - Place an order from the cart
//! - `storefront orders` - Order history
//! - `storefront bookings` - Time slots and appointments

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use storefront_observability::{init_logging, LogFormat, LogLevel};

use commands::{AuthArgs, BookingsArgs, CartArgs, CheckoutArgs, ConfigArgs, OrdersArgs, ProductsArgs};

/// Storefront CLI - browse, fill a cart, and check out
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output; repeat for more log detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config(ConfigArgs),

    /// Sign in, sign out, and session status
    Auth(AuthArgs),

    /// Browse products
    Products(ProductsArgs),

    /// Manage the cart
    Cart(CartArgs),

    /// Place an order from the cart
    Checkout(CheckoutArgs),

    /// Order history
    Orders(OrdersArgs),

    /// Service bookings
    Bookings(BookingsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json { LogFormat::Json } else { LogFormat::Human };
    init_logging(format, LogLevel::from_verbosity(cli.verbose))?;

    // Setup output formatting
    let output = output::Output::new(cli.verbose > 0, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Config(args) => commands::config::run(args, &ctx).await,
        Commands::Auth(args) => commands::auth::run(args, &ctx).await,
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Bookings(args) => commands::bookings::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
