//! `EVCharge` CLI
//!
//! Terminal client for the EV charging backend: log in, browse stations,
//! manage bookings and follow notifications.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use evcharge_cli::auth_cmd::{self, AuthAction};
use evcharge_cli::booking_cmd::{self, BookingAction};
use evcharge_cli::notification_cmd::{self, NotificationAction};
use evcharge_cli::overrides::GlobalArgs;
use evcharge_cli::slot_cmd::{self, SlotAction};
use evcharge_cli::station_cmd::{self, StationAction};
use evcharge_client::EvChargeApp;
use evcharge_core::config::load_config;
use evcharge_core::tracing_init::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "evcharge", version, about = "EV charging station client")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in, log out and show the current user
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Create and manage bookings
    Bookings {
        #[command(subcommand)]
        action: BookingAction,
    },
    /// Inspect and update station slots
    Slots {
        #[command(subcommand)]
        action: SlotAction,
    },
    /// Find charging stations
    Stations {
        #[command(subcommand)]
        action: StationAction,
    },
    /// List notifications or listen for new ones
    Notifications {
        #[command(subcommand)]
        action: NotificationAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config()?;
    cli.global.apply(&mut config);

    init_tracing(&config.log_level, cli.global.log_json);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting evcharge CLI");
    debug!(api = %config.api.base_url, hub = %config.hub.url, "Resolved configuration");

    let app = EvChargeApp::start(config).await?;
    let result = match cli.command {
        Commands::Auth { action } => auth_cmd::run(action, &app).await,
        Commands::Bookings { action } => booking_cmd::run(action, &app).await,
        Commands::Slots { action } => slot_cmd::run(action, &app).await,
        Commands::Stations { action } => station_cmd::run(action, &app).await,
        Commands::Notifications { action } => notification_cmd::run(action, &app).await,
    };
    app.shutdown().await;
    result
}
