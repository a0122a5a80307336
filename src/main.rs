//! # Nextpos CLI
//!
//! Command-line front end for the POS print agent.
//!
//! ## Usage
//!
//! ```bash
//! # Run the local HTTP agent the POS screen talks to
//! nextpos serve
//!
//! # List printers from nextpos.toml
//! nextpos printers
//!
//! # Print a POS Invoice with its profile's settings
//! nextpos print ACC-PSINV-2024-00042 --profile "Main Counter"
//!
//! # Reprint the newest submitted invoice
//! nextpos reprint-last
//!
//! # Check the cutter and the cash drawer
//! nextpos test-print
//! nextpos test-drawer --pin 1
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use nextpos::{
    NextposError,
    bridge::LocalBridge,
    config::{Config, load_config},
    host::FrappeClient,
    printer::DrawerConfig,
    server::{self, ServerConfig},
    session::{DrawerOutcome, PrintReport, PrintSession},
};

/// Nextpos - receipt printing for web POS hosts
#[derive(Parser, Debug)]
#[command(name = "nextpos")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Agent configuration file
    #[arg(long, short, global = true, default_value = "nextpos.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP print agent
    Serve {
        /// Override the listen address from the config file
        #[arg(long)]
        listen: Option<String>,
    },

    /// List configured printers
    Printers,

    /// Print a POS Invoice
    Print {
        /// POS Invoice name
        invoice: String,

        /// POS profile whose printer settings apply
        #[arg(long)]
        profile: Option<String>,
    },

    /// Reprint the most recent submitted POS Invoice
    ReprintLast {
        /// POS profile whose printer settings apply
        #[arg(long)]
        profile: Option<String>,
    },

    /// Print the sample ticket and cut
    TestPrint,

    /// Kick the cash drawer on the first printer
    TestDrawer {
        /// Connector pin (0 or 1)
        #[arg(long, default_value = "0")]
        pin: u8,

        /// Pulse on time (units of 2ms)
        #[arg(long, default_value = "50")]
        t1: u8,

        /// Pulse off time (units of 2ms)
        #[arg(long, default_value = "50")]
        t2: u8,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("{}: {}", e.title(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), NextposError> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { listen } => {
            let listen_addr = listen.unwrap_or_else(|| config.agent.listen_addr.clone());
            let session = build_session(&config)?;
            server::serve(ServerConfig { listen_addr }, session).await
        }

        Commands::Printers => {
            if config.printers.is_empty() {
                return Err(NextposError::NoPrintersFound);
            }
            println!("Configured printers:");
            for printer in &config.printers {
                let is_default =
                    config.agent.default_printer.as_deref() == Some(printer.name.as_str());
                let marker = if is_default { " (default)" } else { "" };
                println!("  {:<24} {}{}", printer.name, printer.endpoint, marker);
            }
            Ok(())
        }

        Commands::Print { invoice, profile } => {
            let session = build_session(&config)?;
            let report = session.print_invoice(&invoice, profile.as_deref()).await?;
            print_report(&report);
            Ok(())
        }

        Commands::ReprintLast { profile } => {
            let session = build_session(&config)?;
            let report = session.reprint_last(profile.as_deref()).await?;
            print_report(&report);
            Ok(())
        }

        Commands::TestPrint => {
            let session = build_session(&config)?;
            let report = session.test_print().await?;
            print_report(&report);
            Ok(())
        }

        Commands::TestDrawer { pin, t1, t2 } => {
            let session = build_session(&config)?;
            let drawer = DrawerConfig {
                pin,
                pulse_on: t1,
                pulse_off: t2,
            };
            let report = session.test_drawer(drawer).await?;
            print_report(&report);
            Ok(())
        }
    }
}

fn build_session(config: &Config) -> Result<PrintSession, NextposError> {
    let host = Arc::new(FrappeClient::new(&config.host)?);
    let bridge = Arc::new(LocalBridge::from_config(config));
    Ok(PrintSession::new(bridge, host))
}

fn print_report(report: &PrintReport) {
    match &report.invoice {
        Some(invoice) => println!("Sent {} to {}", invoice, report.printer),
        None => println!("Sent to {}", report.printer),
    }
    if report.copies_sent > 1 {
        println!("  copies: {}", report.copies_sent);
    }
    match &report.drawer {
        DrawerOutcome::NotRequested => {}
        DrawerOutcome::Opened => println!("  drawer: opened"),
        DrawerOutcome::Failed(e) => println!("  drawer: failed ({})", e),
    }
    for notice in &report.notices {
        println!("  note: {}", notice);
    }
}
