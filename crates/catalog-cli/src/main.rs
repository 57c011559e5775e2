//! Catalog CLI - inspect how locations resolve to pages.

use clap::{Parser, Subcommand};
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Step;

/// Catalog - route inspection for the asset catalog
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve hrefs and print each route as JSON
    Resolve {
        /// Hrefs such as /category/icons or /search?q=cat
        #[arg(required = true)]
        hrefs: Vec<String>,
    },

    /// Print the routing table in precedence order
    Routes,

    /// Replay a browsing session and print every delivered route
    Replay {
        /// Visited hrefs, oldest first; the last one is current
        #[arg(required = true)]
        hrefs: Vec<String>,

        /// Traversal steps applied in order (back, forward, go:N)
        #[arg(short, long = "step")]
        steps: Vec<Step>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("catalog={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Resolve { hrefs } => commands::resolve(&hrefs, &mut out),
        Commands::Routes => commands::routes(&mut out),
        Commands::Replay { hrefs, steps } => commands::replay(&hrefs, &steps, &mut out),
    };

    if let Err(e) = result.and_then(|()| out.flush().map_err(Into::into)) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
