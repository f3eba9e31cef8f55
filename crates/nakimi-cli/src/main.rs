use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nakimi_cli::commands::{
    coordinate_from,
    driver::handle_driver_command,
    link::{handle_link_command, LinkCommandArgs},
    plan::{handle_plan_command, PlanCommandArgs},
    sequence::{handle_sequence_command, SequenceCommandArgs},
    validate::handle_validate_command,
};
use nakimi_cli::config::load_config;
use nakimi_cli::output::OutputFormat;
use nakimi_lib::SequenceStrategy;

#[derive(Parser, Debug)]
#[command(author, version, about = "Nakimi delivery route planning utilities")]
struct Cli {
    /// Planner configuration file (JSON). Defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report which orders are complete enough to be routed.
    Validate {
        /// Order sheet (.csv or .json).
        #[arg(long)]
        orders: PathBuf,
    },
    /// Order valid stops for a run.
    Sequence {
        /// Order sheet (.csv or .json).
        #[arg(long)]
        orders: PathBuf,
        #[arg(long, allow_negative_numbers = true, requires = "origin_lng")]
        origin_lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "origin_lat")]
        origin_lng: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "dest_lng")]
        dest_lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "dest_lat")]
        dest_lng: Option<f64>,
        /// nearest-neighbor or manual. Defaults to the configured strategy.
        #[arg(long)]
        strategy: Option<SequenceStrategy>,
    },
    /// Build a Google Maps navigation link.
    Link {
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        destination: Option<String>,
        /// Intermediate stop; repeat for several.
        #[arg(long = "waypoint")]
        waypoints: Vec<String>,
        /// Use the addresses of the valid orders in this sheet as waypoints.
        #[arg(long)]
        orders: Option<PathBuf>,
    },
    /// Validate, geocode, sequence and link a whole order sheet.
    Plan {
        /// Order sheet (.csv or .json).
        #[arg(long)]
        orders: PathBuf,
        /// Start address or `lat,lng`. Defaults to the configured depot.
        #[arg(long, allow_hyphen_values = true)]
        origin: Option<String>,
        /// End address or `lat,lng`. Defaults to the configured depot.
        #[arg(long, allow_hyphen_values = true)]
        destination: Option<String>,
        #[arg(long)]
        strategy: Option<SequenceStrategy>,
        /// Geocode valid orders that have no coordinates.
        #[arg(long)]
        geocode: bool,
        /// Offline address table (JSON) used for geocoding.
        #[arg(long)]
        geocode_table: Option<PathBuf>,
    },
    /// Show the driver's pending stops and round-trip link.
    Driver {
        /// Order sheet (.csv or .json).
        #[arg(long)]
        orders: PathBuf,
        /// Depot address. Defaults to the configured depot.
        #[arg(long)]
        depot: Option<String>,
        /// Order id already delivered; repeat for several.
        #[arg(long = "delivered")]
        delivered: Vec<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let format = cli.format;

    match cli.command {
        Command::Validate { orders } => handle_validate_command(&orders, format),
        Command::Sequence {
            orders,
            origin_lat,
            origin_lng,
            dest_lat,
            dest_lng,
            strategy,
        } => handle_sequence_command(
            &SequenceCommandArgs {
                orders: &orders,
                origin: coordinate_from(origin_lat, origin_lng),
                destination: coordinate_from(dest_lat, dest_lng),
                strategy: strategy.unwrap_or(config.strategy),
            },
            format,
        ),
        Command::Link {
            origin,
            destination,
            waypoints,
            orders,
        } => handle_link_command(
            &LinkCommandArgs {
                origin: origin.as_deref(),
                destination: destination.as_deref(),
                waypoints: &waypoints,
                orders: orders.as_deref(),
            },
            &config.link_builder(),
            format,
        ),
        Command::Plan {
            orders,
            origin,
            destination,
            strategy,
            geocode,
            geocode_table,
        } => handle_plan_command(
            &PlanCommandArgs {
                orders: &orders,
                origin: origin.as_deref(),
                destination: destination.as_deref(),
                strategy,
                geocode,
                geocode_table: geocode_table.as_deref(),
            },
            &config,
            format,
        ),
        Command::Driver {
            orders,
            depot,
            delivered,
        } => handle_driver_command(
            &orders,
            depot.as_deref().or(config.depot()),
            &delivered,
            format,
        ),
    }
}

/// Log to stderr so `--format json` output stays parseable.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
