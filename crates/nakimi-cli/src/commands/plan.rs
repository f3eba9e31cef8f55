//! Plan command: validate, optionally geocode, sequence and link in one run.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use nakimi_lib::{
    plan_delivery, resolve_orders, Endpoint, Geocoder, NominatimGeocoder, PlanRequest,
    PlannerConfig, SequenceStrategy, StaticGeocoder,
};

use crate::commands::{parse_endpoint, read_orders};
use crate::output::{print_json, render_plan, OutputFormat};
use crate::terminal::ColorPalette;

/// Arguments for the plan command.
#[derive(Debug, Clone)]
pub struct PlanCommandArgs<'a> {
    pub orders: &'a Path,
    pub origin: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub strategy: Option<SequenceStrategy>,
    /// Geocode valid orders without coordinates.
    pub geocode: bool,
    /// Offline address table used instead of the configured geocoder.
    pub geocode_table: Option<&'a Path>,
}

fn build_geocoder(args: &PlanCommandArgs<'_>, config: &PlannerConfig) -> Result<Box<dyn Geocoder>> {
    match args.geocode_table {
        Some(path) => {
            let table = StaticGeocoder::from_path(path)
                .with_context(|| format!("failed to load geocode table {}", path.display()))?;
            Ok(Box::new(table))
        }
        None => {
            let geocoder = NominatimGeocoder::new(config.geocoder_url.clone())
                .context("failed to create geocoding client")?;
            Ok(Box::new(geocoder))
        }
    }
}

/// Handle the plan subcommand.
///
/// Endpoints default to the configured depot, so a configured run starts and
/// ends at the distribution centre.
pub fn handle_plan_command(
    args: &PlanCommandArgs<'_>,
    config: &PlannerConfig,
    format: OutputFormat,
) -> Result<()> {
    let mut orders = read_orders(args.orders)?;

    if args.geocode || args.geocode_table.is_some() {
        let geocoder = build_geocoder(args, config)?;
        resolve_orders(&mut orders, geocoder.as_ref(), &config.unresolved_policy);
    }

    let endpoint = |explicit: Option<&str>| -> Option<Endpoint> {
        explicit.or(config.depot()).map(parse_endpoint)
    };
    let request = PlanRequest {
        origin: endpoint(args.origin),
        destination: endpoint(args.destination),
        strategy: args.strategy.unwrap_or(config.strategy),
        build_link: true,
        link_builder: config.link_builder(),
    };

    let plan = plan_delivery(&orders, &request);

    match format {
        OutputFormat::Json => print_json(&plan),
        OutputFormat::Text => {
            render_plan(&mut io::stdout().lock(), &plan, &ColorPalette::detect())?;
            Ok(())
        }
    }
}
