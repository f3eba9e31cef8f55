//! Link command: build a Google Maps multi-stop URL.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use nakimi_lib::{NavigationLinkBuilder, Stop};

use crate::commands::read_orders;
use crate::output::{print_json, OutputFormat};

/// Arguments for the link command.
#[derive(Debug, Clone)]
pub struct LinkCommandArgs<'a> {
    pub origin: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub waypoints: &'a [String],
    /// Take waypoints from the valid orders of this file, in file order.
    pub orders: Option<&'a Path>,
}

#[derive(Debug, Serialize)]
struct LinkOutput {
    url: String,
    waypoints: usize,
}

/// Handle the link subcommand.
///
/// An invalid route is a fatal error: the message is the one an operator
/// would see in the dashboard.
pub fn handle_link_command(
    args: &LinkCommandArgs<'_>,
    builder: &NavigationLinkBuilder,
    format: OutputFormat,
) -> Result<()> {
    let mut waypoints: Vec<String> = args.waypoints.to_vec();
    if let Some(path) = args.orders {
        let orders = read_orders(path)?;
        waypoints.extend(
            orders
                .iter()
                .filter_map(Stop::from_order)
                .map(|stop| stop.address),
        );
    }

    let url = builder.build(
        args.origin.unwrap_or_default(),
        args.destination.unwrap_or_default(),
        waypoints.as_slice(),
    )?;
    tracing::debug!(waypoints = waypoints.len(), "navigation link generated");

    match format {
        OutputFormat::Json => print_json(&LinkOutput {
            url,
            waypoints: waypoints.len(),
        }),
        OutputFormat::Text => {
            println!("{}", url);
            Ok(())
        }
    }
}
