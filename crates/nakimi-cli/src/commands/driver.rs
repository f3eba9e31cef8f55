//! Driver command: pending stops and the depot round-trip link.

use std::io;
use std::path::Path;

use anyhow::{bail, Result};

use nakimi_lib::{driver_manifest, mark_delivered};

use crate::commands::read_orders;
use crate::output::{print_json, render_driver, OutputFormat};
use crate::terminal::ColorPalette;

/// Handle the driver subcommand.
///
/// `delivered` ids are marked before the manifest is built; unknown ids are
/// reported and skipped.
pub fn handle_driver_command(
    orders_path: &Path,
    depot: Option<&str>,
    delivered: &[String],
    format: OutputFormat,
) -> Result<()> {
    let Some(depot) = depot.map(str::trim).filter(|d| !d.is_empty()) else {
        bail!("no depot address; pass --depot or set \"depot\" in the config file");
    };

    let mut orders = read_orders(orders_path)?;
    for id in delivered {
        if !mark_delivered(&mut orders, id) {
            tracing::warn!(order = %id, "unknown order id, not marked as delivered");
        }
    }

    let manifest = driver_manifest(&orders, depot);

    match format {
        OutputFormat::Json => print_json(&manifest),
        OutputFormat::Text => {
            render_driver(&mut io::stdout().lock(), &manifest, &ColorPalette::detect())?;
            Ok(())
        }
    }
}
