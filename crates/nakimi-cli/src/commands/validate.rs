//! Validate command: report which orders can join a route.

use std::io;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use nakimi_lib::{Order, ValidationError};

use crate::commands::read_orders;
use crate::output::{print_json, render_validation, OutputFormat};
use crate::terminal::ColorPalette;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderReport<'a> {
    id: Option<&'a str>,
    is_valid: bool,
    errors: &'a [ValidationError],
}

impl<'a> From<&'a Order> for OrderReport<'a> {
    fn from(order: &'a Order) -> Self {
        Self {
            id: order.id.as_deref(),
            is_valid: order.is_valid,
            errors: &order.validation_errors,
        }
    }
}

/// Handle the validate subcommand.
pub fn handle_validate_command(orders_path: &Path, format: OutputFormat) -> Result<()> {
    let orders = read_orders(orders_path)?;

    match format {
        OutputFormat::Json => {
            let reports: Vec<OrderReport<'_>> = orders.iter().map(OrderReport::from).collect();
            print_json(&reports)
        }
        OutputFormat::Text => {
            render_validation(&mut io::stdout().lock(), &orders, &ColorPalette::detect())?;
            Ok(())
        }
    }
}
