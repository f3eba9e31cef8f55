//! Sequence command: order valid stops by nearest neighbor or by hand.

use std::io;
use std::path::Path;

use anyhow::Result;

use nakimi_lib::{select_sequencer, Coordinate, SequenceStrategy, Stop};

use crate::commands::read_orders;
use crate::output::{print_json, render_sequence, OutputFormat};
use crate::terminal::ColorPalette;

/// Arguments for the sequence command.
#[derive(Debug, Clone)]
pub struct SequenceCommandArgs<'a> {
    pub orders: &'a Path,
    pub origin: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    pub strategy: SequenceStrategy,
}

/// Handle the sequence subcommand.
///
/// Only valid orders become stops; stops without coordinates are listed as
/// unpositioned.
pub fn handle_sequence_command(args: &SequenceCommandArgs<'_>, format: OutputFormat) -> Result<()> {
    let orders = read_orders(args.orders)?;
    let stops: Vec<Stop> = orders.iter().filter_map(Stop::from_order).collect();

    let route = select_sequencer(args.strategy).sequence(&stops, args.origin, args.destination);

    match format {
        OutputFormat::Json => print_json(&route),
        OutputFormat::Text => {
            render_sequence(&mut io::stdout().lock(), &route, &ColorPalette::detect())?;
            Ok(())
        }
    }
}
