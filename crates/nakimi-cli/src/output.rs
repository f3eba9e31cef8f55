//! Output formatting for command results.
//!
//! Every command renders either a human-readable text view or pretty JSON.
//! Text renderers write to any [`Write`] so they can be checked in tests.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use nakimi_lib::{DeliveryPlan, DriverManifest, Order, SequencedRoute};

use crate::terminal::{format_km, format_pct, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Per-order validation line.
pub fn render_validation(
    out: &mut dyn Write,
    orders: &[Order],
    palette: &ColorPalette,
) -> io::Result<()> {
    let p = palette;
    for order in orders {
        if order.is_valid {
            writeln!(out, "{}OK{}      {}", p.green, p.reset, order.display_id())?;
        } else {
            let reasons: Vec<String> = order
                .validation_errors
                .iter()
                .map(ToString::to_string)
                .collect();
            writeln!(
                out,
                "{}INVALID{} {} {}({}){}",
                p.red,
                p.reset,
                order.display_id(),
                p.gray,
                reasons.join("; "),
                p.reset
            )?;
        }
    }

    let valid = orders.iter().filter(|order| order.is_valid).count();
    let invalid = orders.len() - valid;
    let pct = if orders.is_empty() {
        0.0
    } else {
        invalid as f64 * 100.0 / orders.len() as f64
    };
    writeln!(
        out,
        "\n{} orders: {} valid, {} invalid ({})",
        orders.len(),
        valid,
        invalid,
        format_pct(pct)
    )
}

/// Visiting order with leg distances.
pub fn render_sequence(
    out: &mut dyn Write,
    route: &SequencedRoute,
    palette: &ColorPalette,
) -> io::Result<()> {
    let p = palette;
    writeln!(
        out,
        "Sequence ({} stops; strategy: {}):",
        route.order.len(),
        route.strategy
    )?;
    for (index, stop) in route.order.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {}{}{} {}{}{}",
            index + 1,
            p.white_bold,
            stop.id,
            p.reset,
            p.gray,
            stop.address,
            p.reset
        )?;
    }
    if !route.unpositioned.is_empty() {
        writeln!(
            out,
            "{}Without coordinates:{} {}",
            p.red,
            p.reset,
            route.unpositioned.join(", ")
        )?;
    }
    writeln!(
        out,
        "Total distance: {}{}{}",
        p.cyan,
        format_km(route.total_distance_km()),
        p.reset
    )
}

/// Summary, sequence, rejected orders and link of a planning run.
pub fn render_plan(
    out: &mut dyn Write,
    plan: &DeliveryPlan,
    palette: &ColorPalette,
) -> io::Result<()> {
    let p = palette;
    let summary = &plan.summary;
    writeln!(
        out,
        "Orders: {} total, {} valid, {} invalid ({})",
        summary.total_orders,
        summary.valid_orders,
        summary.invalid_orders,
        format_pct(summary.invalid_pct)
    )?;
    render_sequence(out, &plan.sequence, palette)?;

    if !plan.rejected.is_empty() {
        writeln!(out, "Rejected:")?;
        for rejected in &plan.rejected {
            let reasons: Vec<String> = rejected.errors.iter().map(ToString::to_string).collect();
            writeln!(
                out,
                "  {}{}{} {}({}){}",
                p.red,
                rejected.id,
                p.reset,
                p.gray,
                reasons.join("; "),
                p.reset
            )?;
        }
    }

    render_link(out, plan.url.as_deref(), plan.link_error.as_ref(), palette)
}

/// Pending stops and the depot round-trip link.
pub fn render_driver(
    out: &mut dyn Write,
    manifest: &DriverManifest,
    palette: &ColorPalette,
) -> io::Result<()> {
    let p = palette;
    writeln!(
        out,
        "Depot: {}{}{} ({} pending, {} delivered)",
        p.white_bold,
        manifest.depot,
        p.reset,
        manifest.pending.len(),
        manifest.delivered
    )?;
    for (index, stop) in manifest.pending.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} {}{}{}",
            index + 1,
            stop.id,
            p.gray,
            stop.address,
            p.reset
        )?;
    }
    render_link(
        out,
        manifest.url.as_deref(),
        manifest.link_error.as_ref(),
        palette,
    )
}

fn render_link(
    out: &mut dyn Write,
    url: Option<&str>,
    error: Option<&nakimi_lib::InvalidRouteError>,
    palette: &ColorPalette,
) -> io::Result<()> {
    let p = palette;
    match (url, error) {
        (Some(url), _) => writeln!(out, "Navigation: {}{}{}", p.green, url, p.reset),
        (None, Some(error)) => writeln!(
            out,
            "{}Navigation link not generated:{} {}",
            p.red, p.reset, error
        ),
        (None, None) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nakimi_lib::{
        apply_validation, plan_delivery, sequence, Coordinate, InvalidRouteError, PlanRequest,
        Stop,
    };

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn order(id: &str, phone: Option<&str>, lat: f64, lng: f64) -> Order {
        let mut order = Order::new(id, "Ana", phone.unwrap_or(""), format!("Calle {id}"));
        order.coordinates = Some(Coordinate::new(lat, lng));
        apply_validation(&mut order);
        order
    }

    #[test]
    fn test_render_validation_plain() {
        let orders = vec![
            order("A", Some("+569"), -33.44, -70.65),
            order("B", None, -33.41, -70.57),
        ];
        let text = render(|out| render_validation(out, &orders, &ColorPalette::plain()));

        assert!(text.contains("OK      A"));
        assert!(text.contains("INVALID B (missing phone)"));
        assert!(text.contains("2 orders: 1 valid, 1 invalid (50.0%)"));
    }

    #[test]
    fn test_render_sequence_lists_unpositioned() {
        let stops = vec![
            Stop::new("A", "Moneda 1137", Coordinate::new(-33.44, -70.65)),
            Stop::new("B", "Sin Numero", Coordinate::UNRESOLVED),
        ];
        let route = sequence(&stops, None, None);
        let text = render(|out| render_sequence(out, &route, &ColorPalette::plain()));

        assert!(text.contains("Sequence (1 stops; strategy: nearest-neighbor):"));
        assert!(text.contains("  1. A Moneda 1137"));
        assert!(text.contains("Without coordinates: B"));
        assert!(text.contains("Total distance: 0.00 km"));
    }

    #[test]
    fn test_render_plan_reports_link_error() {
        let orders = vec![order("A", Some("+569"), -33.44, -70.65)];
        let plan = plan_delivery(&orders, &PlanRequest::default());
        assert_eq!(plan.link_error, Some(InvalidRouteError::MissingEndpoints));

        let text = render(|out| render_plan(out, &plan, &ColorPalette::plain()));
        assert!(text.contains("Orders: 1 total, 1 valid, 0 invalid (0.0%)"));
        assert!(
            text.contains("Navigation link not generated: origin and destination are mandatory")
        );
    }

    #[test]
    fn test_render_uses_palette() {
        let orders = vec![order("A", Some("+569"), -33.44, -70.65)];
        let text = render(|out| render_validation(out, &orders, &ColorPalette::colored()));
        assert!(text.contains("\x1b[32mOK\x1b[0m"));
    }
}
