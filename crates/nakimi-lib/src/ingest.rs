//! Loading order sheets.
//!
//! Orders arrive as a CSV export of the store's spreadsheet (Spanish or
//! English headers) or as a JSON array. Every loaded order is validated
//! before it is returned, so callers always see `is_valid` populated.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Error, Result};
use crate::order::{clamp_demand, Coordinate, Order};
use crate::validation::apply_validation;

const ID_HEADERS: &[&str] = &["id", "order_number", "ordernumber"];
const NAME_HEADERS: &[&str] = &["cliente", "customer_name", "customername", "nombre"];
const PHONE_HEADERS: &[&str] = &["telefono", "teléfono", "phone"];
const ADDRESS_HEADERS: &[&str] = &["dirección", "direccion", "address"];
const UNIT_HEADERS: &[&str] = &["departamento", "depto"];
const DISTRICT_HEADERS: &[&str] = &["comuna"];
const DEMAND_HEADERS: &[&str] = &["demand", "demanda"];
const LAT_HEADERS: &[&str] = &["lat", "latitude", "latitud"];
const LNG_HEADERS: &[&str] = &["lng", "lon", "longitude", "longitud"];

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    id: Option<usize>,
    name: Option<usize>,
    phone: Option<usize>,
    address: usize,
    unit: Option<usize>,
    district: Option<usize>,
    demand: Option<usize>,
    lat: Option<usize>,
    lng: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();
        let find = |aliases: &[&str]| {
            normalized
                .iter()
                .position(|header| aliases.contains(&header.as_str()))
        };

        Ok(Self {
            id: find(ID_HEADERS),
            name: find(NAME_HEADERS),
            phone: find(PHONE_HEADERS),
            address: find(ADDRESS_HEADERS).ok_or(Error::MissingColumn { column: "address" })?,
            unit: find(UNIT_HEADERS),
            district: find(DISTRICT_HEADERS),
            demand: find(DEMAND_HEADERS),
            lat: find(LAT_HEADERS),
            lng: find(LNG_HEADERS),
        })
    }
}

/// Non-blank cell at `index`, trimmed.
fn cell(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_demand(value: Option<String>, line: u64) -> Result<u32> {
    let Some(value) = value else {
        return Ok(0);
    };
    let parsed = value
        .parse::<f64>()
        .map_err(|e| Error::InvalidOrderRecord {
            line,
            message: format!("demand '{value}' is not a number: {e}"),
        })?;
    if !parsed.is_finite() {
        return Err(Error::InvalidOrderRecord {
            line,
            message: format!("demand '{value}' is not a number"),
        });
    }
    Ok(clamp_demand(parsed))
}

fn parse_coordinates(
    lat: Option<String>,
    lng: Option<String>,
    line: u64,
) -> Result<Option<Coordinate>> {
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Ok(None);
    };
    let parse = |value: &str, axis: &str| {
        value.replace(',', ".").parse::<f64>().map_err(|e| Error::InvalidOrderRecord {
            line,
            message: format!("{axis} '{value}' is not a number: {e}"),
        })
    };
    Ok(Some(Coordinate::new(parse(&lat, "lat")?, parse(&lng, "lng")?)))
}

fn order_from_record(columns: &ColumnMap, record: &StringRecord) -> Result<Order> {
    let line = record.position().map_or(0, |p| p.line());

    // Unit and district only qualify a street; without one the address is missing.
    let address = cell(record, Some(columns.address)).map(|street| {
        let mut parts = vec![street];
        parts.extend(
            [columns.unit, columns.district]
                .into_iter()
                .filter_map(|index| cell(record, index)),
        );
        parts.join(", ")
    });

    Ok(Order {
        id: cell(record, columns.id),
        customer_name: cell(record, columns.name),
        phone: cell(record, columns.phone),
        address,
        demand: parse_demand(cell(record, columns.demand), line)?,
        coordinates: parse_coordinates(cell(record, columns.lat), cell(record, columns.lng), line)?,
        ..Order::default()
    })
}

/// Parse orders from CSV text.
pub fn read_orders_csv<R: Read>(reader: R) -> Result<Vec<Order>> {
    let mut csv = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let columns = ColumnMap::from_headers(csv.headers()?)?;

    let mut orders = Vec::new();
    for record in csv.records() {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let mut order = order_from_record(&columns, &record)?;
        apply_validation(&mut order);
        orders.push(order);
    }

    let invalid = orders.iter().filter(|o| !o.is_valid).count();
    tracing::info!(orders = orders.len(), invalid, "order sheet parsed");
    Ok(orders)
}

/// Load orders from a CSV file.
pub fn load_orders_csv(path: &Path) -> Result<Vec<Order>> {
    tracing::debug!(path = %path.display(), "reading CSV order sheet");
    read_orders_csv(File::open(path)?)
}

/// Load orders from a JSON array.
pub fn load_orders_json(path: &Path) -> Result<Vec<Order>> {
    tracing::debug!(path = %path.display(), "reading JSON orders");
    let raw = std::fs::read_to_string(path)?;
    let mut orders: Vec<Order> = serde_json::from_str(&raw)?;
    for order in &mut orders {
        apply_validation(order);
    }
    Ok(orders)
}

/// Load orders, choosing the format from the file extension.
pub fn load_orders(path: &Path) -> Result<Vec<Order>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => load_orders_csv(path),
        Some("json") => load_orders_json(path),
        _ => Err(Error::UnsupportedOrderFile {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    fn parse(csv: &str) -> Vec<Order> {
        read_orders_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn spanish_headers_are_mapped() {
        let orders = parse(
            "id,cliente,telefono,dirección,departamento,comuna,demand\n\
             PED-1,Ana Pérez,+56911111111,Av. Providencia 1234,Depto 5,Providencia,2\n",
        );
        let order = &orders[0];
        assert_eq!(order.id.as_deref(), Some("PED-1"));
        assert_eq!(order.customer_name.as_deref(), Some("Ana Pérez"));
        assert_eq!(
            order.address.as_deref(),
            Some("Av. Providencia 1234, Depto 5, Providencia")
        );
        assert_eq!(order.demand, 2);
        assert!(order.is_valid);
    }

    #[test]
    fn english_headers_and_coordinates() {
        let orders = parse(
            "Order_Number,Customer_Name,Phone,Address,Lat,Lng\n\
             7,Bob,555,Moneda 1137,-33.443,-70.654\n",
        );
        assert_eq!(orders[0].id.as_deref(), Some("7"));
        assert_eq!(
            orders[0].coordinates,
            Some(Coordinate::new(-33.443, -70.654))
        );
    }

    #[test]
    fn blank_cells_are_reported_by_validation() {
        let orders = parse("id,cliente,telefono,direccion\nPED-2,  ,,Moneda 1137\n");
        assert!(!orders[0].is_valid);
        assert_eq!(
            orders[0].validation_errors,
            vec![
                ValidationError::MissingCustomerName,
                ValidationError::MissingPhone,
            ]
        );
    }

    #[test]
    fn unit_and_district_without_street_is_missing_address() {
        let orders = parse(
            "id,cliente,telefono,dirección,departamento,comuna\n\
             PED-9,Ana,123,,Depto 5,Providencia\n",
        );
        assert_eq!(orders[0].address, None);
        assert!(!orders[0].is_valid);
        assert_eq!(
            orders[0].validation_errors,
            vec![ValidationError::MissingAddress]
        );
    }

    #[test]
    fn negative_demand_clamps_to_zero() {
        let orders = parse("id,direccion,demand\nA,Moneda 1137,-4\nB,Moneda 1137,\n");
        assert_eq!(orders[0].demand, 0);
        assert_eq!(orders[1].demand, 0);
    }

    #[test]
    fn unparsable_demand_names_the_line() {
        let error =
            read_orders_csv("id,direccion,demand\nA,Moneda 1137,lots\n".as_bytes()).unwrap_err();
        assert!(matches!(error, Error::InvalidOrderRecord { line: 2, .. }));
    }

    #[test]
    fn missing_address_column_is_fatal() {
        let error = read_orders_csv("id,cliente\nA,Ana\n".as_bytes()).unwrap_err();
        assert!(matches!(error, Error::MissingColumn { column: "address" }));
    }

    #[test]
    fn empty_rows_are_skipped() {
        let orders = parse("id,direccion\nA,Moneda 1137\n,\nB,Huérfanos 1052\n");
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let error = load_orders(Path::new("orders.xlsx")).unwrap_err();
        assert!(matches!(error, Error::UnsupportedOrderFile { .. }));
    }
}
