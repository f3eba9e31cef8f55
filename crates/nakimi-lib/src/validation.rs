//! Completeness checks applied to an order before it may join a route.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::order::Order;

/// A single reason an order cannot be routed.
///
/// Serialized as its human-readable message so API consumers see the same
/// text the operator does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingId,
    MissingCustomerName,
    MissingPhone,
    MissingAddress,
    /// Appended by the geocoding step, never by [`validate`].
    UnresolvedCoordinates,
}

impl ValidationError {
    pub fn message(self) -> &'static str {
        match self {
            ValidationError::MissingId => "missing order identifier",
            ValidationError::MissingCustomerName => "missing customer name",
            ValidationError::MissingPhone => "missing phone",
            ValidationError::MissingAddress => "missing address",
            ValidationError::UnresolvedCoordinates => "unable to resolve coordinates",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Error messages in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn is_present_trimmed(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Check an order for the fields every stop needs.
///
/// All rules are evaluated; violations are reported in rule order. The phone
/// number is only checked for presence.
pub fn validate(order: &Order) -> ValidationResult {
    let mut errors = Vec::new();

    if !is_present(order.id.as_deref()) {
        errors.push(ValidationError::MissingId);
    }
    if !is_present_trimmed(order.customer_name.as_deref()) {
        errors.push(ValidationError::MissingCustomerName);
    }
    if !is_present(order.phone.as_deref()) {
        errors.push(ValidationError::MissingPhone);
    }
    if !is_present_trimmed(order.address.as_deref()) {
        errors.push(ValidationError::MissingAddress);
    }

    ValidationResult::from_errors(errors)
}

/// Validate an order and record the outcome on it.
///
/// Returns the new `is_valid` flag.
pub fn apply_validation(order: &mut Order) -> bool {
    let result = validate(order);
    order.is_valid = result.is_valid;
    order.validation_errors = result.errors;
    if !order.is_valid {
        tracing::debug!(
            order = order.display_id(),
            errors = ?order.validation_errors,
            "order failed validation"
        );
    }
    order.is_valid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_order() -> Order {
        Order::new(
            "PED-1001",
            "Ana Pérez",
            "+56912345678",
            "Av. Providencia 1234",
        )
    }

    #[test]
    fn complete_order_is_valid() {
        let result = validate(&complete_order());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn every_missing_field_is_reported_in_rule_order() {
        let result = validate(&Order::default());
        assert!(!result.is_valid);
        assert_eq!(
            result.messages(),
            vec![
                "missing order identifier",
                "missing customer name",
                "missing phone",
                "missing address",
            ]
        );
    }

    #[test]
    fn blank_name_and_address_are_missing() {
        let mut order = complete_order();
        order.customer_name = Some("   ".to_string());
        order.address = Some("\t".to_string());
        let result = validate(&order);
        assert_eq!(
            result.errors,
            vec![
                ValidationError::MissingCustomerName,
                ValidationError::MissingAddress
            ]
        );
    }

    #[test]
    fn empty_id_and_phone_are_missing() {
        let mut order = complete_order();
        order.id = Some(String::new());
        order.phone = Some(String::new());
        let result = validate(&order);
        assert_eq!(
            result.errors,
            vec![ValidationError::MissingId, ValidationError::MissingPhone]
        );
    }

    #[test]
    fn phone_format_is_not_checked() {
        let mut order = complete_order();
        order.phone = Some("N/A".to_string());
        assert!(validate(&order).is_valid);
    }

    #[test]
    fn apply_validation_records_outcome() {
        let mut order = complete_order();
        order.phone = None;
        assert!(!apply_validation(&mut order));
        assert!(!order.is_valid);
        assert_eq!(order.validation_errors, vec![ValidationError::MissingPhone]);

        order.phone = Some("987654321".to_string());
        assert!(apply_validation(&mut order));
        assert!(order.validation_errors.is_empty());
    }

    #[test]
    fn validation_errors_serialize_as_messages() {
        let result = validate(&Order::default());
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"isValid\":false"));
        assert!(json.contains("\"missing phone\""));
    }
}
