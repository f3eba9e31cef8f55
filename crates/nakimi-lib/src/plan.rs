//! One planning run: validated orders in, sequenced route and link out.
//!
//! This is the glue the CLI and the HTTP service share. It never raises for
//! per-order problems: invalid orders are listed in [`DeliveryPlan::rejected`]
//! and a link that cannot be built is reported in
//! [`DeliveryPlan::link_error`].

use std::fmt::Display;

use serde::{Serialize, Serializer};

use crate::error::InvalidRouteError;
use crate::geo::{leg_distances_km, total_km};
use crate::navigation::NavigationLinkBuilder;
use crate::order::{DeliveryStatus, Endpoint, Order, Stop};
use crate::sequencing::{select_sequencer, SequenceStrategy, SequencedRoute};
use crate::validation::ValidationError;

fn serialize_display<T: Display, S: Serializer>(
    value: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serializer.collect_str(value),
        None => serializer.serialize_none(),
    }
}

/// Ordered stops between optional fixed endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Route {
    pub stops: Vec<Stop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Endpoint>,
}

impl Route {
    pub fn new(stops: Vec<Stop>) -> Self {
        Self {
            stops,
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin: impl Into<Endpoint>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<Endpoint>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Stop addresses in visiting order. Endpoints are never waypoints.
    pub fn waypoints(&self) -> Vec<&str> {
        self.stops
            .iter()
            .map(|stop| stop.address.as_str())
            .collect()
    }

    /// Navigation link for this route; coordinate endpoints render as `lat,lng`.
    pub fn navigation_url(
        &self,
        builder: &NavigationLinkBuilder,
    ) -> Result<String, InvalidRouteError> {
        let origin = self
            .origin
            .as_ref()
            .map(Endpoint::as_query)
            .unwrap_or_default();
        let destination = self
            .destination
            .as_ref()
            .map(Endpoint::as_query)
            .unwrap_or_default();
        builder.build(&origin, &destination, self.waypoints().as_slice())
    }
}

/// Parameters of a planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub origin: Option<Endpoint>,
    pub destination: Option<Endpoint>,
    pub strategy: SequenceStrategy,
    /// Attempt a navigation link; failures land in `link_error`.
    pub build_link: bool,
    pub link_builder: NavigationLinkBuilder,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            origin: None,
            destination: None,
            strategy: SequenceStrategy::default(),
            build_link: true,
            link_builder: NavigationLinkBuilder::default(),
        }
    }
}

/// Order that was kept off the route, with its reasons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedOrder {
    pub id: String,
    pub errors: Vec<ValidationError>,
}

/// Headline numbers of a run, as shown on the operations dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub total_orders: usize,
    pub valid_orders: usize,
    pub invalid_orders: usize,
    /// Share of invalid orders, 0–100.
    pub invalid_pct: f64,
    pub stops_sequenced: usize,
    pub total_distance_km: f64,
    pub legs_km: Vec<f64>,
}

impl PlanSummary {
    fn compute(orders: &[Order], sequence: &SequencedRoute) -> Self {
        let total_orders = orders.len();
        let valid_orders = orders.iter().filter(|order| order.is_valid).count();
        let invalid_orders = total_orders - valid_orders;
        let invalid_pct = if total_orders == 0 {
            0.0
        } else {
            invalid_orders as f64 * 100.0 / total_orders as f64
        };
        let legs_km = leg_distances_km(&sequence.path);

        Self {
            total_orders,
            valid_orders,
            invalid_orders,
            invalid_pct,
            stops_sequenced: sequence.order.len(),
            total_distance_km: total_km(&legs_km),
            legs_km,
        }
    }
}

/// Everything a planning run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryPlan {
    pub route: Route,
    pub sequence: SequencedRoute,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_display"
    )]
    pub link_error: Option<InvalidRouteError>,
    pub summary: PlanSummary,
    pub rejected: Vec<RejectedOrder>,
}

/// Plan a run over already-validated orders.
///
/// Invalid orders are rejected, valid ones become stops and are sequenced
/// with `request.strategy` between the request's endpoints. Only positioned
/// stops reach the route; the rest are listed in
/// [`SequencedRoute::unpositioned`].
pub fn plan_delivery(orders: &[Order], request: &PlanRequest) -> DeliveryPlan {
    let rejected: Vec<RejectedOrder> = orders
        .iter()
        .filter(|order| !order.is_valid)
        .map(|order| RejectedOrder {
            id: order.display_id().to_string(),
            errors: order.validation_errors.clone(),
        })
        .collect();
    let stops: Vec<Stop> = orders.iter().filter_map(Stop::from_order).collect();

    let sequencer = select_sequencer(request.strategy);
    let sequence = sequencer.sequence(
        &stops,
        request.origin.as_ref().and_then(Endpoint::coordinate),
        request.destination.as_ref().and_then(Endpoint::coordinate),
    );

    let route = Route {
        stops: sequence.order.clone(),
        origin: request.origin.clone(),
        destination: request.destination.clone(),
    };

    let (url, link_error) = if request.build_link {
        match route.navigation_url(&request.link_builder) {
            Ok(url) => (Some(url), None),
            Err(error) => {
                tracing::warn!(%error, "navigation link not generated");
                (None, Some(error))
            }
        }
    } else {
        (None, None)
    };

    let summary = PlanSummary::compute(orders, &sequence);
    tracing::info!(
        strategy = %request.strategy,
        orders = summary.total_orders,
        rejected = summary.invalid_orders,
        stops = summary.stops_sequenced,
        km = summary.total_distance_km,
        "delivery plan computed"
    );

    DeliveryPlan {
        route,
        sequence,
        url,
        link_error,
        summary,
        rejected,
    }
}

/// What the driver carries: pending stops and a depot round-trip link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverManifest {
    pub depot: String,
    pub pending: Vec<Stop>,
    pub delivered: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_display"
    )]
    pub link_error: Option<InvalidRouteError>,
}

/// Build the driver's manifest from orders in their current (possibly
/// hand-adjusted) order. The route starts and ends at `depot`.
pub fn driver_manifest(orders: &[Order], depot: &str) -> DriverManifest {
    let delivered = orders
        .iter()
        .filter(|order| order.is_valid && order.status == DeliveryStatus::Delivered)
        .count();
    let pending: Vec<Stop> = orders
        .iter()
        .filter(|order| order.status == DeliveryStatus::Pending)
        .filter_map(Stop::from_order)
        .collect();

    let route = Route::new(pending)
        .with_origin(depot)
        .with_destination(depot);
    let (url, link_error) = match route.navigation_url(&NavigationLinkBuilder::default()) {
        Ok(url) => (Some(url), None),
        Err(error) => (None, Some(error)),
    };

    DriverManifest {
        depot: depot.to_string(),
        pending: route.stops,
        delivered,
        url,
        link_error,
    }
}

/// Mark the order with `id` as delivered. Returns `false` for unknown ids.
pub fn mark_delivered(orders: &mut [Order], id: &str) -> bool {
    match orders.iter_mut().find(|o| o.id.as_deref() == Some(id)) {
        Some(order) => {
            order.status = DeliveryStatus::Delivered;
            tracing::info!(order = id, "order delivered");
            true
        }
        None => false,
    }
}
