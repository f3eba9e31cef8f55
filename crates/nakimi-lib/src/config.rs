//! Planner settings shared by the CLI and the HTTP service.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geocode::{UnresolvedPolicy, DEFAULT_NOMINATIM_URL};
use crate::navigation::{NavigationLinkBuilder, MAX_WAYPOINTS};
use crate::sequencing::SequenceStrategy;

/// Tunables for a planning run.
///
/// Every field has a default, so an empty JSON object is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Waypoint cap for navigation links; never above [`MAX_WAYPOINTS`].
    pub max_waypoints: usize,
    pub strategy: SequenceStrategy,
    pub unresolved_policy: UnresolvedPolicy,
    /// Distribution centre address used as driver start and end.
    pub depot: Option<String>,
    /// Base URL of the Nominatim-compatible geocoder.
    pub geocoder_url: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_waypoints: MAX_WAYPOINTS,
            strategy: SequenceStrategy::default(),
            unresolved_policy: UnresolvedPolicy::default(),
            depot: None,
            geocoder_url: DEFAULT_NOMINATIM_URL.to_string(),
        }
    }
}

impl PlannerConfig {
    /// Read and check a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded planner config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_waypoints > MAX_WAYPOINTS {
            return Err(Error::InvalidConfig {
                message: format!(
                    "max_waypoints is {}, the navigation provider accepts at most {MAX_WAYPOINTS}",
                    self.max_waypoints
                ),
            });
        }
        if let UnresolvedPolicy::CityCenter { center } = self.unresolved_policy {
            if !center.is_resolved() {
                return Err(Error::InvalidConfig {
                    message: format!("fallback center {center} is not a usable position"),
                });
            }
        }
        if self.geocoder_url.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "geocoder_url must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Depot address, if one is configured and not blank.
    pub fn depot(&self) -> Option<&str> {
        self.depot
            .as_deref()
            .map(str::trim)
            .filter(|depot| !depot.is_empty())
    }

    pub fn link_builder(&self) -> NavigationLinkBuilder {
        NavigationLinkBuilder::new().with_max_waypoints(self.max_waypoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::SANTIAGO_CENTER;
    use crate::order::Coordinate;

    #[test]
    fn empty_object_yields_defaults() {
        let config: PlannerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.max_waypoints, MAX_WAYPOINTS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reads_policy_and_depot() {
        let config: PlannerConfig = serde_json::from_str(
            r#"{
                "max_waypoints": 10,
                "strategy": "manual",
                "unresolved_policy": {"policy": "city-center"},
                "depot": "Centro Logístico"
            }"#,
        )
        .unwrap();
        assert_eq!(config.strategy, SequenceStrategy::Manual);
        assert_eq!(
            config.unresolved_policy,
            UnresolvedPolicy::CityCenter {
                center: SANTIAGO_CENTER
            }
        );
        assert_eq!(config.depot(), Some("Centro Logístico"));
        assert_eq!(config.link_builder().max_waypoints(), 10);
    }

    #[test]
    fn rejects_waypoint_limit_above_provider_maximum() {
        let config = PlannerConfig {
            max_waypoints: 30,
            ..PlannerConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn rejects_unresolved_fallback_center() {
        let config = PlannerConfig {
            unresolved_policy: UnresolvedPolicy::CityCenter {
                center: Coordinate::UNRESOLVED,
            },
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_depot_is_none() {
        let config = PlannerConfig {
            depot: Some("   ".to_string()),
            ..PlannerConfig::default()
        };
        assert_eq!(config.depot(), None);
    }

    #[test]
    fn from_path_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_waypoints": 99}"#).unwrap();
        assert!(PlannerConfig::from_path(&path).is_err());

        std::fs::write(&path, r#"{"max_waypoints": 5}"#).unwrap();
        assert_eq!(PlannerConfig::from_path(&path).unwrap().max_waypoints, 5);
    }
}
