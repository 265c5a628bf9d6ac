use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use agro_core::{DashError, Result};

/// Root configuration structure parsed from `agrodash.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Rolling series capacities.
    pub series: SeriesConfig,
    /// Readings table settings.
    pub table: TableConfig,
    /// Node map settings.
    pub map: MapConfig,
    /// Push feed settings.
    pub feed: FeedConfig,
}

impl DashConfig {
    /// Reject settings that would leave a view permanently empty.
    pub fn validate(&self) -> Result<()> {
        if self.series.overall_capacity == 0 || self.series.node_capacity == 0 {
            return Err(DashError::Config("series capacities must be at least 1".into()));
        }
        if let Some((name, _)) = self.series.channels.iter().find(|(_, cap)| **cap == 0) {
            return Err(DashError::Config(format!("capacity of channel '{name}' must be at least 1")));
        }
        if self.table.max_rows == 0 {
            return Err(DashError::Config("table.max_rows must be at least 1".into()));
        }
        if self.map.colors.is_empty() {
            return Err(DashError::Config("map.colors must not be empty".into()));
        }
        if self.feed.buffer == 0 {
            return Err(DashError::Config("feed.buffer must be at least 1".into()));
        }
        Ok(())
    }
}

/// Capacities of the rolling buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Points kept per channel across all nodes (sparklines, averages).
    pub overall_capacity: usize,
    /// Points kept per channel for a single node's charts.
    pub node_capacity: usize,
    /// Per-channel overrides (key = channel name, e.g. `"temperature"`).
    /// Apply to both the overall and the per-node series.
    pub channels: HashMap<String, usize>,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            overall_capacity: 150,
            node_capacity:    200,
            channels:         HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows kept in the readings table; older rows drop off the bottom.
    pub max_rows: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { max_rows: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial map centre; `0.0, 0.0` means "use the first located node".
    pub center_lat: f64,
    pub center_lon: f64,
    /// Marker colours, assigned to nodes in the order they are first seen.
    pub colors: Vec<String>,
    /// Fractional padding added around the bounds of all markers.
    pub bounds_padding: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat:     0.0,
            center_lon:     0.0,
            colors:         ["red", "blue", "green", "orange", "violet", "grey", "black", "gold"]
                .map(String::from)
                .to_vec(),
            bounds_padding: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Decoded events buffered between the reader task and the dashboard.
    pub buffer: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { buffer: 64 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = DashConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.series.overall_capacity, 150);
        assert_eq!(cfg.map.colors.len(), 8);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: DashConfig = toml::from_str(
            r#"
            [series]
            node_capacity = 50

            [series.channels]
            temperature = 20
            "#,
        )
        .unwrap();
        assert_eq!(cfg.series.node_capacity, 50);
        assert_eq!(cfg.series.overall_capacity, 150);
        assert_eq!(cfg.series.channels.get("temperature"), Some(&20));
        assert_eq!(cfg.table.max_rows, 100);
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let mut cfg = DashConfig::default();
        cfg.series.channels.insert("light".into(), 0);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("light"), "{err}");

        let mut cfg = DashConfig::default();
        cfg.map.colors.clear();
        assert!(cfg.validate().is_err());
    }
}
