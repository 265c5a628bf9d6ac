use std::collections::HashMap;

use agro_config::MapConfig;
use agro_core::event::LocationUpdate;
use agro_core::SampleValue;

/// What the map knows about one sensor node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub id:       String,
    /// Marker colour, fixed on first sight.
    pub color:    String,
    /// Last reported `(lat, lon)`.
    pub location: Option<(f64, f64)>,
}

/// Geographic box around all located nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west:  f64,
    pub north: f64,
    pub east:  f64,
}

/// Known nodes in first-seen order, with colours and positions.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    order:   Vec<String>,
    nodes:   HashMap<String, NodeInfo>,
    colors:  Vec<String>,
    center:  Option<(f64, f64)>,
    padding: f64,
}

impl NodeRegistry {
    pub fn new(config: &MapConfig) -> Self {
        let center = (config.center_lat != 0.0 || config.center_lon != 0.0)
            .then_some((config.center_lat, config.center_lon));
        Self {
            order:   Vec::new(),
            nodes:   HashMap::new(),
            colors:  config.colors.clone(),
            center,
            padding: config.bounds_padding,
        }
    }

    /// Register `id` if unseen and return its entry.
    pub fn ensure(&mut self, id: &str) -> &mut NodeInfo {
        let color = self
            .colors
            .get(self.order.len() % self.colors.len().max(1))
            .cloned()
            .unwrap_or_default();
        let order = &mut self.order;
        self.nodes.entry(id.to_string()).or_insert_with(|| {
            order.push(id.to_string());
            NodeInfo {
                id: id.to_string(),
                color,
                location: None,
            }
        })
    }

    /// Apply a position report. Reports without a node id or with
    /// non-numeric coordinates are ignored and yield `None`.
    pub fn apply(&mut self, update: &LocationUpdate) -> Option<(String, f64, f64)> {
        let id = update.node_id.as_deref().filter(|id| !id.is_empty())?;
        let lat = update.lat.to_sample()?;
        let lon = update.lon.to_sample()?;
        self.ensure(id).location = Some((lat, lon));
        Some((id.to_string(), lat, lon))
    }

    pub fn get(&self, id: &str) -> Option<&NodeInfo> {
        self.nodes.get(id)
    }

    /// Nodes in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = &NodeInfo> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Configured centre, or the first located node.
    pub fn center(&self) -> Option<(f64, f64)> {
        self.center
            .or_else(|| self.iter().find_map(|n| n.location))
    }

    /// Padded box around all located nodes; only meaningful with two or more.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut located = self.iter().filter_map(|n| n.location);
        let (lat0, lon0) = located.next()?;
        let mut b = Bounds {
            south: lat0,
            west:  lon0,
            north: lat0,
            east:  lon0,
        };
        let mut count = 1;
        for (lat, lon) in located {
            b.south = b.south.min(lat);
            b.north = b.north.max(lat);
            b.west = b.west.min(lon);
            b.east = b.east.max(lon);
            count += 1;
        }
        if count < 2 {
            return None;
        }

        let dlat = (b.north - b.south) * self.padding;
        let dlon = (b.east - b.west) * self.padding;
        Some(Bounds {
            south: b.south - dlat,
            west:  b.west - dlon,
            north: b.north + dlat,
            east:  b.east + dlon,
        })
    }
}
