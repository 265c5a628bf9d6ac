use std::collections::HashMap;

use agro_config::{DashConfig, SeriesConfig};
use agro_core::event::InitialData;
use agro_core::{Channel, ConnectionStatus, Message, SensorSample};
use agro_series::SeriesAggregator;
use tracing::{debug, info, warn};

use crate::nodes::NodeRegistry;
use crate::render;
use crate::table::ReadingTable;

/// What a message changed, so the caller knows which views to redraw.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    Status,
    Gateway,
    Location { node_id: String, lat: f64, lon: f64 },
    /// A reading was recorded; `node_id` is `None` for anonymous readings.
    Sample { node_id: Option<String> },
    Initial { rows: usize },
    Shutdown,
}

/// Everything the dashboard displays, owned in one place.
///
/// `overall` mixes readings from every node (sparklines and running
/// averages); `per_node` backs each node's own charts.
#[derive(Debug, Clone)]
pub struct Dashboard {
    series_config: SeriesConfig,
    overall:       SeriesAggregator,
    per_node:      HashMap<String, SeriesAggregator>,
    table:         ReadingTable,
    nodes:         NodeRegistry,
    status:        ConnectionStatus,
    gateway:       Option<String>,
    last_label:    Option<String>,
}

impl Dashboard {
    pub fn new(config: &DashConfig) -> Self {
        Self {
            series_config: config.series.clone(),
            overall:       new_series(config.series.overall_capacity, &config.series),
            per_node:      HashMap::new(),
            table:         ReadingTable::new(config.table.max_rows),
            nodes:         NodeRegistry::new(&config.map),
            status:        ConnectionStatus::default(),
            gateway:       None,
            last_label:    None,
        }
    }

    /// Apply one feed message. Returns `None` when nothing visible changed.
    pub fn apply(&mut self, message: Message) -> Option<Refresh> {
        match message {
            // ── Connection ────────────────────────────────────────────────────
            Message::Connected | Message::Reconnected => {
                self.status = ConnectionStatus::Connected;
                Some(Refresh::Status)
            }
            Message::Disconnected(reason) => {
                self.status = ConnectionStatus::Disconnected(reason);
                Some(Refresh::Status)
            }
            Message::ConnectError(msg) => {
                self.status = ConnectionStatus::Error(msg);
                Some(Refresh::Status)
            }
            Message::Reconnecting => {
                self.status = ConnectionStatus::Reconnecting;
                Some(Refresh::Status)
            }

            // ── Server pushes ─────────────────────────────────────────────────
            Message::InitialData(init) => Some(self.bootstrap(init)),
            Message::GatewayIp(info) => {
                let Some(ip) = info.ip else {
                    debug!("gateway update without ip ignored");
                    return None;
                };
                self.gateway = ip;
                Some(Refresh::Gateway)
            }
            Message::NodeLocation(update) => match self.nodes.apply(&update) {
                Some((node_id, lat, lon)) => Some(Refresh::Location { node_id, lat, lon }),
                None => {
                    debug!(?update, "ignoring location update");
                    None
                }
            },
            Message::NewSample(sample) => self.ingest(&sample),

            Message::Shutdown => Some(Refresh::Shutdown),
        }
    }

    /// Record a live reading in every series it touches and in the table.
    /// Only the table row is deduplicated by id.
    fn ingest(&mut self, sample: &SensorSample) -> Option<Refresh> {
        if !self.table.insert(sample) {
            debug!(id = ?sample.id, "row already in table");
        }

        let label = sample.label();
        let node = sample.node_id.as_deref().filter(|id| !id.is_empty());

        let mut recorded = 0;
        for channel in Channel::ALL {
            if self.overall.push(channel.key(), sample.field(channel), label.as_deref()) {
                recorded += 1;
            }
        }
        if let Some(id) = node {
            self.nodes.ensure(id);
            let series = self.per_node.entry(id.to_string()).or_insert_with(|| {
                new_series(self.series_config.node_capacity, &self.series_config)
            });
            for channel in Channel::ALL {
                series.push(channel.key(), sample.field(channel), label.as_deref());
            }
        }

        if recorded == 0 {
            debug!(node = ?node, "reading carried no numeric fields");
        }
        if label.is_some() {
            self.last_label = label;
        }
        Some(Refresh::Sample {
            node_id: node.map(str::to_string),
        })
    }

    /// Replace all state derived from history with a bootstrap batch.
    fn bootstrap(&mut self, init: InitialData) -> Refresh {
        if let Some(ip) = init.gateway_ip {
            self.gateway = ip;
        }

        for id in &init.nodes {
            self.nodes.ensure(id);
        }
        let mut located: Vec<_> = init.locations.into_iter().collect();
        located.sort_by(|a, b| a.0.cmp(&b.0));
        for (id, mut update) in located {
            update.node_id.get_or_insert(id);
            if self.nodes.apply(&update).is_none() {
                warn!(?update, "bootstrap location ignored");
            }
        }

        let mut rows = init.rows;
        rows.sort_by(|a, b| a.time_key().total_cmp(&b.time_key()));
        let labels: Vec<String> = rows.iter().map(|r| r.label().unwrap_or_default()).collect();

        for channel in Channel::ALL {
            self.overall.seed(
                channel.key(),
                rows.iter().map(|r| r.field(channel)),
                labels.iter().cloned(),
            );
        }

        self.per_node.clear();
        let mut by_node: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            if let Some(id) = row.node_id.as_deref().filter(|id| !id.is_empty()) {
                self.nodes.ensure(id);
                by_node.entry(id).or_default().push(i);
            }
        }
        for (id, indices) in by_node {
            let mut series = new_series(self.series_config.node_capacity, &self.series_config);
            for channel in Channel::ALL {
                series.seed(
                    channel.key(),
                    indices.iter().map(|&i| rows[i].field(channel)),
                    indices.iter().map(|&i| labels[i].clone()),
                );
            }
            self.per_node.insert(id.to_string(), series);
        }

        self.table.load(rows.iter().rev(), rows.len() as u64);
        self.last_label = rows.iter().rev().find_map(SensorSample::label);

        info!(rows = rows.len(), nodes = self.nodes.len(), "bootstrap applied");
        Refresh::Initial { rows: rows.len() }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Series mixing every node's readings.
    pub fn overall(&self) -> &SeriesAggregator {
        &self.overall
    }

    /// Series for one node, if it has reported anything.
    pub fn node_series(&self, node_id: &str) -> Option<&SeriesAggregator> {
        self.per_node.get(node_id)
    }

    pub fn table(&self) -> &ReadingTable {
        &self.table
    }

    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    /// Gateway identifier readout.
    pub fn gateway(&self) -> String {
        render::gateway(self.gateway.as_deref())
    }

    /// Label of the most recent reading.
    pub fn last_reading(&self) -> Option<&str> {
        self.last_label.as_deref()
    }

    /// Running-average readouts of the overall series.
    pub fn averages(&self) -> Vec<(Channel, String)> {
        Channel::ALL
            .into_iter()
            .map(|c| (c, render::average_readout(c, self.overall.mean(c.key()))))
            .collect()
    }
}

fn new_series(capacity: usize, config: &SeriesConfig) -> SeriesAggregator {
    let series = config
        .channels
        .iter()
        .fold(SeriesAggregator::new(capacity), |agg, (channel, cap)| {
            agg.with_channel_capacity(channel.as_str(), *cap)
        });
    series.with_channels(Channel::ALL.map(Channel::key))
}
