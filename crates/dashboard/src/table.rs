use std::collections::VecDeque;

use agro_core::{Channel, SensorSample};
use serde_json::Value;

use crate::render::{self, EMPTY_CELL};

/// One formatted row of the readings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingRow {
    /// Server id, used to ignore repeated deliveries.
    pub id:          Option<String>,
    pub node:        String,
    pub temperature: String,
    pub humidity:    String,
    pub soil:        String,
    pub light:       String,
    pub timestamp:   String,
    pub created_at:  String,
}

impl ReadingRow {
    pub fn from_sample(sample: &SensorSample) -> Self {
        Self {
            id:          sample.id.as_ref().and_then(id_text),
            node:        sample.node_id.clone().unwrap_or_else(|| EMPTY_CELL.to_string()),
            temperature: render::cell(sample.value(Channel::Temperature), 1),
            humidity:    render::cell(sample.value(Channel::Humidity), 1),
            soil:        render::cell(sample.value(Channel::SoilMoisture), 0),
            light:       render::light_cell(
                sample.value(Channel::Light),
                sample.value(Channel::Percentage),
            ),
            timestamp:   sample
                .timestamp
                .as_ref()
                .and_then(id_text)
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            created_at:  sample
                .created_at
                .clone()
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
        }
    }

    /// Cells in column order.
    pub fn cells(&self) -> [&str; 8] {
        [
            self.id.as_deref().unwrap_or(EMPTY_CELL),
            &self.node,
            &self.temperature,
            &self.humidity,
            &self.soil,
            &self.light,
            &self.timestamp,
            &self.created_at,
        ]
    }
}

fn id_text(v: &Value) -> Option<String> {
    match v {
        Value::Null      => None,
        Value::String(s) => Some(s.clone()),
        other            => Some(other.to_string()),
    }
}

/// Newest-first table of recent readings with a running total.
#[derive(Debug, Clone)]
pub struct ReadingTable {
    rows:     VecDeque<ReadingRow>,
    max_rows: usize,
    total:    u64,
}

impl ReadingTable {
    pub fn new(max_rows: usize) -> Self {
        Self {
            rows: VecDeque::with_capacity(max_rows),
            max_rows,
            total: 0,
        }
    }

    /// Whether a row with this id is currently shown.
    pub fn contains_id(&self, id: &str) -> bool {
        self.rows.iter().any(|r| r.id.as_deref() == Some(id))
    }

    /// Insert a live reading at the top. Returns `false` for a repeated id.
    pub fn insert(&mut self, sample: &SensorSample) -> bool {
        let row = ReadingRow::from_sample(sample);
        if row.id.as_deref().is_some_and(|id| self.contains_id(id)) {
            return false;
        }
        self.rows.push_front(row);
        self.rows.truncate(self.max_rows);
        self.total += 1;
        true
    }

    /// Replace the table with a historical batch, ordered newest first.
    pub fn load<'a>(&mut self, newest_first: impl IntoIterator<Item = &'a SensorSample>, total: u64) {
        self.rows.clear();
        self.rows.extend(
            newest_first
                .into_iter()
                .take(self.max_rows)
                .map(ReadingRow::from_sample),
        );
        self.total = total;
    }

    pub fn rows(&self) -> impl Iterator<Item = &ReadingRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Readings accepted since start, including the bootstrap batch.
    pub fn total(&self) -> u64 {
        self.total
    }
}
