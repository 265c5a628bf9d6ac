use std::collections::HashMap;

use agro_core::SampleValue;
use tracing::trace;

use crate::buffer::{Point, RollingBuffer};

/// Independent copy of one channel's buffer, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSnapshot {
    pub values: Vec<f64>,
    pub labels: Vec<String>,
}

impl SeriesSnapshot {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Summary of the values currently held for a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub mean:  f64,
    pub min:   f64,
    pub max:   f64,
}

/// Named rolling buffers, one per channel, created on first use.
///
/// Capacities are fixed when the aggregator is built: a channel gets its
/// override from [`with_channel_capacity`](Self::with_channel_capacity), or
/// the default.
#[derive(Debug, Clone)]
pub struct SeriesAggregator {
    default_capacity: usize,
    capacities:       HashMap<String, usize>,
    buffers:          HashMap<String, RollingBuffer>,
}

impl SeriesAggregator {
    pub fn new(default_capacity: usize) -> Self {
        Self {
            default_capacity,
            capacities: HashMap::new(),
            buffers: HashMap::new(),
        }
    }

    /// Fix the capacity of `channel` to `capacity` instead of the default.
    /// An existing buffer keeps its most recent `capacity` points.
    #[must_use]
    pub fn with_channel_capacity(mut self, channel: impl Into<String>, capacity: usize) -> Self {
        let channel = channel.into();
        if let Some(buf) = self.buffers.get_mut(&channel) {
            let mut resized = RollingBuffer::new(capacity);
            resized.replace(buf.iter().cloned());
            *buf = resized;
        }
        self.capacities.insert(channel, capacity);
        self
    }

    /// Create empty buffers for channels known up front.
    #[must_use]
    pub fn with_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for channel in channels {
            let channel = channel.into();
            self.buffer_mut(&channel);
        }
        self
    }

    /// Record a sample. Absent or non-numeric values are dropped silently;
    /// the return value reports whether anything was appended.
    pub fn push(&mut self, channel: &str, value: impl SampleValue, label: Option<&str>) -> bool {
        let Some(v) = value.to_sample() else {
            trace!(channel, "dropping non-numeric sample");
            return false;
        };
        self.buffer_mut(channel).push(v, label.unwrap_or_default());
        true
    }

    /// Replace a channel's buffer with a historical batch.
    ///
    /// Values pair positionally with labels (missing labels become empty).
    /// Invalid values are dropped with their label, then only the most
    /// recent `capacity` points are kept.
    pub fn seed<V, L>(
        &mut self,
        channel: &str,
        values: impl IntoIterator<Item = V>,
        labels: impl IntoIterator<Item = L>,
    ) where
        V: SampleValue,
        L: Into<String>,
    {
        let mut labels = labels.into_iter();
        let points: Vec<Point> = values
            .into_iter()
            .filter_map(|value| {
                let label = labels.next().map(Into::into).unwrap_or_default();
                value.to_sample().map(|value| Point { value, label })
            })
            .collect();

        trace!(channel, kept = points.len(), "seeding series");
        self.buffer_mut(channel).replace(points);
    }

    /// Copy of the current contents; empty for unknown channels.
    pub fn snapshot(&self, channel: &str) -> SeriesSnapshot {
        let Some(buf) = self.buffers.get(channel) else {
            return SeriesSnapshot::default();
        };
        let (values, labels) = buf.iter().map(|p| (p.value, p.label.clone())).unzip();
        SeriesSnapshot { values, labels }
    }

    /// Arithmetic mean of the values currently held, `None` when empty.
    pub fn mean(&self, channel: &str) -> Option<f64> {
        self.buffers.get(channel).and_then(RollingBuffer::mean)
    }

    pub fn stats(&self, channel: &str) -> Option<SeriesStats> {
        let buf = self.buffers.get(channel)?;
        let mean = buf.mean()?;
        let (min, max) = buf
            .values()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(SeriesStats {
            count: buf.len(),
            mean,
            min,
            max,
        })
    }

    /// Last recorded value and its label.
    pub fn latest(&self, channel: &str) -> Option<(f64, &str)> {
        self.buffers
            .get(channel)
            .and_then(RollingBuffer::last)
            .map(|p| (p.value, p.label.as_str()))
    }

    pub fn capacity(&self, channel: &str) -> usize {
        self.capacities
            .get(channel)
            .copied()
            .unwrap_or(self.default_capacity)
    }

    pub fn len(&self, channel: &str) -> usize {
        self.buffers.get(channel).map_or(0, RollingBuffer::len)
    }

    /// Empty a channel's buffer, keeping its capacity.
    pub fn clear(&mut self, channel: &str) {
        if let Some(buf) = self.buffers.get_mut(channel) {
            buf.clear();
        }
    }

    /// Channels that have a buffer, in no particular order.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.buffers.keys().map(String::as_str)
    }

    fn buffer_mut(&mut self, channel: &str) -> &mut RollingBuffer {
        let capacity = self.capacity(channel);
        self.buffers
            .entry(channel.to_string())
            .or_insert_with(|| RollingBuffer::new(capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEMP: &str = "temperature";

    fn filled(capacity: usize, values: &[f64]) -> SeriesAggregator {
        let mut agg = SeriesAggregator::new(capacity);
        for (i, v) in values.iter().enumerate() {
            agg.push(TEMP, *v, Some(format!("t{i}").as_str()));
        }
        agg
    }

    #[test]
    fn capacity_three_scenario() {
        let agg = filled(3, &[21.5, 22.0, 23.1, 19.8]);
        assert_eq!(agg.snapshot(TEMP).values, [22.0, 23.1, 19.8]);
        let mean = agg.mean(TEMP).unwrap();
        assert!((mean - 21.633_333).abs() < 1e-5, "mean was {mean}");
    }

    #[test]
    fn absent_value_is_skipped() {
        let mut agg = SeriesAggregator::new(5);
        assert!(agg.push(TEMP, 10.0, None));
        assert!(!agg.push(TEMP, None::<f64>, None));
        assert!(agg.push(TEMP, 20.0, None));
        let snap = agg.snapshot(TEMP);
        assert_eq!(snap.values, [10.0, 20.0]);
        assert_eq!(snap.labels, ["", ""]);
    }

    #[test]
    fn non_numeric_leaves_buffer_unchanged() {
        let mut agg = filled(4, &[1.0, 2.0]);
        let before = agg.snapshot(TEMP);
        agg.push(TEMP, "not-a-number", Some("x"));
        agg.push(TEMP, &json!(null), Some("y"));
        agg.push(TEMP, f64::NAN, Some("z"));
        assert_eq!(agg.snapshot(TEMP), before);
    }

    #[test]
    fn fifo_eviction_keeps_last_capacity() {
        let cap = 5;
        let k = 7;
        let values: Vec<f64> = (0..cap + k).map(|i| i as f64).collect();
        let agg = filled(cap, &values);
        let snap = agg.snapshot(TEMP);
        assert_eq!(snap.values, values[k..]);
        assert_eq!(snap.labels.first().map(String::as_str), Some("t7"));
    }

    #[test]
    fn invariants_hold_after_every_push() {
        let mut agg = SeriesAggregator::new(3);
        let inputs = [json!(1), json!("2"), json!(null), json!("x"), json!(5.5), json!(6), json!(7)];
        for (i, v) in inputs.iter().enumerate() {
            agg.push(TEMP, v, (i % 2 == 0).then_some("even"));
            let snap = agg.snapshot(TEMP);
            assert!(snap.values.len() <= agg.capacity(TEMP));
            assert_eq!(snap.values.len(), snap.labels.len());
        }
        assert_eq!(agg.snapshot(TEMP).values, [5.5, 6.0, 7.0]);
    }

    #[test]
    fn mean_matches_snapshot() {
        let agg = filled(4, &[3.0, 8.0, 1.0, 4.0, 10.0]);
        let snap = agg.snapshot(TEMP);
        let expected = snap.values.iter().sum::<f64>() / snap.values.len() as f64;
        assert_eq!(agg.mean(TEMP), Some(expected));
        assert_eq!(agg.mean("humidity"), None);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let agg = filled(3, &[1.0, 2.0]);
        let mut snap = agg.snapshot(TEMP);
        snap.values.push(99.0);
        snap.labels.clear();
        assert_eq!(agg.snapshot(TEMP).values, [1.0, 2.0]);
        assert_eq!(agg.snapshot(TEMP).labels, ["t0", "t1"]);
    }

    #[test]
    fn seed_keeps_most_recent() {
        let mut agg = SeriesAggregator::new(4);
        agg.push(TEMP, 42.0, None);
        agg.seed(TEMP, [1, 2, 3, 4, 5, 6], ["a", "b", "c", "d", "e", "f"]);
        let snap = agg.snapshot(TEMP);
        assert_eq!(snap.values, [3.0, 4.0, 5.0, 6.0]);
        assert_eq!(snap.labels, ["c", "d", "e", "f"]);
    }

    #[test]
    fn seed_filters_invalid_with_their_labels() {
        let mut agg = SeriesAggregator::new(10);
        let values = [json!(1.5), json!(null), json!("2.5"), json!("bad")];
        agg.seed(TEMP, &values, ["a", "b", "c"]);
        let snap = agg.snapshot(TEMP);
        assert_eq!(snap.values, [1.5, 2.5]);
        assert_eq!(snap.labels, ["a", "c"]);
    }

    #[test]
    fn capacity_overrides() {
        let agg = SeriesAggregator::new(150)
            .with_channels(["humidity"])
            .with_channel_capacity("humidity", 2);
        assert_eq!(agg.capacity("humidity"), 2);
        assert_eq!(agg.capacity("light"), 150);
        assert_eq!(agg.len("humidity"), 0);
        assert_eq!(agg.channels().collect::<Vec<_>>(), ["humidity"]);
    }

    #[test]
    fn shrinking_a_filled_channel_keeps_recent_points() {
        let agg = filled(5, &[1.0, 2.0, 3.0, 4.0]).with_channel_capacity(TEMP, 2);
        let snap = agg.snapshot(TEMP);
        assert_eq!(snap.values, [3.0, 4.0]);
        assert_eq!(snap.labels, ["t2", "t3"]);
        assert_eq!(agg.capacity(TEMP), 2);

        let grown = agg.with_channel_capacity(TEMP, 10);
        assert_eq!(grown.snapshot(TEMP).values, [3.0, 4.0]);
        assert_eq!(grown.capacity(TEMP), 10);
    }

    #[test]
    fn stats_and_latest() {
        let mut agg = filled(10, &[4.0, -1.0, 7.0]);
        let stats = agg.stats(TEMP).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 7.0);
        assert!((stats.mean - 10.0 / 3.0).abs() < 1e-12);
        assert_eq!(agg.latest(TEMP), Some((7.0, "t2")));

        agg.clear(TEMP);
        assert_eq!(agg.stats(TEMP), None);
        assert_eq!(agg.latest(TEMP), None);
        assert_eq!(agg.capacity(TEMP), 10);
    }

    #[test]
    fn channels_are_independent() {
        let mut agg = SeriesAggregator::new(2);
        agg.push("a", 1.0, None);
        agg.push("b", 2.0, None);
        agg.push("b", 3.0, None);
        agg.push("b", 4.0, None);
        assert_eq!(agg.snapshot("a").values, [1.0]);
        assert_eq!(agg.snapshot("b").values, [3.0, 4.0]);
    }
}
