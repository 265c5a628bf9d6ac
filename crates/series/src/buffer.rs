use std::collections::VecDeque;

/// One recorded observation: a finite value and its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub value: f64,
    pub label: String,
}

/// Bounded FIFO history of one channel, backing sparklines and averages.
///
/// Values and labels live in the same deque, so they can never drift out of
/// alignment. `len() <= capacity()` holds after every call.
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    points:   VecDeque<Point>,
    capacity: usize,
}

impl RollingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest ones while over capacity.
    pub fn push(&mut self, value: f64, label: impl Into<String>) {
        self.points.push_back(Point {
            value,
            label: label.into(),
        });
        self.evict();
    }

    /// Replace the contents, keeping only the most recent `capacity` points.
    pub fn replace(&mut self, points: impl IntoIterator<Item = Point>) {
        self.points.clear();
        self.points.extend(points);
        self.evict();
    }

    fn evict(&mut self) {
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Most recent point.
    pub fn last(&self) -> Option<&Point> {
        self.points.back()
    }

    /// Unweighted mean of the current window, recomputed from scratch.
    pub fn mean(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.values().sum::<f64>() / self.points.len() as f64)
    }
}
