//! Bounded live series for the dashboard: one FIFO buffer per channel with
//! on-demand statistics.

pub mod aggregator;
pub mod buffer;

pub use aggregator::{SeriesAggregator, SeriesSnapshot, SeriesStats};
pub use buffer::{Point, RollingBuffer};
