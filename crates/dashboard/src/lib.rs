//! Dashboard state: overall and per-node rolling series, the readings
//! table, the node map registry and their text readouts.

pub mod dashboard;
pub mod nodes;
pub mod render;
pub mod run;
pub mod table;

pub use dashboard::{Dashboard, Refresh};
pub use nodes::{Bounds, NodeInfo, NodeRegistry};
pub use run::{run, run_with};
pub use table::{ReadingRow, ReadingTable};
