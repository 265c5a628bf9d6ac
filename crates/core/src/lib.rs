pub mod coerce;
pub mod error;
pub mod event;
pub mod sample;
pub mod state;

pub use coerce::SampleValue;
pub use error::{DashError, Result};
pub use event::Message;
pub use sample::{Channel, SensorSample};
pub use state::ConnectionStatus;
