use std::fmt;

/// Link state between the dashboard and the push server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    /// Carries the reason reported by the transport.
    Disconnected(String),
    Reconnecting,
    /// Last connection attempt failed.
    Error(String),
}

impl ConnectionStatus {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connecting       => f.write_str("connecting"),
            ConnectionStatus::Connected        => f.write_str("connected"),
            ConnectionStatus::Disconnected(r)  => write!(f, "disconnected: {r}"),
            ConnectionStatus::Reconnecting     => f.write_str("reconnecting"),
            ConnectionStatus::Error(msg)       => write!(f, "connection error: {msg}"),
        }
    }
}
