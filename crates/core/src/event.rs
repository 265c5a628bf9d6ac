use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::sample::SensorSample;

/// All messages (events) that can flow from the push feed into the dashboard.
///
/// On the wire each event is one JSON object, `{"event": <name>, "data": <payload>}`.
/// The Spanish event names used by the Flask server are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Message {
    // ── Connection ────────────────────────────────────────────────────────────
    /// Transport connected.
    #[serde(alias = "connect")]
    Connected,
    /// Transport lost, with the reason reported by the client.
    #[serde(alias = "disconnect")]
    Disconnected(String),
    /// Connection attempt failed.
    ConnectError(String),
    #[serde(alias = "reconnect_attempt")]
    Reconnecting,
    #[serde(alias = "reconnect")]
    Reconnected,

    // ── Server pushes ─────────────────────────────────────────────────────────
    /// Bootstrap payload sent once after connecting.
    #[serde(alias = "datos_iniciales")]
    InitialData(InitialData),
    /// Gateway identifier changed.
    GatewayIp(GatewayInfo),
    /// A node reported its position.
    #[serde(alias = "ubicacion_nodo")]
    NodeLocation(LocationUpdate),
    /// A new reading was stored.
    #[serde(alias = "nuevo_dato")]
    NewSample(SensorSample),

    // ── Internal ──────────────────────────────────────────────────────────────
    /// Graceful shutdown requested.
    #[serde(skip)]
    Shutdown,
}

/// Bootstrap batch: gateway id, historical rows and known node positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialData {
    /// `None` when the key is absent; `Some(None)` when the server sent null.
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub gateway_ip: Option<Option<String>>,
    /// Historical readings, in any order.
    pub rows: Vec<SensorSample>,
    /// Last known position per node id.
    pub locations: HashMap<String, LocationUpdate>,
    /// Node ids known to the server, in display order.
    pub nodes: Vec<String>,
}

/// Gateway change. A payload without `ip` leaves the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayInfo {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub ip: Option<Option<String>>,
}

/// Keeps an explicit `null` apart from a missing key: a key that is present
/// always decodes to `Some`, and `#[serde(default)]` covers the missing case.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Position report. Coordinates stay raw and are validated by the consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationUpdate {
    #[serde(rename = "nodeId", alias = "node_id")]
    pub node_id: Option<String>,
    pub lat: Option<Value>,
    pub lon: Option<Value>,
}
