use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::SampleValue;

/// A measurement stream carried by sensor nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Temperature,
    Humidity,
    SoilMoisture,
    Light,
    Percentage,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::SoilMoisture,
        Channel::Light,
        Channel::Percentage,
    ];

    /// Stable key used to name the channel's rolling series.
    pub fn key(self) -> &'static str {
        match self {
            Channel::Temperature  => "temperature",
            Channel::Humidity     => "humidity",
            Channel::SoilMoisture => "soil_moisture",
            Channel::Light        => "light",
            Channel::Percentage   => "percentage",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// One reading as delivered by the push feed.
///
/// Numeric fields stay raw: upstream nodes omit fields or send strings, and
/// the decision whether a field is usable belongs to [`SampleValue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSample {
    pub id: Option<Value>,
    #[serde(rename = "nodeId", alias = "node_id")]
    pub node_id: Option<String>,
    #[serde(alias = "temperatura")]
    pub temperature: Option<Value>,
    #[serde(alias = "humedad")]
    pub humidity: Option<Value>,
    #[serde(rename = "soilMoisture", alias = "soil_moisture")]
    pub soil_moisture: Option<Value>,
    pub light: Option<Value>,
    pub percentage: Option<Value>,
    /// Unix seconds assigned by the gateway bridge.
    pub timestamp: Option<Value>,
    #[serde(rename = "createdAt", alias = "fecha_creacion")]
    pub created_at: Option<String>,
}

impl SensorSample {
    /// Raw field for `channel`, if the node sent one.
    pub fn field(&self, channel: Channel) -> Option<&Value> {
        match channel {
            Channel::Temperature  => self.temperature.as_ref(),
            Channel::Humidity     => self.humidity.as_ref(),
            Channel::SoilMoisture => self.soil_moisture.as_ref(),
            Channel::Light        => self.light.as_ref(),
            Channel::Percentage   => self.percentage.as_ref(),
        }
    }

    /// Coerced value for `channel`.
    pub fn value(&self, channel: Channel) -> Option<f64> {
        self.field(channel).to_sample()
    }

    /// Display label: `createdAt` verbatim, else `timestamp` as RFC 3339 UTC.
    pub fn label(&self) -> Option<String> {
        if let Some(created) = self.created_at.as_deref().filter(|s| !s.is_empty()) {
            return Some(created.to_string());
        }
        self.timestamp_utc()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Seconds used to order a historical batch; 0 when the sample carries no time.
    pub fn time_key(&self) -> f64 {
        if let Some(secs) = self.timestamp.to_sample().filter(|s| *s != 0.0) {
            return secs;
        }
        self.created_at
            .as_deref()
            .and_then(parse_label)
            .map(|t| t.timestamp_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }

    fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let secs = self.timestamp.to_sample().filter(|s| *s != 0.0)?;
        DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
    }
}

/// Parse a label produced by the backend or the feed.
///
/// Accepts RFC 3339, or `YYYY-MM-DD HH:MM:SS` (space or `T`) optionally
/// followed by a UTC zone name, which is read as UTC.
pub fn parse_label(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok((naive, rest)) = NaiveDateTime::parse_and_remainder(raw, fmt) {
            if matches!(rest.trim(), "" | "UTC" | "GMT" | "Z") {
                return Some(naive.and_utc());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_spanish_field_names() {
        let s: SensorSample = serde_json::from_value(json!({
            "id": 7,
            "nodeId": "N1",
            "temperatura": 21.5,
            "humedad": "40.2",
            "soil_moisture": null,
            "fecha_creacion": "2025-03-01 10:00:00 UTC"
        }))
        .unwrap();

        assert_eq!(s.node_id.as_deref(), Some("N1"));
        assert_eq!(s.value(Channel::Temperature), Some(21.5));
        assert_eq!(s.value(Channel::Humidity), Some(40.2));
        assert_eq!(s.field(Channel::SoilMoisture), None);
        assert_eq!(s.label().as_deref(), Some("2025-03-01 10:00:00 UTC"));
    }

    #[test]
    fn decodes_canonical_field_names() {
        let s: SensorSample = serde_json::from_value(json!({
            "nodeId": "N2",
            "soilMoisture": 512,
            "light": 830.25,
            "percentage": 64,
            "createdAt": "2025-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(s.value(Channel::SoilMoisture), Some(512.0));
        assert_eq!(s.value(Channel::Light), Some(830.25));
        assert_eq!(s.value(Channel::Percentage), Some(64.0));
        assert_eq!(s.value(Channel::Temperature), None);
    }

    #[test]
    fn label_falls_back_to_timestamp() {
        let s = SensorSample {
            timestamp: Some(json!(1_700_000_000)),
            ..Default::default()
        };
        assert_eq!(s.label().as_deref(), Some("2023-11-14T22:13:20.000Z"));
        assert_eq!(SensorSample::default().label(), None);
    }

    #[test]
    fn time_key_prefers_timestamp() {
        let s = SensorSample {
            timestamp: Some(json!(100)),
            created_at: Some("2025-03-01 10:00:00".into()),
            ..Default::default()
        };
        assert_eq!(s.time_key(), 100.0);

        let s = SensorSample {
            created_at: Some("1970-01-01 00:01:40 UTC".into()),
            ..Default::default()
        };
        assert_eq!(s.time_key(), 100.0);
        assert_eq!(SensorSample::default().time_key(), 0.0);
    }

    #[test]
    fn parse_label_formats() {
        let expected = DateTime::from_timestamp(1_740_823_200, 0).unwrap();
        assert_eq!(parse_label("2025-03-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_label("2025-03-01 10:00:00"), Some(expected));
        assert_eq!(parse_label("2025-03-01 10:00:00 UTC"), Some(expected));
        assert_eq!(parse_label("yesterday"), None);
    }

    #[test]
    fn channel_keys_round_trip() {
        for c in Channel::ALL {
            assert_eq!(Channel::from_key(c.key()), Some(c));
        }
        assert_eq!(Channel::from_key("pressure"), None);
    }
}
