//! Text readouts shown next to charts, in table cells and on map markers.

use std::fmt::Display;

use agro_core::sample::parse_label;
use agro_core::Channel;
use chrono::{Local, TimeZone};

/// Shown when a readout has no value yet.
pub const PLACEHOLDER: &str = "—";
/// Shown in a table cell for a field the node did not send.
pub const EMPTY_CELL: &str = "-";

/// Running average readout for a channel, e.g. `"21.6°C"`.
pub fn average_readout(channel: Channel, mean: Option<f64>) -> String {
    let Some(v) = mean else {
        return PLACEHOLDER.to_string();
    };
    match channel {
        Channel::Temperature  => format!("{v:.1}°C"),
        Channel::Humidity     => format!("{v:.1}%"),
        Channel::Light        => format!("{v:.1}"),
        Channel::SoilMoisture => format!("{v:.0}"),
        Channel::Percentage   => format!("{v:.0}%"),
    }
}

/// Fixed-precision table cell.
pub fn cell(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None    => EMPTY_CELL.to_string(),
    }
}

/// Light column: lux and percentage share one cell.
pub fn light_cell(light: Option<f64>, percentage: Option<f64>) -> String {
    match (light, percentage) {
        (Some(l), Some(p)) => format!("{l:.2} - {p:.0}%"),
        (Some(l), None)    => format!("{l:.2}"),
        (None, Some(p))    => format!("{p:.0}%"),
        (None, None)       => EMPTY_CELL.to_string(),
    }
}

/// Gateway identifier, displayed verbatim.
pub fn gateway(ip: Option<&str>) -> String {
    match ip {
        Some(ip) if !ip.is_empty() => ip.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// `HH:MM:SS` of a label in `tz`. Labels that do not parse are shown as-is.
pub fn clock_time<Tz>(label: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(raw) = label.filter(|l| !l.is_empty()) else {
        return PLACEHOLDER.to_string();
    };
    match parse_label(raw) {
        Some(t) => t.with_timezone(tz).format("%H:%M:%S").to_string(),
        None    => raw.to_string(),
    }
}

/// [`clock_time`] in the machine's local zone.
pub fn local_clock_time(label: Option<&str>) -> String {
    clock_time(label, &Local)
}

/// Marker popup text.
pub fn popup(node_id: &str, lat: f64, lon: f64) -> String {
    format!("Node {node_id} lat: {lat:.6} lon: {lon:.6}")
}
