// Response types for the pre-LINE_X API.
//
// Fields use `#[serde(default)]` liberally because the API is
// inconsistent about field presence across firmware generations;
// undocumented fields land in `extra`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The authenticated user, from `me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub homes: Vec<HomeRef>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reference to a home as it appears in the `me` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeRef {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// The home's root metadata document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Home {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    /// `"LINE_X"` on new-generation homes; absent or different otherwise.
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub date_time_zone: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Presence state of the home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Presence {
    Home,
    Away,
    Auto,
}

impl Presence {
    /// The wire spelling, as the API sends and expects it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Away => "AWAY",
            Self::Auto => "AUTO",
        }
    }
}

/// `homes/{id}/state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeState {
    pub presence: Presence,
    #[serde(default)]
    pub presence_locked: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A temperature in both units, as the API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Temperature {
    #[serde(default)]
    pub celsius: Option<f64>,
    #[serde(default)]
    pub fahrenheit: Option<f64>,
}

/// A percentage value holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Percentage {
    pub percentage: f64,
}

/// A wrapped scalar value (the API's `{"value": ...}` convention).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueHolder<T> {
    pub value: T,
}

/// `homes/{id}/weather`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    #[serde(default)]
    pub solar_intensity: Option<Percentage>,
    #[serde(default)]
    pub outside_temperature: Option<Temperature>,
    #[serde(default)]
    pub weather_state: Option<ValueHolder<String>>,
}

/// A device attached to the home, from `homes/{id}/devices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub device_type: Option<String>,
    pub serial_no: String,
    #[serde(default)]
    pub short_serial_no: Option<String>,
    #[serde(default)]
    pub current_fw_version: Option<String>,
    #[serde(default)]
    pub connection_state: Option<ValueHolder<bool>>,
    #[serde(default)]
    pub battery_state: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A zone, from `homes/{id}/zones`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: i64,
    pub name: String,
    #[serde(default, rename = "type")]
    pub zone_type: Option<String>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The active setting of a zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSetting {
    #[serde(default, rename = "type")]
    pub setting_type: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub temperature: Option<Temperature>,
}

/// `homes/{id}/zones/{zone}/state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneState {
    #[serde(default)]
    pub tado_mode: Option<String>,
    #[serde(default)]
    pub setting: Option<ZoneSetting>,
    #[serde(default)]
    pub activity_data_points: Option<serde_json::Value>,
    #[serde(default)]
    pub sensor_data_points: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `homes/{id}/zoneStates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStates {
    pub zone_states: HashMap<String, ZoneState>,
}

/// `homes/{id}/zones/{zone}/capabilities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[serde(default, rename = "type")]
    pub zone_type: Option<String>,
    #[serde(default)]
    pub temperatures: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `devices/{serial}/temperatureOffset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureOffset {
    pub celsius: f64,
    #[serde(default)]
    pub fahrenheit: Option<f64>,
}

/// Active schedule timetable reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub id: i64,
    #[serde(default, rename = "type")]
    pub timetable_type: Option<String>,
}

/// An Energy IQ tariff entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EiqTariff {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub tariff_in_cents: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One Energy IQ meter reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EiqMeterReading {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub reading: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Envelope around the meter-reading list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EiqMeterReadings {
    #[serde(default)]
    pub readings: Vec<EiqMeterReading>,
}

/// Boiler max output temperature, via the bridge-scoped home endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxOutputTemp {
    #[serde(default)]
    pub boiler_max_output_temperature_in_celsius: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
