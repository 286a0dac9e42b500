// Response types for the LINE_X API.

use serde::{Deserialize, Serialize};

/// A LINE_X device, as it appears under `roomsAndDevices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceX {
    pub serial_number: String,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub connection: Option<Connection>,
    #[serde(default)]
    pub battery_state: Option<String>,
    #[serde(default)]
    pub child_lock_enabled: Option<bool>,
    #[serde(default)]
    pub temperature_as_measured: Option<f64>,
    #[serde(default)]
    pub temperature_offset: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Connectivity of a LINE_X device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub state: String,
}

/// One room's entry in `roomsAndDevices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAndDevices {
    pub room_id: i64,
    pub room_name: String,
    #[serde(default)]
    pub devices: Vec<DeviceX>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `homes/{id}/roomsAndDevices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsAndDevices {
    #[serde(default)]
    pub rooms: Vec<RoomAndDevices>,
    #[serde(default)]
    pub other_devices: Vec<DeviceX>,
}

/// A wrapped scalar value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueHolder<T> {
    pub value: T,
}

/// The active setting of a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSetting {
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub temperature: Option<ValueHolder<f64>>,
}

/// Live measurements of a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDataPoints {
    #[serde(default)]
    pub inside_temperature: Option<ValueHolder<f64>>,
    #[serde(default)]
    pub humidity: Option<Percentage>,
}

/// A percentage value holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Percentage {
    pub percentage: f64,
}

/// `homes/{id}/rooms/{room}` — current state of a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomState {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub setting: Option<RoomSetting>,
    #[serde(default)]
    pub sensor_data_points: Option<SensorDataPoints>,
    #[serde(default)]
    pub open_window: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
