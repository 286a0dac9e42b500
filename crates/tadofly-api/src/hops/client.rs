// LINE_X domain methods
//
// Room- and device-level operations against hops.tado.com. Descriptors
// are built with `ApiRequest::line_x()`, so the logical `Change` action
// goes out as PATCH here.

use serde_json::json;
use tracing::debug;

use crate::client::Connection;
use crate::error::Error;
use crate::hops::models::{DeviceX, RoomAndDevices, RoomState, RoomsAndDevices};
use crate::request::{Action, ApiRequest};

/// Domain client for LINE_X homes.
pub struct HopsClient {
    conn: Connection,
}

impl HopsClient {
    /// Wrap an activated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    // ── Home ─────────────────────────────────────────────────────────

    /// Rooms and their devices (`GET homes/{id}/roomsAndDevices`).
    pub async fn get_rooms_and_devices(&mut self) -> Result<RoomsAndDevices, Error> {
        let request = ApiRequest {
            command: Some("roomsAndDevices".into()),
            ..ApiRequest::line_x()
        };
        self.conn.request_as(&request).await
    }

    /// All rooms of the home.
    pub async fn get_rooms(&mut self) -> Result<Vec<RoomAndDevices>, Error> {
        Ok(self.get_rooms_and_devices().await?.rooms)
    }

    /// Every device in the home, flattened across rooms plus the
    /// unassigned ones.
    pub async fn get_devices(&mut self) -> Result<Vec<DeviceX>, Error> {
        let rooms_and_devices = self.get_rooms_and_devices().await?;
        let mut devices: Vec<DeviceX> = rooms_and_devices
            .rooms
            .into_iter()
            .flat_map(|room| room.devices)
            .collect();
        devices.extend(rooms_and_devices.other_devices);
        Ok(devices)
    }

    /// Current state of every room (`GET homes/{id}/rooms`).
    pub async fn get_room_states(&mut self) -> Result<Vec<RoomState>, Error> {
        let request = ApiRequest {
            command: Some("rooms".into()),
            ..ApiRequest::line_x()
        };
        self.conn.request_as(&request).await
    }

    /// Current state of one room.
    pub async fn get_room_state(&mut self, room: i64) -> Result<RoomState, Error> {
        let request = ApiRequest {
            command: Some(format!("rooms/{room}")),
            ..ApiRequest::line_x()
        };
        self.conn.request_as(&request).await
    }

    // ── Quick actions ────────────────────────────────────────────────

    /// Boost heating in all rooms; expires after 30 minutes.
    pub async fn boost_all_heating(&mut self) -> Result<(), Error> {
        let request = ApiRequest {
            command: Some("quickActions/boost".into()),
            action: Action::Set,
            ..ApiRequest::line_x()
        };
        self.conn.request(&request).await?;
        Ok(())
    }

    /// All rooms off, frost protection only.
    pub async fn disable_all_heating(&mut self) -> Result<(), Error> {
        let request = ApiRequest {
            command: Some("quickActions/allOff".into()),
            action: Action::Set,
            ..ApiRequest::line_x()
        };
        self.conn.request(&request).await?;
        Ok(())
    }

    /// Drop every manual override and resume the schedules.
    pub async fn resume_all_schedules(&mut self) -> Result<(), Error> {
        let request = ApiRequest {
            command: Some("quickActions/resumeSchedule".into()),
            action: Action::Set,
            ..ApiRequest::line_x()
        };
        self.conn.request(&request).await?;
        Ok(())
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// Details for one device.
    pub async fn get_device_info(&mut self, device_id: &str) -> Result<DeviceX, Error> {
        let request = ApiRequest {
            command: Some(format!("devices/{device_id}")),
            ..ApiRequest::line_x()
        };
        self.conn.request_as(&request).await
    }

    /// Set the temperature offset on a device. Goes out as PATCH — the
    /// LINE_X translation of the logical `Change`.
    pub async fn set_temp_offset(&mut self, device_id: &str, offset: f64) -> Result<(), Error> {
        debug!(device_id, offset, "setting temperature offset");
        let request = ApiRequest {
            command: Some(format!("roomsAndDevices/devices/{device_id}")),
            action: Action::Change,
            payload: Some(json!({ "temperatureOffset": offset })),
            ..ApiRequest::line_x()
        };
        self.conn.request(&request).await?;
        Ok(())
    }

    /// Toggle the child lock on a device.
    pub async fn set_child_lock(&mut self, device_id: &str, child_lock: bool) -> Result<(), Error> {
        let request = ApiRequest {
            command: Some(format!("roomsAndDevices/devices/{device_id}")),
            action: Action::Change,
            payload: Some(json!({ "childLockEnabled": child_lock })),
            ..ApiRequest::line_x()
        };
        self.conn.request(&request).await?;
        Ok(())
    }
}
