// Pre-LINE_X domain methods
//
// Zone- and home-level operations against my.tado.com. Each method
// builds one `ApiRequest` descriptor and hands it to the connection's
// dispatcher; the connection stays accessible for token persistence and
// diagnostics.

use serde_json::json;
use tracing::debug;

use crate::client::Connection;
use crate::error::Error;
use crate::my::models::{
    Capabilities, Device, EiqMeterReading, EiqMeterReadings, EiqTariff, Home, HomeState,
    MaxOutputTemp, Presence, TemperatureOffset, Timetable, User, Weather, Zone, ZoneState,
    ZoneStates,
};
use crate::request::{Action, ApiRequest, Domain, Endpoint, Mode};

/// Domain client for pre-LINE_X homes.
pub struct MyClient {
    conn: Connection,
}

impl MyClient {
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

    /// The authenticated user (`GET me`).
    pub async fn get_me(&mut self) -> Result<User, Error> {
        let request = ApiRequest {
            domain: Domain::Me,
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// The home's root metadata document.
    pub async fn get_home(&mut self) -> Result<Home, Error> {
        let request = ApiRequest {
            command: Some(String::new()),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// Presence state of the home (`GET homes/{id}/state`).
    pub async fn get_home_state(&mut self) -> Result<HomeState, Error> {
        let request = ApiRequest {
            command: Some("state".into()),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// Lock the home's presence to the given value.
    pub async fn change_presence(&mut self, presence: Presence) -> Result<(), Error> {
        debug!(?presence, "changing presence");
        let request = ApiRequest {
            command: Some("presenceLock".into()),
            action: Action::Change,
            payload: Some(json!({ "homePresence": presence })),
            ..ApiRequest::new()
        };
        self.conn.request(&request).await?;
        Ok(())
    }

    /// Lock presence to HOME.
    pub async fn set_home(&mut self) -> Result<(), Error> {
        self.change_presence(Presence::Home).await
    }

    /// Lock presence to AWAY.
    pub async fn set_away(&mut self) -> Result<(), Error> {
        self.change_presence(Presence::Away).await
    }

    /// Release the presence lock (auto geofencing takes over).
    pub async fn set_auto(&mut self) -> Result<(), Error> {
        let request = ApiRequest {
            command: Some("presenceLock".into()),
            action: Action::Reset,
            ..ApiRequest::new()
        };
        self.conn.request(&request).await?;
        Ok(())
    }

    /// Weather at the home's location.
    pub async fn get_weather(&mut self) -> Result<Weather, Error> {
        let request = ApiRequest {
            command: Some("weather".into()),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// All devices attached to the home.
    pub async fn get_devices(&mut self) -> Result<Vec<Device>, Error> {
        let request = ApiRequest {
            command: Some("devices".into()),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    // ── Zones ────────────────────────────────────────────────────────

    /// All zones of the home.
    pub async fn get_zones(&mut self) -> Result<Vec<Zone>, Error> {
        let request = ApiRequest {
            command: Some("zones".into()),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// Current state of every zone, keyed by zone id.
    pub async fn get_zone_states(&mut self) -> Result<ZoneStates, Error> {
        let request = ApiRequest {
            command: Some("zoneStates".into()),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// Current state of one zone.
    pub async fn get_zone_state(&mut self, zone: i64) -> Result<ZoneState, Error> {
        let request = ApiRequest {
            command: Some(format!("zones/{zone}/state")),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// What the zone's hardware supports.
    pub async fn get_capabilities(&mut self, zone: i64) -> Result<Capabilities, Error> {
        let request = ApiRequest {
            command: Some(format!("zones/{zone}/capabilities")),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// The active schedule timetable of a zone.
    ///
    /// This endpoint expects the text/plain content-type quirk.
    pub async fn get_timetable(&mut self, zone: i64) -> Result<Timetable, Error> {
        let request = ApiRequest {
            command: Some(format!("zones/{zone}/schedule/activeTimetable")),
            mode: Mode::Plain,
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// Switch the active schedule timetable of a zone.
    pub async fn set_timetable(&mut self, zone: i64, timetable_id: i64) -> Result<Timetable, Error> {
        let request = ApiRequest {
            command: Some(format!("zones/{zone}/schedule/activeTimetable")),
            action: Action::Change,
            payload: Some(json!({ "id": timetable_id })),
            mode: Mode::Plain,
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// The temperature offset configured on a device.
    pub async fn get_temp_offset(&mut self, device_id: &str) -> Result<TemperatureOffset, Error> {
        let request = ApiRequest {
            domain: Domain::Devices,
            device: Some(device_id.to_owned()),
            command: Some("temperatureOffset".into()),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// Set the temperature offset on a device, in celsius.
    pub async fn set_temp_offset(
        &mut self,
        device_id: &str,
        offset: f64,
    ) -> Result<TemperatureOffset, Error> {
        debug!(device_id, offset, "setting temperature offset");
        let request = ApiRequest {
            domain: Domain::Devices,
            device: Some(device_id.to_owned()),
            command: Some("temperatureOffset".into()),
            action: Action::Change,
            payload: Some(json!({ "celsius": offset })),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// Toggle the child lock on a device.
    pub async fn set_child_lock(&mut self, device_id: &str, child_lock: bool) -> Result<(), Error> {
        let request = ApiRequest {
            domain: Domain::Devices,
            device: Some(device_id.to_owned()),
            command: Some("childLock".into()),
            action: Action::Change,
            payload: Some(json!({ "childLockEnabled": child_lock })),
            ..ApiRequest::new()
        };
        self.conn.request(&request).await?;
        Ok(())
    }

    // ── Energy IQ ────────────────────────────────────────────────────

    /// Tariff history from the energy-insights API.
    pub async fn get_eiq_tariffs(&mut self) -> Result<Vec<EiqTariff>, Error> {
        let request = ApiRequest {
            endpoint: Endpoint::Eiq,
            command: Some("tariffs".into()),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// Meter readings from the energy-insights API.
    pub async fn get_eiq_meter_readings(&mut self) -> Result<Vec<EiqMeterReading>, Error> {
        let request = ApiRequest {
            endpoint: Endpoint::Eiq,
            command: Some("meterReadings".into()),
            ..ApiRequest::new()
        };
        let readings: EiqMeterReadings = self.conn.request_as(&request).await?;
        Ok(readings.readings)
    }

    /// Submit a meter reading (whole units, no decimals).
    pub async fn set_eiq_meter_reading(&mut self, date: &str, reading: i64) -> Result<(), Error> {
        let request = ApiRequest {
            endpoint: Endpoint::Eiq,
            command: Some("meterReadings".into()),
            action: Action::Set,
            payload: Some(json!({ "date": date, "reading": reading })),
            ..ApiRequest::new()
        };
        self.conn.request(&request).await?;
        Ok(())
    }

    // ── Bridge-scoped home ───────────────────────────────────────────

    /// The boiler's maximum output temperature, via the bridge-scoped
    /// home endpoint (used before the home itself is fully set up).
    pub async fn get_boiler_max_output_temperature(
        &mut self,
        bridge_id: &str,
        auth_key: &str,
    ) -> Result<MaxOutputTemp, Error> {
        let request = ApiRequest {
            domain: Domain::HomeByBridge,
            device: Some(bridge_id.to_owned()),
            command: Some("boilerMaxOutputTemperature".into()),
            params: Some(vec![("authKey".into(), auth_key.to_owned())]),
            ..ApiRequest::new()
        };
        self.conn.request_as(&request).await
    }

    /// Set the boiler's maximum output temperature.
    pub async fn set_boiler_max_output_temperature(
        &mut self,
        bridge_id: &str,
        auth_key: &str,
        temperature_in_celsius: f64,
    ) -> Result<(), Error> {
        let request = ApiRequest {
            domain: Domain::HomeByBridge,
            device: Some(bridge_id.to_owned()),
            command: Some("boilerMaxOutputTemperature".into()),
            action: Action::Change,
            params: Some(vec![("authKey".into(), auth_key.to_owned())]),
            payload: Some(json!({
                "boilerMaxOutputTemperatureInCelsius": temperature_in_celsius,
            })),
            ..ApiRequest::new()
        };
        self.conn.request(&request).await?;
        Ok(())
    }
}
