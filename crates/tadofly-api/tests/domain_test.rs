#![allow(clippy::unwrap_used)]
// Domain-layer tests: dialect selection and a slice of the zone/room
// methods over mock payloads.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tadofly_api::my::models::Presence;
use tadofly_api::{HomeApi, HopsClient, MyClient};

#[tokio::test]
async fn pre_line_x_home_selects_the_my_dialect() {
    let server = MockServer::start().await;
    let conn = common::activated_connection(&server).await;

    let api = HomeApi::from_connection(conn).unwrap();
    assert!(matches!(api, HomeApi::My(_)));
}

#[tokio::test]
async fn line_x_home_selects_the_hops_dialect() {
    let server = MockServer::start().await;
    let conn = common::activated_connection_with_home(
        &server,
        json!({ "id": 1234, "generation": "LINE_X" }),
    )
    .await;

    let api = HomeApi::from_connection(conn).unwrap();
    assert!(matches!(api, HomeApi::Hops(_)));
}

#[tokio::test]
async fn get_zones_parses_the_zone_list() {
    let server = MockServer::start().await;
    let conn = common::activated_connection(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/homes/1234/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "name": "Living Room",
                "type": "HEATING",
                "devices": [{
                    "deviceType": "RU02",
                    "serialNo": "RU0123456789",
                    "connectionState": { "value": true },
                }],
            },
            { "id": 2, "name": "Bathroom", "type": "HEATING" },
        ])))
        .mount(&server)
        .await;

    let mut client = MyClient::from_connection(conn);
    let zones = client.get_zones().await.unwrap();

    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].name, "Living Room");
    assert_eq!(zones[0].devices.len(), 1);
    assert_eq!(zones[0].devices[0].serial_no, "RU0123456789");
    assert_eq!(zones[1].zone_type.as_deref(), Some("HEATING"));
    assert!(zones[1].devices.is_empty());
}

#[tokio::test]
async fn change_presence_puts_the_presence_lock() {
    let server = MockServer::start().await;
    let conn = common::activated_connection(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/homes/1234/presenceLock"))
        .and(body_json(json!({ "homePresence": "AWAY" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = MyClient::from_connection(conn);
    client.change_presence(Presence::Away).await.unwrap();
}

#[tokio::test]
async fn get_home_state_parses_presence() {
    let server = MockServer::start().await;
    let conn = common::activated_connection(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/homes/1234/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "presence": "HOME",
            "presenceLocked": false,
        })))
        .mount(&server)
        .await;

    let mut client = MyClient::from_connection(conn);
    let state = client.get_home_state().await.unwrap();

    assert_eq!(state.presence, Presence::Home);
    assert_eq!(state.presence_locked, Some(false));
}

#[tokio::test]
async fn get_temp_offset_hits_the_device_domain() {
    let server = MockServer::start().await;
    let conn = common::activated_connection(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/devices/RU0123456789/temperatureOffset"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "celsius": -1.5, "fahrenheit": -2.7 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut client = MyClient::from_connection(conn);
    let offset = client.get_temp_offset("RU0123456789").await.unwrap();

    assert!((offset.celsius - (-1.5)).abs() < f64::EPSILON);
}

#[tokio::test]
async fn hops_devices_flatten_rooms_and_other_devices() {
    let server = MockServer::start().await;
    let conn = common::activated_connection_with_home(
        &server,
        json!({ "id": 1234, "generation": "LINE_X" }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/hops/homes/1234/roomsAndDevices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rooms": [
                {
                    "roomId": 1,
                    "roomName": "Living Room",
                    "devices": [
                        { "serialNumber": "VA1", "type": "VA04" },
                        { "serialNumber": "VA2", "type": "VA04" },
                    ],
                },
            ],
            "otherDevices": [{ "serialNumber": "IB1", "type": "IB01" }],
        })))
        .mount(&server)
        .await;

    let mut client = HopsClient::from_connection(conn);
    let devices = client.get_devices().await.unwrap();

    let serials: Vec<&str> = devices.iter().map(|d| d.serial_number.as_str()).collect();
    assert_eq!(serials, ["VA1", "VA2", "IB1"]);
}

#[tokio::test]
async fn hops_set_temp_offset_patches_the_device() {
    let server = MockServer::start().await;
    let conn = common::activated_connection_with_home(
        &server,
        json!({ "id": 1234, "generation": "LINE_X" }),
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path("/hops/homes/1234/roomsAndDevices/devices/VA1"))
        .and(body_json(json!({ "temperatureOffset": 2.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = HopsClient::from_connection(conn);
    client.set_temp_offset("VA1", 2.0).await.unwrap();
}

#[tokio::test]
async fn hops_room_states_parse_measurements() {
    let server = MockServer::start().await;
    let conn = common::activated_connection_with_home(
        &server,
        json!({ "id": 1234, "generation": "LINE_X" }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/hops/homes/1234/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "name": "Living Room",
                "setting": { "power": "ON", "temperature": { "value": 21.0 } },
                "sensorDataPoints": {
                    "insideTemperature": { "value": 20.3 },
                    "humidity": { "percentage": 45.0 },
                },
            },
        ])))
        .mount(&server)
        .await;

    let mut client = HopsClient::from_connection(conn);
    let rooms = client.get_room_states().await.unwrap();

    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].name, "Living Room");
    let sensors = rooms[0].sensor_data_points.as_ref().unwrap();
    assert!((sensors.inside_temperature.as_ref().unwrap().value - 20.3).abs() < f64::EPSILON);
}
