#![allow(clippy::unwrap_used)]
// Behavior tests for `DetailController` against a wiremock backend.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domo_core::{ApiClient, DetailController, SwitchCommand};

const DEVICE_ID: i64 = 7;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Arc<ApiClient>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let gateway = Arc::new(ApiClient::with_client(reqwest::Client::new(), base_url));
    (server, gateway)
}

fn device_json() -> serde_json::Value {
    json!({
        "id": DEVICE_ID,
        "name": "ESP32-Jardín",
        "macAddress": "aa:bb:cc:dd:ee:ff",
        "ipAddress": "192.168.8.50",
        "status": "online",
        "isEnabled": true,
        "lastConnection": "2024-06-15T10:30:00Z"
    })
}

fn readings_json() -> serde_json::Value {
    json!({
        "temperatura": {
            "id": 101,
            "sensorType": "temperatura",
            "value": 23.5,
            "unit": "°C",
            "timestamp": "2024-06-15T10:30:00Z"
        }
    })
}

fn actuator_json(id: i64, actuator_type: &str, state: &str) -> serde_json::Value {
    json!({
        "id": id,
        "deviceId": DEVICE_ID,
        "actuatorType": actuator_type,
        "state": state,
        "updatedAt": "2024-06-15T10:30:00Z"
    })
}

async fn mount_device(server: &MockServer, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(device_json())
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("GET"))
        .and(path(format!("/api/devices/{DEVICE_ID}")))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_readings(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/sensors/device/{DEVICE_ID}/latest")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_actuators(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/actuators/device/{DEVICE_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_all_ok(server: &MockServer) {
    mount_device(server, 200).await;
    mount_readings(server, readings_json()).await;
    mount_actuators(server, json!([actuator_json(11, "led_azul", "OFF")])).await;
}

// ── Initial load ────────────────────────────────────────────────────

#[tokio::test]
async fn load_applies_all_three_results() {
    let (server, gateway) = setup().await;
    mount_all_ok(&server).await;

    let controller = DetailController::new(gateway, DEVICE_ID);
    controller.load().await;

    let snap = controller.snapshot();
    assert!(!snap.loading);
    assert_eq!(snap.error, None);
    assert_eq!(snap.device.as_ref().map(|d| d.id), Some(DEVICE_ID));
    assert_eq!(snap.sensor_readings["temperatura"].value, 23.5);
    assert_eq!(snap.actuator_states.len(), 1);
}

#[tokio::test]
async fn load_fails_fast_when_the_device_fetch_fails() {
    let (server, gateway) = setup().await;
    mount_device(&server, 500).await;
    // The secondary fetches would succeed -- their results must still
    // be discarded.
    mount_readings(&server, readings_json()).await;
    mount_actuators(&server, json!([actuator_json(11, "led_azul", "ON")])).await;

    let controller = DetailController::new(gateway, DEVICE_ID);
    controller.load().await;

    let snap = controller.snapshot();
    assert_eq!(snap.error.as_deref(), Some("Error 500: Internal Server Error"));
    assert!(!snap.loading);
    assert_eq!(snap.device, None);
    assert!(snap.sensor_readings.is_empty());
    assert!(snap.actuator_states.is_empty());
}

#[tokio::test]
async fn load_swallows_secondary_failures() {
    let (server, gateway) = setup().await;
    mount_device(&server, 200).await;
    // Readings and actuators both 404 -- no mocks mounted for them.

    let controller = DetailController::new(gateway, DEVICE_ID);
    controller.load().await;

    let snap = controller.snapshot();
    assert_eq!(snap.error, None);
    assert!(snap.device.is_some());
    assert!(snap.sensor_readings.is_empty());
    assert!(snap.actuator_states.is_empty());
}

#[tokio::test]
async fn retry_after_failure_clears_the_error() {
    let (server, gateway) = setup().await;
    mount_device(&server, 500).await;

    let controller = DetailController::new(gateway, DEVICE_ID);
    controller.load().await;
    assert!(controller.snapshot().error.is_some());

    server.reset().await;
    mount_all_ok(&server).await;

    controller.load().await;
    let snap = controller.snapshot();
    assert_eq!(snap.error, None);
    assert!(snap.device.is_some());
}

// ── Manual refresh ──────────────────────────────────────────────────

#[tokio::test]
async fn manual_refresh_has_no_fail_fast_short_circuit() {
    let (server, gateway) = setup().await;
    mount_device(&server, 500).await;
    mount_readings(&server, readings_json()).await;
    mount_actuators(&server, json!([actuator_json(11, "led_azul", "ON")])).await;

    let controller = DetailController::new(gateway, DEVICE_ID);
    controller.refresh().await;

    // The failed device fetch does not discard the secondary results,
    // and no screen-level error is raised.
    let snap = controller.snapshot();
    assert!(!snap.refreshing);
    assert_eq!(snap.error, None);
    assert_eq!(snap.device, None);
    assert_eq!(snap.sensor_readings.len(), 1);
    assert_eq!(snap.actuator_states.len(), 1);
}

// ── Silent polling ──────────────────────────────────────────────────

#[tokio::test]
async fn silent_poll_applies_data_without_touching_flags() {
    let (server, gateway) = setup().await;
    mount_all_ok(&server).await;

    let controller =
        DetailController::with_interval(gateway, DEVICE_ID, Duration::from_millis(40));
    controller.load().await;

    server.reset().await;
    mount_device(&server, 200).await;
    mount_readings(
        &server,
        json!({
            "temperatura": {
                "id": 150,
                "sensorType": "temperatura",
                "value": 25.0,
                "unit": "°C",
                "timestamp": "2024-06-15T10:31:00Z"
            }
        }),
    )
    .await;
    mount_actuators(&server, json!([actuator_json(11, "led_azul", "ON")])).await;

    controller.start_polling();
    let mut rx = controller.subscribe();
    rx.mark_unchanged();
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("poll loop never fetched")
        .unwrap();
    // Let the full cycle land before asserting.
    tokio::time::sleep(Duration::from_millis(80)).await;
    controller.stop_polling();

    let snap = controller.snapshot();
    assert!(!snap.loading);
    assert!(!snap.refreshing);
    assert_eq!(snap.sensor_readings["temperatura"].value, 25.0);
    assert!(snap.actuator_states[0].is_active());
}

#[tokio::test]
async fn silent_poll_failure_leaves_the_previous_snapshot() {
    let (server, gateway) = setup().await;
    mount_all_ok(&server).await;

    let controller =
        DetailController::with_interval(gateway, DEVICE_ID, Duration::from_millis(40));
    controller.load().await;
    let before = controller.snapshot();

    server.reset().await; // every fetch now 404s

    controller.start_polling();
    tokio::time::sleep(Duration::from_millis(150)).await;
    controller.stop_polling();

    assert_eq!(controller.snapshot(), before);
}

// ── Actuator commands ───────────────────────────────────────────────

#[tokio::test]
async fn command_reconciles_from_a_fresh_server_fetch() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/actuators/command"))
        .and(body_json(json!({
            "deviceId": DEVICE_ID,
            "actuatorType": "led_azul",
            "command": "ON"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(actuator_json(11, "led_azul", "ON")),
        )
        .expect(1)
        .mount(&server)
        .await;

    // The re-fetch reflects a server-side effect on another actuator
    // too -- the snapshot must mirror this list, not a locally flipped
    // flag.
    mount_actuators(
        &server,
        json!([
            actuator_json(11, "led_azul", "ON"),
            actuator_json(12, "led_verde", "OFF"),
        ]),
    )
    .await;

    let controller = DetailController::new(gateway, DEVICE_ID);
    controller.send_command("led_azul", SwitchCommand::On).await;

    let snap = controller.snapshot();
    assert_eq!(snap.actuator_states.len(), 2);
    assert!(snap.actuator_states[0].is_active());
    assert_eq!(snap.message.as_deref(), Some("LED Azul encendido"));
}

#[tokio::test]
async fn off_command_uses_the_deactivation_text() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/actuators/command"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(actuator_json(13, "bomba_riego", "OFF")),
        )
        .mount(&server)
        .await;
    mount_actuators(&server, json!([actuator_json(13, "bomba_riego", "OFF")])).await;

    let controller = DetailController::new(gateway, DEVICE_ID);
    controller
        .send_command("bomba_riego", SwitchCommand::Off)
        .await;

    assert_eq!(
        controller.snapshot().message.as_deref(),
        Some("Bomba de Riego apagado")
    );
}

#[tokio::test]
async fn command_failure_sets_the_message_and_keeps_the_list() {
    let (server, gateway) = setup().await;
    mount_all_ok(&server).await;

    let controller = DetailController::new(gateway, DEVICE_ID);
    controller.load().await;
    let list_before = controller.snapshot().actuator_states;

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/actuators/command"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    controller.send_command("led_azul", SwitchCommand::On).await;

    let snap = controller.snapshot();
    assert_eq!(
        snap.message.as_deref(),
        Some("Error: Error 503: Service Unavailable")
    );
    assert_eq!(snap.actuator_states, list_before);
}

#[tokio::test]
async fn a_second_message_overwrites_a_pending_one() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/actuators/command"))
        .and(body_json(json!({
            "deviceId": DEVICE_ID,
            "actuatorType": "led_azul",
            "command": "ON"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(actuator_json(11, "led_azul", "ON")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/actuators/command"))
        .and(body_json(json!({
            "deviceId": DEVICE_ID,
            "actuatorType": "led_verde",
            "command": "ON"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(actuator_json(12, "led_verde", "ON")),
        )
        .mount(&server)
        .await;
    mount_actuators(
        &server,
        json!([
            actuator_json(11, "led_azul", "ON"),
            actuator_json(12, "led_verde", "ON"),
        ]),
    )
    .await;

    let controller = DetailController::new(gateway, DEVICE_ID);
    controller.send_command("led_azul", SwitchCommand::On).await;
    controller.send_command("led_verde", SwitchCommand::On).await;

    assert_eq!(
        controller.snapshot().message.as_deref(),
        Some("LED Verde encendido")
    );
}

#[tokio::test]
async fn clear_message_resets_to_none() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/actuators/command"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(actuator_json(11, "led_azul", "ON")),
        )
        .mount(&server)
        .await;
    mount_actuators(&server, json!([actuator_json(11, "led_azul", "ON")])).await;

    let controller = DetailController::new(gateway, DEVICE_ID);
    controller.send_command("led_azul", SwitchCommand::On).await;
    assert!(controller.snapshot().message.is_some());

    controller.clear_message();
    assert_eq!(controller.snapshot().message, None);
}
