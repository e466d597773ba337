// ── Wire models for the backend REST API ──
//
// The backend returns these shapes verbatim (camelCase JSON), and the
// client layer displays them verbatim, so there is no separate domain
// model: wire types carry their own predicates.

use serde::{Deserialize, Serialize};

/// A registered ESP32 device.
///
/// Mutated only by gateway responses; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub mac_address: String,
    /// Current DHCP lease, if the backend knows one.
    pub ip_address: Option<String>,
    /// Connection status as reported by the heartbeat monitor:
    /// `"online"` or `"offline"`.
    pub status: String,
    pub is_enabled: bool,
    /// Last heartbeat timestamp (ISO 8601), opaque to this client.
    pub last_connection: Option<String>,
}

impl Device {
    /// Whether the device is currently reachable.
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online")
    }
}

/// A single sensor measurement.
///
/// The backend's `latest` endpoint returns one reading per sensor type;
/// within a device the readings are keyed by `sensor_type` and the
/// last-fetched value always wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub id: i64,
    /// e.g. `"temperatura"`, `"humedad"`, `"higrometro_suelo"`.
    pub sensor_type: String,
    pub value: f64,
    /// e.g. `"°C"`, `"%"`, `"ADC"`.
    pub unit: String,
    /// Measurement time (ISO 8601), opaque to this client.
    pub timestamp: String,
}

/// Current state of one actuator on a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActuatorState {
    pub id: i64,
    pub device_id: i64,
    /// e.g. `"led_azul"`, `"led_verde"`, `"bomba_riego"`.
    pub actuator_type: String,
    /// Raw state string from the backend. Anything outside the active
    /// set ("ON"/"OPEN", case-insensitive) counts as inactive.
    pub state: String,
    pub updated_at: String,
}

impl ActuatorState {
    /// Whether the actuator is currently active.
    pub fn is_active(&self) -> bool {
        self.state.eq_ignore_ascii_case("ON") || self.state.eq_ignore_ascii_case("OPEN")
    }

    /// Human-readable name for the actuator type.
    ///
    /// Known types get their proper Spanish names; unknown types fall
    /// back to underscores-to-spaces with a capitalized first letter.
    pub fn display_name(&self) -> String {
        match self.actuator_type.to_lowercase().as_str() {
            "led_azul" => "LED Azul".to_owned(),
            "led_verde" => "LED Verde".to_owned(),
            "bomba_riego" => "Bomba de Riego".to_owned(),
            _ => {
                let spaced = self.actuator_type.replace('_', " ");
                let mut chars = spaced.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => spaced,
                }
            }
        }
    }
}

/// The closed set of commands an actuator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwitchCommand {
    On,
    Off,
}

impl SwitchCommand {
    /// Confirmation verb shown to the user after the backend acks.
    pub fn action_text(self) -> &'static str {
        match self {
            Self::On => "encendido",
            Self::Off => "apagado",
        }
    }
}

/// Outbound actuator command. The backend forwards it to the device
/// over MQTT; it is never persisted client-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActuatorCommand {
    pub device_id: i64,
    pub actuator_type: String,
    pub command: SwitchCommand,
}
