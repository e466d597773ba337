// Backend HTTP client
//
// Wraps `reqwest::Client` with URL construction, status checking, and
// body decoding. Every method is a single fallible round-trip: no
// retries here -- retry policy belongs to the sync controllers above.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{ActuatorCommand, ActuatorState, Device, SensorReading, SwitchCommand};
use crate::transport::TransportConfig;

/// Typed client for the backend REST API.
///
/// All operations are async and return `Result` -- nothing panics
/// across this boundary. Non-2xx statuses, transport failures, and
/// malformed bodies are all normalized into [`Error`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`
    /// (e.g. `http://192.168.8.136:8080`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Device endpoints ─────────────────────────────────────────────

    /// List every registered device, enabled or not.
    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        self.get(self.api_url("devices")).await
    }

    /// Fetch a single device by id.
    pub async fn get_device(&self, id: i64) -> Result<Device, Error> {
        self.get(self.api_url(&format!("devices/{id}"))).await
    }

    /// Flip a device's enabled flag. Returns the updated device.
    pub async fn set_device_enabled(&self, id: i64, enabled: bool) -> Result<Device, Error> {
        let mut url = self.api_url(&format!("devices/{id}/toggle"));
        url.query_pairs_mut()
            .append_pair("enabled", if enabled { "true" } else { "false" });
        self.put(url).await
    }

    // ── Sensor endpoints ─────────────────────────────────────────────

    /// Latest reading per sensor type for one device.
    pub async fn latest_readings(
        &self,
        device_id: i64,
    ) -> Result<HashMap<String, SensorReading>, Error> {
        self.get(self.api_url(&format!("sensors/device/{device_id}/latest")))
            .await
    }

    // ── Actuator endpoints ───────────────────────────────────────────

    /// Current state of every actuator on one device.
    pub async fn actuator_states(&self, device_id: i64) -> Result<Vec<ActuatorState>, Error> {
        self.get(self.api_url(&format!("actuators/device/{device_id}")))
            .await
    }

    /// Send an ON/OFF command to an actuator. Returns the acknowledged
    /// state of the commanded actuator only; callers wanting the full
    /// picture should re-fetch [`actuator_states`](Self::actuator_states).
    pub async fn send_actuator_command(
        &self,
        device_id: i64,
        actuator_type: &str,
        command: SwitchCommand,
    ) -> Result<ActuatorState, Error> {
        let body = ActuatorCommand {
            device_id,
            actuator_type: actuator_type.to_owned(),
            command,
        };
        self.post(self.api_url("actuators/command"), &body).await
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::decode(resp).await
    }

    /// Send a PUT request (no body) and decode the JSON response.
    async fn put<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self.http.put(url).send().await.map_err(Error::Transport)?;
        Self::decode(resp).await
    }

    /// Send a POST request with a JSON body and decode the response.
    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::decode(resp).await
    }

    /// Check the status, then decode the body.
    ///
    /// The status check comes first: an error page must never be fed to
    /// the deserializer and reported as a decode failure.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::from_status(status));
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Decode {
                message: format!("{e} (body preview: {preview:?})"),
            }
        })
    }
}
