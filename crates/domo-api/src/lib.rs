//! Async client for the domo backend REST API.
//!
//! The backend owns all real state and talks MQTT to the hardware; this
//! crate is the thin, typed HTTP boundary the rest of the workspace
//! consumes:
//!
//! - **[`ApiClient`]** — one method per endpoint (device roster, single
//!   device, enabled toggle, latest sensor readings, actuator states,
//!   actuator commands), each a single fallible round-trip.
//! - **[`Error`]** — every failure (non-2xx, transport, malformed body)
//!   normalized to a message-carrying variant; callers only ever branch
//!   on success/failure.
//! - **Wire models** ([`models`]) — `Device`, `SensorReading`,
//!   `ActuatorState`, `SwitchCommand`, with the domain predicates
//!   (`is_online`, `is_active`, display names) attached directly.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::{ActuatorCommand, ActuatorState, Device, SensorReading, SwitchCommand};
pub use transport::TransportConfig;
