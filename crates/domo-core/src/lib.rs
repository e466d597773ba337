//! Sync layer between `domo-api` and UI consumers.
//!
//! The backend owns all real state; this crate keeps on-screen state
//! eventually consistent with it under fixed polling cadences:
//!
//! - **[`RosterController`]** — the device roster: initial load, manual
//!   refresh, and a 10 s silent loop. State is a closed
//!   [`RosterState`] sum type (`Loading` / `Loaded` / `Failed`)
//!   published through a `watch` channel.
//!
//! - **[`DetailController`]** — one device's sensors and actuators:
//!   concurrent three-way fetch fan-out, a 5 s silent loop, and
//!   reconcile-after-ack actuator commands. State is an immutable
//!   [`DetailSnapshot`] replaced wholesale on every update.
//!
//! - **[`PreferenceStore`]** — the persisted dark-mode flag with
//!   three-valued semantics and a reactive read side.
//!
//! Controllers are independent: no shared mutable state between
//! screens, and each owns at most one background polling loop,
//! restartable and cancelled on teardown.

pub mod detail;
pub mod error;
pub mod prefs;
pub mod roster;

pub use detail::{DETAIL_POLL_INTERVAL, DetailController, DetailSnapshot};
pub use error::CoreError;
pub use prefs::PreferenceStore;
pub use roster::{ROSTER_POLL_INTERVAL, RosterController, RosterState};

// Re-export the wire models at the crate root for ergonomics.
pub use domo_api::{
    ActuatorState, ApiClient, Device, SensorReading, SwitchCommand, TransportConfig,
};
