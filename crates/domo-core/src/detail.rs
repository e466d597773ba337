// ── Device detail sync controller ──
//
// One controller per device id, fixed at creation. Owns the snapshot
// for the detail screen: device info, latest reading per sensor type,
// actuator states, status flags, and the transient user message.
//
// Every fetch cycle fans out the three requests concurrently and
// applies each result to the snapshot independently; resolution order
// across the three is unspecified. Only the initial load fail-fasts on
// the device fetch -- the device is the primary entity, and a detail
// screen without it is an error screen.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use domo_api::{ActuatorState, ApiClient, Device, SensorReading, SwitchCommand};

/// Default cadence of the silent detail refresh. Faster than the
/// roster's: sensor readings go stale quickly.
pub const DETAIL_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Observable state of the detail screen, replaced wholesale on every
/// update. `loading` and `refreshing` are never both true within one
/// fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailSnapshot {
    /// First load (or retry) in progress; the screen shows a spinner.
    pub loading: bool,
    /// Manual refresh in progress; content stays visible.
    pub refreshing: bool,
    pub device: Option<Device>,
    /// Latest reading per sensor type; last-fetched value wins.
    pub sensor_readings: HashMap<String, SensorReading>,
    pub actuator_states: Vec<ActuatorState>,
    /// Screen-level error (primary-entity load failure only).
    pub error: Option<String>,
    /// Transient user message; at most one pending, newer overwrites.
    pub message: Option<String>,
}

impl Default for DetailSnapshot {
    fn default() -> Self {
        Self {
            loading: true,
            refreshing: false,
            device: None,
            sensor_readings: HashMap::new(),
            actuator_states: Vec::new(),
            error: None,
            message: None,
        }
    }
}

/// Polling controller for a single device's detail screen.
#[derive(Clone)]
pub struct DetailController {
    inner: Arc<DetailInner>,
}

struct DetailInner {
    gateway: Arc<ApiClient>,
    device_id: i64,
    snapshot: watch::Sender<DetailSnapshot>,
    poll_interval: Duration,
    cancel: CancellationToken,
    poll_token: Mutex<CancellationToken>,
}

impl DetailController {
    /// Create a controller scoped to `device_id` with the default 5 s
    /// polling cadence. Polling does not start until
    /// [`start_polling`](Self::start_polling).
    pub fn new(gateway: Arc<ApiClient>, device_id: i64) -> Self {
        Self::with_interval(gateway, device_id, DETAIL_POLL_INTERVAL)
    }

    /// Create a controller with a custom polling cadence.
    pub fn with_interval(gateway: Arc<ApiClient>, device_id: i64, poll_interval: Duration) -> Self {
        let (snapshot, _) = watch::channel(DetailSnapshot::default());
        let cancel = CancellationToken::new();
        let poll_token = Mutex::new(cancel.child_token());
        Self {
            inner: Arc::new(DetailInner {
                gateway,
                device_id,
                snapshot,
                poll_interval,
                cancel,
                poll_token,
            }),
        }
    }

    /// The device this controller is bound to.
    pub fn device_id(&self) -> i64 {
        self.inner.device_id
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<DetailSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> DetailSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Initial load or user-initiated retry.
    ///
    /// Fans out the three fetches concurrently. A device-fetch failure
    /// sets the screen-level error and discards the other two results
    /// even if they succeeded; reading/actuator failures are swallowed
    /// and the previous values stay on screen.
    pub async fn load(&self) {
        let inner = &self.inner;
        inner.snapshot.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let (device_res, readings_res, actuators_res) = inner.fan_out().await;

        let device = match device_res {
            Ok(d) => d,
            Err(e) => {
                inner.snapshot.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(e.to_string());
                });
                return;
            }
        };

        inner.snapshot.send_modify(|s| s.device = Some(device));
        inner.apply_secondary(readings_res, actuators_res);
        inner.snapshot.send_modify(|s| s.loading = false);
    }

    /// Manual refresh: content stays visible, each of the three results
    /// is applied independently, and no failure short-circuits the
    /// others -- including a failed device fetch.
    pub async fn refresh(&self) {
        let inner = &self.inner;
        inner.snapshot.send_modify(|s| s.refreshing = true);
        inner.apply_cycle().await;
        inner.snapshot.send_modify(|s| s.refreshing = false);
    }

    /// Send an ON/OFF command to one actuator.
    ///
    /// Reconcile-after-ack: the switch is never flipped locally. On ack
    /// the full actuator list is re-fetched so server-side effects on
    /// other actuators are reflected too, and a confirmation message is
    /// set. On failure only the message changes.
    pub async fn send_command(&self, actuator_type: &str, command: SwitchCommand) {
        let inner = &self.inner;
        match inner
            .gateway
            .send_actuator_command(inner.device_id, actuator_type, command)
            .await
        {
            Ok(acked) => {
                match inner.gateway.actuator_states(inner.device_id).await {
                    Ok(states) => inner.snapshot.send_modify(|s| s.actuator_states = states),
                    Err(e) => debug!(error = %e, "post-command actuator re-fetch failed"),
                }
                let text = format!("{} {}", acked.display_name(), command.action_text());
                inner.snapshot.send_modify(|s| s.message = Some(text));
            }
            Err(e) => {
                inner
                    .snapshot
                    .send_modify(|s| s.message = Some(format!("Error: {e}")));
            }
        }
    }

    /// Clear the transient message after the UI has shown it. The
    /// controller keeps no queue: a message arriving before the clear
    /// simply overwrites the pending one.
    pub fn clear_message(&self) {
        self.inner.snapshot.send_modify(|s| s.message = None);
    }

    /// Start the background polling loop, replacing any loop already
    /// running. Exactly one loop is active per controller at any time.
    pub fn start_polling(&self) {
        let token = self.inner.replace_poll_token();
        let inner = Arc::downgrade(&self.inner);
        tokio::spawn(poll_task(inner, self.inner.poll_interval, token));
    }

    /// Cancel the background polling loop, if any.
    pub fn stop_polling(&self) {
        self.inner
            .poll_token
            .lock()
            .expect("poll token lock poisoned")
            .cancel();
    }
}

type FanOut = (
    Result<Device, domo_api::Error>,
    Result<HashMap<String, SensorReading>, domo_api::Error>,
    Result<Vec<ActuatorState>, domo_api::Error>,
);

impl DetailInner {
    /// Issue the three fetches concurrently and wait for all of them.
    async fn fan_out(&self) -> FanOut {
        tokio::join!(
            self.gateway.get_device(self.device_id),
            self.gateway.latest_readings(self.device_id),
            self.gateway.actuator_states(self.device_id),
        )
    }

    /// Non-fail-fast cycle shared by manual refresh and the silent
    /// loop: apply every success independently, swallow every failure.
    async fn apply_cycle(&self) {
        let (device_res, readings_res, actuators_res) = self.fan_out().await;
        match device_res {
            Ok(device) => self.snapshot.send_modify(|s| s.device = Some(device)),
            Err(e) => debug!(error = %e, "device refresh failed"),
        }
        self.apply_secondary(readings_res, actuators_res);
    }

    fn apply_secondary(
        &self,
        readings_res: Result<HashMap<String, SensorReading>, domo_api::Error>,
        actuators_res: Result<Vec<ActuatorState>, domo_api::Error>,
    ) {
        match readings_res {
            Ok(readings) => self.snapshot.send_modify(|s| s.sensor_readings = readings),
            Err(e) => debug!(error = %e, "sensor readings fetch failed"),
        }
        match actuators_res {
            Ok(states) => self.snapshot.send_modify(|s| s.actuator_states = states),
            Err(e) => debug!(error = %e, "actuator states fetch failed"),
        }
    }

    /// Cancel the current poll token and install a fresh child token.
    fn replace_poll_token(&self) -> CancellationToken {
        let mut guard = self.poll_token.lock().expect("poll token lock poisoned");
        guard.cancel();
        let child = self.cancel.child_token();
        *guard = child.clone();
        child
    }
}

impl Drop for DetailInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Fully silent periodic refresh: touches neither status flag, applies
/// only successes, and skips the cycle entirely while an explicit load
/// or manual refresh is in flight.
async fn poll_task(inner: Weak<DetailInner>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let Some(inner) = inner.upgrade() else { break };
                let busy = {
                    let snap = inner.snapshot.borrow();
                    snap.loading || snap.refreshing
                };
                if busy {
                    continue;
                }
                inner.apply_cycle().await;
            }
        }
    }
}
