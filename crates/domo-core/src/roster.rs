// ── Device roster sync controller ──
//
// Keeps the enabled-device list eventually consistent with the backend
// under a fixed polling cadence. The full observable state is a single
// sum type replaced wholesale on every update; consumers subscribe
// through a watch channel and render whatever snapshot they hold.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use domo_api::{ApiClient, Device};

/// Default cadence of the silent roster refresh.
pub const ROSTER_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Observable state of the roster screen.
///
/// `Loading` is only entered by an explicit [`RosterController::load`];
/// background refreshes replace a `Loaded`/`Failed` value directly or
/// leave it untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterState {
    Loading,
    Loaded(Vec<Device>),
    Failed(String),
}

impl RosterState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Polling controller for the device roster.
///
/// Cheaply cloneable; all clones share one snapshot and at most one
/// background polling loop.
#[derive(Clone)]
pub struct RosterController {
    inner: Arc<RosterInner>,
}

struct RosterInner {
    gateway: Arc<ApiClient>,
    state: watch::Sender<RosterState>,
    poll_interval: Duration,
    /// Parent token. Child tokens are handed to polling loops so a
    /// restart cancels the old loop without killing the parent.
    cancel: CancellationToken,
    poll_token: Mutex<CancellationToken>,
}

impl RosterController {
    /// Create a controller with the default 10 s polling cadence.
    /// Polling does not start until [`start_polling`](Self::start_polling).
    pub fn new(gateway: Arc<ApiClient>) -> Self {
        Self::with_interval(gateway, ROSTER_POLL_INTERVAL)
    }

    /// Create a controller with a custom polling cadence.
    pub fn with_interval(gateway: Arc<ApiClient>, poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(RosterState::Loading);
        let cancel = CancellationToken::new();
        let poll_token = Mutex::new(cancel.child_token());
        Self {
            inner: Arc::new(RosterInner {
                gateway,
                state,
                poll_interval,
                cancel,
                poll_token,
            }),
        }
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<RosterState> {
        self.inner.state.subscribe()
    }

    /// The current snapshot.
    pub fn state(&self) -> RosterState {
        self.inner.state.borrow().clone()
    }

    /// Initial load or user-initiated retry: forces the `Loading`
    /// state (clearing any previous error), then fetches and emits
    /// `Loaded` with the enabled subset, or `Failed`.
    pub async fn load(&self) {
        let _ = self.inner.state.send(RosterState::Loading);
        let next = self.inner.fetch().await;
        let _ = self.inner.state.send(next);
    }

    /// Refresh without entering `Loading`, keeping the rendered list
    /// visible during the fetch. Unlike the background loop this path
    /// CAN transition into `Failed` -- it is the resume-from-background
    /// hook, where the user expects an up-to-date answer.
    pub async fn refresh(&self) {
        let next = self.inner.fetch().await;
        let _ = self.inner.state.send(next);
    }

    /// Start the background polling loop, replacing any loop already
    /// running. Exactly one loop is active per controller at any time.
    pub fn start_polling(&self) {
        let token = self.inner.replace_poll_token();
        let inner = Arc::downgrade(&self.inner);
        tokio::spawn(poll_task(inner, self.inner.poll_interval, token));
    }

    /// Cancel the background polling loop, if any. The loop can be
    /// restarted later with [`start_polling`](Self::start_polling).
    pub fn stop_polling(&self) {
        self.inner
            .poll_token
            .lock()
            .expect("poll token lock poisoned")
            .cancel();
    }
}

impl RosterInner {
    /// One fetch cycle: list, filter to enabled devices preserving
    /// gateway order, map the outcome to a snapshot value.
    async fn fetch(&self) -> RosterState {
        match self.gateway.list_devices().await {
            Ok(devices) => RosterState::Loaded(enabled_only(devices)),
            Err(e) => RosterState::Failed(e.to_string()),
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

impl Drop for RosterInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Disabled devices stay manageable elsewhere; the roster only shows
/// the enabled subset.
fn enabled_only(devices: Vec<Device>) -> Vec<Device> {
    devices.into_iter().filter(|d| d.is_enabled).collect()
}

/// Silent periodic refresh. Failures leave the previous snapshot in
/// place: stale data beats flashing an error during routine polling.
async fn poll_task(inner: Weak<RosterInner>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let Some(inner) = inner.upgrade() else { break };
                if inner.state.borrow().is_loading() {
                    continue;
                }
                match inner.gateway.list_devices().await {
                    Ok(devices) => {
                        let _ = inner.state.send(RosterState::Loaded(enabled_only(devices)));
                    }
                    Err(e) => debug!(error = %e, "silent roster refresh failed"),
                }
            }
        }
    }
}
