//! Device roster command handlers.

use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use domo_core::{ApiClient, Device, RosterController, RosterState};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Last connection")]
    last_connection: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        let status = if d.is_online() {
            d.status.green().to_string()
        } else {
            d.status.red().to_string()
        };
        Self {
            id: d.id,
            name: d.name.clone(),
            status,
            ip: d.ip_address.clone().unwrap_or_else(|| "-".into()),
            mac: d.mac_address.clone(),
            enabled: if d.is_enabled { "yes".into() } else { "no".into() },
            last_connection: d.last_connection.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

fn print_table(devices: &[Device]) {
    if devices.is_empty() {
        println!("no devices");
        return;
    }
    let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
    println!("{}", Table::new(rows).with(Style::sharp()));
}

// ── Handlers ────────────────────────────────────────────────────────

/// `domo devices [--all]`
///
/// The default view goes through the roster controller (enabled subset,
/// gateway order); `--all` bypasses the filter for administration.
pub async fn list(gateway: &Arc<ApiClient>, all: bool) -> Result<()> {
    if all {
        let devices = gateway.list_devices().await?;
        print_table(&devices);
        return Ok(());
    }

    let controller = RosterController::new(Arc::clone(gateway));
    controller.load().await;
    match controller.state() {
        RosterState::Loaded(devices) => {
            print_table(&devices);
            Ok(())
        }
        RosterState::Failed(message) => Err(eyre!(message)),
        RosterState::Loading => unreachable!("load() always settles the state"),
    }
}

/// `domo toggle <id> <enabled>`
pub async fn toggle(gateway: &Arc<ApiClient>, id: i64, enabled: bool) -> Result<()> {
    let device = gateway.set_device_enabled(id, enabled).await?;
    println!(
        "{} is now {}",
        device.name,
        if device.is_enabled {
            "enabled".green().to_string()
        } else {
            "disabled".yellow().to_string()
        }
    );
    Ok(())
}
