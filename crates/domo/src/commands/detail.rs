//! Device detail command handlers: show, switch, watch.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use owo_colors::OwoColorize;

use domo_core::{ApiClient, DetailController, DetailSnapshot, SwitchCommand};

/// `domo device <id>`
pub async fn show(gateway: &Arc<ApiClient>, id: i64) -> Result<()> {
    let controller = DetailController::new(Arc::clone(gateway), id);
    controller.load().await;

    let snapshot = controller.snapshot();
    if let Some(message) = &snapshot.error {
        return Err(eyre!(message.clone()));
    }
    print_snapshot(&snapshot);
    Ok(())
}

/// `domo switch <device-id> <actuator> <on|off>`
pub async fn switch(
    gateway: &Arc<ApiClient>,
    device_id: i64,
    actuator: &str,
    command: SwitchCommand,
) -> Result<()> {
    let controller = DetailController::new(Arc::clone(gateway), device_id);
    controller.send_command(actuator, command).await;

    let snapshot = controller.snapshot();
    match &snapshot.message {
        Some(message) if message.starts_with("Error:") => Err(eyre!(message.clone())),
        Some(message) => {
            println!("{message}");
            print_actuators(&snapshot);
            Ok(())
        }
        None => Ok(()),
    }
}

/// `domo watch <id> [--interval N]`
///
/// Loads once, then follows the silent refresh loop, reprinting the
/// snapshot whenever it changes. Ctrl-C stops the loop.
pub async fn watch(gateway: &Arc<ApiClient>, id: i64, interval: Duration) -> Result<()> {
    let controller = DetailController::with_interval(Arc::clone(gateway), id, interval);
    let mut rx = controller.subscribe();

    controller.load().await;
    let snapshot = controller.snapshot();
    if let Some(message) = &snapshot.error {
        return Err(eyre!(message.clone()));
    }
    print_snapshot(&snapshot);
    rx.mark_unchanged();

    controller.start_polling();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                println!();
                print_snapshot(&snapshot);
            }
        }
    }
    controller.stop_polling();
    Ok(())
}

// ── Rendering ───────────────────────────────────────────────────────

fn print_snapshot(snapshot: &DetailSnapshot) {
    if let Some(device) = &snapshot.device {
        let status = if device.is_online() {
            device.status.green().to_string()
        } else {
            device.status.red().to_string()
        };
        println!("{} (#{})  {}", device.name.bold(), device.id, status);
        println!("  mac: {}", device.mac_address);
        if let Some(ip) = &device.ip_address {
            println!("  ip:  {ip}");
        }
        if let Some(seen) = &device.last_connection {
            println!("  last connection: {seen}");
        }
    }

    if !snapshot.sensor_readings.is_empty() {
        println!("\n{}", "Sensors".bold());
        let mut readings: Vec<_> = snapshot.sensor_readings.values().collect();
        readings.sort_by(|a, b| a.sensor_type.cmp(&b.sensor_type));
        for reading in readings {
            println!(
                "  {:<20} {} {}  ({})",
                reading.sensor_type, reading.value, reading.unit, reading.timestamp
            );
        }
    }

    print_actuators(snapshot);
}

fn print_actuators(snapshot: &DetailSnapshot) {
    if snapshot.actuator_states.is_empty() {
        return;
    }
    println!("\n{}", "Actuators".bold());
    for actuator in &snapshot.actuator_states {
        let state = if actuator.is_active() {
            actuator.state.green().to_string()
        } else {
            actuator.state.dimmed().to_string()
        };
        println!("  {:<20} {state}", actuator.display_name());
    }
}
