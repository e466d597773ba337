//! Clap derive structures for the `domo` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use domo_core::SwitchCommand;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// domo -- monitor and control ESP32 devices from the command line
#[derive(Debug, Parser)]
#[command(
    name = "domo",
    version,
    about = "Monitor sensors and drive actuators through the domo backend",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL
    #[arg(
        long,
        short = 's',
        env = "DOMO_SERVER",
        default_value = "http://192.168.8.136:8080",
        global = true
    )]
    pub server: String,

    /// Request timeout in seconds
    #[arg(long, env = "DOMO_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List devices on the roster
    #[command(alias = "ls")]
    Devices {
        /// Include disabled devices (administration view)
        #[arg(long)]
        all: bool,
    },

    /// Show one device: info, latest readings, actuator states
    Device {
        /// Device id
        id: i64,
    },

    /// Send an ON/OFF command to an actuator
    Switch {
        /// Device id
        device_id: i64,
        /// Actuator type (e.g. led_azul, bomba_riego)
        actuator: String,
        /// Target state
        #[arg(value_enum)]
        state: SwitchArg,
    },

    /// Enable or disable a device on the roster
    Toggle {
        /// Device id
        id: i64,
        /// true to show the device on the roster
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Follow a device's snapshot as it refreshes (Ctrl-C to stop)
    Watch {
        /// Device id
        id: i64,
        /// Poll interval in seconds
        #[arg(long, default_value = "5")]
        interval: u64,
    },

    /// Show or set the theme preference
    Theme {
        /// dark, light, or system (omit to print the current value)
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SwitchArg {
    On,
    Off,
}

impl From<SwitchArg> for SwitchCommand {
    fn from(arg: SwitchArg) -> Self {
        match arg {
            SwitchArg::On => SwitchCommand::On,
            SwitchArg::Off => SwitchCommand::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
    Dark,
    Light,
    System,
}
