//! Clap derive structures for the `omada` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// omada -- poll and manage Omada networks through the Open API
#[derive(Debug, Parser)]
#[command(
    name = "omada",
    version,
    about = "Poll and manage Omada networks from the command line",
    long_about = "A CLI for TP-Link Omada controllers reached through the Open API\n\
        (cloud northbound or local controller), with one-shot listings,\n\
        device and client actions, and a long-running watch mode.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "OMADA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Site id or name (overrides profile)
    #[arg(long, short = 's', env = "OMADA_SITE", global = true)]
    pub site: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OMADA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format on stderr
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "OMADA_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "OMADA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// On/off switch argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Self::On
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List sites visible to the application
    Sites,

    /// List adopted devices with uplink and status details
    #[command(alias = "dev")]
    Devices,

    /// List connected clients
    #[command(alias = "cl")]
    Clients,

    /// List the DPI application catalogue
    Apps,

    /// Today's per-application traffic for one client
    Traffic(TrafficArgs),

    /// List PoE-capable switch ports and per-switch budgets
    Poe,

    /// Show WAN port status of every gateway
    Wan,

    /// List SSIDs across all WLAN groups
    Ssids,

    /// Device actions
    Device(DeviceArgs),

    /// Switch port actions
    Port(PortArgs),

    /// Client actions
    Client(ClientArgs),

    /// SSID actions
    Ssid(SsidArgs),

    /// Run all pollers and print every published snapshot until Ctrl-C
    Watch,

    /// Inspect the cached access token
    Token(TokenArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Traffic ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TrafficArgs {
    /// Client MAC address
    pub mac: String,

    /// Application ids to keep (defaults to the profile's applications)
    #[arg(long = "app", short = 'a')]
    pub applications: Vec<i64>,
}

// ── Device ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// Reboot a device
    Reboot {
        /// Device MAC address
        mac: String,
    },

    /// Toggle the locate LED
    Locate {
        /// Device MAC address
        mac: String,
        #[arg(value_enum, default_value = "on")]
        state: Toggle,
    },
}

// ── Port ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PortArgs {
    #[command(subcommand)]
    pub command: PortCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortCommand {
    /// Enable or disable PoE output on a switch port
    Poe {
        /// Switch MAC address
        switch: String,
        /// Port number
        port: u32,
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Enable or disable the profile override on a switch port
    ProfileOverride {
        /// Switch MAC address
        switch: String,
        /// Port number
        port: u32,
        #[arg(value_enum)]
        state: Toggle,
    },
}

// ── Client ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientArgs {
    #[command(subcommand)]
    pub command: ClientCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    /// Block a client
    Block { mac: String },
    /// Unblock a client
    Unblock { mac: String },
    /// Force a wireless client to reconnect
    Reconnect { mac: String },
}

// ── SSID ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SsidArgs {
    #[command(subcommand)]
    pub command: SsidCommand,
}

#[derive(Debug, Subcommand)]
pub enum SsidCommand {
    /// Show or hide an SSID's broadcast
    Broadcast {
        /// WLAN group id
        wlan: String,
        /// SSID id
        ssid: String,
        #[arg(value_enum)]
        state: Toggle,
    },
}

// ── Token ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Print the cached token expiry for the active profile
    Show,
    /// Forget the cached tokens; the next call re-issues from client credentials
    Clear,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,
    /// List configured profiles
    Profiles,
    /// Store the active profile's client secret in the system keyring
    SetSecret,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
