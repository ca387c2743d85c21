use std::net::{AddrParseError, SocketAddr};

use clap::{Parser, Subcommand};
use ledgerdesk_workspace::{ActivationPolicy, MatchPolicy, STORAGE_NAME};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "ledgerdesk", about = "LedgerDesk - multi-tenant admin backend with mock record stores")]
pub struct CliArgs {
    /// Path to config file
    #[arg(short, long, default_value = "ledgerdesk.toml")]
    pub config: String,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log level (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Print the seeded ledgers and exit
    Seed,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Load the demo fixtures into the in-memory stores at startup.
    #[serde(default = "default_true")]
    pub seed: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LedgerConfig {
    /// Reject ledger writes whose debits, credits and total amount disagree.
    /// Submitting a ledger for approval always requires it to balance.
    #[serde(default)]
    pub enforce_balance: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkspaceConfig {
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    #[serde(default = "default_storage_name")]
    pub storage_name: String,

    #[serde(default)]
    pub activation: ActivationPolicy,

    #[serde(default)]
    pub matching: MatchPolicy,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_state_dir() -> String {
    "state".to_string()
}

fn default_storage_name() -> String {
    STORAGE_NAME.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig { seed: true }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        WorkspaceConfig {
            state_dir: default_state_dir(),
            storage_name: default_storage_name(),
            activation: ActivationPolicy::default(),
            matching: MatchPolicy::default(),
        }
    }
}

impl Config {
    pub fn load(cli: &CliArgs) -> Self {
        let mut config = match std::fs::read_to_string(&cli.config) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                eprintln!("Warning: Failed to parse config file: {}", e);
                Config::default()
            }),
            Err(_) => Config::default(),
        };

        // CLI overrides
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(ref level) = cli.log_level {
            config.logging.level = level.clone();
        }

        config
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "info");
        assert!(config.store.seed);
        assert!(!config.ledger.enforce_balance);
        assert_eq!(config.workspace.storage_name, "workspace-layout");
        assert_eq!(config.workspace.activation, ActivationPolicy::LastRemaining);
        assert_eq!(config.workspace.matching, MatchPolicy::LongestPrefix);
    }

    #[test]
    fn test_parse_sections() {
        let config = Config::parse(
            r#"
            [server]
            port = 8080

            [logging]
            json = true

            [ledger]
            enforce_balance = true

            [workspace]
            state_dir = "/var/lib/ledgerdesk"
            activation = "previous-active"
            matching = "first-match"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.logging.json);
        assert!(config.ledger.enforce_balance);
        assert_eq!(config.workspace.state_dir, "/var/lib/ledgerdesk");
        assert_eq!(config.workspace.activation, ActivationPolicy::PreviousActive);
        assert_eq!(config.workspace.matching, MatchPolicy::FirstMatch);
        assert_eq!(config.listen_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = CliArgs::parse_from(["ledgerdesk", "--config", "does-not-exist.toml", "-p", "9000", "-l", "debug", "seed"]);
        let config = Config::load(&cli);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(cli.command, Some(Command::Seed));
    }
}
