use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rpc: RpcConfig,
    pub chart: ChartConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub http_url: String,
    pub ws_url: String,
    pub program_id: String,
    pub commitment: String,
    /// Byte offset of the little-endian u64 price inside the feed account.
    /// This tracks the on-chain account layout and may move if the program
    /// changes its account structure.
    pub price_offset: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub window_ms: u64,
    pub max_points: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub default_feed: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl RpcConfig {
    pub fn program_pubkey(&self) -> Result<Pubkey> {
        Pubkey::from_str(&self.program_id)
            .with_context(|| format!("invalid rpc.program_id '{}'", self.program_id))
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config: Config =
            toml::from_str(&config_str).context("failed to parse config/default.toml")?;

        if let Ok(url) = std::env::var("LAZER_HTTP_URL") {
            config.rpc.http_url = url;
        }
        if let Ok(url) = std::env::var("LAZER_WS_URL") {
            config.rpc.ws_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.rpc.program_pubkey().context("rpc.program_id is invalid")?;
        if self.chart.window_ms == 0 {
            bail!("chart.window_ms must be > 0");
        }
        if self.chart.max_points == 0 {
            bail!("chart.max_points must be > 0");
        }
        if self.ui.refresh_rate_ms == 0 {
            bail!("ui.refresh_rate_ms must be > 0");
        }
        match self.rpc.commitment.as_str() {
            "processed" | "confirmed" | "finalized" => {}
            other => bail!(
                "rpc.commitment '{}' is invalid, expected processed/confirmed/finalized",
                other
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
[rpc]
http_url = "https://devnet.magicblock.app"
ws_url = "wss://devnet.magicblock.app"
program_id = "PriCems5tHihc6UDXDjzjeawomAwBduWMGAi8ZUjppd"
commitment = "confirmed"
price_offset = 73

[chart]
window_ms = 5000
max_points = 600

[ui]
refresh_rate_ms = 33
default_feed = "BTCUSD"

[logging]
level = "info"
"#
    }

    #[test]
    fn parse_default_toml() {
        let config: Config = toml::from_str(sample_toml()).unwrap();
        assert_eq!(config.rpc.ws_url, "wss://devnet.magicblock.app");
        assert_eq!(config.rpc.price_offset, 73);
        assert_eq!(config.chart.window_ms, 5000);
        assert_eq!(config.chart.max_points, 600);
        assert_eq!(config.ui.default_feed, "BTCUSD");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_program_id() {
        let mut config: Config = toml::from_str(sample_toml()).unwrap();
        config.rpc.program_id = "not-a-pubkey".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut config: Config = toml::from_str(sample_toml()).unwrap();
        config.chart.window_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_commitment() {
        let mut config: Config = toml::from_str(sample_toml()).unwrap();
        config.rpc.commitment = "instant".to_string();
        assert!(config.validate().is_err());
    }
}
