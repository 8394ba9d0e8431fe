use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_min_endorsements")]
    pub min_endorsements: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartConfig {
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_template")]
    pub template: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_path: Option<PathBuf>,
    pub min_endorsements: Option<usize>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/parrainage-dashboard/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.data_path {
            self.data.path = path.display().to_string();
        }
        if let Some(threshold) = overrides.min_endorsements {
            self.data.min_endorsements = threshold;
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_data_path(&self) -> PathBuf {
        expand_tilde(&self.data.path)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let bind = format!("{}:{}", self.server.host, self.server.port);
        bind.parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))
    }

    /// Mount prefix normalized to `/` or `/segment` without a trailing slash.
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.server.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}")
        }
    }

    pub fn default_template() -> String {
        let template = r#"[data]
path = "parrainage/data/parrainagestotal.csv"
delimiter = ";"
min_endorsements = 500

[server]
host = "0.0.0.0"
port = 8055
base_path = "/"

[chart]
height = 450
template = "plotly_white"
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            server: ServerConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            delimiter: default_delimiter(),
            min_endorsements: default_min_endorsements(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            template: default_template(),
        }
    }
}

fn default_data_path() -> String {
    "parrainage/data/parrainagestotal.csv".to_string()
}

fn default_delimiter() -> char {
    ';'
}

fn default_min_endorsements() -> usize {
    500
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8055
}

fn default_base_path() -> String {
    "/".to_string()
}

fn default_height() -> u32 {
    450
}

fn default_template() -> String {
    "plotly_white".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_defaults() {
        let parsed: Config =
            toml::from_str(&Config::default_template()).expect("template should parse");
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load(Some(&dir.path().join("absent.toml"))).expect("load");
        assert_eq!(config.server.port, 8055);
        assert_eq!(config.data.min_endorsements, 500);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nport = 9000\n").expect("write");
        let config = Config::load(Some(&path)).expect("load");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.data.delimiter, ';');
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            data_path: Some(PathBuf::from("other.csv")),
            min_endorsements: Some(10),
            host: None,
            port: Some(8080),
        });
        assert_eq!(config.data.path, "other.csv");
        assert_eq!(config.data.min_endorsements, 10);
        assert_eq!(config.bind_addr().expect("addr").port(), 8080);
    }

    #[test]
    fn base_path_is_normalized() {
        let mut config = Config::default();
        assert_eq!(config.normalized_base_path(), "/");
        config.server.base_path = "parrainage/".to_string();
        assert_eq!(config.normalized_base_path(), "/parrainage");
    }

    #[test]
    fn invalid_host_is_rejected() {
        let mut config = Config::default();
        config.server.host = "not a host".to_string();
        assert!(config.bind_addr().is_err());
    }
}
