//! Server configuration

use clap::Parser;
use sentiscope_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

#[derive(Parser, Debug, Clone)]
#[command(name = "sentiscope-server")]
#[command(about = "Review sentiment classification service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SENTISCOPE_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Model artifact path
    #[arg(short, long, env = "SENTISCOPE_MODEL_PATH")]
    pub model: Option<String>,

    /// Listen address
    #[arg(short = 'l', long, env = "SENTISCOPE_LISTEN")]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "SENTISCOPE_PORT")]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Model artifact produced by the training pipeline
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Largest accepted `/predict/batch` request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Allow cross-origin requests from any origin
    #[serde(default = "default_true")]
    pub cors: bool,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(cli: &Cli) -> Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(&cli.config).exists() {
            Self::from_file(&cli.config)?
        } else {
            Self::default()
        };

        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Apply CLI overrides
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(model) = &cli.model {
            self.model_path = model.clone();
        }

        if let Some(listen) = &cli.listen {
            self.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            self.port = port;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::config("port must be non-zero"));
        }

        if self.max_batch_size == 0 {
            return Err(Error::config("max_batch_size must be at least 1"));
        }

        if self.model_path.trim().is_empty() {
            return Err(Error::config("model_path must not be empty"));
        }

        Ok(())
    }

    /// Address to bind the listener to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.listen, self.port)
            .parse()
            .map_err(|e| Error::config(format!("invalid listen address '{}': {}", self.listen, e)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            model_path: default_model_path(),
            max_batch_size: default_max_batch_size(),
            cors: true,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model_path() -> String {
    "models/sentiment_model.json".to_string()
}

fn default_max_batch_size() -> usize {
    256
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["sentiscope-server"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let config = ServerConfig::load(&cli(&["--config", "/nonexistent/config.yaml"])).unwrap();
        assert_eq!(config.listen, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.model_path, "models/sentiment_model.json");
        assert_eq!(config.max_batch_size, 256);
        assert!(config.cors);
    }

    #[test]
    fn test_file_with_partial_fields() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port: 9100\nmax_batch_size: 32\ncors: false").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.max_batch_size, 32);
        assert!(!config.cors);
        assert_eq!(config.listen, "0.0.0.0");
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port: 9100\nmodel_path: from-file.json").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = ServerConfig::load(&cli(&[
            "--config",
            &path,
            "--model",
            "from-cli.json",
            "-P",
            "9200",
        ]))
        .unwrap();

        assert_eq!(config.model_path, "from-cli.json");
        assert_eq!(config.port, 9200);
    }

    #[test]
    fn test_malformed_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port: [not a port").unwrap();

        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.port = 8000;
        config.max_batch_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            listen: "127.0.0.1".to_string(),
            port: 8123,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8123");

        let config = ServerConfig {
            listen: "not an address".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
