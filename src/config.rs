use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_CLASSIFIER_URL: &str = "https://ethxpose.onrender.com/api/py/classify";
pub const DEFAULT_MODEL_NAME: &str = "first_Feather-G_RF.joblib";
pub const DEFAULT_WALLET_ADDRESS: &str = "0x0a888f0f0b772e17a2adfd62d3f15cec72c8d42f";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub classifier: ClassifierConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Remote inference endpoint the proxy forwards to.
    pub url: String,
    pub model_name: String,
    /// Address pre-filled in the page form.
    pub default_wallet_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub seed: u64,
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            classifier: ClassifierConfig {
                url: DEFAULT_CLASSIFIER_URL.to_string(),
                model_name: DEFAULT_MODEL_NAME.to_string(),
                default_wallet_address: DEFAULT_WALLET_ADDRESS.to_string(),
            },
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 640.0,
            seed: 42,
            tick_interval_ms: 16,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(
        Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST")
                    .unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(defaults.server.port),
            },
            classifier: ClassifierConfig {
                url: env::var("CLASSIFIER_URL")
                    .unwrap_or(defaults.classifier.url),
                model_name: env::var("CLASSIFIER_MODEL")
                    .unwrap_or(defaults.classifier.model_name),
                default_wallet_address: env::var("DEFAULT_WALLET_ADDRESS")
                    .unwrap_or(defaults.classifier.default_wallet_address),
            },
            layout: LayoutConfig {
                width: parse_or("GRAPH_WIDTH", defaults.layout.width),
                height: parse_or("GRAPH_HEIGHT", defaults.layout.height),
                seed: parse_or("LAYOUT_SEED", defaults.layout.seed),
                tick_interval_ms: parse_or("LAYOUT_TICK_MS", defaults.layout.tick_interval_ms),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
