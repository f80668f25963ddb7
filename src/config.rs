use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the serialized scoring model artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Path to the raw interaction records CSV
    #[serde(default = "default_interactions_path")]
    pub interactions_path: String,

    /// Path to the content metadata CSV
    #[serde(default = "default_content_path")]
    pub content_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of recommendations returned per request
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_model_path() -> String {
    "./model/model.onnx".to_string()
}

fn default_interactions_path() -> String {
    "./data/interactions_train_df.csv".to_string()
}

fn default_content_path() -> String {
    "./data/articles_df.csv".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_top_n() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
