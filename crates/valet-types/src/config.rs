//! Configuration types for Valet.
//!
//! `ValetConfig` represents the top-level `config.toml`. All fields have
//! sensible defaults so a missing or partial file still yields a working
//! configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Valet backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValetConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Model identifier sent to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible provider endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Interval between proactive background pushes, in seconds.
    #[serde(default = "default_background_interval_secs")]
    pub background_interval_secs: u64,

    #[serde(default)]
    pub conversation: ConversationSettings,
}

/// Bounds for a single conversation's history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConversationSettings {
    /// Maximum history length before compaction triggers.
    #[serde(default = "default_max")]
    pub max: usize,

    /// Number of recent messages kept verbatim through compaction.
    /// Must be smaller than `max`.
    #[serde(default = "default_keep")]
    pub keep: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_model() -> String {
    "gpt-4.1".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_background_interval_secs() -> u64 {
    30 * 60
}

fn default_max() -> usize {
    50
}

fn default_keep() -> usize {
    20
}

impl Default for ValetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model: default_model(),
            base_url: default_base_url(),
            background_interval_secs: default_background_interval_secs(),
            conversation: ConversationSettings::default(),
        }
    }
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            max: default_max(),
            keep: default_keep(),
        }
    }
}
