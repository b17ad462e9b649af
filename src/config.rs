// src/config.rs

//! Runtime configuration consumed by the resolution core
//!
//! The host parses flags and an optional JSON config file into a [`Config`]
//! and threads it through the core entry points. The core itself never
//! reads global state.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Direction used when printing plans and menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    TopDown,
    BottomUp,
}

/// Flags and endpoints controlling resolution behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Never prompt; fail when interaction would be required
    pub no_confirm: bool,
    /// Defer conflict confirmation to the package manager
    pub use_ask: bool,
    pub sort_mode: SortMode,
    pub aur_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_confirm: false,
            use_ask: false,
            sort_mode: SortMode::TopDown,
            aur_url: "https://aur.archlinux.org".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
