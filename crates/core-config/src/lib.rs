//! Configuration loading and parsing.
//!
//! Parses `treeline.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [codec]
//! comment_sentinel = "::"
//!
//! [region]
//! ternary = false        # enables the cycleRegion command (bound to `V`)
//!
//! [clipboard]
//! read = ["wl-paste", "--no-newline"]
//! write = ["wl-copy"]
//!
//! [keymap]
//! "gt" = "foldTops"
//! "<C-e>" = "edit"
//! ```
//!
//! A missing file or a parse error yields defaults. Unknown fields are
//! ignored so older binaries tolerate newer files. Invalid individual values
//! (blank sentinel, bad binding) are logged under target `config` and
//! skipped rather than failing the load.

use anyhow::Result;
use core_keymap::{MappingOutput, MappingSpec, baseline_outline_specs, parse_binding};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

const DEFAULT_SENTINEL: &str = "::";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    #[serde(default = "CodecConfig::default_sentinel")]
    pub comment_sentinel: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            comment_sentinel: Self::default_sentinel(),
        }
    }
}

impl CodecConfig {
    fn default_sentinel() -> String {
        DEFAULT_SENTINEL.to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct RegionConfig {
    #[serde(default)]
    pub ternary: bool,
}

/// External commands for the system clipboard. Empty means in-memory only.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ClipboardConfig {
    #[serde(default)]
    pub read: Vec<String>,
    #[serde(default)]
    pub write: Vec<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub region: RegionConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    /// Key sequence (angle-bracket notation) -> command name.
    #[serde(default)]
    pub keymap: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub path: Option<PathBuf>,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // working directory first, then the platform config dir
    let local = PathBuf::from("treeline.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("treeline").join("treeline.toml");
    }
    PathBuf::from("treeline.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), bindings = file.keymap.len(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                path: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Comment sentinel, falling back to `::` when the configured one is blank.
    pub fn comment_sentinel(&self) -> &str {
        let s = self.file.codec.comment_sentinel.trim();
        if s.is_empty() {
            info!(target: "config", "comment_sentinel_blank_using_default");
            DEFAULT_SENTINEL
        } else {
            s
        }
    }

    pub fn ternary_region(&self) -> bool {
        self.file.region.ternary
    }

    /// Baseline bindings followed by user bindings (later entries win).
    /// Invalid user bindings are logged and dropped.
    pub fn keymap_specs(&self) -> Vec<MappingSpec> {
        let mut specs = baseline_outline_specs();
        if self.ternary_region() {
            // `V` is the default key for the ternary cycle
            if let Ok(spec) = MappingSpec::parse("V", MappingOutput::CycleRegion) {
                specs.push(spec);
            }
        }
        for (keys, command) in &self.file.keymap {
            match parse_binding(keys, command) {
                Ok(spec) => specs.push(spec),
                Err(e) => {
                    warn!(target: "config", keys = %keys, command = %command, error = %e, "keymap_binding_ignored");
                }
            }
        }
        specs
    }
}
