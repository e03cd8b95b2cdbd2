use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::glitch::GlitchConfig;
use crate::shared::constants;

/// Values given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub glitch_speed_ms: Option<u64>,
    pub smooth: Option<bool>,
    pub characters: Option<String>,
}

/// Where to look for a config file, in priority order.
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut paths = vec![PathBuf::from(constants::LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(constants::CONFIG_DIR_NAME).join(constants::CONFIG_FILE));
    }
    paths
}

fn read_config(path: &Path) -> Result<GlitchConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// First existing config file wins, then command line overrides.
///
/// An explicitly named file must exist and parse. Auto-discovered files that
/// fail to parse are logged and skipped.
pub fn load(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<GlitchConfig> {
    let mut config = GlitchConfig::default();

    for path in candidate_paths(explicit) {
        if explicit.is_none() && !path.exists() {
            continue;
        }
        match read_config(&path) {
            Ok(loaded) => {
                crate::utils::logger::info(&format!("Loaded config from {}", path.display()));
                config = loaded;
                break;
            }
            Err(err) if explicit.is_none() => {
                crate::utils::logger::warn(&format!("Skipping config: {:#}", err));
            }
            Err(err) => return Err(err),
        }
    }

    apply_overrides(&mut config, overrides);
    for fix in config.sanitize() {
        crate::utils::logger::warn(&fix);
    }

    Ok(config)
}

pub fn apply_overrides(config: &mut GlitchConfig, overrides: &ConfigOverrides) {
    if let Some(ms) = overrides.glitch_speed_ms {
        config.glitch_speed_ms = ms;
    }
    if let Some(smooth) = overrides.smooth {
        config.smooth = smooth;
    }
    if let Some(characters) = &overrides.characters {
        config.characters = characters.clone();
    }
}
