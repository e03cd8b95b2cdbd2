use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::glitch::Theme;
use crate::shared::constants;

/// String key/value preference store persisted as a flat JSON object.
///
/// Every `set` writes through to disk. A store without a path (see
/// `in_memory`) keeps values for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct Preferences {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl Preferences {
    /// `<config dir>/glitchgrid/preferences.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(constants::CONFIG_DIR_NAME)
                .join(constants::PREFERENCES_FILE)
        })
    }

    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => {
                crate::utils::logger::warn("No config directory; preferences will not persist");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Read the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed one is logged and treated as empty.
    pub fn load(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(values) => values,
                Err(err) => {
                    crate::utils::logger::warn(&format!(
                        "Ignoring malformed preferences at {}: {}",
                        path.display(),
                        err
                    ));
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Stored theme, `dark` when nothing (or nothing valid) is stored.
    pub fn theme(&self) -> Theme {
        self.get(constants::THEME_STORAGE_KEY)
            .and_then(Theme::parse)
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.set(constants::THEME_STORAGE_KEY, theme.as_str())
    }

    /// Flip between light and dark and persist the result.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn language(&self) -> Option<&str> {
        self.get(constants::LANGUAGE_STORAGE_KEY)
    }

    pub fn set_language(&mut self, code: &str) -> Result<()> {
        self.set(constants::LANGUAGE_STORAGE_KEY, code)
    }
}
