use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::shared::constants;

/// Tunables for the glitch animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlitchConfig {
    /// Milliseconds between mutation passes.
    pub glitch_speed_ms: u64,
    /// Fade colors between mutations instead of snapping.
    pub smooth: bool,
    /// Alphabet cells draw their characters from.
    pub characters: String,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            glitch_speed_ms: constants::DEFAULT_GLITCH_SPEED_MS,
            smooth: constants::DEFAULT_SMOOTH,
            characters: constants::DEFAULT_CHARACTERS.to_string(),
        }
    }
}

impl GlitchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.glitch_speed_ms)
    }

    /// Replace unusable values with defaults, returning one message per fix.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();
        if self.glitch_speed_ms == 0 {
            fixes.push(format!(
                "glitch_speed_ms must be positive, using {}",
                constants::DEFAULT_GLITCH_SPEED_MS
            ));
            self.glitch_speed_ms = constants::DEFAULT_GLITCH_SPEED_MS;
        }
        if self.characters.chars().all(char::is_whitespace) {
            fixes.push("characters is empty, using the default alphabet".to_string());
            self.characters = constants::DEFAULT_CHARACTERS.to_string();
        }
        fixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GlitchConfig = serde_json::from_str(r#"{ "smooth": false }"#).unwrap();
        assert!(!config.smooth);
        assert_eq!(config.glitch_speed_ms, 50);
        assert_eq!(config.characters, constants::DEFAULT_CHARACTERS);
    }

    #[test]
    fn test_sanitize() {
        let mut config = GlitchConfig {
            glitch_speed_ms: 0,
            smooth: true,
            characters: "  ".to_string(),
        };
        assert_eq!(config.sanitize().len(), 2);
        assert_eq!(config, GlitchConfig::default());
        assert!(config.sanitize().is_empty());
    }
}
