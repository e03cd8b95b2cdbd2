use crate::shared::constants;

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("de", "Deutsch"),
    ("en", "English"),
    ("es", "español"),
    ("fr", "français"),
    ("it", "italiano"),
    ("ja", "日本語"),
    ("pt", "português"),
];

// (language, region) -> region name in that language
const REGION_NAMES: &[(&str, &str, &str)] = &[
    ("de", "AT", "Österreich"),
    ("de", "CH", "Schweiz"),
    ("en", "GB", "United Kingdom"),
    ("en", "US", "United States"),
    ("es", "MX", "México"),
    ("fr", "CA", "Canada"),
    ("fr", "CH", "Suisse"),
    ("pt", "BR", "Brasil"),
];

/// Display label for a BCP-47 code in its own language, e.g.
/// `de-CH` -> `Deutsch (Schweiz)`. Unknown parts fall back to the raw code.
pub fn label_for(code: &str) -> String {
    let mut parts = code.splitn(2, '-');
    let lang = parts.next().unwrap_or_default();
    let region = parts.next();

    let mut label = LANGUAGE_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(lang))
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string());

    if let Some(region) = region {
        let region_name = REGION_NAMES
            .iter()
            .find(|(l, r, _)| l.eq_ignore_ascii_case(lang) && r.eq_ignore_ascii_case(region))
            .map(|(_, _, name)| *name)
            .unwrap_or(region);
        label.push_str(&format!(" ({})", region_name));
    }

    capitalize(&label)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Languages to offer: `current` first, then the other supported codes
/// deduplicated and ordered by label.
///
/// Codes that `current` starts with are dropped, so `de` is not offered
/// next to an active `de-CH`.
pub fn language_list(supported: &[&str], current: &str) -> Vec<String> {
    let mut rest: Vec<&str> = Vec::new();
    for &code in supported {
        if code.is_empty() || rest.contains(&code) || current.starts_with(code) {
            continue;
        }
        rest.push(code);
    }

    rest.sort_by_cached_key(|code| label_for(code).to_lowercase());

    std::iter::once(current.to_string())
        .chain(rest.into_iter().map(str::to_string))
        .collect()
}

/// `de_CH.UTF-8` -> `de-CH`. Returns `None` for the C/POSIX locales.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

fn match_supported(code: &str, supported: &[&str]) -> Option<String> {
    if let Some(exact) = supported.iter().find(|s| s.eq_ignore_ascii_case(code)) {
        return Some(exact.to_string());
    }
    let lang = code.split('-').next()?;
    supported
        .iter()
        .find(|s| s.eq_ignore_ascii_case(lang))
        .map(|s| s.to_string())
}

/// Active language: stored preference, then the environment locale, then English.
pub fn resolve_current(stored: Option<&str>, env_locale: Option<&str>, supported: &[&str]) -> String {
    stored
        .and_then(|code| match_supported(code, supported))
        .or_else(|| {
            env_locale
                .and_then(normalize_locale)
                .and_then(|code| match_supported(&code, supported))
        })
        .unwrap_or_else(|| constants::FALLBACK_LANGUAGE.to_string())
}

/// `resolve_current` against the process environment (`LC_ALL`, then `LANG`).
pub fn current_language(stored: Option<&str>) -> String {
    let env_locale = std::env::var("LC_ALL")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var("LANG").ok());
    resolve_current(stored, env_locale.as_deref(), constants::SUPPORTED_LANGUAGES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(label_for("de"), "Deutsch");
        assert_eq!(label_for("de-CH"), "Deutsch (Schweiz)");
        assert_eq!(label_for("es"), "Español");
        assert_eq!(label_for("pt-BR"), "Português (Brasil)");
        assert_eq!(label_for("xx"), "Xx");
        assert_eq!(label_for("de-LI"), "Deutsch (LI)");
    }

    #[test]
    fn test_current_first_then_sorted_by_label() {
        let list = language_list(&["fr", "en", "de", "es", "en"], "it");
        assert_eq!(list, vec!["it", "de", "en", "es", "fr"]);
    }

    #[test]
    fn test_prefixes_of_current_are_dropped() {
        let list = language_list(&["en", "de", "de-CH", "fr"], "de-CH");
        assert_eq!(list, vec!["de-CH", "en", "fr"]);
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("de_CH.UTF-8").as_deref(), Some("de-CH"));
        assert_eq!(normalize_locale("fr_FR@euro").as_deref(), Some("fr-FR"));
        assert_eq!(normalize_locale("C"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn test_resolve_current() {
        let supported = &["en", "de", "de-CH", "fr"];
        assert_eq!(resolve_current(Some("fr"), Some("de_CH.UTF-8"), supported), "fr");
        assert_eq!(resolve_current(None, Some("de_CH.UTF-8"), supported), "de-CH");
        assert_eq!(resolve_current(None, Some("fr_CA.UTF-8"), supported), "fr");
        assert_eq!(resolve_current(Some("xx"), Some("C"), supported), "en");
        assert_eq!(resolve_current(None, None, supported), "en");
    }
}
