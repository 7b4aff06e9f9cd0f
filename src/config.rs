use std::path::PathBuf;

const DEFAULT_MEDIA_DIR: &str = "media";
const DEFAULT_TITLE: &str = "Memories We Treasure";
const DEFAULT_LOADER_THREADS: usize = 2;
const MAX_LOADER_THREADS: usize = 8;

/// Startup settings, read once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    /// Root the built-in catalog is resolved against (`KEEPSAKE_MEDIA_DIR`).
    pub media_dir: PathBuf,
    /// Header title (`KEEPSAKE_TITLE`).
    pub title: String,
    /// Whether video tiles offer detached presentation (`KEEPSAKE_DETACHED`).
    pub detached_enabled: bool,
    /// Tile decode workers (`KEEPSAKE_LOADER_THREADS`).
    pub loader_threads: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from(DEFAULT_MEDIA_DIR),
            title: DEFAULT_TITLE.to_string(),
            detached_enabled: true,
            loader_threads: DEFAULT_LOADER_THREADS,
        }
    }
}

impl GalleryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            media_dir: lookup("KEEPSAKE_MEDIA_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.media_dir),
            title: lookup("KEEPSAKE_TITLE")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.title),
            detached_enabled: lookup("KEEPSAKE_DETACHED")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.detached_enabled),
            loader_threads: lookup("KEEPSAKE_LOADER_THREADS")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|v| *v > 0)
                .map(|v| v.min(MAX_LOADER_THREADS))
                .unwrap_or(defaults.loader_threads),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> GalleryConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GalleryConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, GalleryConfig::default());
        assert_eq!(config.media_dir, PathBuf::from("media"));
        assert!(config.detached_enabled);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("KEEPSAKE_MEDIA_DIR", "/srv/album"),
            ("KEEPSAKE_TITLE", "  Summer  "),
            ("KEEPSAKE_DETACHED", "off"),
            ("KEEPSAKE_LOADER_THREADS", "4"),
        ]);
        assert_eq!(config.media_dir, PathBuf::from("/srv/album"));
        assert_eq!(config.title, "Summer");
        assert!(!config.detached_enabled);
        assert_eq!(config.loader_threads, 4);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("KEEPSAKE_MEDIA_DIR", "  "),
            ("KEEPSAKE_TITLE", ""),
            ("KEEPSAKE_DETACHED", "maybe"),
            ("KEEPSAKE_LOADER_THREADS", "0"),
        ]);
        assert_eq!(config, GalleryConfig::default());

        let config = config_from(&[("KEEPSAKE_LOADER_THREADS", "64")]);
        assert_eq!(config.loader_threads, MAX_LOADER_THREADS);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
