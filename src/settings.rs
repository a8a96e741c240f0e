use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tauri::AppHandle;
use tauri::Manager;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SearchEngine {
    #[default]
    Google,
    DuckDuckGo,
    Bing,
    Brave,
}

impl SearchEngine {
    /// Builds the results URL for `query`.
    ///
    /// Spaces become `+`; every other character is inserted as typed, so
    /// `&` or `#` in a query end up changing the URL's meaning.
    pub fn query_url(&self, query: &str) -> String {
        let q = query.replace(' ', "+");
        match self {
            Self::Google => format!("https://www.google.com/search?q={}", q),
            Self::DuckDuckGo => format!("https://duckduckgo.com/?q={}", q),
            Self::Bing => format!("https://www.bing.com/search?q={}", q),
            Self::Brave => format!("https://search.brave.com/search?q={}", q),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub homepage: String,
    pub search_engine: SearchEngine,
    /// Overrides the platform download directory when set.
    pub download_dir: Option<PathBuf>,
    pub open_completed_downloads: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            homepage: "https://www.google.com".to_string(),
            search_engine: SearchEngine::default(),
            download_dir: None,
            open_completed_downloads: cfg!(target_os = "windows"),
        }
    }
}

impl Settings {
    pub fn get_path(app: &AppHandle) -> Option<PathBuf> {
        app.path()
            .app_data_dir()
            .ok()
            .map(|dir| dir.join("settings.json"))
    }

    /// Loads settings for the app, writing the defaults out on first launch.
    pub fn load_or_init(app: &AppHandle) -> Self {
        let Some(path) = Self::get_path(app) else {
            log::warn!("[Settings] No app data dir, using defaults");
            return Self::default();
        };

        if path.exists() {
            return Self::load_from(&path);
        }

        let settings = Self::default();
        if let Err(e) = settings.save_to(&path) {
            log::warn!("[Settings] Failed to write defaults to {}: {}", path.display(), e);
        }
        settings
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("[Settings] Failed to parse settings: {}, returning defaults", e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("[Settings] Failed to read file: {}, returning defaults", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        let tmp_path = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        // Write to tmp, then rename, so a crash never leaves half a file behind.
        fs::write(&tmp_path, json).map_err(|e| e.to_string())?;
        fs::rename(tmp_path, path).map_err(|e| e.to_string())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SearchEngine::Google, "https://www.google.com/search?q=rust+lang")]
    #[case(SearchEngine::DuckDuckGo, "https://duckduckgo.com/?q=rust+lang")]
    #[case(SearchEngine::Bing, "https://www.bing.com/search?q=rust+lang")]
    #[case(SearchEngine::Brave, "https://search.brave.com/search?q=rust+lang")]
    fn test_query_url(#[case] engine: SearchEngine, #[case] expected: &str) {
        assert_eq!(engine.query_url("rust lang"), expected);
    }

    #[test]
    fn test_query_url_is_not_percent_encoded() {
        assert_eq!(
            SearchEngine::Google.query_url("c++ & café"),
            "https://www.google.com/search?q=c+++&+café"
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "search_engine": "DuckDuckGo" }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.search_engine, SearchEngine::DuckDuckGo);
        assert_eq!(settings.homepage, "https://www.google.com");
        assert_eq!(settings.download_dir, None);
    }

    #[test]
    fn test_malformed_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.homepage = "https://example.org".to_string();

        settings.save_to(&path).unwrap();

        assert!(!path.with_extension("tmp").exists());
        assert_eq!(Settings::load_from(&path).homepage, "https://example.org");
    }
}
