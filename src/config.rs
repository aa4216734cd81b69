use std::fs;
use std::path::{Path, PathBuf};

use iced::Theme;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_API_URL: &str = "http://localhost:3002/api/";
pub const DEFAULT_DB_PATH: &str = "school_admin.db";

pub const ENV_API_URL: &str = "SCHOOL_ADMIN_API_URL";
pub const ENV_DATA_SOURCE: &str = "SCHOOL_ADMIN_DATA_SOURCE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Live,
    Mock,
}

impl DataSourceKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Some(Self::Live),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme_name: String,
    pub api_base_url: String,
    pub data_source: DataSourceKind,
    pub local_db_path: String,
    pub page_size: usize,
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme_name: "Light".to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            data_source: DataSourceKind::Live,
            local_db_path: DEFAULT_DB_PATH.to_string(),
            page_size: 5,
            path: None,
        }
    }
}

impl Config {
    /// Reads `path`. A missing or unreadable file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut config = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str::<Config>(&contents).unwrap_or_else(|error| {
                warn!(path = %path.display(), %error, "config unreadable, using defaults");
                Config::default()
            }),
            Err(_) => {
                info!(path = %path.display(), "no config file, using defaults");
                Config::default()
            }
        };
        config.path = Some(path.to_path_buf());
        config
    }

    /// Environment variables win over the file.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(raw) = var(ENV_DATA_SOURCE) {
            match DataSourceKind::parse(&raw) {
                Some(kind) => self.data_source = kind,
                None => warn!(value = %raw, "ignoring unknown {ENV_DATA_SOURCE}"),
            }
        }
        self.page_size = self.page_size.max(1);
        self
    }

    pub fn from_env() -> Self {
        Self::load(CONFIG_FILE).with_overrides(|key| std::env::var(key).ok())
    }

    pub fn theme(&self) -> Theme {
        theme_from_str(&self.theme_name).unwrap_or(Theme::Light)
    }

    pub fn set_theme(&mut self, theme: &Theme) {
        self.theme_name = theme_to_str(theme).to_string();
    }

    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

pub fn theme_from_str(name: &str) -> Option<Theme> {
    Theme::ALL
        .iter()
        .find(|t| theme_to_str(t).eq_ignore_ascii_case(name))
        .cloned()
}

pub fn theme_names() -> Vec<&'static str> {
    Theme::ALL.iter().map(theme_to_str).collect()
}

pub fn theme_to_str(theme: &Theme) -> &'static str {
    match theme {
        Theme::Light => "Light",
        Theme::Dark => "Dark",
        Theme::Dracula => "Dracula",
        Theme::Nord => "Nord",
        Theme::SolarizedLight => "SolarizedLight",
        Theme::SolarizedDark => "SolarizedDark",
        Theme::GruvboxLight => "GruvboxLight",
        Theme::GruvboxDark => "GruvboxDark",
        Theme::CatppuccinLatte => "CatppuccinLatte",
        Theme::CatppuccinFrappe => "CatppuccinFrappe",
        Theme::CatppuccinMacchiato => "CatppuccinMacchiato",
        Theme::CatppuccinMocha => "CatppuccinMocha",
        Theme::TokyoNight => "TokyoNight",
        Theme::TokyoNightStorm => "TokyoNightStorm",
        Theme::TokyoNightLight => "TokyoNightLight",
        Theme::KanagawaWave => "KanagawaWave",
        Theme::KanagawaDragon => "KanagawaDragon",
        Theme::KanagawaLotus => "KanagawaLotus",
        Theme::Moonfly => "Moonfly",
        Theme::Nightfly => "Nightfly",
        Theme::Oxocarbon => "Oxocarbon",
        Theme::Ferra => "Ferra",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = serde_json::from_str(r#"{"theme_name": "Dark", "data_source": "mock"}"#).unwrap();
        assert_eq!(config.theme(), Theme::Dark);
        assert_eq!(config.data_source, DataSourceKind::Mock);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn environment_overrides_file() {
        let config = Config { page_size: 0, ..Config::default() }.with_overrides(|key| match key {
            ENV_API_URL => Some("http://school.local/api/".into()),
            ENV_DATA_SOURCE => Some("MOCK".into()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "http://school.local/api/");
        assert_eq!(config.data_source, DataSourceKind::Mock);
        assert_eq!(config.page_size, 1);
    }

    #[test]
    fn unknown_theme_falls_back_to_light() {
        let config = Config { theme_name: "Neon".into(), ..Config::default() };
        assert_eq!(config.theme(), Theme::Light);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load("definitely/not/here/config.json");
        assert_eq!(config.data_source, DataSourceKind::Live);
        assert!(config.path.is_some());
    }
}
