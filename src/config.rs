use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "BINGO_CONFIG";
const CONFIG_FILE: &str = "bingo.json";
const APP_DIR: &str = "bingo-hall";

// Every key is optional, e.g.
// {
//    "draw_delay_ms": 1000,
//    "seed": 42,
//    "render_path": "bingo_card.png"
// }
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub draw_delay_ms: u64,
    pub spinner_frame_ms: u64,
    pub seed: Option<u64>,
    pub render_path: PathBuf,
    pub font_path: Option<PathBuf>,
    pub font_px: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            draw_delay_ms: 1000,
            spinner_frame_ms: 100,
            seed: None,
            render_path: PathBuf::from("bingo_card.png"),
            font_path: None,
            font_px: 36.0,
        }
    }
}

impl GameConfig {
    pub fn draw_delay(&self) -> Duration {
        Duration::from_millis(self.draw_delay_ms)
    }

    pub fn spinner_frame(&self) -> Duration {
        Duration::from_millis(self.spinner_frame_ms.max(1))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

pub fn read_config_from_json(path: &Path) -> Result<GameConfig, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `<config dir>/bingo-hall/bingo.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Loads the config from an explicit path, or from the default location.
///
/// An explicit path must exist; a missing default file just means defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<GameConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config_from_json(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => read_config_from_json(&path),
        _ => Ok(GameConfig::default()),
    }
}
