use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    env_subst::substitute_env,
    error::{Context, Error, Result},
    schema::ShelterBotConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "shelter-bot.toml",
    "shelter-bot.yaml",
    "shelter-bot.yml",
    "shelter-bot.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<ShelterBotConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = parse_config(&substitute_env(&raw), path)?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./shelter-bot.{toml,yaml,yml,json}`
/// 2. `<user config dir>/shelter-bot/shelter-bot.{toml,yaml,yml,json}`
///
/// Returns `ShelterBotConfig::default()` if no config file is found.
pub fn discover_and_load() -> Result<ShelterBotConfig> {
    match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path)
        },
        None => {
            debug!("no config file found, using defaults");
            Ok(ShelterBotConfig::default())
        },
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|path| path.exists())
}

/// The user-global config directory, e.g. `~/.config/shelter-bot/`.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "shelter-bot").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<ShelterBotConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::UnsupportedFormat {
            extension: extension.to_string(),
        }),
    }
}
