use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;

use crate::{Config, ConfigError};

const CONFIG_FILE: &str = "config.json";
const BACKUPS_DIR: &str = "backups";
const BACKUP_PREFIX: &str = "config_";
const BACKUP_SUFFIX: &str = ".json";
/// `20250102T093000`: sorts chronologically as plain text.
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";
const STAMP_LEN: usize = 15;

/// Reads and writes `config.json` inside one directory, with backups kept in
/// `backups/` next to it.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    dir: PathBuf,
}

impl ConfigManager {
    /// Manager for `dir`, creating it and its backups folder when missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let manager = Self { dir: dir.into() };
        fs::create_dir_all(manager.backups_dir())?;
        Ok(manager)
    }

    /// Manager for `<home>/config`, home being [`Config::resolve_home_dir`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::open(Config::resolve_home_dir().join("config"))
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.dir.join(BACKUPS_DIR)
    }

    /// Stored preferences, or the defaults when nothing was saved yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let path = self.config_path();
        if path.exists() {
            read_config(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Writes a sibling `.tmp` file, then renames it over `config.json`.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let path = self.config_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, to_json(config)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<Config, ConfigError> {
        let mut config = self.load()?;
        config.set_value(key, value)?;
        self.save(&config)?;
        Ok(config)
    }

    /// Stores a copy of `config` as `config_<stamp>[_<note>].json` and returns that name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, ConfigError> {
        let stamp = Utc::now().format(STAMP_FORMAT).to_string();
        let stem = match note.and_then(slug) {
            Some(slug) => format!("{BACKUP_PREFIX}{stamp}_{slug}"),
            None => format!("{BACKUP_PREFIX}{stamp}"),
        };
        let dir = self.backups_dir();
        let mut name = format!("{stem}{BACKUP_SUFFIX}");
        let mut attempt = 1;
        while dir.join(&name).exists() {
            attempt += 1;
            name = format!("{stem}-{attempt}{BACKUP_SUFFIX}");
        }
        fs::write(dir.join(&name), to_json(config)?)?;
        Ok(name)
    }

    /// Makes the named backup the current config.
    pub fn restore(&self, name: &str) -> Result<Config, ConfigError> {
        let path = self.backups_dir().join(name);
        if backup_stamp(name).is_none() || !path.is_file() {
            return Err(ConfigError::BackupNotFound(name.to_string()));
        }
        let config = read_config(&path)?;
        self.save(&config)?;
        Ok(config)
    }

    /// Backup names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, ConfigError> {
        let dir = self.backups_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if backup_stamp(&name).is_some() {
                names.push(name);
            }
        }
        names.sort_by(|a, b| backup_stamp(b).cmp(&backup_stamp(a)).then_with(|| b.cmp(a)));
        Ok(names)
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
}

fn to_json(config: &Config) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(config).map_err(|err| ConfigError::Serde(err.to_string()))
}

/// Lowercase alphanumeric words joined by `-`.
fn slug(note: &str) -> Option<String> {
    let words: Vec<String> = note
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    (!words.is_empty()).then(|| words.join("-"))
}

/// The timestamp part of a backup file name, `None` for anything else.
fn backup_stamp(name: &str) -> Option<&str> {
    if name.contains(['/', '\\']) {
        return None;
    }
    let rest = name
        .strip_suffix(BACKUP_SUFFIX)?
        .strip_prefix(BACKUP_PREFIX)?;
    let stamp = rest.get(..STAMP_LEN)?;
    let well_formed = stamp
        .char_indices()
        .all(|(i, ch)| if i == 8 { ch == 'T' } else { ch.is_ascii_digit() });
    let tail_ok = matches!(rest.as_bytes().get(STAMP_LEN), None | Some(b'_' | b'-'));
    (well_formed && tail_ok).then_some(stamp)
}
