use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;

/// Theme variant, persisted as its integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeVariant {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeVariant {
    pub fn code(self) -> u8 {
        match self {
            ThemeVariant::System => 0,
            ThemeVariant::Light => 1,
            ThemeVariant::Dark => 2,
        }
    }

    /// Unknown codes (a file written by a newer build) clamp to the
    /// default rather than erroring.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => ThemeVariant::Light,
            2 => ThemeVariant::Dark,
            _ => ThemeVariant::System,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub dynamic_color: bool,
    pub theme: ThemeVariant,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dynamic_color: true,
            theme: ThemeVariant::System,
        }
    }
}

/// On-disk shape: the two persisted keys.
#[derive(Serialize, Deserialize)]
struct SettingsFile {
    dynamic_color: bool,
    theme: u8,
}

/// The two app preferences in a small JSON file. Reads never fail — a
/// missing or unreadable file means defaults. Writes persist first,
/// then publish to watchers.
pub struct SettingsStore {
    path: PathBuf,
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let initial = read_settings(&path);
        let (tx, _) = watch::channel(initial);
        Self { path, tx }
    }

    pub fn current(&self) -> Settings {
        *self.tx.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    pub fn set_dynamic_color(&self, value: bool) -> Result<()> {
        self.update(|settings| settings.dynamic_color = value)
    }

    pub fn set_theme(&self, theme: ThemeVariant) -> Result<()> {
        self.update(|settings| settings.theme = theme)
    }

    fn update(&self, mutate: impl FnOnce(&mut Settings)) -> Result<()> {
        let mut next = self.current();
        mutate(&mut next);
        write_settings(&self.path, next)?;
        let _ = self.tx.send(next);
        Ok(())
    }
}

fn read_settings(path: &Path) -> Settings {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        // Most commonly "file not found" on first launch.
        Err(_) => return Settings::default(),
    };

    match serde_json::from_str::<SettingsFile>(&raw) {
        Ok(file) => Settings {
            dynamic_color: file.dynamic_color,
            theme: ThemeVariant::from_code(file.theme),
        },
        Err(e) => {
            warn!("settings file unreadable, using defaults: {e}");
            Settings::default()
        }
    }
}

fn write_settings(path: &Path, settings: Settings) -> Result<()> {
    let file = SettingsFile {
        dynamic_color: settings.dynamic_color,
        theme: settings.theme.code(),
    };
    std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
    Ok(())
}
