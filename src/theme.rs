//! Light/dark theme preference, persisted under the `theme` key.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::storage::{LocalStorage, StorageError};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

/// Background and text colours for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background_default: &'static str,
    pub background_paper: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
}

const LIGHT: Palette = Palette {
    background_default: "#ffffff",
    background_paper: "#f5f5f5",
    text_primary: "#000000",
    text_secondary: "#555555",
};

const DARK: Palette = Palette {
    background_default: "#121212",
    background_paper: "#1e1e1e",
    text_primary: "#ffffff",
    text_secondary: "#b0b0b0",
};

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            ThemeMode::Light => LIGHT,
            ThemeMode::Dark => DARK,
        }
    }

    /// Reads the stored mode. Anything unreadable or unrecognised means dark.
    pub fn load(storage: &dyn LocalStorage) -> ThemeMode {
        match storage.get_item(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                debug!("Ignoring unknown stored theme '{}'", raw);
                ThemeMode::default()
            }),
            Ok(None) => ThemeMode::default(),
            Err(e) => {
                warn!("Could not read the stored theme: {}", e);
                ThemeMode::default()
            }
        }
    }

    pub fn store(&self, storage: &dyn LocalStorage) -> Result<(), StorageError> {
        storage.set_item(THEME_KEY, self.as_str())
    }

    /// Flips the stored mode and returns the new one.
    pub fn toggle(storage: &dyn LocalStorage) -> Result<ThemeMode, StorageError> {
        let next = ThemeMode::load(storage).toggled();
        next.store(storage)?;
        Ok(next)
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("Unknown theme '{}'", other)),
        }
    }
}
