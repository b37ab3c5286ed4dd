use serde::Serialize;
use std::collections::BTreeMap;

pub const THEME_KEY: &str = "lab-site-theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }

    pub fn pressed(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "◑",
            Self::Light => "◐",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("persistent storage is unavailable")]
    Unavailable,

    #[error("persistent storage rejected the operation: {0}")]
    Rejected(String),
}

/// Key-value backend for the persisted theme name.
pub trait ThemeStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Current theme plus an optional persistent backend.
///
/// The backend is dropped the first time it fails, after which the store
/// keeps working in memory for the rest of the session.
pub struct ThemeStore<S> {
    storage: Option<S>,
    current: Theme,
}

impl<S: ThemeStorage> ThemeStore<S> {
    pub fn load(storage: Option<S>) -> Self {
        let Some(storage) = storage else {
            return Self::in_memory();
        };

        match storage.read(THEME_KEY) {
            Ok(value) => Self {
                current: value.as_deref().and_then(Theme::parse).unwrap_or_default(),
                storage: Some(storage),
            },
            Err(_) => Self::in_memory(),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            storage: None,
            current: Theme::default(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.current
    }

    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// Returns the storage error when the write failed; the theme is
    /// updated either way.
    pub fn set_theme(&mut self, next: Theme) -> Result<(), StorageError> {
        self.current = next;

        let Some(storage) = self.storage.as_ref() else {
            return Ok(());
        };

        if let Err(err) = storage.write(THEME_KEY, next.as_str()) {
            self.storage = None;
            return Err(err);
        }

        Ok(())
    }

    pub fn toggle(&mut self) -> Result<Theme, StorageError> {
        let next = self.current.toggled();
        self.set_theme(next).map(|_| next)
    }
}

/// Ordered mapping of CSS custom property name to colour value.
pub type ThemeVariables = BTreeMap<&'static str, String>;

pub const THEME_VARIABLE_NAMES: [&str; 6] =
    ["--bg", "--surface", "--fg", "--muted", "--accent", "--hairline"];

pub fn normalize_hue(hue: f64) -> f64 {
    if !hue.is_finite() {
        return 0.0;
    }
    let normalized = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

pub fn compute_theme_variables(seed_hue: f64, theme: Theme) -> ThemeVariables {
    let h = normalize_hue(seed_hue).round();
    let hsl = |s: u8, l: u8| format!("hsl({h:.0} {s}% {l}%)");
    let hsla = |s: u8, l: u8, a: f64| format!("hsl({h:.0} {s}% {l}% / {a:.2})");

    let entries = match theme {
        Theme::Dark => [
            hsl(18, 7),
            hsl(16, 11),
            hsl(20, 92),
            hsl(10, 64),
            hsl(85, 62),
            hsla(20, 80, 0.14),
        ],
        Theme::Light => [
            hsl(30, 97),
            hsl(25, 100),
            hsl(25, 12),
            hsl(12, 38),
            hsl(75, 42),
            hsla(25, 15, 0.12),
        ],
    };

    THEME_VARIABLE_NAMES.into_iter().zip(entries).collect()
}
