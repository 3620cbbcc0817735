//! Display theme resolution and persistence.
//!
//! The studio presents in one of two themes, `light` or `dark`. The active
//! theme is resolved once at session start: a stored preference wins, and
//! only when none exists is the host's ambient color-scheme signal
//! consulted. Every explicit toggle is written back to storage so the
//! choice survives the session.
//!
//! Storage and the ambient signal are injected through the [`ThemeStore`]
//! and [`ColorSchemeProbe`] traits so tests can substitute both. The
//! production store keeps a single file holding the literal string `light`
//! or `dark`; a write failure there is logged and swallowed, and the
//! in-memory theme stays authoritative for the session.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Storage key / file name for the persisted preference.
pub const THEME_KEY: &str = "theme";

/// Environment variable consulted for the ambient color-scheme signal.
///
/// Stands in for the host's `prefers-color-scheme` query: set to `dark`
/// to indicate the host prefers dark presentation.
pub const COLOR_SCHEME_ENV: &str = "RECAP_COLOR_SCHEME";

/// The display theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light presentation.
    Light,
    /// Dark presentation.
    Dark,
}

impl Theme {
    /// Returns the opposite theme. An involution: toggling twice is identity.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

/// Durable storage for the theme preference.
pub trait ThemeStore {
    /// Read the stored preference. `None` when absent or invalid.
    fn load(&self) -> Option<Theme>;

    /// Write the preference, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage is unavailable. The
    /// caller treats this as best-effort and keeps the in-memory value.
    fn save(&self, theme: Theme) -> std::io::Result<()>;
}

/// Ambient color-scheme signal from the host environment.
pub trait ColorSchemeProbe {
    /// Whether the host prefers dark presentation.
    fn prefers_dark(&self) -> bool;
}

/// File-backed theme store: one file holding `light` or `dark`.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    /// Create a store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the default location (`config_dir()/theme`).
    #[must_use]
    pub fn at_default_path() -> Self {
        Self::new(crate::recap_dirs::theme_file())
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Option<Theme> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        content.parse().ok()
    }

    fn save(&self, theme: Theme) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, theme.to_string())
    }
}

/// Probe reading the [`COLOR_SCHEME_ENV`] environment variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvColorSchemeProbe;

impl ColorSchemeProbe for EnvColorSchemeProbe {
    fn prefers_dark(&self) -> bool {
        std::env::var(COLOR_SCHEME_ENV).is_ok_and(|v| v.trim().eq_ignore_ascii_case("dark"))
    }
}

/// Owns the active theme and keeps it synchronized between in-memory
/// state, the dark root marker, and durable storage.
pub struct ThemeController {
    theme: Theme,
    dark_root: bool,
    store: Box<dyn ThemeStore>,
}

impl ThemeController {
    /// Resolve the initial theme and construct the controller.
    ///
    /// A stored preference always wins; otherwise the ambient probe
    /// decides. The resolved theme is applied immediately so the root
    /// marker is correct before any themed output.
    pub fn resolve(store: Box<dyn ThemeStore>, probe: &dyn ColorSchemeProbe) -> Self {
        let theme = store.load().unwrap_or_else(|| {
            if probe.prefers_dark() {
                Theme::Dark
            } else {
                Theme::Light
            }
        });
        let mut controller = Self {
            theme,
            dark_root: false,
            store,
        };
        controller.apply(theme);
        controller
    }

    /// The active theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// The root-level presentation marker: set when the theme is dark.
    #[must_use]
    pub fn dark_root(&self) -> bool {
        self.dark_root
    }

    /// Apply a theme to the in-memory state and root marker. Idempotent.
    pub fn apply(&mut self, theme: Theme) {
        self.theme = theme;
        self.dark_root = theme == Theme::Dark;
    }

    /// Flip the theme, apply it, and persist the new value.
    ///
    /// Persistence is best-effort: a storage failure is logged at debug
    /// level and the in-memory theme remains authoritative.
    pub fn toggle(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.apply(next);
        if let Err(e) = self.store.save(next) {
            tracing::debug!(error = %e, "theme preference write failed; keeping in-memory value");
        }
        next
    }
}

impl std::fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("theme", &self.theme)
            .field("dark_root", &self.dark_root)
            .finish_non_exhaustive()
    }
}
