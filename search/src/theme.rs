//! Process-wide presentation theme.
//!
//! Installed once at startup and read-only afterwards. Search state never
//! reads or writes it.

use once_cell::sync::OnceCell;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Value of the `data-bs-theme` attribute on the document root.
    pub fn attribute(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

static THEME: OnceCell<Theme> = OnceCell::new();

/// Sets the theme for the lifetime of the process. Returns `false` when a
/// theme was already installed; the first value stays in effect.
pub fn install(theme: Theme) -> bool {
    match THEME.set(theme) {
        Ok(()) => true,
        Err(rejected) => {
            warn!(
                "theme already installed as {}; ignoring {}",
                current().attribute(),
                rejected.attribute()
            );
            false
        }
    }
}

pub fn current() -> Theme {
    THEME.get().copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_install_wins() {
        // Shared static: this is the only test that installs a theme.
        assert!(install(Theme::Light));
        assert!(!install(Theme::Dark));
        assert_eq!(current(), Theme::Light);
        assert_eq!(current().attribute(), "light");
    }
}
