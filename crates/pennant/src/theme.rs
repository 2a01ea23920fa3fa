use std::fmt;

use serde::{Deserialize, Serialize};

/// The color mode a page is rendered in.
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Dark,
    Light,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the initial [`ColorMode`] from the reader's `prefers-color-scheme: dark`
/// preference.
///
/// `None` means no preference could be determined, as is always the case when
/// rendering ahead of time.
pub fn default_color_mode(prefers_dark: Option<bool>) -> ColorMode {
    match prefers_dark {
        Some(false) => ColorMode::Light,
        Some(true) | None => ColorMode::Dark,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_color_mode() {
        assert_eq!(default_color_mode(None), ColorMode::Dark);
        assert_eq!(default_color_mode(Some(true)), ColorMode::Dark);
        assert_eq!(default_color_mode(Some(false)), ColorMode::Light);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(ColorMode::Dark.toggled(), ColorMode::Light);
        assert_eq!(ColorMode::Light.toggled().as_str(), "dark");
    }
}
