use serde::{Deserialize, Serialize};

use crate::core::{ChartFamily, ThemeMode};

/// Tooltip detail level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipMode {
    /// Describes the hovered item only.
    #[default]
    Summary,
    /// Describes every series sharing the hovered category.
    Detail,
}

/// Formatter lookup key: `(family, theme, mode)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TooltipKey {
    pub family: String,
    pub theme: ThemeMode,
    pub mode: TooltipMode,
}

const DARK_SUFFIX: &str = "dark";
const LIGHT_SUFFIX: &str = "light";
const DETAIL_SUFFIX: &str = "detail";

impl TooltipKey {
    #[must_use]
    pub fn new(family: &str, theme: ThemeMode, mode: TooltipMode) -> Self {
        Self {
            family: ChartFamily::registry_key(family),
            theme,
            mode,
        }
    }

    /// Parses a declared key such as `barDark`, `pieLightDetail` or
    /// `lineDetailDark`. Suffixes match case-insensitively in any order and
    /// may be separated by `_`, `-` or `.`. An empty family part falls back
    /// to `fallback_family`; a missing theme suffix means light.
    #[must_use]
    pub fn parse(declared: &str, fallback_family: &str) -> Self {
        Self::parse_with_theme(declared, fallback_family, ThemeMode::Light)
    }

    /// Like [`TooltipKey::parse`], but a key without a theme suffix takes
    /// `fallback_theme`.
    #[must_use]
    pub fn parse_with_theme(
        declared: &str,
        fallback_family: &str,
        fallback_theme: ThemeMode,
    ) -> Self {
        let mut rest = declared.trim();
        let mut theme = None;
        let mut mode = TooltipMode::Summary;

        loop {
            rest = rest.trim_end_matches(['_', '-', '.', ' ']);
            if let Some(stripped) = strip_suffix_ignore_case(rest, DARK_SUFFIX) {
                theme.get_or_insert(ThemeMode::Dark);
                rest = stripped;
            } else if let Some(stripped) = strip_suffix_ignore_case(rest, LIGHT_SUFFIX) {
                theme.get_or_insert(ThemeMode::Light);
                rest = stripped;
            } else if let Some(stripped) = strip_suffix_ignore_case(rest, DETAIL_SUFFIX) {
                mode = TooltipMode::Detail;
                rest = stripped;
            } else {
                break;
            }
        }

        let family = if rest.is_empty() { fallback_family } else { rest };
        Self::new(family, theme.unwrap_or(fallback_theme), mode)
    }

    /// Key string in the declared convention, e.g. `barDarkDetail`.
    #[must_use]
    pub fn declared(&self) -> String {
        let theme = match self.theme {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
        };
        let mode = match self.mode {
            TooltipMode::Summary => "",
            TooltipMode::Detail => "Detail",
        };
        format!("{}{theme}{mode}", self.family)
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

#[cfg(test)]
mod tests {
    use super::{TooltipKey, TooltipMode};
    use crate::core::ThemeMode;

    #[test]
    fn suffixes_parse_in_either_order() {
        let a = TooltipKey::parse("barDarkDetail", "pie");
        let b = TooltipKey::parse("bar_detail_dark", "pie");
        assert_eq!(a, b);
        assert_eq!(a.family, "bar");
        assert_eq!(a.theme, ThemeMode::Dark);
        assert_eq!(a.mode, TooltipMode::Detail);
    }

    #[test]
    fn bare_suffix_falls_back_to_config_family() {
        let key = TooltipKey::parse("Dark", "treemap");
        assert_eq!(key.family, "treemap");
        assert_eq!(key.mode, TooltipMode::Summary);
    }

    #[test]
    fn last_theme_suffix_wins() {
        let key = TooltipKey::parse("pieLightDark", "");
        assert_eq!(key.theme, ThemeMode::Dark);
        assert_eq!(key.declared(), "pieDark");
    }

    #[test]
    fn missing_theme_suffix_takes_fallback() {
        let key = TooltipKey::parse_with_theme("lineDetail", "bar", ThemeMode::Dark);
        assert_eq!(key.family, "line");
        assert!(key.is_dark());
    }

    #[test]
    fn aliases_normalize_family() {
        assert_eq!(TooltipKey::parse("kLight", "").family, "candlestick");
    }
}
