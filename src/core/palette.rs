use serde::{Deserialize, Serialize};

/// Role-named chrome colors for one theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub text: String,
    pub muted_text: String,
    pub grid: String,
    pub axis: String,
    pub shadow: String,
    pub background: String,
    pub tooltip_background: String,
    pub tooltip_border: String,
}

/// Injected color tables. Implementations must be pure lookups.
pub trait PaletteProvider: Send + Sync {
    fn theme_colors(&self, is_dark: bool) -> ThemeColors;

    /// Cyclic series colors; never empty.
    fn series_colors(&self, is_dark: bool) -> &[String];
}

/// Builtin tables matching the engine's stock light and dark themes.
#[derive(Debug, Clone)]
pub struct DefaultPalette {
    light_series: Vec<String>,
    dark_series: Vec<String>,
}

const LIGHT_SERIES: [&str; 9] = [
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4",
    "#ea7ccc",
];

const DARK_SERIES: [&str; 9] = [
    "#4992ff", "#7cffb2", "#fddd60", "#ff6e76", "#58d9f9", "#05c091", "#ff8a45", "#8d48e3",
    "#dd79ff",
];

impl Default for DefaultPalette {
    fn default() -> Self {
        Self {
            light_series: LIGHT_SERIES.iter().map(|c| (*c).to_owned()).collect(),
            dark_series: DARK_SERIES.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

impl DefaultPalette {
    /// Replaces the series cycle for both themes. An empty list keeps the stock one.
    #[must_use]
    pub fn with_series_colors(mut self, light: Vec<String>, dark: Vec<String>) -> Self {
        if !light.is_empty() {
            self.light_series = light;
        }
        if !dark.is_empty() {
            self.dark_series = dark;
        }
        self
    }
}

impl PaletteProvider for DefaultPalette {
    fn theme_colors(&self, is_dark: bool) -> ThemeColors {
        if is_dark {
            ThemeColors {
                text: "#eeeeee".to_owned(),
                muted_text: "#a3a3a3".to_owned(),
                grid: "#484753".to_owned(),
                axis: "#b9b8ce".to_owned(),
                shadow: "rgba(0, 0, 0, 0.5)".to_owned(),
                background: "#100c2a".to_owned(),
                tooltip_background: "#1f1d36".to_owned(),
                tooltip_border: "#3d3b55".to_owned(),
            }
        } else {
            ThemeColors {
                text: "#333333".to_owned(),
                muted_text: "#6e7079".to_owned(),
                grid: "#e0e6f1".to_owned(),
                axis: "#6e7079".to_owned(),
                shadow: "rgba(0, 0, 0, 0.2)".to_owned(),
                background: "#ffffff".to_owned(),
                tooltip_background: "#ffffff".to_owned(),
                tooltip_border: "#dddddd".to_owned(),
            }
        }
    }

    fn series_colors(&self, is_dark: bool) -> &[String] {
        if is_dark {
            &self.dark_series
        } else {
            &self.light_series
        }
    }
}
