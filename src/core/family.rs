use serde::{Deserialize, Serialize};

/// Structural kind of chart a specification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFamily {
    Bar,
    Line,
    Scatter,
    Pie,
    Funnel,
    Radar,
    BoxPlot,
    Candlestick,
    Heatmap,
    Tree,
    Treemap,
    Sunburst,
    Map,
    Parallel,
}

impl ChartFamily {
    pub const ALL: [Self; 14] = [
        Self::Bar,
        Self::Line,
        Self::Scatter,
        Self::Pie,
        Self::Funnel,
        Self::Radar,
        Self::BoxPlot,
        Self::Candlestick,
        Self::Heatmap,
        Self::Tree,
        Self::Treemap,
        Self::Sunburst,
        Self::Map,
        Self::Parallel,
    ];

    /// Registry tag, identical to the engine's series `type`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Pie => "pie",
            Self::Funnel => "funnel",
            Self::Radar => "radar",
            Self::BoxPlot => "boxplot",
            Self::Candlestick => "candlestick",
            Self::Heatmap => "heatmap",
            Self::Tree => "tree",
            Self::Treemap => "treemap",
            Self::Sunburst => "sunburst",
            Self::Map => "map",
            Self::Parallel => "parallel",
        }
    }

    /// Human label used when synthesizing item names (`"Bar 3"`).
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::Bar => "Bar",
            Self::Line => "Line",
            Self::Scatter => "Scatter",
            Self::Pie => "Pie",
            Self::Funnel => "Funnel",
            Self::Radar => "Radar",
            Self::BoxPlot => "Box",
            Self::Candlestick => "Candle",
            Self::Heatmap => "Cell",
            Self::Tree => "Node",
            Self::Treemap => "Treemap",
            Self::Sunburst => "Sunburst",
            Self::Map => "Region",
            Self::Parallel => "Line",
        }
    }

    /// Parses a free-form tag, case-insensitively, accepting common aliases.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let family = match normalized.as_str() {
            "bar" => Self::Bar,
            "line" => Self::Line,
            "scatter" | "effectscatter" => Self::Scatter,
            "pie" | "donut" => Self::Pie,
            "funnel" => Self::Funnel,
            "radar" => Self::Radar,
            "boxplot" | "box" => Self::BoxPlot,
            "candlestick" | "k" | "ohlc" => Self::Candlestick,
            "heatmap" => Self::Heatmap,
            "tree" => Self::Tree,
            "treemap" => Self::Treemap,
            "sunburst" => Self::Sunburst,
            "map" | "geo" => Self::Map,
            "parallel" => Self::Parallel,
            _ => return None,
        };
        Some(family)
    }

    /// Canonical registry key for any tag: builtin aliases collapse to the
    /// builtin tag, unknown tags are lowercased verbatim.
    #[must_use]
    pub fn registry_key(tag: &str) -> String {
        Self::parse(tag).map_or_else(
            || tag.trim().to_lowercase(),
            |family| family.as_str().to_owned(),
        )
    }

    #[must_use]
    pub const fn is_cartesian(self) -> bool {
        matches!(
            self,
            Self::Bar
                | Self::Line
                | Self::Scatter
                | Self::BoxPlot
                | Self::Candlestick
                | Self::Heatmap
        )
    }

    #[must_use]
    pub const fn is_hierarchical(self) -> bool {
        matches!(self, Self::Tree | Self::Treemap | Self::Sunburst)
    }

    /// Families whose values add up along a category (grand total in detail mode).
    #[must_use]
    pub const fn is_additive(self) -> bool {
        matches!(self, Self::Bar)
    }

    /// Families with an axis-triggered detail tooltip.
    #[must_use]
    pub const fn supports_detail(self) -> bool {
        matches!(
            self,
            Self::Bar | Self::Line | Self::Scatter | Self::BoxPlot | Self::Candlestick
        )
    }
}

impl std::fmt::Display for ChartFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light/dark presentation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    #[must_use]
    pub const fn from_dark_flag(is_dark: bool) -> Self {
        if is_dark { Self::Dark } else { Self::Light }
    }
}

#[cfg(test)]
mod tests {
    use super::ChartFamily;

    #[test]
    fn aliases_collapse_to_builtin_tags() {
        assert_eq!(ChartFamily::parse("K"), Some(ChartFamily::Candlestick));
        assert_eq!(ChartFamily::parse("box-plot"), Some(ChartFamily::BoxPlot));
        assert_eq!(ChartFamily::parse(" TreeMap "), Some(ChartFamily::Treemap));
        assert_eq!(ChartFamily::registry_key("boxPlot"), "boxplot");
        assert_eq!(ChartFamily::registry_key("Gantt"), "gantt");
    }

    #[test]
    fn every_builtin_tag_round_trips_through_parse() {
        for family in ChartFamily::ALL {
            assert_eq!(ChartFamily::parse(family.as_str()), Some(family));
        }
    }
}
