use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{ChartFamily, RawDataItem, ThemeMode};

use super::TooltipKey;

/// Sparse chart description as supplied by a caller.
///
/// Every field is optional; unknown top-level keys are preserved in `extra`
/// and passed through to the canonical configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartSpecification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolbox: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Value>,
    pub series: Vec<RawSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_axis: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radar: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_map: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One raw series: a family tag plus raw data items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSeries {
    #[serde(rename = "type", alias = "family", skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub data: Vec<RawDataItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl RawSeries {
    #[must_use]
    pub fn new(family: impl Into<String>, data: Vec<RawDataItem>) -> Self {
        Self {
            family: Some(family.into()),
            data,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Builtin family of this series, if its tag names one.
    #[must_use]
    pub fn builtin_family(&self) -> Option<ChartFamily> {
        self.family.as_deref().and_then(ChartFamily::parse)
    }
}

impl ChartSpecification {
    #[must_use]
    pub fn new(chart_family: impl Into<String>) -> Self {
        Self {
            chart_family: Some(chart_family.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_series(mut self, series: RawSeries) -> Self {
        self.series.push(series);
        self
    }

    #[must_use]
    pub fn with_tooltip_key(mut self, key: impl Into<String>) -> Self {
        self.tooltip_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn with_map(mut self, map_id: impl Into<String>) -> Self {
        self.map = Some(map_id.into());
        self
    }

    /// Declared family, falling back to the first series tag.
    #[must_use]
    pub fn family_tag(&self) -> Option<&str> {
        self.chart_family
            .as_deref()
            .or_else(|| self.series.iter().find_map(|s| s.family.as_deref()))
            .filter(|tag| !tag.trim().is_empty())
    }

    /// Explicit `theme`, else the tooltip key's `Dark`/`Light` suffix, else light.
    #[must_use]
    pub fn theme_mode(&self) -> ThemeMode {
        self.theme.unwrap_or_else(|| {
            self.tooltip_key
                .as_deref()
                .map_or(ThemeMode::Light, |declared| {
                    TooltipKey::parse(declared, "").theme
                })
        })
    }

    /// Map identifier from the top level or the first series that names one.
    #[must_use]
    pub fn map_id(&self) -> Option<&str> {
        self.map
            .as_deref()
            .or_else(|| self.series.iter().find_map(|s| s.map.as_deref()))
            .filter(|id| !id.trim().is_empty())
    }
}
