use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::{CanonicalDataItem, ChartFamily, ThemeMode};
use crate::render::{TooltipFormatter, TooltipInput};

/// Gap-free configuration in the rendering engine's option schema.
///
/// Produced fresh by every transformation; the caller owns it outright.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalChartConfig {
    /// Registry key the configuration was resolved under (e.g. `candlestick`).
    pub chart_family: String,
    pub theme: ThemeMode,
    pub background_color: String,
    pub color: Vec<String>,
    pub text_style: Value,
    pub title: Value,
    pub legend: Value,
    pub toolbox: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_axis: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub y_axis: Vec<Value>,
    pub series: Vec<CanonicalSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip_key: Option<String>,
    pub tooltip: TooltipBlock,
    #[serde(flatten)]
    pub family_blocks: FamilyBlocks,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalChartConfig {
    #[must_use]
    pub fn family(&self) -> Option<ChartFamily> {
        ChartFamily::parse(&self.chart_family)
    }

    #[must_use]
    pub fn has_stacked_series(&self) -> bool {
        self.series.iter().any(|series| series.stack().is_some())
    }

    /// Invokes the installed tooltip formatter; empty when none is installed.
    #[must_use]
    pub fn render_tooltip(&self, input: TooltipInput<'_>) -> String {
        self.tooltip
            .formatter
            .as_ref()
            .map(|formatter| formatter.render(input))
            .unwrap_or_default()
    }
}

/// One resolved series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalSeries {
    #[serde(rename = "type")]
    pub family: String,
    pub name: String,
    pub data: Vec<CanonicalDataItem>,
    #[serde(flatten)]
    pub layout: SeriesLayout,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl CanonicalSeries {
    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        match &self.layout {
            SeriesLayout::Cartesian { stack, .. } => stack.as_deref(),
            _ => None,
        }
    }
}

/// Per-family layout keys flattened into the series object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesLayout {
    #[serde(rename_all = "camelCase")]
    Cartesian {
        x_axis_index: usize,
        y_axis_index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        stack: Option<String>,
    },
    Radial {
        radius: Value,
        center: Value,
    },
    Funnel {
        sort: String,
        gap: f64,
        left: Value,
        width: Value,
    },
    #[serde(rename_all = "camelCase")]
    Radar { radar_index: usize },
    Hierarchical { levels: Vec<Value> },
    #[serde(rename_all = "camelCase")]
    Geo { map: String, geo_index: usize },
    #[serde(rename_all = "camelCase")]
    Parallel { parallel_index: usize },
}

/// Top-level blocks only some families carry.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyBlocks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_axis: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_map: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radar: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipTrigger {
    #[default]
    Item,
    Axis,
    #[serde(rename = "none")]
    Disabled,
}

/// Tooltip trigger, styling and the installed render function.
///
/// `formatter` is a function value and never serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TooltipBlock {
    pub trigger: TooltipTrigger,
    #[serde(flatten)]
    pub options: Map<String, Value>,
    #[serde(skip)]
    pub formatter: Option<TooltipFormatter>,
}

impl TooltipBlock {
    /// Caller options minus the keys this block owns.
    #[must_use]
    pub fn from_user(user: Option<&Value>, trigger: TooltipTrigger) -> Self {
        let mut options = user
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        options.remove("trigger");
        options.remove("formatter");
        Self {
            trigger,
            options,
            formatter: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::{CanonicalSeries, SeriesLayout, TooltipBlock, TooltipTrigger};

    #[test]
    fn layout_keys_flatten_into_series_object() {
        let series = CanonicalSeries {
            family: "bar".to_owned(),
            name: "Sales".to_owned(),
            data: Vec::new(),
            layout: SeriesLayout::Cartesian {
                x_axis_index: 0,
                y_axis_index: 0,
                stack: Some("total".to_owned()),
            },
            options: Map::new(),
        };
        let value = serde_json::to_value(&series).expect("serialize series");
        assert_eq!(value["type"], "bar");
        assert_eq!(value["xAxisIndex"], 0);
        assert_eq!(value["stack"], "total");
        assert_eq!(series.stack(), Some("total"));
    }

    #[test]
    fn tooltip_block_drops_owned_user_keys() {
        let block = TooltipBlock::from_user(
            Some(&json!({"trigger": "none", "formatter": "{b}", "confine": false})),
            TooltipTrigger::Axis,
        );
        let value = serde_json::to_value(&block).expect("serialize tooltip");
        assert_eq!(value, json!({"trigger": "axis", "confine": false}));
    }
}
