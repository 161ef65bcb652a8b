//! Per-family shape rules turning raw items into canonical items.
//!
//! Every family shares one normalizer; families differ only in their
//! [`ShapeRule`]: tuple schema, how palette colors are handed out, whether
//! `children` are honored, and default border width.
//!
//! Precedence for each raw item:
//! 1. records keep every caller-set style field, defaults fill the rest;
//! 2. bare numbers get a positional name (`"Bar 3"`) and the next color;
//! 3. `(label, value)` tuples map position 0 to name and 1 to value;
//! 4. longer tuples go through the family's fixed positional schema.
//!
//! Anything unreadable becomes a zero-valued placeholder and a warning.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::color::{AssignedColor, ColorAssignment, PaletteCursor};
use crate::core::data_item::{
    CanonicalDataItem, ItemMeasure, ItemStyle, RawDataItem, RawRecord, RawValue, StyleOverrides,
    TupleCell,
};
use crate::core::family::ChartFamily;
use crate::core::hierarchy::HierarchyAggregator;
use crate::core::merge::Defaulted;
use crate::core::palette::ThemeColors;
use crate::core::tuple_schema::TupleSchema;
use crate::error::ChartError;

const DEFAULT_FONT_SIZE: f64 = 12.0;

/// How palette entries are distributed over a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemColoring {
    /// Every item takes the next palette entry (pie, funnel, trees, map).
    PerItem,
    /// The whole series shares one palette entry (Cartesian families).
    PerSeries,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeRule {
    pub family: ChartFamily,
    pub tuple_schema: TupleSchema,
    pub coloring: ItemColoring,
    pub hierarchical: bool,
    pub border_width: f64,
}

impl ShapeRule {
    #[must_use]
    pub const fn for_family(family: ChartFamily) -> Self {
        let (tuple_schema, coloring, border_width) = match family {
            ChartFamily::Bar | ChartFamily::Line => {
                (TupleSchema::LabelValue, ItemColoring::PerSeries, 0.0)
            }
            ChartFamily::Scatter | ChartFamily::Parallel | ChartFamily::Radar => {
                (TupleSchema::Coordinates, ItemColoring::PerSeries, 0.0)
            }
            ChartFamily::BoxPlot => (TupleSchema::BoxPlot, ItemColoring::PerSeries, 1.0),
            ChartFamily::Candlestick => (TupleSchema::Candlestick, ItemColoring::PerSeries, 1.0),
            ChartFamily::Heatmap => (TupleSchema::HeatCell, ItemColoring::PerSeries, 0.0),
            ChartFamily::Pie | ChartFamily::Funnel => {
                (TupleSchema::LabelValue, ItemColoring::PerItem, 1.0)
            }
            ChartFamily::Map => (TupleSchema::LabelValue, ItemColoring::PerItem, 0.5),
            ChartFamily::Tree | ChartFamily::Treemap | ChartFamily::Sunburst => {
                (TupleSchema::LabelValue, ItemColoring::PerItem, 1.0)
            }
        };
        Self {
            family,
            tuple_schema,
            coloring,
            hierarchical: family.is_hierarchical(),
            border_width,
        }
    }
}

/// Normalizer bound to one rule, palette and theme.
#[derive(Debug, Clone)]
pub struct ShapeNormalizer<'a> {
    rule: ShapeRule,
    colors: ColorAssignment<'a>,
    border_color: String,
    aggregator: HierarchyAggregator,
}

/// Position of the item being normalized inside its tree.
#[derive(Debug, Clone, Copy)]
struct Slot {
    index: usize,
    depth: usize,
    root_color_index: usize,
}

impl<'a> ShapeNormalizer<'a> {
    #[must_use]
    pub fn new(rule: ShapeRule, colors: ColorAssignment<'a>, theme: &ThemeColors) -> Self {
        Self {
            rule,
            colors,
            border_color: theme.background.clone(),
            aggregator: HierarchyAggregator::default(),
        }
    }

    #[must_use]
    pub fn with_aggregator(mut self, aggregator: HierarchyAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    #[must_use]
    pub fn rule(&self) -> ShapeRule {
        self.rule
    }

    /// Normalizes one series. `cursor` advances once per series for
    /// per-series coloring and once per top-level item otherwise.
    pub fn normalize(
        &self,
        series_name: &str,
        raw_items: &[RawDataItem],
        cursor: &mut PaletteCursor,
    ) -> Vec<CanonicalDataItem> {
        let series_color_index = match self.rule.coloring {
            ItemColoring::PerSeries => Some(cursor.advance()),
            ItemColoring::PerItem => None,
        };
        raw_items
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let color_index = series_color_index.unwrap_or_else(|| cursor.advance());
                let slot = Slot {
                    index,
                    depth: 0,
                    root_color_index: color_index,
                };
                self.normalize_item(series_name, raw, slot)
            })
            .collect()
    }

    fn normalize_item(
        &self,
        series_name: &str,
        raw: &RawDataItem,
        slot: Slot,
    ) -> CanonicalDataItem {
        let outcome = match raw {
            RawDataItem::Scalar(value) if value.is_finite() => Ok(self.leaf(
                self.synthesized_name(slot.index),
                *value,
                None,
                None,
                Map::new(),
                slot,
            )),
            RawDataItem::Scalar(value) => Err(format!("non-finite scalar {value}")),
            RawDataItem::Tuple(cells) => self.from_tuple(cells, None, Map::new(), slot),
            RawDataItem::Record(record) => self.from_record(series_name, record, slot),
            RawDataItem::Malformed(raw) => Err(format!("unrecognized shape `{raw}`")),
        };
        outcome.unwrap_or_else(|reason| self.placeholder(series_name, raw, slot, reason))
    }

    fn from_tuple(
        &self,
        cells: &[TupleCell],
        overrides: Option<&StyleOverrides>,
        extra: Map<String, Value>,
        slot: Slot,
    ) -> Result<CanonicalDataItem, String> {
        let decoded = self.rule.tuple_schema.decode(cells)?;
        let name = decoded
            .name
            .unwrap_or_else(|| self.synthesized_name(slot.index));
        Ok(self.leaf(name, decoded.value, decoded.measure, overrides, extra, slot))
    }

    fn from_record(
        &self,
        series_name: &str,
        record: &RawRecord,
        slot: Slot,
    ) -> Result<CanonicalDataItem, String> {
        let explicit_name = record.name.as_ref().and_then(TupleCell::as_label);
        let overrides = record.item_style.as_ref();
        let extra = record.extra.clone();

        if let Some(children) = record.children.as_ref().filter(|c| !c.is_empty()) {
            if self.rule.hierarchical {
                let name = explicit_name.unwrap_or_else(|| self.synthesized_name(slot.index));
                return Ok(self.container(series_name, name, children, overrides, extra, slot));
            }
            debug!(
                series = series_name,
                index = slot.index,
                family = %self.rule.family,
                "ignoring children on non-hierarchical item"
            );
        }

        match &record.value {
            Some(RawValue::Number(value)) if value.is_finite() => {
                let name = explicit_name.unwrap_or_else(|| self.synthesized_name(slot.index));
                Ok(self.leaf(name, *value, None, overrides, extra, slot))
            }
            Some(RawValue::Number(value)) => Err(format!("non-finite value {value}")),
            Some(RawValue::Cells(cells)) => {
                let mut item = self.from_tuple(cells, overrides, extra, slot)?;
                if let Some(name) = explicit_name {
                    item.name = name;
                }
                Ok(item)
            }
            Some(RawValue::Other(other)) => Err(format!("unreadable value `{other}`")),
            None => {
                let name = explicit_name.unwrap_or_else(|| self.synthesized_name(slot.index));
                Ok(self.leaf(name, 0.0, None, overrides, extra, slot))
            }
        }
    }

    fn container(
        &self,
        series_name: &str,
        name: String,
        children: &[RawDataItem],
        overrides: Option<&StyleOverrides>,
        extra: Map<String, Value>,
        slot: Slot,
    ) -> CanonicalDataItem {
        let children = if slot.depth + 1 >= self.aggregator.max_depth() {
            warn!(
                series = series_name,
                node = %name,
                depth = slot.depth,
                dropped = children.len(),
                "tree depth limit reached; truncating children"
            );
            Vec::new()
        } else {
            children
                .iter()
                .enumerate()
                .map(|(index, child)| {
                    let child_slot = Slot {
                        index,
                        depth: slot.depth + 1,
                        root_color_index: slot.root_color_index,
                    };
                    self.normalize_item(series_name, child, child_slot)
                })
                .collect()
        };
        CanonicalDataItem {
            name,
            value: None,
            style: self.resolve_style(overrides, slot),
            measure: None,
            children,
            extra,
            placeholder: false,
        }
    }

    fn leaf(
        &self,
        name: String,
        value: f64,
        measure: Option<ItemMeasure>,
        overrides: Option<&StyleOverrides>,
        extra: Map<String, Value>,
        slot: Slot,
    ) -> CanonicalDataItem {
        CanonicalDataItem {
            name,
            value: Some(value),
            style: self.resolve_style(overrides, slot),
            measure,
            children: Vec::new(),
            extra,
            placeholder: false,
        }
    }

    fn placeholder(
        &self,
        series_name: &str,
        raw: &RawDataItem,
        slot: Slot,
        reason: String,
    ) -> CanonicalDataItem {
        let issue = ChartError::MalformedDataItem {
            series: series_name.to_owned(),
            index: slot.index,
            reason,
        };
        warn!(depth = slot.depth, error = %issue, "replacing data item with placeholder");
        let (name, overrides) = match raw {
            RawDataItem::Record(record) => (
                record.name.as_ref().and_then(TupleCell::as_label),
                record.item_style.as_ref(),
            ),
            _ => (None, None),
        };
        CanonicalDataItem {
            name: name.unwrap_or_else(|| self.synthesized_name(slot.index)),
            value: Some(0.0),
            style: self.resolve_style(overrides, slot),
            measure: None,
            children: Vec::new(),
            extra: Map::new(),
            placeholder: true,
        }
    }

    fn resolve_style(&self, overrides: Option<&StyleOverrides>, slot: Slot) -> ItemStyle {
        let defaults = self.default_style(slot);
        match overrides {
            Some(overrides) => overrides.or_defaults(&defaults),
            None => defaults,
        }
    }

    fn default_style(&self, slot: Slot) -> ItemStyle {
        let AssignedColor { color, opacity } = if self.rule.hierarchical {
            self.colors
                .shade_for(slot.root_color_index, slot.index, slot.depth)
        } else {
            self.colors.color_for(slot.root_color_index, 0)
        };
        let font_size = if self.rule.hierarchical {
            self.aggregator.style_for_depth(slot.depth).font_size
        } else {
            DEFAULT_FONT_SIZE
        };
        ItemStyle {
            color,
            opacity,
            font_size,
            border_color: self.border_color.clone(),
            border_width: self.rule.border_width,
        }
    }

    fn synthesized_name(&self, index: usize) -> String {
        format!("{} {}", self.rule.family.display_label(), index + 1)
    }
}
