use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{RawDataItem, RawValue, TupleCell};

/// What the host engine reports about a hovered data point.
///
/// `value` carries the item in whatever shape reached the engine: a bare
/// number, a positional tuple, or a record with optional extras such as
/// `percent`. Every accessor below tolerates all three.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataPointDescriptor {
    pub series_name: Option<String>,
    pub series_index: usize,
    pub data_index: usize,
    pub name: Option<String>,
    pub value: Option<RawDataItem>,
    pub color: Option<String>,
    pub percent: Option<f64>,
    /// Names from the top-level item down to the hovered node.
    pub tree_path: Vec<String>,
    /// Child positions matching `tree_path`, starting with the top-level index.
    pub tree_indices: Vec<usize>,
    pub axis_value_label: Option<String>,
}

impl DataPointDescriptor {
    #[must_use]
    pub fn new(series_index: usize, data_index: usize) -> Self {
        Self {
            series_index,
            data_index,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_series_name(mut self, name: impl Into<String>) -> Self {
        self.series_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: RawDataItem) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_percent(mut self, percent: f64) -> Self {
        self.percent = Some(percent);
        self
    }

    #[must_use]
    pub fn with_tree_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tree_path = path.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_tree_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.tree_indices = indices.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_axis_value_label(mut self, label: impl Into<String>) -> Self {
        self.axis_value_label = Some(label.into());
        self
    }

    /// Item name, then the record's own `name`, then `"#<index>"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| match &self.value {
                Some(RawDataItem::Record(record)) => {
                    record.name.as_ref().and_then(TupleCell::as_label)
                }
                _ => None,
            })
            .unwrap_or_else(|| format!("#{}", self.data_index + 1))
    }

    /// Best scalar reading of the hovered value.
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.as_ref().and_then(RawDataItem::primary_number)
    }

    /// Positional cells of a tuple value, or of a record whose `value` is a tuple.
    #[must_use]
    pub fn cells(&self) -> Option<&[TupleCell]> {
        match self.value.as_ref()? {
            RawDataItem::Tuple(cells) => Some(cells.as_slice()),
            RawDataItem::Record(record) => match record.value.as_ref()? {
                RawValue::Cells(cells) => Some(cells.as_slice()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Numeric extra field on a record value (e.g. `percent`).
    #[must_use]
    pub fn record_number(&self, key: &str) -> Option<f64> {
        match self.value.as_ref()? {
            RawDataItem::Record(record) => record
                .extra
                .get(key)
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Percentage reported by the engine, either on the descriptor or on the record.
    #[must_use]
    pub fn reported_percent(&self) -> Option<f64> {
        self.percent
            .filter(|v| v.is_finite())
            .or_else(|| self.record_number("percent"))
    }
}

/// Hover payload: summary mode passes one descriptor, detail mode many.
#[derive(Debug, Clone, Copy)]
pub enum TooltipInput<'a> {
    Single(&'a DataPointDescriptor),
    Many(&'a [DataPointDescriptor]),
}

impl<'a> TooltipInput<'a> {
    #[must_use]
    pub fn as_slice(self) -> &'a [DataPointDescriptor] {
        match self {
            Self::Single(point) => std::slice::from_ref(point),
            Self::Many(points) => points,
        }
    }

    #[must_use]
    pub fn first(self) -> Option<&'a DataPointDescriptor> {
        self.as_slice().first()
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.as_slice().is_empty()
    }
}
