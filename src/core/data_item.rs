use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::core::tuple_schema::{BoxPlotStats, CandleStats};

/// One position of a raw tuple: a number, a label, or an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TupleCell {
    Number(f64),
    Label(String),
    Missing,
}

impl TupleCell {
    /// Numeric view of the cell; numeric labels (`"12.5"`) are accepted.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            Self::Label(label) => label.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Text view of the cell, used for names and category labels.
    #[must_use]
    pub fn as_label(&self) -> Option<String> {
        match self {
            Self::Number(value) if value.is_finite() => Some(format_plain_number(*value)),
            Self::Label(label) if !label.trim().is_empty() => Some(label.clone()),
            _ => None,
        }
    }

    /// Non-negative integral number, read as an index into a category axis.
    #[must_use]
    pub fn as_category_index(&self) -> Option<usize> {
        match self {
            Self::Number(value)
                if value.fract() == 0.0
                    && *value >= 0.0
                    && *value <= MAX_CATEGORY_INDEX as f64 =>
            {
                Some(*value as usize)
            }
            _ => None,
        }
    }
}

/// Largest numeric coordinate read as a category index.
pub const MAX_CATEGORY_INDEX: usize = 65_535;

pub type TupleCells = SmallVec<[TupleCell; 6]>;

/// Caller-provided data item as it arrives in a specification.
///
/// `Malformed` catches anything else so one bad entry never fails
/// deserialization of its whole series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDataItem {
    Scalar(f64),
    Tuple(TupleCells),
    Record(RawRecord),
    Malformed(Value),
}

impl RawDataItem {
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        Self::Scalar(value)
    }

    #[must_use]
    pub fn named(name: impl Into<String>, value: f64) -> Self {
        Self::Record(RawRecord {
            name: Some(TupleCell::Label(name.into())),
            value: Some(RawValue::Number(value)),
            ..RawRecord::default()
        })
    }

    #[must_use]
    pub fn container(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Record(RawRecord {
            name: Some(TupleCell::Label(name.into())),
            children: Some(children),
            ..RawRecord::default()
        })
    }

    #[must_use]
    pub fn tuple(values: &[f64]) -> Self {
        Self::Tuple(values.iter().copied().map(TupleCell::Number).collect())
    }

    /// Best-effort scalar reading, whatever the shape.
    #[must_use]
    pub fn primary_number(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value).filter(|v| v.is_finite()),
            Self::Tuple(cells) => cells.iter().rev().find_map(TupleCell::as_number),
            Self::Record(record) => record.value.as_ref().and_then(RawValue::primary_number),
            Self::Malformed(_) => None,
        }
    }
}

/// Record-shaped raw item. Unknown keys are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TupleCell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RawValue>,
    #[serde(default, alias = "style", skip_serializing_if = "Option::is_none")]
    pub item_style: Option<StyleOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawDataItem>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Cells(TupleCells),
    Other(Value),
}

impl RawValue {
    #[must_use]
    pub fn primary_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value).filter(|v| v.is_finite()),
            Self::Cells(cells) => cells.iter().rev().find_map(TupleCell::as_number),
            Self::Other(_) => None,
        }
    }
}

/// Sparse style as supplied by the caller; every field optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
}

impl StyleOverrides {
    #[must_use]
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_fully_specified(&self) -> bool {
        self.color.is_some()
            && self.opacity.is_some()
            && self.font_size.is_some()
            && self.border_color.is_some()
            && self.border_width.is_some()
    }
}

/// Gap-free item style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    pub color: String,
    pub opacity: f64,
    pub font_size: f64,
    pub border_color: String,
    pub border_width: f64,
}

/// Shape-specific measurements decoded from positional tuples.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ItemMeasure {
    Coordinates { values: SmallVec<[f64; 4]> },
    BoxPlot(BoxPlotStats),
    Candlestick(CandleStats),
    HeatCell { x: TupleCell, y: TupleCell },
}

/// Fully resolved data item.
///
/// Container items (non-empty `children`) carry no `value` of their own;
/// their total is derived on demand by the hierarchy aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDataItem {
    pub name: String,
    pub value: Option<f64>,
    pub style: ItemStyle,
    pub measure: Option<ItemMeasure>,
    pub children: Vec<CanonicalDataItem>,
    pub extra: Map<String, Value>,
    pub placeholder: bool,
}

impl CanonicalDataItem {
    #[must_use]
    pub fn is_container(&self) -> bool {
        !self.children.is_empty()
    }

    /// Value as the engine expects it under `value`.
    #[must_use]
    pub fn engine_value(&self) -> Value {
        match &self.measure {
            Some(ItemMeasure::Coordinates { values }) => Value::from(values.to_vec()),
            Some(ItemMeasure::BoxPlot(stats)) => Value::from(stats.engine_vector()),
            Some(ItemMeasure::Candlestick(stats)) => Value::from(stats.engine_vector()),
            Some(ItemMeasure::HeatCell { x, y }) => Value::Array(vec![
                serde_json::to_value(x).unwrap_or(Value::Null),
                serde_json::to_value(y).unwrap_or(Value::Null),
                self.value.map_or(Value::Null, Value::from),
            ]),
            None => self.value.map_or(Value::Null, Value::from),
        }
    }
}

impl Serialize for CanonicalDataItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("name", &self.name)?;
        let value = self.engine_value();
        if !value.is_null() {
            map.serialize_entry("value", &value)?;
        }
        map.serialize_entry("itemStyle", &self.style)?;
        if let Some(measure) = &self.measure {
            map.serialize_entry("stats", measure)?;
        }
        if !self.children.is_empty() {
            map.serialize_entry("children", &self.children)?;
        }
        map.end()
    }
}

/// Renders integral values without a trailing `.0`.
#[must_use]
pub(crate) fn format_plain_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::{RawDataItem, RawValue, TupleCell};

    #[test]
    fn untagged_shapes_deserialize_without_aborting_on_bad_entries() {
        let items: Vec<RawDataItem> = serde_json::from_str(
            r#"[12, ["Mon", 3], {"name": "A", "value": 10, "percent": 25}, true, {"name": {"x": 1}}]"#,
        )
        .expect("series payload");

        assert_eq!(items[0], RawDataItem::Scalar(12.0));
        assert!(matches!(
            &items[1],
            RawDataItem::Tuple(cells) if cells[0] == TupleCell::Label("Mon".to_owned())
        ));
        match &items[2] {
            RawDataItem::Record(record) => {
                assert_eq!(record.value, Some(RawValue::Number(10.0)));
                assert!(record.extra.contains_key("percent"));
            }
            other => panic!("expected record, got {other:?}"),
        }
        assert!(matches!(items[3], RawDataItem::Malformed(_)));
        assert!(matches!(items[4], RawDataItem::Malformed(_)));
    }

    #[test]
    fn numeric_labels_read_as_numbers() {
        assert_eq!(TupleCell::Label(" 12.5 ".to_owned()).as_number(), Some(12.5));
        assert_eq!(TupleCell::Missing.as_number(), None);
        assert_eq!(TupleCell::Number(3.0).as_label().as_deref(), Some("3"));
    }
}
