use serde::Serialize;
use smallvec::SmallVec;

use crate::core::data_item::{ItemMeasure, TupleCell};

/// Positional layout a family applies to multi-position tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleSchema {
    /// `(label, value)`, or `(x, y)` when position 0 is numeric.
    LabelValue,
    /// Every numeric position is a coordinate (scatter, parallel, radar).
    Coordinates,
    /// `[min, q1, median, q3, max]` with an optional leading x.
    BoxPlot,
    /// `[open, close, low, high]` with an optional leading time/category.
    Candlestick,
    /// `[x, y, value]`.
    HeatCell,
}

/// Result of applying a schema to one tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTuple {
    pub name: Option<String>,
    pub value: f64,
    pub measure: Option<ItemMeasure>,
}

/// Five-number summary plus derived spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPlotStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub iqr: f64,
    pub range: f64,
}

impl BoxPlotStats {
    const WIDTH: usize = 5;

    pub fn from_cells(cells: &[TupleCell]) -> Result<Self, String> {
        let (position, body) = split_leading(cells, Self::WIDTH, "box plot")?;
        let [min, q1, median, q3, max] = numeric_array::<5>(body, "box plot")?;
        Ok(Self {
            position,
            min,
            q1,
            median,
            q3,
            max,
            iqr: q3 - q1,
            range: max - min,
        })
    }

    #[must_use]
    pub fn engine_vector(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(6);
        out.extend(self.position);
        out.extend([self.min, self.q1, self.median, self.q3, self.max]);
        out
    }
}

/// OHLC reading with derived change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
}

impl CandleStats {
    const WIDTH: usize = 4;

    pub fn from_cells(cells: &[TupleCell]) -> Result<Self, String> {
        let (position, body) = split_leading(cells, Self::WIDTH, "candlestick")?;
        let [open, close, low, high] = numeric_array::<4>(body, "candlestick")?;
        let change = close - open;
        Ok(Self {
            position,
            open,
            close,
            low,
            high,
            change,
            change_percent: (open != 0.0).then(|| change / open * 100.0),
        })
    }

    #[must_use]
    pub fn engine_vector(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(5);
        out.extend(self.position);
        out.extend([self.open, self.close, self.low, self.high]);
        out
    }

    #[must_use]
    pub fn is_rising(&self) -> bool {
        self.close >= self.open
    }
}

impl TupleSchema {
    /// Applies the positional schema. `Err` carries a reason for the
    /// placeholder diagnostic.
    pub fn decode(self, cells: &[TupleCell]) -> Result<DecodedTuple, String> {
        if cells.is_empty() {
            return Err("empty tuple".to_owned());
        }
        match self {
            Self::LabelValue => decode_label_value(cells),
            Self::Coordinates => decode_coordinates(cells),
            Self::BoxPlot => {
                let stats = BoxPlotStats::from_cells(cells)?;
                Ok(DecodedTuple {
                    name: leading_label(cells, BoxPlotStats::WIDTH),
                    value: stats.median,
                    measure: Some(ItemMeasure::BoxPlot(stats)),
                })
            }
            Self::Candlestick => {
                let stats = CandleStats::from_cells(cells)?;
                Ok(DecodedTuple {
                    name: leading_label(cells, CandleStats::WIDTH),
                    value: stats.close,
                    measure: Some(ItemMeasure::Candlestick(stats)),
                })
            }
            Self::HeatCell => decode_heat_cell(cells),
        }
    }
}

fn decode_label_value(cells: &[TupleCell]) -> Result<DecodedTuple, String> {
    let trailing_label = trailing_label(cells);
    match cells {
        [only] => only
            .as_number()
            .map(|value| DecodedTuple {
                name: None,
                value,
                measure: None,
            })
            .ok_or_else(|| "single-position tuple is not numeric".to_owned()),
        [TupleCell::Label(label), value, ..] => {
            let value = value
                .as_number()
                .ok_or_else(|| format!("value for `{label}` is not numeric"))?;
            Ok(DecodedTuple {
                name: Some(label.clone()).filter(|label| !label.trim().is_empty()),
                value,
                measure: None,
            })
        }
        [x, y, ..] => {
            let x = x.as_number().ok_or_else(|| "x position is not numeric".to_owned())?;
            let y = y.as_number().ok_or_else(|| "y position is not numeric".to_owned())?;
            Ok(DecodedTuple {
                name: trailing_label,
                value: y,
                measure: Some(ItemMeasure::Coordinates {
                    values: SmallVec::from_slice(&[x, y]),
                }),
            })
        }
        [] => Err("empty tuple".to_owned()),
    }
}

fn decode_coordinates(cells: &[TupleCell]) -> Result<DecodedTuple, String> {
    let name = trailing_label(cells);
    let positions = if name.is_some() {
        &cells[..cells.len() - 1]
    } else {
        cells
    };
    let values: SmallVec<[f64; 4]> = positions
        .iter()
        .map(|cell| cell.as_number().unwrap_or(f64::NAN))
        .collect();
    let value = values
        .iter()
        .rev()
        .copied()
        .find(|v| v.is_finite())
        .ok_or_else(|| "tuple has no numeric coordinate".to_owned())?;
    Ok(DecodedTuple {
        name,
        value,
        measure: Some(ItemMeasure::Coordinates { values }),
    })
}

fn decode_heat_cell(cells: &[TupleCell]) -> Result<DecodedTuple, String> {
    let [x, y, value] = cells else {
        return Err(format!("heatmap cell expects 3 positions, got {}", cells.len()));
    };
    if matches!(x, TupleCell::Missing) || matches!(y, TupleCell::Missing) {
        return Err("heatmap cell coordinate is null".to_owned());
    }
    let value = value
        .as_number()
        .ok_or_else(|| "heatmap cell value is not numeric".to_owned())?;
    Ok(DecodedTuple {
        name: None,
        value,
        measure: Some(ItemMeasure::HeatCell {
            x: x.clone(),
            y: y.clone(),
        }),
    })
}

/// Splits an optional leading coordinate off a fixed-width body.
fn split_leading<'a>(
    cells: &'a [TupleCell],
    width: usize,
    schema: &str,
) -> Result<(Option<f64>, &'a [TupleCell]), String> {
    if cells.len() == width {
        Ok((None, cells))
    } else if cells.len() == width + 1 {
        Ok((cells[0].as_number(), &cells[1..]))
    } else {
        Err(format!(
            "{schema} tuple expects {width} or {} positions, got {}",
            width + 1,
            cells.len()
        ))
    }
}

/// Non-numeric leading category of a fixed-width tuple, used as the item name.
fn leading_label(cells: &[TupleCell], width: usize) -> Option<String> {
    match cells {
        [TupleCell::Label(label), ..]
            if cells.len() == width + 1 && label.trim().parse::<f64>().is_err() =>
        {
            Some(label.clone()).filter(|label| !label.trim().is_empty())
        }
        _ => None,
    }
}

fn numeric_array<const N: usize>(cells: &[TupleCell], schema: &str) -> Result<[f64; N], String> {
    let mut out = [0.0; N];
    for (slot, (index, cell)) in out.iter_mut().zip(cells.iter().enumerate()) {
        *slot = cell
            .as_number()
            .ok_or_else(|| format!("{schema} position {index} is not numeric"))?;
    }
    Ok(out)
}

fn trailing_label(cells: &[TupleCell]) -> Option<String> {
    match cells.last() {
        Some(TupleCell::Label(label))
            if cells.len() > 1 && label.trim().parse::<f64>().is_err() =>
        {
            Some(label.clone())
        }
        _ => None,
    }
}
