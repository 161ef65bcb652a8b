//! Builtin per-family tooltip formatters.
//!
//! A formatter runs once per resolved configuration: whatever it can derive
//! from the configuration (series totals, subtree memo tables, axis labels,
//! dimension names) is computed in `build` and moved into the returned
//! closure, so hover-time rendering is lookups plus string assembly.

use std::sync::Arc;

use serde_json::Value;

use crate::api::CanonicalChartConfig;
use crate::core::{
    BoxPlotStats, CandleStats, HierarchyAggregator, PaletteProvider, Percentage, RawDataItem,
    RawValue, SubtreeTotals, TupleCell,
};
use crate::render::descriptor::{DataPointDescriptor, TooltipInput};
use crate::render::markup::{
    MarkupBackend, NO_DATA, TooltipDocument, TooltipRow, format_fixed, format_percentage,
    format_signed, format_value,
};
use crate::render::RenderFn;

/// `(isDark, config) -> renderFn`.
pub trait Formatter: Send + Sync {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn;
}

/// Theme lookup and output backend shared by the builtin formatters.
#[derive(Clone)]
pub struct FormatterContext {
    palette: Arc<dyn PaletteProvider>,
    backend: Arc<dyn MarkupBackend>,
    aggregator: HierarchyAggregator,
}

impl std::fmt::Debug for FormatterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterContext")
            .field("aggregator", &self.aggregator)
            .finish_non_exhaustive()
    }
}

impl FormatterContext {
    #[must_use]
    pub fn new(palette: Arc<dyn PaletteProvider>, backend: Arc<dyn MarkupBackend>) -> Self {
        Self {
            palette,
            backend,
            aggregator: HierarchyAggregator::default(),
        }
    }

    #[must_use]
    pub fn with_aggregator(mut self, aggregator: HierarchyAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    #[must_use]
    pub fn aggregator(&self) -> HierarchyAggregator {
        self.aggregator
    }

    fn render_with<F>(&self, is_dark: bool, build: F) -> RenderFn
    where
        F: Fn(TooltipInput<'_>) -> TooltipDocument + Send + Sync + 'static,
    {
        let theme = self.palette.theme_colors(is_dark);
        let backend = Arc::clone(&self.backend);
        Arc::new(move |input: TooltipInput<'_>| {
            if input.is_empty() {
                return String::new();
            }
            backend.render(&build(input), &theme)
        })
    }
}

/// Whether an axis-detail tooltip appends a grand total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalPolicy {
    Always,
    WhenStacked,
    Never,
}

/// Summary for bar, line and scatter: series, item name, value.
#[derive(Debug, Clone)]
pub struct ItemSummaryFormatter {
    ctx: FormatterContext,
    show_coordinates: bool,
}

impl ItemSummaryFormatter {
    #[must_use]
    pub fn new(ctx: FormatterContext) -> Self {
        Self {
            ctx,
            show_coordinates: false,
        }
    }

    /// Renders multi-position values as `(x, y)` instead of the last number.
    #[must_use]
    pub fn with_coordinates(mut self) -> Self {
        self.show_coordinates = true;
        self
    }
}

impl Formatter for ItemSummaryFormatter {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn {
        let names = series_names(config);
        let show_coordinates = self.show_coordinates;
        self.ctx.render_with(is_dark, move |input| {
            let Some(point) = input.first() else {
                return TooltipDocument::default();
            };
            let mut doc = TooltipDocument::titled(series_label(point, &names));
            let value = if show_coordinates {
                coordinates_text(point).unwrap_or_else(|| value_text(point))
            } else {
                value_text(point)
            };
            doc.push(
                TooltipRow::new(point.display_name(), value).with_marker(point.color.as_deref()),
            );
            if let Some(pct) = point.reported_percent() {
                doc.push(TooltipRow::new("Share", format_percentage(Percentage::Available(pct))));
            }
            doc
        })
    }
}

/// Axis-triggered detail: one row per series sharing the category.
#[derive(Debug, Clone)]
pub struct AxisDetailFormatter {
    ctx: FormatterContext,
    total: TotalPolicy,
}

impl AxisDetailFormatter {
    #[must_use]
    pub fn new(ctx: FormatterContext, total: TotalPolicy) -> Self {
        Self { ctx, total }
    }
}

impl Formatter for AxisDetailFormatter {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn {
        let names = series_names(config);
        let show_total = match self.total {
            TotalPolicy::Always => true,
            TotalPolicy::WhenStacked => config.has_stacked_series(),
            TotalPolicy::Never => false,
        };
        self.ctx.render_with(is_dark, move |input| {
            let points = input.as_slice();
            let mut doc = TooltipDocument::titled(category_title(points));
            for point in points {
                doc.push(
                    TooltipRow::new(series_label(point, &names), value_text(point))
                        .with_marker(point.color.as_deref()),
                );
            }
            if show_total {
                let numbers: Vec<f64> = points
                    .iter()
                    .filter_map(DataPointDescriptor::numeric_value)
                    .collect();
                let total = if numbers.is_empty() {
                    NO_DATA.to_owned()
                } else {
                    format_value(numbers.iter().sum())
                };
                doc = doc.with_footer(TooltipRow::new("Total", total));
            }
            doc
        })
    }
}

/// Pie and funnel: value plus share of the series total.
#[derive(Debug, Clone)]
pub struct ShareFormatter {
    ctx: FormatterContext,
}

impl ShareFormatter {
    #[must_use]
    pub fn new(ctx: FormatterContext) -> Self {
        Self { ctx }
    }
}

impl Formatter for ShareFormatter {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn {
        let names = series_names(config);
        let aggregator = self.ctx.aggregator();
        let totals: Vec<f64> = config
            .series
            .iter()
            .map(|series| aggregator.forest_total(&series.data))
            .collect();
        self.ctx.render_with(is_dark, move |input| {
            let points = input.as_slice();
            let Some(first) = points.first() else {
                return TooltipDocument::default();
            };
            let mut doc = TooltipDocument::titled(series_label(first, &names));
            for point in points {
                let share = point.reported_percent().map_or_else(
                    || match (point.numeric_value(), totals.get(point.series_index)) {
                        (Some(value), Some(total)) => Percentage::of(value, *total),
                        _ => Percentage::Unavailable,
                    },
                    Percentage::Available,
                );
                doc.push(
                    TooltipRow::new(
                        point.display_name(),
                        format!("{} ({})", value_text(point), format_percentage(share)),
                    )
                    .with_marker(point.color.as_deref()),
                );
            }
            doc
        })
    }
}

/// Tree, treemap and sunburst: subtree total and share of the series.
#[derive(Debug, Clone)]
pub struct HierarchyFormatter {
    ctx: FormatterContext,
}

impl HierarchyFormatter {
    #[must_use]
    pub fn new(ctx: FormatterContext) -> Self {
        Self { ctx }
    }
}

impl Formatter for HierarchyFormatter {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn {
        let aggregator = self.ctx.aggregator();
        let memos: Vec<SubtreeTotals> = config
            .series
            .iter()
            .map(|series| aggregator.memoize(&series.data))
            .collect();
        self.ctx.render_with(is_dark, move |input| {
            let Some(point) = input.first() else {
                return TooltipDocument::default();
            };
            let path = if point.tree_path.is_empty() {
                vec![point.display_name()]
            } else {
                point.tree_path.clone()
            };
            let memo = memos.get(point.series_index);
            let reported = point.numeric_value();
            let total = memo.and_then(|memo| {
                if !point.tree_indices.is_empty() {
                    return memo.total_at_position(&point.tree_indices);
                }
                // Hosts may prefix the path with a synthetic root; skip until it matches.
                (0..path.len()).find_map(|skip| memo.total_matching(&path[skip..], reported))
            });
            let (value, share) = match (total, memo) {
                (Some(total), Some(memo)) => {
                    (Some(total), Percentage::of(total, memo.root_total()))
                }
                (None, Some(memo)) => (
                    reported,
                    reported.map_or(Percentage::Unavailable, |v| {
                        Percentage::of(v, memo.root_total())
                    }),
                ),
                (_, None) => (reported, Percentage::Unavailable),
            };
            let mut doc = TooltipDocument::titled(path.join(" / "));
            doc.push(
                TooltipRow::new("Value", value.map_or_else(|| NO_DATA.to_owned(), format_value))
                    .with_marker(point.color.as_deref()),
            );
            doc.push(TooltipRow::new("Share", format_percentage(share)));
            doc
        })
    }
}

/// Five-number summary with spread; compact median rows in detail mode.
#[derive(Debug, Clone)]
pub struct BoxPlotFormatter {
    ctx: FormatterContext,
}

impl BoxPlotFormatter {
    #[must_use]
    pub fn new(ctx: FormatterContext) -> Self {
        Self { ctx }
    }
}

impl Formatter for BoxPlotFormatter {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn {
        let names = series_names(config);
        self.ctx.render_with(is_dark, move |input| {
            let points = input.as_slice();
            match input {
                TooltipInput::Single(point) => {
                    let mut doc = TooltipDocument::titled(format!(
                        "{} · {}",
                        series_label(point, &names),
                        point.display_name()
                    ));
                    match point.cells().map(BoxPlotStats::from_cells) {
                        Some(Ok(stats)) => {
                            for (label, value) in [
                                ("Min", stats.min),
                                ("Q1", stats.q1),
                                ("Median", stats.median),
                                ("Q3", stats.q3),
                                ("Max", stats.max),
                                ("IQR", stats.iqr),
                                ("Range", stats.range),
                            ] {
                                doc.push(TooltipRow::new(label, format_fixed(value, 2)));
                            }
                        }
                        _ => doc.push(TooltipRow::new("Statistics", NO_DATA)),
                    }
                    doc
                }
                TooltipInput::Many(_) => {
                    let mut doc = TooltipDocument::titled(category_title(points));
                    for point in points {
                        let text = match point.cells().map(BoxPlotStats::from_cells) {
                            Some(Ok(stats)) => format!(
                                "median {} (IQR {})",
                                format_fixed(stats.median, 2),
                                format_fixed(stats.iqr, 2)
                            ),
                            _ => NO_DATA.to_owned(),
                        };
                        doc.push(
                            TooltipRow::new(series_label(point, &names), text)
                                .with_marker(point.color.as_deref()),
                        );
                    }
                    doc
                }
            }
        })
    }
}

/// OHLC rows with change; compact close rows in detail mode.
#[derive(Debug, Clone)]
pub struct CandlestickFormatter {
    ctx: FormatterContext,
}

impl CandlestickFormatter {
    #[must_use]
    pub fn new(ctx: FormatterContext) -> Self {
        Self { ctx }
    }
}

impl Formatter for CandlestickFormatter {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn {
        let names = series_names(config);
        self.ctx.render_with(is_dark, move |input| {
            let points = input.as_slice();
            match input {
                TooltipInput::Single(point) => {
                    let mut doc = TooltipDocument::titled(category_title(points));
                    match point.cells().map(CandleStats::from_cells) {
                        Some(Ok(stats)) => {
                            for (label, value) in [
                                ("Open", stats.open),
                                ("Close", stats.close),
                                ("Low", stats.low),
                                ("High", stats.high),
                            ] {
                                doc.push(TooltipRow::new(label, format_fixed(value, 2)));
                            }
                            doc.push(
                                TooltipRow::new("Change", change_text(&stats))
                                    .with_marker(point.color.as_deref()),
                            );
                        }
                        _ => doc.push(TooltipRow::new(series_label(point, &names), NO_DATA)),
                    }
                    doc
                }
                TooltipInput::Many(_) => {
                    let mut doc = TooltipDocument::titled(category_title(points));
                    for point in points {
                        let text = match point.cells().map(CandleStats::from_cells) {
                            Some(Ok(stats)) => {
                                let close = format_fixed(stats.close, 2);
                                format!("close {close} {}", change_text(&stats))
                            }
                            _ => value_text(point),
                        };
                        doc.push(
                            TooltipRow::new(series_label(point, &names), text)
                                .with_marker(point.color.as_deref()),
                        );
                    }
                    doc
                }
            }
        })
    }
}

fn change_text(stats: &CandleStats) -> String {
    let pct = stats
        .change_percent
        .map_or_else(|| NO_DATA.to_owned(), |pct| format!("{}%", format_signed(pct, 2)));
    format!("{} ({pct})", format_signed(stats.change, 2))
}

/// Heatmap cell: `x / y: value`, indices resolved to axis category labels.
#[derive(Debug, Clone)]
pub struct HeatmapFormatter {
    ctx: FormatterContext,
}

impl HeatmapFormatter {
    #[must_use]
    pub fn new(ctx: FormatterContext) -> Self {
        Self { ctx }
    }
}

impl Formatter for HeatmapFormatter {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn {
        let names = series_names(config);
        let x_labels = category_labels(config.x_axis.first());
        let y_labels = category_labels(config.y_axis.first());
        self.ctx.render_with(is_dark, move |input| {
            let Some(point) = input.first() else {
                return TooltipDocument::default();
            };
            let mut doc = TooltipDocument::titled(series_label(point, &names));
            let row = match point.cells() {
                Some([x, y, value, ..]) => TooltipRow::new(
                    format!(
                        "{} / {}",
                        axis_label(x, &x_labels),
                        axis_label(y, &y_labels)
                    ),
                    value.as_number().map_or_else(|| NO_DATA.to_owned(), format_value),
                ),
                _ => TooltipRow::new(point.display_name(), value_text(point)),
            };
            doc.push(row.with_marker(point.color.as_deref()));
            doc
        })
    }
}

/// Map region: value (zero for completed regions) and share of the map total.
#[derive(Debug, Clone)]
pub struct MapFormatter {
    ctx: FormatterContext,
}

impl MapFormatter {
    #[must_use]
    pub fn new(ctx: FormatterContext) -> Self {
        Self { ctx }
    }
}

impl Formatter for MapFormatter {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn {
        let names = series_names(config);
        let aggregator = self.ctx.aggregator();
        let totals: Vec<f64> = config
            .series
            .iter()
            .map(|series| aggregator.forest_total(&series.data))
            .collect();
        self.ctx.render_with(is_dark, move |input| {
            let Some(point) = input.first() else {
                return TooltipDocument::default();
            };
            let mut doc = TooltipDocument::titled(point.display_name());
            let value = point.numeric_value();
            doc.push(
                TooltipRow::new(
                    series_label(point, &names),
                    value.map_or_else(|| NO_DATA.to_owned(), format_value),
                )
                .with_marker(point.color.as_deref()),
            );
            let share = match (value, totals.get(point.series_index)) {
                (Some(value), Some(total)) => Percentage::of(value, *total),
                _ => Percentage::Unavailable,
            };
            doc.push(TooltipRow::new("Share", format_percentage(share)));
            doc
        })
    }
}

/// Parallel coordinates: one row per dimension.
#[derive(Debug, Clone)]
pub struct ParallelFormatter {
    ctx: FormatterContext,
}

impl ParallelFormatter {
    #[must_use]
    pub fn new(ctx: FormatterContext) -> Self {
        Self { ctx }
    }
}

impl Formatter for ParallelFormatter {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn {
        let names = series_names(config);
        let dimensions = named_entries(config.family_blocks.parallel_axis.as_ref());
        self.ctx.render_with(is_dark, move |input| {
            let Some(point) = input.first() else {
                return TooltipDocument::default();
            };
            dimension_document(series_label(point, &names), point, &dimensions)
        })
    }
}

/// Radar: one row per indicator.
#[derive(Debug, Clone)]
pub struct RadarFormatter {
    ctx: FormatterContext,
}

impl RadarFormatter {
    #[must_use]
    pub fn new(ctx: FormatterContext) -> Self {
        Self { ctx }
    }
}

impl Formatter for RadarFormatter {
    fn build(&self, is_dark: bool, config: &CanonicalChartConfig) -> RenderFn {
        let indicators = named_entries(
            config
                .family_blocks
                .radar
                .as_ref()
                .and_then(|radar| radar.get("indicator")),
        );
        self.ctx.render_with(is_dark, move |input| {
            let Some(point) = input.first() else {
                return TooltipDocument::default();
            };
            dimension_document(point.display_name(), point, &indicators)
        })
    }
}

fn dimension_document(
    title: String,
    point: &DataPointDescriptor,
    dimensions: &[String],
) -> TooltipDocument {
    let mut doc = TooltipDocument::titled(title);
    match point.cells() {
        Some(cells) => {
            for (index, cell) in cells.iter().enumerate() {
                let label = dimensions
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| format!("Dim {}", index + 1));
                doc.push(TooltipRow::new(label, cell_text(cell)));
            }
        }
        None => doc.push(TooltipRow::new(point.display_name(), value_text(point))),
    }
    doc
}

fn series_names(config: &CanonicalChartConfig) -> Vec<String> {
    config.series.iter().map(|series| series.name.clone()).collect()
}

fn series_label(point: &DataPointDescriptor, names: &[String]) -> String {
    point
        .series_name
        .clone()
        .filter(|name| !name.is_empty())
        .or_else(|| names.get(point.series_index).cloned())
        .unwrap_or_else(|| format!("Series {}", point.series_index + 1))
}

fn category_title(points: &[DataPointDescriptor]) -> String {
    points
        .first()
        .map(|point| {
            point
                .axis_value_label
                .clone()
                .unwrap_or_else(|| point.display_name())
        })
        .unwrap_or_default()
}

/// Scalar reading of any value shape, falling back to the joined cells.
fn value_text(point: &DataPointDescriptor) -> String {
    if let Some(number) = point.numeric_value() {
        return format_value(number);
    }
    match &point.value {
        Some(RawDataItem::Tuple(cells)) => join_cells(cells),
        Some(RawDataItem::Record(record)) => match &record.value {
            Some(RawValue::Cells(cells)) => join_cells(cells),
            _ => NO_DATA.to_owned(),
        },
        _ => NO_DATA.to_owned(),
    }
}

fn coordinates_text(point: &DataPointDescriptor) -> Option<String> {
    let cells = point.cells().filter(|cells| cells.len() >= 2)?;
    Some(format!("({})", join_cells(cells)))
}

fn join_cells(cells: &[TupleCell]) -> String {
    cells.iter().map(cell_text).collect::<Vec<_>>().join(", ")
}

fn cell_text(cell: &TupleCell) -> String {
    match cell {
        TupleCell::Number(value) => format_value(*value),
        TupleCell::Label(label) => label.clone(),
        TupleCell::Missing => NO_DATA.to_owned(),
    }
}

fn category_labels(axis: Option<&Value>) -> Vec<String> {
    axis.and_then(|axis| axis.get("data"))
        .and_then(Value::as_array)
        .map(|data| {
            data.iter()
                .map(|entry| match entry {
                    Value::String(text) => text.clone(),
                    Value::Object(map) => map
                        .get("value")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn axis_label(cell: &TupleCell, labels: &[String]) -> String {
    if let Some(label) = cell.as_category_index().and_then(|index| labels.get(index)) {
        return label.clone();
    }
    cell.as_label().unwrap_or_else(|| NO_DATA.to_owned())
}

/// `name` of every object in an array block (`parallelAxis`, `radar.indicator`).
fn named_entries(block: Option<&Value>) -> Vec<String> {
    block
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    entry
                        .get("name")
                        .and_then(Value::as_str)
                        .map_or_else(|| format!("Dim {}", index + 1), str::to_owned)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{axis_label, category_labels, named_entries};
    use crate::core::TupleCell;
    use serde_json::json;

    #[test]
    fn heat_indices_resolve_to_category_labels() {
        let labels = category_labels(Some(&json!({"type": "category", "data": ["Mon", "Tue"]})));
        assert_eq!(axis_label(&TupleCell::Number(1.0), &labels), "Tue");
        assert_eq!(axis_label(&TupleCell::Number(7.0), &labels), "7");
        assert_eq!(axis_label(&TupleCell::Label("Wed".to_owned()), &labels), "Wed");
    }

    #[test]
    fn unnamed_dimensions_get_positional_names() {
        let names = named_entries(Some(&json!([{"name": "Price"}, {"dim": 1}])));
        assert_eq!(names, vec!["Price".to_owned(), "Dim 2".to_owned()]);
    }
}
