//! Builtin transformers: shape normalization plus family layout defaults.

use std::cmp::Reverse;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::core::{
    CanonicalDataItem, ChartFamily, ColorAssignment, HierarchyAggregator, ItemMeasure,
    PaletteCursor, RawDataItem, RegionCompleter, RegionValue, ShapeNormalizer, ShapeRule,
    ThemeColors, ThemeMode, TupleCell, merge_optional, merge_value,
};
use crate::error::{BoundaryLoadError, ChartError, ChartResult};

use super::chrome_defaults;
use super::{
    CanonicalChartConfig, CanonicalSeries, ChartSpecification, ChartTransformer, FamilyBlocks,
    RawSeries, SeriesLayout, TooltipBlock, TooltipKey, TooltipMode, TooltipTrigger,
    TransformContext,
};

const PIE_RADIUS: [&str; 2] = ["0%", "70%"];
const PIE_CENTER: [&str; 2] = ["50%", "50%"];
const FUNNEL_GAP: f64 = 2.0;
const INDICATOR_HEADROOM_DIVISOR: f64 = 10.0;

#[must_use]
pub fn builtin_transformer(family: ChartFamily) -> Arc<dyn ChartTransformer> {
    match family {
        ChartFamily::Bar
        | ChartFamily::Line
        | ChartFamily::Scatter
        | ChartFamily::BoxPlot
        | ChartFamily::Candlestick
        | ChartFamily::Heatmap => Arc::new(CartesianTransformer::new(family)),
        ChartFamily::Pie | ChartFamily::Funnel => Arc::new(RadialTransformer::new(family)),
        ChartFamily::Radar => Arc::new(RadarTransformer),
        ChartFamily::Tree | ChartFamily::Treemap | ChartFamily::Sunburst => {
            Arc::new(HierarchyTransformer::new(family))
        }
        ChartFamily::Map => Arc::new(MapTransformer),
        ChartFamily::Parallel => Arc::new(ParallelTransformer),
    }
}

/// Theme, palette and top-level chrome shared by every family.
struct Chrome {
    mode: ThemeMode,
    theme: ThemeColors,
    palette: Vec<String>,
    background_color: String,
    text_style: Value,
    extra: Map<String, Value>,
}

impl Chrome {
    fn resolve(spec: &ChartSpecification, ctx: &TransformContext<'_>) -> Self {
        let theme = ctx.theme_colors();
        let mut extra = spec.extra.clone();
        let palette = extra
            .remove("color")
            .and_then(|colors| string_list(&colors))
            .filter(|colors| !colors.is_empty())
            .unwrap_or_else(|| ctx.series_colors().to_vec());
        let background_color = extra
            .remove("backgroundColor")
            .and_then(|value| value.as_str().map(str::to_owned))
            .unwrap_or_else(|| theme.background.clone());
        let text_style = merge_optional(
            extra.remove("textStyle").as_ref(),
            &chrome_defaults::text_style(&theme),
        );
        Self {
            mode: ctx.theme,
            theme,
            palette,
            background_color,
            text_style,
            extra,
        }
    }

    fn normalizer(
        &self,
        family: ChartFamily,
        aggregator: HierarchyAggregator,
    ) -> ShapeNormalizer<'_> {
        ShapeNormalizer::new(
            ShapeRule::for_family(family),
            ColorAssignment::from_colors(&self.palette),
            &self.theme,
        )
        .with_aggregator(aggregator)
    }

    fn assemble(
        self,
        spec: &ChartSpecification,
        family: ChartFamily,
        parts: ConfigParts,
    ) -> CanonicalChartConfig {
        let key = spec
            .tooltip_key
            .as_deref()
            .map(|declared| TooltipKey::parse(declared, family.as_str()));
        let trigger = match key.map(|key| key.mode) {
            Some(TooltipMode::Detail) => TooltipTrigger::Axis,
            _ => TooltipTrigger::Item,
        };
        CanonicalChartConfig {
            chart_family: family.as_str().to_owned(),
            theme: self.mode,
            title: merge_optional(
                text_block(spec.title.as_ref()).as_ref(),
                &chrome_defaults::title(&self.theme),
            ),
            legend: merge_optional(spec.legend.as_ref(), &chrome_defaults::legend(&self.theme)),
            toolbox: merge_optional(spec.toolbox.as_ref(), &chrome_defaults::toolbox(&self.theme)),
            grid: parts.grid,
            x_axis: parts.x_axis,
            y_axis: parts.y_axis,
            series: parts.series,
            tooltip_key: spec.tooltip_key.clone(),
            tooltip: TooltipBlock::from_user(spec.tooltip.as_ref(), trigger),
            family_blocks: parts.blocks,
            background_color: self.background_color,
            color: self.palette,
            text_style: self.text_style,
            extra: self.extra,
        }
    }
}

/// Family-specific pieces of a configuration.
#[derive(Default)]
struct ConfigParts {
    series: Vec<CanonicalSeries>,
    grid: Option<Value>,
    x_axis: Vec<Value>,
    y_axis: Vec<Value>,
    blocks: FamilyBlocks,
}

/// Bar, line, scatter, box plot, candlestick and heatmap on a 2D grid.
#[derive(Debug, Clone, Copy)]
pub struct CartesianTransformer {
    family: ChartFamily,
}

impl CartesianTransformer {
    #[must_use]
    pub fn new(family: ChartFamily) -> Self {
        Self { family }
    }
}

impl ChartTransformer for CartesianTransformer {
    fn transform(
        &self,
        spec: &ChartSpecification,
        ctx: &TransformContext<'_>,
    ) -> ChartResult<CanonicalChartConfig> {
        let chrome = Chrome::resolve(spec, ctx);
        let mut cursor = PaletteCursor::default();
        let series: Vec<CanonicalSeries> = spec
            .series
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                // Mixed charts (bar + line) keep each series' own Cartesian family.
                let family = raw
                    .builtin_family()
                    .filter(|family| family.is_cartesian())
                    .unwrap_or(self.family);
                let name = series_name(raw, index);
                let data = chrome
                    .normalizer(family, ctx.aggregator)
                    .normalize(&name, &raw.data, &mut cursor);
                let mut options = series_options(raw, family, &chrome.theme);
                let layout = SeriesLayout::Cartesian {
                    x_axis_index: take_index(&mut options, "xAxisIndex"),
                    y_axis_index: take_index(&mut options, "yAxisIndex"),
                    stack: raw.stack.clone().filter(|stack| !stack.is_empty()),
                };
                CanonicalSeries {
                    family: family.as_str().to_owned(),
                    name,
                    data,
                    layout,
                    options,
                }
            })
            .collect();

        let (x_categories, y_categories) = if self.family == ChartFamily::Heatmap {
            heat_categories(&series)
        } else {
            let names = series
                .first()
                .map(|first| first.data.iter().map(|item| item.name.clone()).collect())
                .unwrap_or_default();
            (names, Vec::new())
        };
        let x_kind = if self.family == ChartFamily::Scatter {
            AxisKind::Value
        } else {
            AxisKind::Category
        };
        let y_kind = if self.family == ChartFamily::Heatmap {
            AxisKind::Category
        } else {
            AxisKind::Value
        };
        let x_axis = resolve_axes(spec.x_axis.as_ref(), x_kind, &chrome.theme, &x_categories);
        let y_axis = resolve_axes(spec.y_axis.as_ref(), y_kind, &chrome.theme, &y_categories);

        let mut blocks = FamilyBlocks::default();
        if self.family == ChartFamily::Heatmap {
            let (min, max) = value_extent(series.iter().flat_map(|s| s.data.iter()));
            let high = chrome.palette.first().map_or("#5470c6", String::as_str);
            blocks.visual_map = Some(merge_optional(
                spec.visual_map.as_ref(),
                &chrome_defaults::visual_map(
                    &chrome.theme,
                    min,
                    max,
                    [chrome.theme.grid.as_str(), high],
                ),
            ));
        } else if let Some(user) = &spec.visual_map {
            blocks.visual_map = Some(user.clone());
        }

        let parts = ConfigParts {
            series,
            grid: Some(merge_optional(spec.grid.as_ref(), &chrome_defaults::grid())),
            x_axis,
            y_axis,
            blocks,
        };
        Ok(chrome.assemble(spec, self.family, parts))
    }
}

/// Pie and funnel: per-item colors, radial or stacked-trapezoid layout.
#[derive(Debug, Clone, Copy)]
pub struct RadialTransformer {
    family: ChartFamily,
}

impl RadialTransformer {
    #[must_use]
    pub fn new(family: ChartFamily) -> Self {
        Self { family }
    }
}

impl ChartTransformer for RadialTransformer {
    fn transform(
        &self,
        spec: &ChartSpecification,
        ctx: &TransformContext<'_>,
    ) -> ChartResult<CanonicalChartConfig> {
        let chrome = Chrome::resolve(spec, ctx);
        let normalizer = chrome.normalizer(self.family, ctx.aggregator);
        let series = spec
            .series
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let name = series_name(raw, index);
                let mut data =
                    normalizer.normalize(&name, &raw.data, &mut PaletteCursor::default());
                let mut options = series_options(raw, self.family, &chrome.theme);
                let layout = if self.family == ChartFamily::Funnel {
                    let sort = take_value(&mut options, "sort", json!("descending"));
                    let sort = sort.as_str().unwrap_or("descending").to_owned();
                    sort_funnel(&mut data, &sort);
                    SeriesLayout::Funnel {
                        sort,
                        gap: take_value(&mut options, "gap", json!(FUNNEL_GAP))
                            .as_f64()
                            .unwrap_or(FUNNEL_GAP),
                        left: take_value(&mut options, "left", json!("10%")),
                        width: take_value(&mut options, "width", json!("80%")),
                    }
                } else {
                    SeriesLayout::Radial {
                        radius: take_value(&mut options, "radius", json!(PIE_RADIUS)),
                        center: take_value(&mut options, "center", json!(PIE_CENTER)),
                    }
                };
                CanonicalSeries {
                    family: self.family.as_str().to_owned(),
                    name,
                    data,
                    layout,
                    options,
                }
            })
            .collect();

        let parts = ConfigParts {
            series,
            grid: spec.grid.clone(),
            ..ConfigParts::default()
        };
        Ok(chrome.assemble(spec, self.family, parts))
    }
}

fn sort_funnel(data: &mut [CanonicalDataItem], order: &str) {
    let key = |item: &CanonicalDataItem| OrderedFloat(item.value.unwrap_or(0.0));
    match order {
        "ascending" => data.sort_by_key(key),
        "none" => {}
        _ => data.sort_by_key(|item| Reverse(key(item))),
    }
}

/// Radar: coordinate rows against a derived or supplied indicator list.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadarTransformer;

impl ChartTransformer for RadarTransformer {
    fn transform(
        &self,
        spec: &ChartSpecification,
        ctx: &TransformContext<'_>,
    ) -> ChartResult<CanonicalChartConfig> {
        let chrome = Chrome::resolve(spec, ctx);
        let normalizer = chrome.normalizer(ChartFamily::Radar, ctx.aggregator);
        let mut cursor = PaletteCursor::default();
        let series: Vec<CanonicalSeries> = spec
            .series
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let name = series_name(raw, index);
                let data = normalizer.normalize(&name, &raw.data, &mut cursor);
                let mut options = series_options(raw, ChartFamily::Radar, &chrome.theme);
                CanonicalSeries {
                    family: ChartFamily::Radar.as_str().to_owned(),
                    name,
                    layout: SeriesLayout::Radar {
                        radar_index: take_index(&mut options, "radarIndex"),
                    },
                    data,
                    options,
                }
            })
            .collect();

        let columns = column_maxima(series.iter().flat_map(|s| s.data.iter()));
        let indicator: Vec<Value> = columns
            .iter()
            .enumerate()
            .map(|(index, max)| {
                json!({
                    "name": format!("Dim {}", index + 1),
                    "max": indicator_max(*max),
                })
            })
            .collect();
        let blocks = FamilyBlocks {
            radar: Some(merge_optional(
                spec.radar.as_ref(),
                &chrome_defaults::radar(&chrome.theme, Value::Array(indicator)),
            )),
            ..FamilyBlocks::default()
        };
        let parts = ConfigParts {
            series,
            blocks,
            ..ConfigParts::default()
        };
        Ok(chrome.assemble(spec, ChartFamily::Radar, parts))
    }
}

fn indicator_max(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        (max + max / INDICATOR_HEADROOM_DIVISOR).ceil()
    } else {
        1.0
    }
}

/// Tree, treemap and sunburst: depth-styled levels over the normalized forest.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyTransformer {
    family: ChartFamily,
}

impl HierarchyTransformer {
    #[must_use]
    pub fn new(family: ChartFamily) -> Self {
        Self { family }
    }
}

impl ChartTransformer for HierarchyTransformer {
    fn transform(
        &self,
        spec: &ChartSpecification,
        ctx: &TransformContext<'_>,
    ) -> ChartResult<CanonicalChartConfig> {
        let chrome = Chrome::resolve(spec, ctx);
        let normalizer = chrome.normalizer(self.family, ctx.aggregator);
        let series = spec
            .series
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let name = series_name(raw, index);
                let data = normalizer.normalize(&name, &raw.data, &mut PaletteCursor::default());
                let mut options = series_options(raw, self.family, &chrome.theme);
                let levels = match options.remove("levels") {
                    Some(Value::Array(levels)) => levels,
                    _ => (0..=forest_height(&data))
                        .map(|depth| {
                            let style = ctx.aggregator.style_for_depth(depth);
                            json!({
                                "itemStyle": {"opacity": style.opacity},
                                "label": {"fontSize": style.font_size},
                            })
                        })
                        .collect(),
                };
                CanonicalSeries {
                    family: self.family.as_str().to_owned(),
                    name,
                    data,
                    layout: SeriesLayout::Hierarchical { levels },
                    options,
                }
            })
            .collect();
        let parts = ConfigParts {
            series,
            ..ConfigParts::default()
        };
        Ok(chrome.assemble(spec, self.family, parts))
    }
}

/// Deepest level index present in the forest (0 for a flat list).
fn forest_height(items: &[CanonicalDataItem]) -> usize {
    items
        .iter()
        .filter(|item| item.is_container())
        .map(|item| 1 + forest_height(&item.children))
        .max()
        .unwrap_or(0)
}

/// Choropleth over a boundary set: every boundary region present exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapTransformer;

impl ChartTransformer for MapTransformer {
    fn boundary_key(&self, spec: &ChartSpecification) -> Option<String> {
        spec.map_id().map(str::to_owned)
    }

    fn transform(
        &self,
        spec: &ChartSpecification,
        ctx: &TransformContext<'_>,
    ) -> ChartResult<CanonicalChartConfig> {
        let map_id = spec.map_id().ok_or_else(|| {
            ChartError::InvalidData("map chart specification names no map".to_owned())
        })?;
        let boundary = ctx.boundary.ok_or_else(|| BoundaryLoadError::Unsupported {
            map_id: map_id.to_owned(),
        })?;
        let chrome = Chrome::resolve(spec, ctx);
        let normalizer = chrome.normalizer(ChartFamily::Map, ctx.aggregator);

        let series: Vec<CanonicalSeries> = spec
            .series
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let name = series_name(raw, index);
                let mut cursor = PaletteCursor::default();
                let provided = normalizer.normalize(&name, &raw.data, &mut cursor);
                let sparse: Vec<RegionValue> = provided
                    .iter()
                    .map(|item| RegionValue::new(item.name.clone(), item.value.unwrap_or(0.0)))
                    .collect();
                let mut by_name: IndexMap<String, CanonicalDataItem> = IndexMap::new();
                for item in provided {
                    by_name.entry(item.name.clone()).or_insert(item);
                }
                let completed = RegionCompleter::complete(&sparse, boundary);
                debug!(
                    map_id,
                    provided = by_name.len(),
                    completed = completed.len(),
                    "completed region dataset"
                );
                let data = completed
                    .into_iter()
                    .filter_map(|region| match by_name.swap_remove(&region.name) {
                        Some(mut item) => {
                            item.value = Some(region.value);
                            Some(item)
                        }
                        None => {
                            let filler = [RawDataItem::named(region.name, 0.0)];
                            normalizer
                                .normalize(&name, &filler, &mut cursor)
                                .into_iter()
                                .next()
                        }
                    })
                    .collect();
                let mut options = series_options(raw, ChartFamily::Map, &chrome.theme);
                CanonicalSeries {
                    family: ChartFamily::Map.as_str().to_owned(),
                    name,
                    data,
                    layout: SeriesLayout::Geo {
                        map: raw.map.clone().unwrap_or_else(|| map_id.to_owned()),
                        geo_index: take_index(&mut options, "geoIndex"),
                    },
                    options,
                }
            })
            .collect();

        let (min, max) = value_extent(series.iter().flat_map(|s| s.data.iter()));
        let high = chrome.palette.first().map_or("#5470c6", String::as_str);
        let blocks = FamilyBlocks {
            geo: Some(merge_optional(
                spec.geo.as_ref(),
                &chrome_defaults::geo(&chrome.theme, map_id),
            )),
            visual_map: Some(merge_optional(
                spec.visual_map.as_ref(),
                &chrome_defaults::visual_map(
                    &chrome.theme,
                    min,
                    max,
                    [chrome.theme.grid.as_str(), high],
                ),
            )),
            ..FamilyBlocks::default()
        };
        let parts = ConfigParts {
            series,
            blocks,
            ..ConfigParts::default()
        };
        Ok(chrome.assemble(spec, ChartFamily::Map, parts))
    }
}

/// Parallel coordinates: one axis per tuple position.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelTransformer;

impl ChartTransformer for ParallelTransformer {
    fn transform(
        &self,
        spec: &ChartSpecification,
        ctx: &TransformContext<'_>,
    ) -> ChartResult<CanonicalChartConfig> {
        let chrome = Chrome::resolve(spec, ctx);
        let normalizer = chrome.normalizer(ChartFamily::Parallel, ctx.aggregator);
        let mut cursor = PaletteCursor::default();
        let series: Vec<CanonicalSeries> = spec
            .series
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let name = series_name(raw, index);
                let data = normalizer.normalize(&name, &raw.data, &mut cursor);
                let mut options = series_options(raw, ChartFamily::Parallel, &chrome.theme);
                CanonicalSeries {
                    family: ChartFamily::Parallel.as_str().to_owned(),
                    name,
                    layout: SeriesLayout::Parallel {
                        parallel_index: take_index(&mut options, "parallelIndex"),
                    },
                    data,
                    options,
                }
            })
            .collect();

        let parallel_axis = match &spec.parallel_axis {
            Some(user) => user.clone(),
            None => {
                let width = column_maxima(series.iter().flat_map(|s| s.data.iter())).len();
                Value::Array(
                    (0..width)
                        .map(|dim| json!({"dim": dim, "name": format!("Dim {}", dim + 1)}))
                        .collect(),
                )
            }
        };
        let blocks = FamilyBlocks {
            parallel_axis: Some(parallel_axis),
            parallel: Some(merge_optional(
                spec.parallel.as_ref(),
                &chrome_defaults::parallel(&chrome.theme),
            )),
            ..FamilyBlocks::default()
        };
        let parts = ConfigParts {
            series,
            blocks,
            ..ConfigParts::default()
        };
        Ok(chrome.assemble(spec, ChartFamily::Parallel, parts))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisKind {
    Category,
    Value,
}

/// Merges each caller axis over the default for its declared (or implied) type.
fn resolve_axes(
    user: Option<&Value>,
    kind: AxisKind,
    theme: &ThemeColors,
    categories: &[String],
) -> Vec<Value> {
    let default_for = |axis: Option<&Value>| {
        let declared = axis.and_then(|axis| axis.get("type")).and_then(Value::as_str);
        match (declared, kind) {
            (Some("category"), _) | (None, AxisKind::Category) => {
                chrome_defaults::category_axis(theme, categories)
            }
            _ => chrome_defaults::value_axis(theme),
        }
    };
    match user {
        Some(Value::Array(axes)) if !axes.is_empty() => axes
            .iter()
            .map(|axis| merge_value(axis, &default_for(Some(axis))))
            .collect(),
        Some(axis @ Value::Object(_)) => vec![merge_value(axis, &default_for(Some(axis)))],
        _ => vec![default_for(None)],
    }
}

/// Category labels for the x and y axes of heat cells.
fn heat_categories(series: &[CanonicalSeries]) -> (Vec<String>, Vec<String>) {
    let mut xs = HeatAxis::default();
    let mut ys = HeatAxis::default();
    for item in series.iter().flat_map(|s| s.data.iter()) {
        if let Some(ItemMeasure::HeatCell { x, y }) = &item.measure {
            xs.observe(x);
            ys.observe(y);
        }
    }
    (xs.into_categories(), ys.into_categories())
}

/// Numeric cells index the category list, so they occupy `0..=max`; string
/// labels follow in first-seen order.
#[derive(Debug, Default)]
struct HeatAxis {
    max_index: Option<usize>,
    labels: IndexSet<String>,
}

impl HeatAxis {
    fn observe(&mut self, cell: &TupleCell) {
        if let Some(index) = cell.as_category_index() {
            self.max_index = Some(self.max_index.map_or(index, |max| max.max(index)));
        } else if let Some(label) = cell.as_label() {
            self.labels.insert(label);
        }
    }

    fn into_categories(self) -> Vec<String> {
        let mut categories: IndexSet<String> = self
            .max_index
            .map(|max| (0..=max).map(|index| index.to_string()).collect())
            .unwrap_or_default();
        categories.extend(self.labels);
        categories.into_iter().collect()
    }
}

/// Min and max of finite item values; `(0, 0)` for an empty set.
fn value_extent<'i>(items: impl Iterator<Item = &'i CanonicalDataItem>) -> (f64, f64) {
    let values: Vec<OrderedFloat<f64>> = items
        .filter_map(|item| item.value)
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .collect();
    match (values.iter().min(), values.iter().max()) {
        (Some(min), Some(max)) => (min.into_inner(), max.into_inner()),
        _ => (0.0, 0.0),
    }
}

/// Per-position maxima over coordinate rows; scalar rows count as one column.
fn column_maxima<'i>(items: impl Iterator<Item = &'i CanonicalDataItem>) -> Vec<f64> {
    let mut maxima: Vec<f64> = Vec::new();
    for item in items {
        let row: Vec<f64> = match &item.measure {
            Some(ItemMeasure::Coordinates { values }) => values.to_vec(),
            _ => item.value.into_iter().collect(),
        };
        for (index, value) in row.into_iter().enumerate() {
            match maxima.get_mut(index) {
                Some(current) => *current = current.max(value),
                None => maxima.push(value),
            }
        }
    }
    maxima
}

fn series_name(raw: &RawSeries, index: usize) -> String {
    raw.name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("Series {}", index + 1))
}

/// Caller series options merged over the family's stock series options.
fn series_options(raw: &RawSeries, family: ChartFamily, theme: &ThemeColors) -> Map<String, Value> {
    let user = Value::Object(raw.options.clone());
    match merge_value(&user, &series_defaults(family, theme)) {
        Value::Object(options) => options,
        _ => Map::new(),
    }
}

fn series_defaults(family: ChartFamily, theme: &ThemeColors) -> Value {
    match family {
        ChartFamily::Bar => json!({"barMaxWidth": 48, "emphasis": {"focus": "series"}}),
        ChartFamily::Line => json!({
            "smooth": false,
            "showSymbol": true,
            "symbolSize": 6,
            "emphasis": {"focus": "series"},
        }),
        ChartFamily::Scatter => json!({"symbolSize": 10}),
        ChartFamily::BoxPlot => json!({"boxWidth": [7, 50]}),
        ChartFamily::Candlestick => json!({
            "itemStyle": {
                "color": "#ec0000",
                "color0": "#00da3c",
                "borderColor": "#8a0000",
                "borderColor0": "#008f28",
            },
        }),
        ChartFamily::Heatmap => json!({
            "label": {"show": false},
            "emphasis": {"itemStyle": {"shadowBlur": 10, "shadowColor": theme.shadow}},
        }),
        ChartFamily::Pie => json!({
            "avoidLabelOverlap": true,
            "label": {"color": theme.text},
            "emphasis": {"itemStyle": {"shadowBlur": 10, "shadowColor": theme.shadow}},
        }),
        ChartFamily::Funnel => json!({"label": {"show": true, "position": "inside"}}),
        ChartFamily::Radar => json!({"symbolSize": 4, "areaStyle": {"opacity": 0.1}}),
        ChartFamily::Tree => json!({
            "orient": "LR",
            "expandAndCollapse": true,
            "initialTreeDepth": 2,
            "label": {"color": theme.text},
        }),
        ChartFamily::Treemap => json!({
            "roam": false,
            "breadcrumb": {"show": true},
            "label": {"show": true},
        }),
        ChartFamily::Sunburst => json!({"radius": ["15%", "80%"], "label": {"rotate": "radial"}}),
        ChartFamily::Map => json!({
            "label": {"show": false},
            "emphasis": {"label": {"color": theme.text}},
        }),
        ChartFamily::Parallel => json!({"lineStyle": {"width": 1, "opacity": 0.5}}),
    }
}

fn take_value(options: &mut Map<String, Value>, key: &str, default: Value) -> Value {
    options
        .remove(key)
        .filter(|value| !value.is_null())
        .unwrap_or(default)
}

fn take_index(options: &mut Map<String, Value>, key: &str) -> usize {
    options
        .remove(key)
        .and_then(|value| value.as_u64())
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or(0)
}

/// A bare string title becomes `{ "text": ... }`.
fn text_block(user: Option<&Value>) -> Option<Value> {
    match user? {
        Value::String(text) => Some(json!({"text": text})),
        other => Some(other.clone()),
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|entries| {
        entries
            .iter()
            .filter_map(|entry| entry.as_str().map(str::to_owned))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AxisKind, forest_height, indicator_max, resolve_axes, text_block};
    use crate::core::{CanonicalDataItem, DefaultPalette, ItemStyle, PaletteProvider};

    fn node(name: &str, children: Vec<CanonicalDataItem>) -> CanonicalDataItem {
        CanonicalDataItem {
            name: name.to_owned(),
            value: children.is_empty().then_some(1.0),
            style: ItemStyle {
                color: "#000".to_owned(),
                opacity: 1.0,
                font_size: 12.0,
                border_color: "#fff".to_owned(),
                border_width: 0.0,
            },
            measure: None,
            children,
            extra: serde_json::Map::new(),
            placeholder: false,
        }
    }

    #[test]
    fn caller_axis_type_selects_default() {
        let theme = DefaultPalette::default().theme_colors(false);
        let axes = resolve_axes(
            Some(&json!([{"type": "value", "name": "x"}])),
            AxisKind::Category,
            &theme,
            &["Mon".to_owned()],
        );
        assert_eq!(axes[0]["type"], "value");
        assert_eq!(axes[0]["name"], "x");
        assert!(axes[0].get("data").is_none());

        let axes = resolve_axes(None, AxisKind::Category, &theme, &["Mon".to_owned()]);
        assert_eq!(axes[0]["data"], json!(["Mon"]));
    }

    #[test]
    fn forest_height_counts_container_levels() {
        let forest = vec![
            node("a", vec![node("b", vec![node("c", Vec::new())])]),
            node("d", Vec::new()),
        ];
        assert_eq!(forest_height(&forest), 2);
        assert_eq!(forest_height(&[]), 0);
    }

    #[test]
    fn helpers_handle_degenerate_input() {
        assert_eq!(indicator_max(0.0), 1.0);
        assert_eq!(indicator_max(90.0), 99.0);
        assert_eq!(text_block(Some(&json!("Sales"))), Some(json!({"text": "Sales"})));
    }
}
