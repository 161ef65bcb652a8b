use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::{ChartFamily, PaletteProvider, ThemeMode, merge_value};
use crate::render::{
    AxisDetailFormatter, BoxPlotFormatter, CandlestickFormatter, Formatter, FormatterContext,
    HeatmapFormatter, HierarchyFormatter, ItemSummaryFormatter, MapFormatter, MarkupBackend,
    ParallelFormatter, RadarFormatter, ShareFormatter, TooltipFormatter, TotalPolicy,
};

use super::chrome_defaults;
use super::{CanonicalChartConfig, TooltipKey, TooltipMode, TooltipTrigger};

/// `(family, theme, mode)` → formatter dispatch table.
#[derive(Default)]
pub struct FormatterRegistry {
    formatters: IndexMap<TooltipKey, Arc<dyn Formatter>>,
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field(
                "keys",
                &self.formatters.keys().map(TooltipKey::declared).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FormatterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary formatters for every builtin family and detail formatters for
    /// the axis-triggered ones, each under both themes.
    #[must_use]
    pub fn with_builtin_formatters(ctx: &FormatterContext) -> Self {
        let mut registry = Self::new();
        for family in ChartFamily::ALL {
            let summary: Arc<dyn Formatter> = match family {
                ChartFamily::Bar | ChartFamily::Line => {
                    Arc::new(ItemSummaryFormatter::new(ctx.clone()))
                }
                ChartFamily::Scatter => {
                    Arc::new(ItemSummaryFormatter::new(ctx.clone()).with_coordinates())
                }
                ChartFamily::Pie | ChartFamily::Funnel => {
                    Arc::new(ShareFormatter::new(ctx.clone()))
                }
                ChartFamily::Radar => Arc::new(RadarFormatter::new(ctx.clone())),
                ChartFamily::BoxPlot => Arc::new(BoxPlotFormatter::new(ctx.clone())),
                ChartFamily::Candlestick => Arc::new(CandlestickFormatter::new(ctx.clone())),
                ChartFamily::Heatmap => Arc::new(HeatmapFormatter::new(ctx.clone())),
                ChartFamily::Tree | ChartFamily::Treemap | ChartFamily::Sunburst => {
                    Arc::new(HierarchyFormatter::new(ctx.clone()))
                }
                ChartFamily::Map => Arc::new(MapFormatter::new(ctx.clone())),
                ChartFamily::Parallel => Arc::new(ParallelFormatter::new(ctx.clone())),
            };
            registry.register_both_themes(family.as_str(), TooltipMode::Summary, summary);

            let detail: Option<Arc<dyn Formatter>> = match family {
                ChartFamily::Bar => Some(Arc::new(AxisDetailFormatter::new(
                    ctx.clone(),
                    TotalPolicy::Always,
                ))),
                ChartFamily::Line => Some(Arc::new(AxisDetailFormatter::new(
                    ctx.clone(),
                    TotalPolicy::WhenStacked,
                ))),
                ChartFamily::Scatter => Some(Arc::new(AxisDetailFormatter::new(
                    ctx.clone(),
                    TotalPolicy::Never,
                ))),
                ChartFamily::BoxPlot => Some(Arc::new(BoxPlotFormatter::new(ctx.clone()))),
                ChartFamily::Candlestick => Some(Arc::new(CandlestickFormatter::new(ctx.clone()))),
                _ => None,
            };
            if let Some(detail) = detail {
                registry.register_both_themes(family.as_str(), TooltipMode::Detail, detail);
            }
        }
        registry
    }

    /// Registers (or replaces) the formatter for one key.
    pub fn register(&mut self, key: TooltipKey, formatter: Arc<dyn Formatter>) {
        if self.formatters.insert(key.clone(), formatter).is_some() {
            debug!(key = %key.declared(), "replaced registered tooltip formatter");
        }
    }

    pub fn register_both_themes(
        &mut self,
        family: &str,
        mode: TooltipMode,
        formatter: Arc<dyn Formatter>,
    ) {
        for theme in [ThemeMode::Light, ThemeMode::Dark] {
            self.register(TooltipKey::new(family, theme, mode), Arc::clone(&formatter));
        }
    }

    #[must_use]
    pub fn resolve(&self, key: &TooltipKey) -> Option<Arc<dyn Formatter>> {
        self.formatters.get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &TooltipKey) -> bool {
        self.formatters.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

/// Decorates resolved configurations with a themed tooltip block and a
/// concrete render function.
pub struct TooltipProcessor {
    registry: Arc<FormatterRegistry>,
    palette: Arc<dyn PaletteProvider>,
}

impl std::fmt::Debug for TooltipProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TooltipProcessor")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl TooltipProcessor {
    #[must_use]
    pub fn new(registry: Arc<FormatterRegistry>, palette: Arc<dyn PaletteProvider>) -> Self {
        Self { registry, palette }
    }

    /// Processor over the builtin formatters, rendering through `backend`.
    #[must_use]
    pub fn with_builtin_formatters(
        palette: Arc<dyn PaletteProvider>,
        backend: Arc<dyn MarkupBackend>,
    ) -> Self {
        let ctx = FormatterContext::new(Arc::clone(&palette), backend);
        Self::new(
            Arc::new(FormatterRegistry::with_builtin_formatters(&ctx)),
            palette,
        )
    }

    #[must_use]
    pub fn registry(&self) -> &FormatterRegistry {
        &self.registry
    }

    /// Key from the declared tooltip key, defaulting the family and theme
    /// to the configuration's own.
    #[must_use]
    pub fn resolve_key(&self, config: &CanonicalChartConfig) -> TooltipKey {
        TooltipKey::parse_with_theme(
            config.tooltip_key.as_deref().unwrap_or_default(),
            &config.chart_family,
            config.theme,
        )
    }

    /// Installs trigger, themed styling and the render function. A lookup
    /// miss installs a renderer that returns an empty string.
    #[must_use]
    pub fn process(&self, mut config: CanonicalChartConfig) -> CanonicalChartConfig {
        let key = self.resolve_key(&config);
        let theme = self.palette.theme_colors(key.is_dark());

        let user = Value::Object(std::mem::take(&mut config.tooltip.options));
        let style = Value::Object(chrome_defaults::tooltip_style(&theme));
        config.tooltip.options = match merge_value(&user, &style) {
            Value::Object(options) => options,
            _ => Map::new(),
        };
        config.tooltip.trigger = match key.mode {
            TooltipMode::Detail => TooltipTrigger::Axis,
            TooltipMode::Summary => TooltipTrigger::Item,
        };

        let declared = key.declared();
        let formatter = match self.registry.resolve(&key) {
            Some(formatter) => {
                TooltipFormatter::new(declared, formatter.build(key.is_dark(), &config))
            }
            None => {
                warn!(
                    key = %declared,
                    family = %key.family,
                    "no tooltip formatter registered; installing empty renderer"
                );
                TooltipFormatter::empty(declared)
            }
        };
        config.tooltip.formatter = Some(formatter);
        config
    }
}
