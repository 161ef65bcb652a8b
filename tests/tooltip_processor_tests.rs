use std::sync::Arc;

use chart_config::api::{
    CanonicalChartConfig, ChartConfigResolver, ChartSpecification, FormatterRegistry, RawSeries,
    TooltipKey, TooltipMode, TooltipProcessor, TooltipTrigger, TransformRegistry,
};
use chart_config::core::{DefaultPalette, PaletteProvider, RawDataItem, ThemeMode};
use chart_config::render::{
    DataPointDescriptor, Formatter, PlainTextMarkup, RenderFn, TooltipInput,
};
use serde_json::json;

fn plain_resolver() -> ChartConfigResolver {
    ChartConfigResolver::with_builtins(
        Arc::new(DefaultPalette::default()),
        Arc::new(PlainTextMarkup),
    )
}

fn two_series_bar(tooltip_key: &str) -> ChartSpecification {
    ChartSpecification::new("bar")
        .with_tooltip_key(tooltip_key)
        .with_series(
            RawSeries::new("bar", vec![RawDataItem::scalar(3.0)]).with_name("Sales"),
        )
        .with_series(
            RawSeries::new("bar", vec![RawDataItem::scalar(4.0)]).with_name("Costs"),
        )
}

fn hover_column() -> Vec<DataPointDescriptor> {
    vec![
        DataPointDescriptor::new(0, 0)
            .with_name("Mon")
            .with_value(RawDataItem::scalar(3.0)),
        DataPointDescriptor::new(1, 0)
            .with_name("Mon")
            .with_value(RawDataItem::scalar(4.0)),
    ]
}

async fn resolve(resolver: &ChartConfigResolver, spec: &ChartSpecification) -> CanonicalChartConfig {
    resolver
        .resolve(spec)
        .await
        .into_result()
        .expect("specification should resolve")
}

#[tokio::test]
async fn summary_and_detail_keys_install_different_formatters() {
    let resolver = plain_resolver();
    let summary = resolve(&resolver, &two_series_bar("barDark")).await;
    let detail = resolve(&resolver, &two_series_bar("barDarkDetail")).await;

    let summary_formatter = summary.tooltip.formatter.as_ref().expect("summary formatter");
    let detail_formatter = detail.tooltip.formatter.as_ref().expect("detail formatter");
    assert_eq!(summary_formatter.key(), "barDark");
    assert_eq!(detail_formatter.key(), "barDarkDetail");
    assert_eq!(summary.tooltip.trigger, TooltipTrigger::Item);
    assert_eq!(detail.tooltip.trigger, TooltipTrigger::Axis);

    let points = hover_column();
    let summary_text = summary.render_tooltip(TooltipInput::Many(&points));
    let detail_text = detail.render_tooltip(TooltipInput::Many(&points));
    assert_ne!(summary_text, detail_text);
    assert_eq!(summary_text, "Sales\nMon: 3");
}

#[tokio::test]
async fn bar_detail_lists_every_series_and_a_total() {
    let config = resolve(&plain_resolver(), &two_series_bar("barDetail")).await;
    let points = hover_column();

    assert_eq!(
        config.render_tooltip(TooltipInput::Many(&points)),
        "Mon\nSales: 3\nCosts: 4\nTotal: 7"
    );
}

#[tokio::test]
async fn detail_total_without_numeric_values_reports_no_data() {
    let config = resolve(&plain_resolver(), &two_series_bar("barDetail")).await;
    let points = vec![DataPointDescriptor::new(0, 0).with_name("Mon")];

    let text = config.render_tooltip(TooltipInput::Many(&points));
    assert!(text.ends_with("Total: no data"), "{text}");
}

#[tokio::test]
async fn line_detail_totals_only_stacked_charts() {
    let resolver = plain_resolver();
    let line = |stack: Option<&str>| {
        let mut first = RawSeries::new("line", vec![RawDataItem::scalar(3.0)]).with_name("Sales");
        let mut second = RawSeries::new("line", vec![RawDataItem::scalar(4.0)]).with_name("Costs");
        if let Some(stack) = stack {
            first = first.with_stack(stack);
            second = second.with_stack(stack);
        }
        ChartSpecification::new("line")
            .with_tooltip_key("lineDetail")
            .with_series(first)
            .with_series(second)
    };
    let points = hover_column();

    let plain = resolve(&resolver, &line(None)).await;
    assert!(!plain.render_tooltip(TooltipInput::Many(&points)).contains("Total"));

    let stacked = resolve(&resolver, &line(Some("all"))).await;
    assert!(stacked.render_tooltip(TooltipInput::Many(&points)).ends_with("Total: 7"));
}

#[tokio::test]
async fn pie_share_is_computed_from_the_series_total() {
    let spec = ChartSpecification::new("pie").with_series(RawSeries::new(
        "pie",
        vec![RawDataItem::named("A", 1.0), RawDataItem::named("B", 3.0)],
    ));
    let config = resolve(&plain_resolver(), &spec).await;
    let point = DataPointDescriptor::new(0, 1)
        .with_name("B")
        .with_value(RawDataItem::scalar(3.0));

    assert_eq!(
        config.render_tooltip(TooltipInput::Single(&point)),
        "Series 1\nB: 3 (75.0%)"
    );
}

#[tokio::test]
async fn reported_percent_takes_precedence_over_derived_share() {
    let spec = ChartSpecification::new("pie").with_series(RawSeries::new(
        "pie",
        vec![RawDataItem::named("A", 1.0), RawDataItem::named("B", 3.0)],
    ));
    let config = resolve(&plain_resolver(), &spec).await;
    let point = DataPointDescriptor::new(0, 0)
        .with_name("A")
        .with_value(RawDataItem::scalar(1.0))
        .with_percent(12.5);

    assert!(config.render_tooltip(TooltipInput::Single(&point)).ends_with("A: 1 (12.5%)"));
}

#[tokio::test]
async fn zero_total_share_reports_no_data() {
    let spec = ChartSpecification::new("funnel").with_series(RawSeries::new(
        "funnel",
        vec![RawDataItem::named("A", 0.0)],
    ));
    let config = resolve(&plain_resolver(), &spec).await;
    let point = DataPointDescriptor::new(0, 0)
        .with_name("A")
        .with_value(RawDataItem::scalar(0.0));

    assert!(config.render_tooltip(TooltipInput::Single(&point)).ends_with("A: 0 (no data)"));
}

#[tokio::test]
async fn hierarchy_share_uses_memoized_subtree_totals() {
    let spec = ChartSpecification::new("sunburst").with_series(RawSeries::new(
        "sunburst",
        vec![RawDataItem::container(
            "root",
            vec![
                RawDataItem::named("a", 3.0),
                RawDataItem::container(
                    "c",
                    vec![RawDataItem::named("d", 3.0), RawDataItem::named("e", 4.0)],
                ),
            ],
        )],
    ));
    let config = resolve(&plain_resolver(), &spec).await;

    let point = DataPointDescriptor::new(0, 1)
        .with_name("c")
        .with_tree_path(["root", "c"]);
    assert_eq!(
        config.render_tooltip(TooltipInput::Single(&point)),
        "root / c\nValue: 7\nShare: 70.0%"
    );

    let prefixed = DataPointDescriptor::new(0, 1).with_tree_path(["All", "root", "c", "e"]);
    assert!(
        config
            .render_tooltip(TooltipInput::Single(&prefixed))
            .ends_with("Value: 4\nShare: 40.0%")
    );
}

#[tokio::test]
async fn same_named_siblings_report_their_own_totals() {
    let spec = ChartSpecification::new("treemap").with_series(RawSeries::new(
        "treemap",
        vec![RawDataItem::container(
            "root",
            vec![
                RawDataItem::container("x", vec![RawDataItem::named("a", 1.0)]),
                RawDataItem::container("x", vec![RawDataItem::named("b", 9.0)]),
            ],
        )],
    ));
    let config = resolve(&plain_resolver(), &spec).await;

    let by_value = DataPointDescriptor::new(0, 2)
        .with_tree_path(["root", "x"])
        .with_value(RawDataItem::scalar(9.0));
    assert_eq!(
        config.render_tooltip(TooltipInput::Single(&by_value)),
        "root / x\nValue: 9\nShare: 90.0%"
    );

    let by_position = DataPointDescriptor::new(0, 2)
        .with_tree_path(["root", "x"])
        .with_tree_indices([0, 1]);
    assert_eq!(
        config.render_tooltip(TooltipInput::Single(&by_position)),
        "root / x\nValue: 9\nShare: 90.0%"
    );
}

#[tokio::test]
async fn lookup_miss_installs_an_empty_renderer() {
    let spec = ChartSpecification::new("pie")
        .with_tooltip_key("pieDetail")
        .with_series(RawSeries::new("pie", vec![RawDataItem::named("A", 1.0)]));
    let config = resolve(&plain_resolver(), &spec).await;
    let point = DataPointDescriptor::new(0, 0).with_value(RawDataItem::scalar(1.0));

    let formatter = config.tooltip.formatter.as_ref().expect("formatter installed");
    assert_eq!(formatter.key(), "pieLightDetail");
    assert_eq!(config.render_tooltip(TooltipInput::Single(&point)), "");
}

#[tokio::test]
async fn empty_hover_input_renders_nothing() {
    let config = resolve(&plain_resolver(), &two_series_bar("barDetail")).await;

    assert_eq!(config.render_tooltip(TooltipInput::Many(&[])), "");
}

#[tokio::test]
async fn tooltip_styling_follows_theme_and_keeps_caller_options() {
    let mut spec = two_series_bar("barDark");
    spec.tooltip = Some(json!({"confine": false, "trigger": "none"}));
    let config = resolve(&plain_resolver(), &spec).await;
    let dark = DefaultPalette::default().theme_colors(true);

    assert_eq!(config.tooltip.options["confine"], false);
    assert_eq!(config.tooltip.options["backgroundColor"], dark.tooltip_background.as_str());
    assert_eq!(config.tooltip.trigger, TooltipTrigger::Item);
    let serialized = config.to_json_value().expect("serialize");
    assert_eq!(serialized["tooltip"]["trigger"], "item");
    assert!(serialized["tooltip"].get("formatter").is_none());
}

#[tokio::test]
async fn html_output_escapes_caller_strings() {
    let spec = ChartSpecification::new("bar")
        .with_series(RawSeries::new("bar", vec![RawDataItem::scalar(1.0)]).with_name("<b>x</b>"));
    let config = resolve(&ChartConfigResolver::default(), &spec).await;
    let point = DataPointDescriptor::new(0, 0)
        .with_name("a&b")
        .with_color("#5470c6")
        .with_value(RawDataItem::scalar(1.0));

    let html = config.render_tooltip(TooltipInput::Single(&point));
    assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    assert!(html.contains("a&amp;b"));
    assert!(!html.contains("<b>"));
}

/// Renders a fixed marker, so registry dispatch is observable.
struct MarkerFormatter(&'static str);

impl Formatter for MarkerFormatter {
    fn build(&self, _is_dark: bool, _config: &CanonicalChartConfig) -> RenderFn {
        let marker = self.0;
        Arc::new(move |_: TooltipInput<'_>| marker.to_owned())
    }
}

#[tokio::test]
async fn custom_registry_dispatches_on_the_full_key() {
    let mut formatters = FormatterRegistry::new();
    formatters.register(
        TooltipKey::new("bar", ThemeMode::Light, TooltipMode::Summary),
        Arc::new(MarkerFormatter("light summary")),
    );
    formatters.register(
        TooltipKey::new("bar", ThemeMode::Dark, TooltipMode::Detail),
        Arc::new(MarkerFormatter("dark detail")),
    );
    let palette = Arc::new(DefaultPalette::default());
    let processor = TooltipProcessor::new(Arc::new(formatters), palette.clone());
    let registry = TransformRegistry::with_builtin_transformers(palette);
    let resolver = ChartConfigResolver::new(registry, processor);
    let points = hover_column();

    for (declared, expected) in [
        ("bar", "light summary"),
        ("barDetailDark", "dark detail"),
        ("barDark", ""),
    ] {
        let config = resolve(&resolver, &two_series_bar(declared)).await;
        assert_eq!(
            config.render_tooltip(TooltipInput::Many(&points)),
            expected,
            "key {declared}"
        );
    }
}

#[tokio::test]
async fn processing_is_repeatable_on_a_resolved_config() {
    let resolver = plain_resolver();
    let config = resolve(&resolver, &two_series_bar("barDetail")).await;
    let again = resolver.tooltips().process(config.clone());

    assert_eq!(config, again);
    assert_eq!(
        resolver.tooltips().resolve_key(&config),
        TooltipKey::new("bar", ThemeMode::Light, TooltipMode::Detail)
    );
}
