use std::sync::Arc;

use async_trait::async_trait;
use chart_config::BoundaryLoadError;
use chart_config::api::{CanonicalChartConfig, ChartSpecification, RawSeries, TransformRegistry};
use chart_config::core::{
    BoundaryFeatureSet, BoundaryLoader, DefaultPalette, RawDataItem, RegionCompleter,
};
use chart_config::render::{
    BoxPlotFormatter, CandlestickFormatter, DataPointDescriptor, Formatter, FormatterContext,
    HeatmapFormatter, ItemSummaryFormatter, MapFormatter, ParallelFormatter, PlainTextMarkup,
    RadarFormatter, TooltipInput,
};
use serde_json::json;

fn ctx() -> FormatterContext {
    FormatterContext::new(Arc::new(DefaultPalette::default()), Arc::new(PlainTextMarkup))
}

async fn config_for(spec: ChartSpecification) -> CanonicalChartConfig {
    TransformRegistry::with_builtin_transformers(Arc::new(DefaultPalette::default()))
        .try_transform(&spec)
        .await
        .expect("specification should resolve")
}

fn render(
    formatter: &dyn Formatter,
    config: &CanonicalChartConfig,
    point: &DataPointDescriptor,
) -> String {
    let render = formatter.build(false, config);
    render(TooltipInput::Single(point))
}

#[tokio::test]
async fn box_plot_single_point_lists_statistics_with_two_decimals() {
    let config = config_for(ChartSpecification::new("boxplot").with_series(
        RawSeries::new("boxplot", vec![RawDataItem::tuple(&[10.0, 20.0, 30.0, 40.0, 50.0])])
            .with_name("Latency"),
    ))
    .await;
    let point = DataPointDescriptor::new(0, 0)
        .with_name("Mon")
        .with_value(RawDataItem::tuple(&[10.0, 20.0, 30.0, 40.0, 50.0]));

    assert_eq!(
        render(&BoxPlotFormatter::new(ctx()), &config, &point),
        "Latency · Mon\nMin: 10.00\nQ1: 20.00\nMedian: 30.00\nQ3: 40.00\nMax: 50.00\nIQR: 20.00\nRange: 40.00"
    );
}

#[tokio::test]
async fn box_plot_six_element_value_renders_like_five() {
    let config = config_for(ChartSpecification::new("boxplot").with_series(RawSeries::new(
        "boxplot",
        vec![RawDataItem::tuple(&[10.0, 20.0, 30.0, 40.0, 50.0])],
    )))
    .await;
    let formatter = BoxPlotFormatter::new(ctx());
    let five = DataPointDescriptor::new(0, 0)
        .with_name("Mon")
        .with_value(RawDataItem::tuple(&[10.0, 20.0, 30.0, 40.0, 50.0]));
    let six = DataPointDescriptor::new(0, 0)
        .with_name("Mon")
        .with_value(RawDataItem::tuple(&[0.0, 10.0, 20.0, 30.0, 40.0, 50.0]));

    assert_eq!(
        render(&formatter, &config, &five),
        render(&formatter, &config, &six)
    );
}

#[tokio::test]
async fn box_plot_with_unreadable_value_reports_no_data() {
    let config = config_for(ChartSpecification::new("boxplot")).await;
    let point = DataPointDescriptor::new(0, 0).with_value(RawDataItem::tuple(&[1.0, 2.0]));

    assert!(
        render(&BoxPlotFormatter::new(ctx()), &config, &point).ends_with("Statistics: no data")
    );
}

#[tokio::test]
async fn box_plot_detail_rows_show_median_and_spread() {
    let config = config_for(ChartSpecification::new("boxplot")).await;
    let points = vec![
        DataPointDescriptor::new(0, 0)
            .with_series_name("A")
            .with_axis_value_label("Mon")
            .with_value(RawDataItem::tuple(&[1.0, 2.0, 3.0, 4.0, 5.0])),
        DataPointDescriptor::new(1, 0)
            .with_series_name("B")
            .with_value(RawDataItem::scalar(1.0)),
    ];
    let render = BoxPlotFormatter::new(ctx()).build(false, &config);

    assert_eq!(
        render(TooltipInput::Many(&points)),
        "Mon\nA: median 3.00 (IQR 2.00)\nB: no data"
    );
}

#[tokio::test]
async fn candlestick_reports_signed_change() {
    let config = config_for(ChartSpecification::new("candlestick")).await;
    let point = DataPointDescriptor::new(0, 0)
        .with_axis_value_label("2024-01-02")
        .with_value(RawDataItem::tuple(&[20.0, 34.0, 10.0, 38.0]));

    assert_eq!(
        render(&CandlestickFormatter::new(ctx()), &config, &point),
        "2024-01-02\nOpen: 20.00\nClose: 34.00\nLow: 10.00\nHigh: 38.00\nChange: +14.00 (+70.00%)"
    );
}

#[tokio::test]
async fn candlestick_with_zero_open_has_no_change_percentage() {
    let config = config_for(ChartSpecification::new("candlestick")).await;
    let point = DataPointDescriptor::new(0, 0)
        .with_name("d1")
        .with_value(RawDataItem::tuple(&[0.0, 5.0, 0.0, 6.0]));

    assert!(
        render(&CandlestickFormatter::new(ctx()), &config, &point)
            .ends_with("Change: +5.00 (no data)")
    );
}

#[tokio::test]
async fn heatmap_resolves_axis_indices_to_category_labels() {
    let data = serde_json::from_value(json!([["Mon", "AM", 5], ["Tue", "PM", 9]])).expect("items");
    let config = config_for(
        ChartSpecification::new("heatmap")
            .with_series(RawSeries::new("heatmap", data).with_name("Load")),
    )
    .await;
    let point = DataPointDescriptor::new(0, 1).with_value(RawDataItem::tuple(&[1.0, 0.0, 9.0]));

    assert_eq!(
        render(&HeatmapFormatter::new(ctx()), &config, &point),
        "Load\nTue / AM: 9"
    );
}

#[tokio::test]
async fn heatmap_numeric_indices_label_their_own_category() {
    let data = serde_json::from_value(json!([[1, 0, 5], [0, 0, 3]])).expect("items");
    let config =
        config_for(ChartSpecification::new("heatmap").with_series(RawSeries::new("heatmap", data)))
            .await;
    let point = DataPointDescriptor::new(0, 0).with_value(RawDataItem::tuple(&[1.0, 0.0, 5.0]));

    assert_eq!(
        render(&HeatmapFormatter::new(ctx()), &config, &point),
        "Series 1\n1 / 0: 5"
    );
}

#[tokio::test]
async fn radar_rows_use_indicator_names() {
    let mut spec = ChartSpecification::new("radar").with_series(RawSeries::new(
        "radar",
        vec![RawDataItem::tuple(&[90.0, 40.0])],
    ));
    spec.radar = Some(json!({"indicator": [{"name": "Speed", "max": 100}, {"name": "Power", "max": 50}]}));
    let config = config_for(spec).await;
    let point = DataPointDescriptor::new(0, 0)
        .with_name("Alice")
        .with_value(RawDataItem::tuple(&[90.0, 40.0]));

    assert_eq!(
        render(&RadarFormatter::new(ctx()), &config, &point),
        "Alice\nSpeed: 90\nPower: 40"
    );
}

#[tokio::test]
async fn parallel_rows_fall_back_to_positional_dimension_names() {
    let config = config_for(ChartSpecification::new("parallel").with_series(
        RawSeries::new("parallel", vec![RawDataItem::tuple(&[1.0, 2.5])]).with_name("Runs"),
    ))
    .await;
    let point = DataPointDescriptor::new(0, 0).with_value(RawDataItem::tuple(&[1.0, 2.5, 7.0]));

    assert_eq!(
        render(&ParallelFormatter::new(ctx()), &config, &point),
        "Runs\nDim 1: 1\nDim 2: 2.5\nDim 3: 7"
    );
}

#[tokio::test]
async fn scatter_summary_shows_coordinates() {
    let config = config_for(ChartSpecification::new("scatter").with_series(
        RawSeries::new("scatter", vec![RawDataItem::tuple(&[1.5, 2.0])]).with_name("Points"),
    ))
    .await;
    let point = DataPointDescriptor::new(0, 0).with_value(RawDataItem::tuple(&[1.5, 2.0]));
    let formatter = ItemSummaryFormatter::new(ctx()).with_coordinates();

    assert_eq!(render(&formatter, &config, &point), "Points\n#1: (1.5, 2)");
}

struct CompassLoader;

#[async_trait]
impl BoundaryLoader for CompassLoader {
    async fn load(&self, _map_id: &str) -> Result<BoundaryFeatureSet, BoundaryLoadError> {
        Ok(BoundaryFeatureSet::new(["North", "South", "East"]))
    }
}

#[tokio::test]
async fn map_share_is_relative_to_the_completed_dataset() {
    let spec = ChartSpecification::new("map").with_map("compass").with_series(RawSeries::new(
        "map",
        vec![RawDataItem::named("North", 5.0), RawDataItem::named("South", 15.0)],
    ));
    let config = TransformRegistry::with_builtin_transformers(Arc::new(DefaultPalette::default()))
        .with_region_completer(Arc::new(RegionCompleter::new(Arc::new(CompassLoader))))
        .try_transform(&spec)
        .await
        .expect("map should resolve");
    let formatter = MapFormatter::new(ctx());

    let north = DataPointDescriptor::new(0, 0)
        .with_name("North")
        .with_value(RawDataItem::named("North", 5.0));
    assert_eq!(
        render(&formatter, &config, &north),
        "North\nSeries 1: 5\nShare: 25.0%"
    );

    let east = DataPointDescriptor::new(0, 2)
        .with_name("East")
        .with_value(RawDataItem::scalar(0.0));
    assert!(render(&formatter, &config, &east).ends_with("Series 1: 0\nShare: 0.0%"));
}

#[tokio::test]
async fn dark_and_light_builds_differ_only_in_styling() {
    let config = config_for(ChartSpecification::new("bar").with_series(RawSeries::new(
        "bar",
        vec![RawDataItem::scalar(2.0)],
    )))
    .await;
    let point = DataPointDescriptor::new(0, 0).with_value(RawDataItem::scalar(2.0));
    let formatter = ItemSummaryFormatter::new(ctx());

    let light = formatter.build(false, &config)(TooltipInput::Single(&point));
    let dark = formatter.build(true, &config)(TooltipInput::Single(&point));
    assert_eq!(light, dark);
    assert_eq!(light, "Series 1\n#1: 2");
}
