use std::hint::black_box;
use std::sync::Arc;

use chart_config::api::{ChartConfigResolver, ChartSpecification, RawSeries};
use chart_config::core::{
    ChartFamily, ColorAssignment, DefaultPalette, HierarchyAggregator, PaletteCursor,
    PaletteProvider, RawDataItem, ShapeNormalizer, ShapeRule,
};
use chart_config::render::{DataPointDescriptor, PlainTextMarkup, TooltipInput};
use criterion::{Criterion, criterion_group, criterion_main};

fn wide_forest(branching: usize, depth: usize, seed: &mut usize) -> Vec<RawDataItem> {
    (0..branching)
        .map(|index| {
            *seed += 1;
            if depth == 0 {
                RawDataItem::named(format!("leaf{seed}"), (*seed % 97) as f64 + 1.0)
            } else {
                RawDataItem::container(format!("node{index}"), wide_forest(branching, depth - 1, seed))
            }
        })
        .collect()
}

fn bench_normalize_10k_bars(c: &mut Criterion) {
    let palette = DefaultPalette::default();
    let theme = palette.theme_colors(false);
    let normalizer = ShapeNormalizer::new(
        ShapeRule::for_family(ChartFamily::Bar),
        ColorAssignment::new(&palette, false),
        &theme,
    );
    let raw: Vec<RawDataItem> = (0..10_000)
        .map(|i| match i % 3 {
            0 => RawDataItem::scalar(i as f64),
            1 => RawDataItem::named(format!("c{i}"), i as f64 * 0.5),
            _ => RawDataItem::tuple(&[i as f64, i as f64 * 2.0]),
        })
        .collect();

    c.bench_function("normalize_10k_bar_items", |b| {
        b.iter(|| {
            let items = normalizer.normalize("bench", black_box(&raw), &mut PaletteCursor::default());
            black_box(items.len())
        })
    });
}

fn bench_subtree_totals(c: &mut Criterion) {
    let palette = DefaultPalette::default();
    let theme = palette.theme_colors(false);
    let normalizer = ShapeNormalizer::new(
        ShapeRule::for_family(ChartFamily::Treemap),
        ColorAssignment::new(&palette, false),
        &theme,
    );
    let mut seed = 0;
    let raw = wide_forest(6, 4, &mut seed);
    let forest = normalizer.normalize("bench", &raw, &mut PaletteCursor::default());
    let aggregator = HierarchyAggregator::default();

    c.bench_function("forest_total_6x5", |b| {
        b.iter(|| black_box(aggregator.forest_total(black_box(&forest))))
    });
    c.bench_function("memoize_6x5", |b| {
        b.iter(|| black_box(aggregator.memoize(black_box(&forest)).len()))
    });
}

fn bench_hover_render(c: &mut Criterion) {
    let resolver = ChartConfigResolver::with_builtins(
        Arc::new(DefaultPalette::default()),
        Arc::new(PlainTextMarkup),
    );
    let mut spec = ChartSpecification::new("bar").with_tooltip_key("barDetail");
    for s in 0..8 {
        let data = (0..64).map(|i| RawDataItem::scalar((i * s) as f64)).collect();
        spec = spec.with_series(RawSeries::new("bar", data).with_name(format!("S{s}")));
    }
    let config = futures::executor::block_on(resolver.resolve(&spec))
        .into_result()
        .expect("bench spec resolves");
    let points: Vec<DataPointDescriptor> = (0..8)
        .map(|s| {
            DataPointDescriptor::new(s, 3)
                .with_name("Thu")
                .with_value(RawDataItem::scalar(s as f64 * 3.0))
        })
        .collect();

    c.bench_function("hover_render_bar_detail_8_series", |b| {
        b.iter(|| black_box(config.render_tooltip(TooltipInput::Many(black_box(&points)))))
    });
}

criterion_group!(
    benches,
    bench_normalize_10k_bars,
    bench_subtree_totals,
    bench_hover_render
);
criterion_main!(benches);
