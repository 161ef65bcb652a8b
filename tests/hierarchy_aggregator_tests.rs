use chart_config::core::{
    CanonicalDataItem, ChartFamily, ColorAssignment, DefaultPalette, HierarchyAggregator,
    MIN_DEPTH_OPACITY, PaletteCursor, PaletteProvider, Percentage, RawDataItem, ShapeNormalizer,
    ShapeRule,
};

fn tree(raw: &[RawDataItem]) -> Vec<CanonicalDataItem> {
    let palette = DefaultPalette::default();
    let theme = palette.theme_colors(false);
    ShapeNormalizer::new(
        ShapeRule::for_family(ChartFamily::Treemap),
        ColorAssignment::new(&palette, false),
        &theme,
    )
    .normalize("tree", raw, &mut PaletteCursor::default())
}

fn sample_forest() -> Vec<CanonicalDataItem> {
    tree(&[
        RawDataItem::container(
            "root",
            vec![
                RawDataItem::named("a", 1.0),
                RawDataItem::named("b", 2.0),
                RawDataItem::container(
                    "c",
                    vec![RawDataItem::named("d", 3.0), RawDataItem::named("e", 4.0)],
                ),
            ],
        ),
        RawDataItem::named("solo", 10.0),
    ])
}

#[test]
fn subtree_total_sums_leaves() {
    let forest = sample_forest();
    let aggregator = HierarchyAggregator::default();

    assert_eq!(aggregator.subtree_total(&forest[0]), 10.0);
    assert_eq!(aggregator.subtree_total(&forest[0].children[2]), 7.0);
    assert_eq!(aggregator.forest_total(&forest), 20.0);
}

#[test]
fn container_own_value_is_ignored() {
    let mut forest = sample_forest();
    forest[0].value = Some(1_000.0);
    forest[0].children[2].value = Some(-50.0);

    assert_eq!(HierarchyAggregator::default().subtree_total(&forest[0]), 10.0);
}

#[test]
fn negative_and_non_finite_leaves_contribute_zero() {
    let mut forest = sample_forest();
    forest[0].children[0].value = Some(-5.0);
    forest[0].children[1].value = Some(f64::NAN);

    assert_eq!(HierarchyAggregator::default().subtree_total(&forest[0]), 7.0);
}

#[test]
fn percentages_are_relative_to_the_given_root() {
    let forest = sample_forest();
    let aggregator = HierarchyAggregator::default();
    let root = &forest[0];

    let share = aggregator.percentage_of(&root.children[2], root);
    assert_eq!(share, Percentage::Available(70.0));
    let of_series = aggregator.percentage_of_series(root, &forest);
    assert_eq!(of_series.value(), Some(50.0));
}

#[test]
fn zero_total_yields_unavailable_percentage() {
    let forest = tree(&[RawDataItem::container(
        "empty",
        vec![RawDataItem::named("x", 0.0), RawDataItem::named("y", 0.0)],
    )]);

    let share = HierarchyAggregator::default().percentage_of(&forest[0].children[0], &forest[0]);
    assert_eq!(share, Percentage::Unavailable);
    assert_eq!(share.value(), None);
}

#[test]
fn memoized_totals_match_direct_computation() {
    let forest = sample_forest();
    let aggregator = HierarchyAggregator::default();
    let totals = aggregator.memoize(&forest);

    assert_eq!(totals.root_total(), aggregator.forest_total(&forest));
    assert_eq!(totals.total_for_path(&["root", "c"]), Some(7.0));
    assert_eq!(totals.total_for_path(&["root", "c", "e"]), Some(4.0));
    assert_eq!(totals.total_for_path(&["solo"]), Some(10.0));
    assert_eq!(totals.total_for_path(&["missing"]), None);
    assert_eq!(
        totals.percentage_for_path(&["root"]),
        Percentage::Available(50.0)
    );
    assert_eq!(totals.len(), 7);
}

#[test]
fn depth_style_is_non_increasing_and_floored() {
    let aggregator = HierarchyAggregator::default();
    let mut previous = aggregator.style_for_depth(0);
    assert_eq!(previous.opacity, 1.0);

    for depth in 1..=20 {
        let style = aggregator.style_for_depth(depth);
        assert!(style.font_size <= previous.font_size);
        assert!(style.opacity <= previous.opacity);
        assert!(style.opacity >= MIN_DEPTH_OPACITY);
        assert!(style.font_size > 0.0);
        previous = style;
    }
}

#[test]
fn depth_limit_truncates_deep_subtrees() {
    let mut raw = RawDataItem::named("leaf", 5.0);
    for level in (0..6).rev() {
        raw = RawDataItem::container(format!("n{level}"), vec![raw]);
    }
    let forest = tree(&[raw]);

    assert_eq!(HierarchyAggregator::default().subtree_total(&forest[0]), 5.0);
    assert_eq!(HierarchyAggregator::with_max_depth(3).subtree_total(&forest[0]), 0.0);
}
