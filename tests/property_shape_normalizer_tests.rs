use chart_config::core::{
    ChartFamily, ColorAssignment, DefaultPalette, PaletteCursor, PaletteProvider, RawDataItem,
    ShapeNormalizer, ShapeRule,
};
use proptest::prelude::*;
use serde_json::{Value, json};

fn raw_item() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1.0e6f64..1.0e6).prop_map(|v| json!(v)),
        ("[a-z]{0,6}", -1.0e3f64..1.0e3).prop_map(|(name, v)| json!([name, v])),
        prop::collection::vec(-1.0e3f64..1.0e3, 1..7).prop_map(|cells| json!(cells)),
        ("[a-z]{0,6}", -1.0e3f64..1.0e3).prop_map(|(name, v)| json!({"name": name, "value": v})),
        Just(json!(true)),
        Just(json!(null)),
        "[a-z]{1,4}".prop_map(|text| json!(text)),
        Just(json!({"value": "not a number"})),
    ]
}

proptest! {
    #[test]
    fn every_item_gets_a_name_a_finite_value_and_a_color(
        family_index in 0usize..ChartFamily::ALL.len(),
        items in prop::collection::vec(raw_item(), 0..24),
        dark in any::<bool>()
    ) {
        let family = ChartFamily::ALL[family_index];
        let raw: Vec<RawDataItem> =
            serde_json::from_value(Value::Array(items.clone())).expect("any json item parses");
        let palette = DefaultPalette::default();
        let theme = palette.theme_colors(dark);
        let normalizer = ShapeNormalizer::new(
            ShapeRule::for_family(family),
            ColorAssignment::new(&palette, dark),
            &theme,
        );

        let normalized = normalizer.normalize("s", &raw, &mut PaletteCursor::default());

        prop_assert_eq!(normalized.len(), items.len());
        for item in &normalized {
            prop_assert!(!item.name.trim().is_empty());
            prop_assert!(item.value.is_some_and(f64::is_finite));
            prop_assert!(!item.style.color.is_empty());
            prop_assert!(item.style.opacity > 0.0 && item.style.opacity <= 1.0);
            prop_assert_eq!(&item.style.border_color, &theme.background);
        }
    }

    #[test]
    fn normalization_is_deterministic(
        family_index in 0usize..ChartFamily::ALL.len(),
        items in prop::collection::vec(raw_item(), 0..16)
    ) {
        let family = ChartFamily::ALL[family_index];
        let raw: Vec<RawDataItem> =
            serde_json::from_value(Value::Array(items)).expect("any json item parses");
        let palette = DefaultPalette::default();
        let theme = palette.theme_colors(false);
        let normalizer = ShapeNormalizer::new(
            ShapeRule::for_family(family),
            ColorAssignment::new(&palette, false),
            &theme,
        );

        let first = normalizer.normalize("s", &raw, &mut PaletteCursor::default());
        let second = normalizer.normalize("s", &raw, &mut PaletteCursor::default());
        prop_assert_eq!(first, second);
    }
}
