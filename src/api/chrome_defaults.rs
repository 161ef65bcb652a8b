//! Theme-driven defaults for the non-series blocks of a configuration.
//!
//! Every function returns the default block; callers merge user input over
//! it with [`merge_optional`](crate::core::merge_optional).

use serde_json::{Map, Value, json};

use crate::core::ThemeColors;

#[must_use]
pub fn text_style(theme: &ThemeColors) -> Value {
    json!({
        "color": theme.text,
        "fontFamily": "sans-serif",
        "fontSize": 12,
    })
}

#[must_use]
pub fn title(theme: &ThemeColors) -> Value {
    json!({
        "show": true,
        "text": "",
        "left": "center",
        "top": 8,
        "textStyle": {"color": theme.text, "fontSize": 16, "fontWeight": "bold"},
        "subtextStyle": {"color": theme.muted_text, "fontSize": 12},
    })
}

#[must_use]
pub fn legend(theme: &ThemeColors) -> Value {
    json!({
        "show": true,
        "type": "scroll",
        "bottom": 4,
        "left": "center",
        "textStyle": {"color": theme.muted_text},
        "pageTextStyle": {"color": theme.muted_text},
    })
}

#[must_use]
pub fn toolbox(theme: &ThemeColors) -> Value {
    json!({
        "show": false,
        "right": 12,
        "iconStyle": {"borderColor": theme.axis},
        "feature": {"saveAsImage": {"backgroundColor": theme.background}},
    })
}

#[must_use]
pub fn grid() -> Value {
    json!({
        "left": "3%",
        "right": "4%",
        "top": 60,
        "bottom": 48,
        "containLabel": true,
    })
}

#[must_use]
pub fn category_axis(theme: &ThemeColors, categories: &[String]) -> Value {
    json!({
        "type": "category",
        "data": categories,
        "boundaryGap": true,
        "axisLine": {"lineStyle": {"color": theme.axis}},
        "axisLabel": {"color": theme.muted_text},
        "splitLine": {"show": false},
    })
}

#[must_use]
pub fn value_axis(theme: &ThemeColors) -> Value {
    json!({
        "type": "value",
        "scale": false,
        "axisLine": {"show": false, "lineStyle": {"color": theme.axis}},
        "axisLabel": {"color": theme.muted_text},
        "splitLine": {"show": true, "lineStyle": {"color": theme.grid}},
    })
}

/// Tooltip chrome; the trigger and formatter are owned by the tooltip block.
#[must_use]
pub fn tooltip_style(theme: &ThemeColors) -> Map<String, Value> {
    let value = json!({
        "show": true,
        "confine": true,
        "backgroundColor": theme.tooltip_background,
        "borderColor": theme.tooltip_border,
        "borderWidth": 1,
        "padding": [8, 12],
        "textStyle": {"color": theme.text, "fontSize": 12},
        "extraCssText": format!("box-shadow: 0 2px 8px {};", theme.shadow),
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Continuous color scale over `[min, max]`.
#[must_use]
pub fn visual_map(theme: &ThemeColors, min: f64, max: f64, range_colors: [&str; 2]) -> Value {
    json!({
        "type": "continuous",
        "min": min,
        "max": max,
        "calculable": true,
        "left": "left",
        "bottom": 48,
        "textStyle": {"color": theme.muted_text},
        "inRange": {"color": range_colors},
    })
}

#[must_use]
pub fn geo(theme: &ThemeColors, map_id: &str) -> Value {
    json!({
        "map": map_id,
        "roam": true,
        "itemStyle": {"areaColor": theme.grid, "borderColor": theme.background},
        "emphasis": {"label": {"color": theme.text}},
    })
}

#[must_use]
pub fn parallel(theme: &ThemeColors) -> Value {
    json!({
        "left": "5%",
        "right": "13%",
        "top": "20%",
        "bottom": "10%",
        "parallelAxisDefault": {
            "nameTextStyle": {"color": theme.text},
            "axisLine": {"lineStyle": {"color": theme.axis}},
            "axisLabel": {"color": theme.muted_text},
        },
    })
}

#[must_use]
pub fn radar(theme: &ThemeColors, indicator: Value) -> Value {
    json!({
        "indicator": indicator,
        "shape": "polygon",
        "radius": "65%",
        "axisName": {"color": theme.text},
        "axisLine": {"lineStyle": {"color": theme.axis}},
        "splitLine": {"lineStyle": {"color": theme.grid}},
    })
}
