//! Defaulted merge: caller values win at every leaf, defaults fill the gaps.
//!
//! Engine-schema blocks (title, legend, axes, tooltip styling, family blocks)
//! are merged as JSON trees; typed styles go through [`Defaulted`].

use serde_json::{Map, Value};

use crate::core::data_item::{ItemStyle, StyleOverrides};

/// Recursively merges `user` over `default`.
///
/// Objects merge key by key; any other non-null user value (including arrays)
/// replaces the default wholesale; `null` counts as absent.
#[must_use]
pub fn merge_value(user: &Value, default: &Value) -> Value {
    match (user, default) {
        (Value::Null, _) => default.clone(),
        (Value::Object(user_map), Value::Object(default_map)) => {
            Value::Object(merge_maps(user_map, default_map))
        }
        _ => user.clone(),
    }
}

/// Like [`merge_value`] for an optional caller block.
#[must_use]
pub fn merge_optional(user: Option<&Value>, default: &Value) -> Value {
    user.map_or_else(|| default.clone(), |user| merge_value(user, default))
}

fn merge_maps(user: &Map<String, Value>, default: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(default.len().max(user.len()));
    for (key, default_value) in default {
        let merged = user
            .get(key)
            .map_or_else(|| default_value.clone(), |u| merge_value(u, default_value));
        out.insert(key.clone(), merged);
    }
    for (key, user_value) in user {
        if !default.contains_key(key) && !user_value.is_null() {
            out.insert(key.clone(), user_value.clone());
        }
    }
    out
}

/// Sparse value that resolves against a complete default.
pub trait Defaulted {
    type Resolved;

    fn or_defaults(&self, defaults: &Self::Resolved) -> Self::Resolved;
}

impl<T: Clone> Defaulted for Option<T> {
    type Resolved = T;

    fn or_defaults(&self, defaults: &T) -> T {
        self.as_ref().unwrap_or(defaults).clone()
    }
}

impl Defaulted for Value {
    type Resolved = Value;

    fn or_defaults(&self, defaults: &Value) -> Value {
        merge_value(self, defaults)
    }
}

impl Defaulted for StyleOverrides {
    type Resolved = ItemStyle;

    fn or_defaults(&self, defaults: &ItemStyle) -> ItemStyle {
        ItemStyle {
            color: self.color.or_defaults(&defaults.color),
            opacity: self
                .opacity
                .filter(|v| v.is_finite())
                .or_defaults(&defaults.opacity),
            font_size: self
                .font_size
                .filter(|v| v.is_finite() && *v > 0.0)
                .or_defaults(&defaults.font_size),
            border_color: self.border_color.or_defaults(&defaults.border_color),
            border_width: self
                .border_width
                .filter(|v| v.is_finite())
                .or_defaults(&defaults.border_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Defaulted, merge_value};
    use crate::core::data_item::{ItemStyle, StyleOverrides};

    #[test]
    fn user_leaves_win_and_defaults_fill_gaps() {
        let user = json!({"textStyle": {"color": "#f00"}, "show": null, "extra": [1]});
        let default = json!({"show": true, "textStyle": {"color": "#333", "fontSize": 14}});

        let merged = merge_value(&user, &default);

        assert_eq!(
            merged,
            json!({"show": true, "textStyle": {"color": "#f00", "fontSize": 14}, "extra": [1]})
        );
    }

    #[test]
    fn arrays_replace_rather_than_merge() {
        let merged = merge_value(&json!({"radius": ["40%"]}), &json!({"radius": ["0%", "70%"]}));
        assert_eq!(merged, json!({"radius": ["40%"]}));
    }

    #[test]
    fn style_overrides_keep_every_caller_field() {
        let defaults = ItemStyle {
            color: "#5470c6".to_owned(),
            opacity: 1.0,
            font_size: 12.0,
            border_color: "#fff".to_owned(),
            border_width: 0.0,
        };
        let overrides = StyleOverrides {
            color: Some("#123456".to_owned()),
            opacity: Some(f64::NAN),
            border_width: Some(2.0),
            ..StyleOverrides::default()
        };

        let resolved = overrides.or_defaults(&defaults);

        assert_eq!(resolved.color, "#123456");
        assert_eq!(resolved.opacity, 1.0);
        assert_eq!(resolved.border_width, 2.0);
        assert_eq!(resolved.font_size, 12.0);
    }
}
