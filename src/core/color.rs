//! Palette cycling for series items and tree nodes.
//!
//! Policy, not invariant: depth-0 nodes take palette entries in order; deeper
//! nodes keep their root's hue, fade with depth down to
//! [`MIN_DEPTH_OPACITY`], and cycle a fixed set of alpha-suffixed variants so
//! siblings stay distinguishable while the subtree reads as one group.

use crate::core::palette::PaletteProvider;

pub const MIN_DEPTH_OPACITY: f64 = 0.6;
const DEPTH_OPACITY_STEP: f64 = 0.1;
const VARIANT_ALPHA_SUFFIXES: [&str; 4] = ["ff", "d9", "b3", "8c"];
const FALLBACK_COLOR: &str = "#5470c6";

#[derive(Debug, Clone, PartialEq)]
pub struct AssignedColor {
    pub color: String,
    pub opacity: f64,
}

/// Deterministic position in the palette, advanced in input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaletteCursor {
    next: usize,
}

impl PaletteCursor {
    #[must_use]
    pub fn starting_at(index: usize) -> Self {
        Self { next: index }
    }

    /// Returns the current index and moves past it.
    pub fn advance(&mut self) -> usize {
        let current = self.next;
        self.next = self.next.wrapping_add(1);
        current
    }

    #[must_use]
    pub fn peek(self) -> usize {
        self.next
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColorAssignment<'a> {
    colors: &'a [String],
}

impl<'a> ColorAssignment<'a> {
    #[must_use]
    pub fn new(palette: &'a dyn PaletteProvider, is_dark: bool) -> Self {
        Self {
            colors: palette.series_colors(is_dark),
        }
    }

    #[must_use]
    pub fn from_colors(colors: &'a [String]) -> Self {
        Self { colors }
    }

    #[must_use]
    pub fn palette_size(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn base_color(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            return FALLBACK_COLOR;
        }
        &self.colors[index % self.colors.len()]
    }

    /// Color for the `index`-th item (depth 0) or for the first descendant
    /// at `depth` under root `index`.
    #[must_use]
    pub fn color_for(&self, index: usize, depth: usize) -> AssignedColor {
        if depth == 0 {
            return AssignedColor {
                color: self.base_color(index).to_owned(),
                opacity: 1.0,
            };
        }
        self.shade_for(index, 0, depth)
    }

    /// Variant of root `root_index`'s hue for the `sibling_index`-th node at `depth`.
    #[must_use]
    pub fn shade_for(
        &self,
        root_index: usize,
        sibling_index: usize,
        depth: usize,
    ) -> AssignedColor {
        let base = self.base_color(root_index);
        if depth == 0 {
            return AssignedColor {
                color: base.to_owned(),
                opacity: 1.0,
            };
        }
        let suffix = VARIANT_ALPHA_SUFFIXES[sibling_index % VARIANT_ALPHA_SUFFIXES.len()];
        AssignedColor {
            color: with_alpha_suffix(base, suffix),
            opacity: opacity_for_depth(depth),
        }
    }
}

/// Non-increasing in `depth`, never below [`MIN_DEPTH_OPACITY`].
#[must_use]
pub fn opacity_for_depth(depth: usize) -> f64 {
    let depth = depth.min(64) as f64;
    (1.0 - DEPTH_OPACITY_STEP * depth).max(MIN_DEPTH_OPACITY)
}

fn with_alpha_suffix(base: &str, suffix: &str) -> String {
    let Some(hex) = base.strip_prefix('#') else {
        return base.to_owned();
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return base.to_owned();
    }
    match hex.len() {
        6 => format!("#{hex}{suffix}"),
        3 => {
            let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
            format!("#{expanded}{suffix}")
        }
        8 => format!("#{}{suffix}", &hex[..6]),
        _ => base.to_owned(),
    }
}
