use indexmap::IndexMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::core::color::opacity_for_depth;
use crate::core::data_item::CanonicalDataItem;

/// Recursion bound for every tree walk; deeper children are truncated.
pub const MAX_TREE_DEPTH: usize = 64;

const ROOT_FONT_SIZE: f64 = 14.0;
const FONT_SIZE_STEP: f64 = 2.0;
const MIN_FONT_SIZE: f64 = 9.0;

/// Share of a total, or an explicit marker when the total is zero/non-finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Percentage {
    Available(f64),
    Unavailable,
}

impl Percentage {
    #[must_use]
    pub fn of(part: f64, total: f64) -> Self {
        if !part.is_finite() || !total.is_finite() || total == 0.0 {
            return Self::Unavailable;
        }
        let pct = 100.0 * part / total;
        if pct.is_finite() {
            Self::Available(pct)
        } else {
            Self::Unavailable
        }
    }

    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Available(pct) => Some(pct),
            Self::Unavailable => None,
        }
    }
}

/// Label presentation for one tree level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthStyle {
    pub font_size: f64,
    pub opacity: f64,
}

/// Stateless subtree arithmetic over canonical items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyAggregator {
    max_depth: usize,
}

impl Default for HierarchyAggregator {
    fn default() -> Self {
        Self {
            max_depth: MAX_TREE_DEPTH,
        }
    }
}

impl HierarchyAggregator {
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    #[must_use]
    pub fn max_depth(self) -> usize {
        self.max_depth
    }

    /// Sum of leaf values under `node`. Containers ignore their own value.
    #[must_use]
    pub fn subtree_total(self, node: &CanonicalDataItem) -> f64 {
        self.total_at(node, 0)
    }

    /// Sum of subtree totals over sibling roots (a whole series).
    #[must_use]
    pub fn forest_total(self, nodes: &[CanonicalDataItem]) -> f64 {
        nodes.iter().map(|node| self.subtree_total(node)).sum()
    }

    #[must_use]
    pub fn percentage_of(self, node: &CanonicalDataItem, root: &CanonicalDataItem) -> Percentage {
        Percentage::of(self.subtree_total(node), self.subtree_total(root))
    }

    #[must_use]
    pub fn percentage_of_series(
        self,
        node: &CanonicalDataItem,
        series: &[CanonicalDataItem],
    ) -> Percentage {
        Percentage::of(self.subtree_total(node), self.forest_total(series))
    }

    /// Non-increasing in `depth`, floored for both font size and opacity.
    #[must_use]
    pub fn style_for_depth(self, depth: usize) -> DepthStyle {
        let steps = depth.min(self.max_depth) as f64;
        DepthStyle {
            font_size: (ROOT_FONT_SIZE - FONT_SIZE_STEP * steps).max(MIN_FONT_SIZE),
            opacity: opacity_for_depth(depth),
        }
    }

    /// Totals for every node keyed by its position path and its name path,
    /// computed in one walk.
    #[must_use]
    pub fn memoize(self, roots: &[CanonicalDataItem]) -> SubtreeTotals {
        let mut memo = SubtreeTotals::default();
        let mut positions = Vec::new();
        let mut names = Vec::new();
        for (index, root) in roots.iter().enumerate() {
            positions.push(index);
            let total = self.memoize_at(root, 0, &mut positions, &mut names, &mut memo);
            memo.root_total += total;
            positions.pop();
        }
        memo
    }

    fn total_at(self, node: &CanonicalDataItem, depth: usize) -> f64 {
        if node.children.is_empty() {
            return leaf_value(node);
        }
        if depth + 1 >= self.max_depth {
            return 0.0;
        }
        node.children
            .iter()
            .map(|child| self.total_at(child, depth + 1))
            .sum()
    }

    fn memoize_at(
        self,
        node: &CanonicalDataItem,
        depth: usize,
        positions: &mut Vec<usize>,
        names: &mut Vec<String>,
        memo: &mut SubtreeTotals,
    ) -> f64 {
        names.push(node.name.clone());
        let total = if node.children.is_empty() {
            leaf_value(node)
        } else if depth + 1 >= self.max_depth {
            0.0
        } else {
            let mut sum = 0.0;
            for (index, child) in node.children.iter().enumerate() {
                positions.push(index);
                sum += self.memoize_at(child, depth + 1, positions, names, memo);
                positions.pop();
            }
            sum
        };
        memo.by_position.insert(positions.clone(), total);
        memo.by_name.entry(names.clone()).or_default().push(total);
        names.pop();
        total
    }
}

/// Leaf contribution: finite and non-negative, otherwise zero.
fn leaf_value(node: &CanonicalDataItem) -> f64 {
    node.value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0)
}

/// Per-configuration memo of subtree totals, so hover rendering is a lookup.
///
/// Position paths (child indices from the top-level item down) identify a
/// node exactly. Name paths may be shared by siblings, so each holds every
/// matching total in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtreeTotals {
    by_position: IndexMap<Vec<usize>, f64>,
    by_name: IndexMap<Vec<String>, SmallVec<[f64; 1]>>,
    root_total: f64,
}

impl SubtreeTotals {
    #[must_use]
    pub fn total_at_position(&self, positions: &[usize]) -> Option<f64> {
        self.by_position.get(positions).copied()
    }

    /// Totals of every node on `path`, in document order.
    #[must_use]
    pub fn totals_for_path<S: AsRef<str>>(&self, path: &[S]) -> &[f64] {
        let key: Vec<String> = path.iter().map(|s| s.as_ref().to_owned()).collect();
        self.by_name
            .get(&key)
            .map(|totals| totals.as_slice())
            .unwrap_or_default()
    }

    /// First node on `path`.
    #[must_use]
    pub fn total_for_path<S: AsRef<str>>(&self, path: &[S]) -> Option<f64> {
        self.totals_for_path(path).first().copied()
    }

    /// Node on `path` whose total equals `reported`, else the first one.
    #[must_use]
    pub fn total_matching<S: AsRef<str>>(&self, path: &[S], reported: Option<f64>) -> Option<f64> {
        let totals = self.totals_for_path(path);
        reported
            .and_then(|reported| {
                totals.iter().copied().find(|total| {
                    (total - reported).abs() <= 1e-9 * total.abs().max(1.0)
                })
            })
            .or_else(|| totals.first().copied())
    }

    #[must_use]
    pub fn root_total(&self) -> f64 {
        self.root_total
    }

    #[must_use]
    pub fn percentage_for_path<S: AsRef<str>>(&self, path: &[S]) -> Percentage {
        self.total_for_path(path)
            .map_or(Percentage::Unavailable, |total| {
                Percentage::of(total, self.root_total)
            })
    }

    /// Number of memoized nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }
}
