pub mod color;
pub mod data_item;
pub mod family;
pub mod hierarchy;
pub mod merge;
pub mod palette;
pub mod region;
pub mod shape;
pub mod tuple_schema;

pub use color::{
    AssignedColor, ColorAssignment, MIN_DEPTH_OPACITY, PaletteCursor, opacity_for_depth,
};
pub use data_item::{
    CanonicalDataItem, ItemMeasure, ItemStyle, RawDataItem, RawRecord, RawValue, StyleOverrides,
    TupleCell, TupleCells,
};
pub use family::{ChartFamily, ThemeMode};
pub use hierarchy::{DepthStyle, HierarchyAggregator, MAX_TREE_DEPTH, Percentage, SubtreeTotals};
pub use merge::{Defaulted, merge_optional, merge_value};
pub use palette::{DefaultPalette, PaletteProvider, ThemeColors};
pub use region::{
    BoundaryFeatureSet, BoundaryLoader, FileBoundaryLoader, RegionCompleter, RegionDataset,
    RegionValue,
};
pub use shape::{ItemColoring, ShapeNormalizer, ShapeRule};
pub use tuple_schema::{BoxPlotStats, CandleStats, DecodedTuple, TupleSchema};
