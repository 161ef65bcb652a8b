//! chart-config-rs: resolves sparse chart specifications into gap-free
//! engine configurations with themed, context-aware tooltip renderers.
//!
//! `core` holds the data model and pure algorithms (shape normalization,
//! palette cycling, subtree aggregation, region completion), `api` the
//! registries that orchestrate them, and `render` the tooltip formatters and
//! markup backends.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{
    CanonicalChartConfig, ChartConfigResolver, ChartSpecification, TooltipProcessor,
    TransformOutcome, TransformRegistry,
};
pub use error::{BoundaryLoadError, ChartError, ChartResult};
