mod chart_config;
mod chart_spec;
pub mod chrome_defaults;
mod family_transformers;
mod json_contract;
mod resolver;
mod tooltip_key;
mod tooltip_processor;
mod transform_registry;

pub use chart_config::{
    CanonicalChartConfig, CanonicalSeries, FamilyBlocks, SeriesLayout, TooltipBlock,
    TooltipTrigger,
};
pub use chart_spec::{ChartSpecification, RawSeries};
pub use family_transformers::{
    CartesianTransformer, HierarchyTransformer, MapTransformer, ParallelTransformer,
    RadarTransformer, RadialTransformer, builtin_transformer,
};
pub use json_contract::{
    CANONICAL_CONFIG_JSON_SCHEMA_V1, CHART_SPECIFICATION_JSON_SCHEMA_V1,
    CanonicalConfigJsonContractV1, ChartSpecificationJsonContractV1,
};
pub use resolver::ChartConfigResolver;
pub use tooltip_key::{TooltipKey, TooltipMode};
pub use tooltip_processor::{FormatterRegistry, TooltipProcessor};
pub use transform_registry::{
    ChartTransformer, TransformContext, TransformOutcome, TransformRegistry,
};
