use std::sync::Arc;

use futures::future::join_all;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::{
    BoundaryFeatureSet, ChartFamily, DefaultPalette, HierarchyAggregator, PaletteProvider,
    RegionCompleter, ThemeColors, ThemeMode,
};
use crate::error::{BoundaryLoadError, ChartError, ChartResult};

use super::family_transformers::builtin_transformer;
use super::{CanonicalChartConfig, ChartSpecification};

/// Everything a transformer may read besides the specification itself.
#[derive(Clone, Copy)]
pub struct TransformContext<'a> {
    pub palette: &'a dyn PaletteProvider,
    pub theme: ThemeMode,
    pub aggregator: HierarchyAggregator,
    /// Boundary set resolved for the transformer's `boundary_key`, if any.
    pub boundary: Option<&'a BoundaryFeatureSet>,
}

impl<'a> TransformContext<'a> {
    #[must_use]
    pub fn theme_colors(&self) -> ThemeColors {
        self.palette.theme_colors(self.theme.is_dark())
    }

    #[must_use]
    pub fn series_colors(&self) -> &'a [String] {
        self.palette.series_colors(self.theme.is_dark())
    }
}

/// Resolves specifications of one chart family.
///
/// Transformers stay synchronous: a family that needs a boundary set names
/// its map id through `boundary_key` and receives the loaded set in the
/// context.
pub trait ChartTransformer: Send + Sync {
    fn boundary_key(&self, _spec: &ChartSpecification) -> Option<String> {
        None
    }

    fn transform(
        &self,
        spec: &ChartSpecification,
        ctx: &TransformContext<'_>,
    ) -> ChartResult<CanonicalChartConfig>;
}

/// Result of one transformation. Failures hand the untouched specification
/// back so batch callers can report or retry it.
#[derive(Debug)]
pub enum TransformOutcome {
    Resolved(Box<CanonicalChartConfig>),
    Failed {
        spec: Box<ChartSpecification>,
        error: ChartError,
    },
}

impl TransformOutcome {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    #[must_use]
    pub fn config(&self) -> Option<&CanonicalChartConfig> {
        match self {
            Self::Resolved(config) => Some(config),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&ChartError> {
        match self {
            Self::Resolved(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    pub fn into_result(self) -> ChartResult<CanonicalChartConfig> {
        match self {
            Self::Resolved(config) => Ok(*config),
            Self::Failed { error, .. } => Err(error),
        }
    }
}

/// Chart-family → transformer dispatch table.
///
/// Built once at startup and shared by reference; holds no per-call state
/// apart from the region completer's boundary cache.
pub struct TransformRegistry {
    transformers: IndexMap<String, Arc<dyn ChartTransformer>>,
    palette: Arc<dyn PaletteProvider>,
    aggregator: HierarchyAggregator,
    region_completer: Option<Arc<RegionCompleter>>,
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("families", &self.transformers.keys().collect::<Vec<_>>())
            .field("aggregator", &self.aggregator)
            .field("region_completer", &self.region_completer)
            .finish_non_exhaustive()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new(Arc::new(DefaultPalette::default()))
    }
}

impl TransformRegistry {
    /// Empty registry over `palette`.
    #[must_use]
    pub fn new(palette: Arc<dyn PaletteProvider>) -> Self {
        Self {
            transformers: IndexMap::new(),
            palette,
            aggregator: HierarchyAggregator::default(),
            region_completer: None,
        }
    }

    /// Registry with a transformer for every builtin family.
    #[must_use]
    pub fn with_builtin_transformers(palette: Arc<dyn PaletteProvider>) -> Self {
        let mut registry = Self::new(palette);
        for family in ChartFamily::ALL {
            registry
                .transformers
                .insert(family.as_str().to_owned(), builtin_transformer(family));
        }
        registry
    }

    #[must_use]
    pub fn with_region_completer(mut self, completer: Arc<RegionCompleter>) -> Self {
        self.region_completer = Some(completer);
        self
    }

    #[must_use]
    pub fn with_aggregator(mut self, aggregator: HierarchyAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    #[must_use]
    pub fn palette(&self) -> Arc<dyn PaletteProvider> {
        Arc::clone(&self.palette)
    }

    #[must_use]
    pub fn aggregator(&self) -> HierarchyAggregator {
        self.aggregator
    }

    /// Registers (or replaces) the transformer for `family_tag`.
    pub fn register(
        &mut self,
        family_tag: &str,
        transformer: Arc<dyn ChartTransformer>,
    ) -> ChartResult<()> {
        let key = ChartFamily::registry_key(family_tag);
        if key.is_empty() {
            return Err(ChartError::InvalidData(
                "chart family tag must not be empty".to_owned(),
            ));
        }
        if self.transformers.insert(key.clone(), transformer).is_some() {
            debug!(family = %key, "replaced registered transformer");
        }
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, family_tag: &str) -> bool {
        self.transformers
            .contains_key(&ChartFamily::registry_key(family_tag))
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.transformers.keys().map(String::as_str)
    }

    /// Resolves one specification. Never panics and never mutates `spec`.
    pub async fn transform(&self, spec: &ChartSpecification) -> TransformOutcome {
        match self.try_transform(spec).await {
            Ok(config) => TransformOutcome::Resolved(Box::new(config)),
            Err(error) => {
                warn!(
                    family = spec.family_tag().unwrap_or_default(),
                    error = %error,
                    "chart specification could not be resolved"
                );
                TransformOutcome::Failed {
                    spec: Box::new(spec.clone()),
                    error,
                }
            }
        }
    }

    /// Like [`TransformRegistry::transform`], as a plain `Result`.
    pub async fn try_transform(
        &self,
        spec: &ChartSpecification,
    ) -> ChartResult<CanonicalChartConfig> {
        let tag = spec.family_tag().unwrap_or_default();
        let key = ChartFamily::registry_key(tag);
        let transformer = self
            .transformers
            .get(&key)
            .cloned()
            .ok_or_else(|| ChartError::UnknownFamily {
                family: tag.to_owned(),
            })?;

        let boundary = match transformer.boundary_key(spec) {
            Some(map_id) => Some(self.boundary_for(&map_id).await?),
            None => None,
        };

        let ctx = TransformContext {
            palette: self.palette.as_ref(),
            theme: spec.theme_mode(),
            aggregator: self.aggregator,
            boundary: boundary.as_deref(),
        };
        let config = transformer.transform(spec, &ctx)?;
        debug!(
            family = %key,
            series = config.series.len(),
            "resolved chart specification"
        );
        Ok(config)
    }

    /// One independent outcome per input, in input order; failures never
    /// abort siblings.
    pub async fn transform_batch(&self, specs: &[ChartSpecification]) -> Vec<TransformOutcome> {
        join_all(specs.iter().map(|spec| self.transform(spec))).await
    }

    async fn boundary_for(&self, map_id: &str) -> ChartResult<Arc<BoundaryFeatureSet>> {
        let Some(completer) = &self.region_completer else {
            return Err(BoundaryLoadError::Unsupported {
                map_id: map_id.to_owned(),
            }
            .into());
        };
        Ok(completer.boundary(map_id).await?)
    }
}
