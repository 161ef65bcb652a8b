use std::sync::Arc;

use futures::future::join_all;

use crate::core::{DefaultPalette, PaletteProvider, RegionCompleter};
use crate::render::{HtmlMarkup, MarkupBackend};

use super::{ChartSpecification, TooltipProcessor, TransformOutcome, TransformRegistry};

/// Transform then tooltip processing, the full resolution pipeline.
#[derive(Debug)]
pub struct ChartConfigResolver {
    registry: TransformRegistry,
    tooltips: TooltipProcessor,
}

impl Default for ChartConfigResolver {
    fn default() -> Self {
        Self::with_builtins(Arc::new(DefaultPalette::default()), Arc::new(HtmlMarkup))
    }
}

impl ChartConfigResolver {
    #[must_use]
    pub fn new(registry: TransformRegistry, tooltips: TooltipProcessor) -> Self {
        Self { registry, tooltips }
    }

    /// Builtin transformers and formatters sharing one palette.
    #[must_use]
    pub fn with_builtins(
        palette: Arc<dyn PaletteProvider>,
        backend: Arc<dyn MarkupBackend>,
    ) -> Self {
        Self::new(
            TransformRegistry::with_builtin_transformers(Arc::clone(&palette)),
            TooltipProcessor::with_builtin_formatters(palette, backend),
        )
    }

    #[must_use]
    pub fn with_region_completer(mut self, completer: Arc<RegionCompleter>) -> Self {
        self.registry = self.registry.with_region_completer(completer);
        self
    }

    #[must_use]
    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TransformRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn tooltips(&self) -> &TooltipProcessor {
        &self.tooltips
    }

    pub async fn resolve(&self, spec: &ChartSpecification) -> TransformOutcome {
        match self.registry.transform(spec).await {
            TransformOutcome::Resolved(config) => {
                TransformOutcome::Resolved(Box::new(self.tooltips.process(*config)))
            }
            failed @ TransformOutcome::Failed { .. } => failed,
        }
    }

    pub async fn resolve_batch(&self, specs: &[ChartSpecification]) -> Vec<TransformOutcome> {
        join_all(specs.iter().map(|spec| self.resolve(spec))).await
    }
}
