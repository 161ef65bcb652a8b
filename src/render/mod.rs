mod descriptor;
mod formatters;
mod markup;

pub use descriptor::{DataPointDescriptor, TooltipInput};
pub use formatters::{
    AxisDetailFormatter, BoxPlotFormatter, CandlestickFormatter, Formatter, FormatterContext,
    HeatmapFormatter, HierarchyFormatter, ItemSummaryFormatter, MapFormatter, ParallelFormatter,
    RadarFormatter, ShareFormatter, TotalPolicy,
};
pub use markup::{
    HtmlMarkup, MarkupBackend, NO_DATA, PlainTextMarkup, TooltipDocument, TooltipRow,
    format_fixed, format_percentage, format_signed, format_value,
};

use std::sync::Arc;

/// Hover-time render function installed on a resolved configuration.
///
/// Must stay pure: no I/O, bounded allocation per call.
pub type RenderFn = Arc<dyn Fn(TooltipInput<'_>) -> String + Send + Sync>;

/// Render function tagged with the key it was resolved for.
///
/// Equality compares keys only, so configurations stay comparable.
#[derive(Clone)]
pub struct TooltipFormatter {
    key: String,
    render: RenderFn,
}

impl TooltipFormatter {
    #[must_use]
    pub fn new(key: impl Into<String>, render: RenderFn) -> Self {
        Self {
            key: key.into(),
            render,
        }
    }

    /// Formatter that renders nothing, installed on lookup misses.
    #[must_use]
    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(key, Arc::new(|_: TooltipInput<'_>| String::new()))
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn render(&self, input: TooltipInput<'_>) -> String {
        (self.render)(input)
    }
}

impl std::fmt::Debug for TooltipFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TooltipFormatter")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PartialEq for TooltipFormatter {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
