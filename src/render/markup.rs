use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{Percentage, ThemeColors};

/// Marker rendered wherever a statistic cannot be computed.
pub const NO_DATA: &str = "no data";

const MAX_VALUE_DECIMALS: u32 = 6;

/// One `label: value` line, optionally led by a color marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipRow {
    pub marker: Option<String>,
    pub label: String,
    pub value: String,
}

impl TooltipRow {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            marker: None,
            label: label.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn with_marker(mut self, color: Option<&str>) -> Self {
        self.marker = color.map(str::to_owned);
        self
    }
}

/// Backend-neutral tooltip content built by formatters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TooltipDocument {
    pub title: Option<String>,
    pub rows: Vec<TooltipRow>,
    pub footer: Option<TooltipRow>,
}

impl TooltipDocument {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn push(&mut self, row: TooltipRow) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn with_footer(mut self, footer: TooltipRow) -> Self {
        self.footer = Some(footer);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.rows.is_empty() && self.footer.is_none()
    }
}

/// Contract implemented by any tooltip output backend.
///
/// Formatters only build [`TooltipDocument`]s, so swapping markup for another
/// representation never touches normalization or aggregation code.
pub trait MarkupBackend: Send + Sync {
    fn render(&self, document: &TooltipDocument, theme: &ThemeColors) -> String;
}

/// Inline-styled HTML with every caller-supplied string escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMarkup;

impl MarkupBackend for HtmlMarkup {
    fn render(&self, document: &TooltipDocument, theme: &ThemeColors) -> String {
        if document.is_empty() {
            return String::new();
        }
        let mut out = String::with_capacity(96 * (document.rows.len() + 2));
        out.push_str(&format!(
            "<div style=\"color:{};font-size:12px;line-height:18px\">",
            attr(&theme.text)
        ));
        if let Some(title) = &document.title {
            out.push_str(&format!(
                "<div style=\"font-weight:600;margin-bottom:4px\">{}</div>",
                html_escape::encode_text(title)
            ));
        }
        for row in &document.rows {
            push_html_row(&mut out, row, &theme.muted_text, false);
        }
        if let Some(footer) = &document.footer {
            out.push_str(&format!(
                "<div style=\"border-top:1px solid {};margin-top:4px;padding-top:4px\">",
                attr(&theme.tooltip_border)
            ));
            push_html_row(&mut out, footer, &theme.muted_text, true);
            out.push_str("</div>");
        }
        out.push_str("</div>");
        out
    }
}

fn push_html_row(out: &mut String, row: &TooltipRow, muted: &str, bold: bool) {
    out.push_str("<div>");
    if let Some(color) = &row.marker {
        out.push_str(&format!(
            "<span style=\"display:inline-block;margin-right:4px;border-radius:50%;\
             width:10px;height:10px;background-color:{}\"></span>",
            attr(color)
        ));
    }
    out.push_str(&format!(
        "<span style=\"color:{}\">{}</span>",
        attr(muted),
        html_escape::encode_text(&row.label)
    ));
    let weight = if bold { 700 } else { 600 };
    out.push_str(&format!(
        "<span style=\"float:right;margin-left:16px;font-weight:{weight}\">{}</span>",
        html_escape::encode_text(&row.value)
    ));
    out.push_str("</div>");
}

fn attr(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Line-oriented plain text; useful for logs, terminals and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextMarkup;

impl MarkupBackend for PlainTextMarkup {
    fn render(&self, document: &TooltipDocument, _theme: &ThemeColors) -> String {
        let mut lines = Vec::with_capacity(document.rows.len() + 2);
        if let Some(title) = &document.title {
            lines.push(title.clone());
        }
        for row in document.rows.iter().chain(document.footer.as_ref()) {
            lines.push(format!("{}: {}", row.label, row.value));
        }
        lines.join("\n")
    }
}

/// Shortest decimal rendering, rounded to remove binary float artifacts.
#[must_use]
pub fn format_value(value: f64) -> String {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(MAX_VALUE_DECIMALS).normalize().to_string())
        .unwrap_or_else(|| NO_DATA.to_owned())
}

/// Fixed number of decimal places, e.g. `format_fixed(10.0, 2) == "10.00"`.
#[must_use]
pub fn format_fixed(value: f64, decimals: u32) -> String {
    Decimal::from_f64(value)
        .map(|d| {
            let mut rounded =
                d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(decimals);
            rounded.to_string()
        })
        .unwrap_or_else(|| NO_DATA.to_owned())
}

/// One-decimal percentage (`"75.0%"`), or [`NO_DATA`].
#[must_use]
pub fn format_percentage(percentage: Percentage) -> String {
    match percentage.value() {
        Some(pct) => format!("{}%", format_fixed(pct, 1)),
        None => NO_DATA.to_owned(),
    }
}

/// Signed fixed rendering (`+1.50`), used for deltas.
#[must_use]
pub fn format_signed(value: f64, decimals: u32) -> String {
    let fixed = format_fixed(value, decimals);
    if value.is_finite() && value > 0.0 {
        format!("+{fixed}")
    } else {
        fixed
    }
}
