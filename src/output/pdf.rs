//! One-shot PDF market report.
//!
//! The report is built in two steps: `report_lines` turns an insight set
//! into a flat list of styled lines, and `layout` places those lines on
//! A4 pages (10 mm margins, 10 mm line cells, page break 15 mm above the
//! bottom edge). Only `render_pdf` touches printpdf.

use anyhow::{anyhow, Context, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use tracing::info;

use crate::format::{format_percent, format_usd};
use crate::types::{InsightSet, PriceMove};

pub const REPORT_TITLE: &str = "Cryptocurrency Market Analysis Report";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 15.0;
const CELL_HEIGHT_MM: f32 = 10.0;

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// A single line of report content.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    /// Bold 16 pt, centred.
    Title(String),
    /// Bold 14 pt.
    Heading(String),
    /// Regular 12 pt.
    Text(String),
    /// Vertical gap in millimetres.
    Gap(f32),
}

/// Build the report content for one snapshot.
pub fn report_lines(insights: &InsightSet, generated_at: &str) -> Vec<ReportLine> {
    let mut lines = vec![
        ReportLine::Title(REPORT_TITLE.to_string()),
        ReportLine::Gap(10.0),
        ReportLine::Text(format!("Report Generated On: {generated_at}")),
        ReportLine::Gap(10.0),
        ReportLine::Heading("Top 5 Cryptocurrencies by Market Cap:".to_string()),
        ReportLine::Gap(5.0),
    ];

    for coin in &insights.top5_by_market_cap {
        lines.push(ReportLine::Text(format!(
            "{}: {}",
            coin.name,
            format_usd(coin.market_cap)
        )));
    }

    lines.extend([
        ReportLine::Gap(10.0),
        ReportLine::Heading("Average Price of Top 50 Cryptocurrencies:".to_string()),
        ReportLine::Gap(5.0),
        ReportLine::Text(format_usd(insights.average_price)),
        ReportLine::Gap(10.0),
        ReportLine::Heading("Price Change Analysis (24h):".to_string()),
        ReportLine::Gap(5.0),
        ReportLine::Text(move_line("Highest", &insights.highest_or_placeholder())),
        ReportLine::Text(move_line("Lowest", &insights.lowest_or_placeholder())),
    ]);

    lines
}

fn move_line(label: &str, m: &PriceMove) -> String {
    format!("{label}: {} with {} change", m.name, format_percent(m.change_pct))
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// A line of text positioned on a page. Coordinates are printpdf's:
/// millimetres from the bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub page: usize,
    pub x_mm: f32,
    pub baseline_mm: f32,
    pub size_pt: f32,
    pub style: FontStyle,
    pub text: String,
}

fn estimated_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * AVG_GLYPH_EM * PT_TO_MM
}

/// Place lines top to bottom, starting a new page whenever the next
/// cell would cross the bottom margin.
pub fn layout(lines: &[ReportLine]) -> Vec<PlacedLine> {
    let mut placed = Vec::with_capacity(lines.len());
    let mut page = 0;
    let mut y = MARGIN_MM;

    for line in lines {
        let (text, size_pt, style, centred) = match line {
            ReportLine::Gap(mm) => {
                y += mm;
                continue;
            }
            ReportLine::Title(t) => (t, 16.0, FontStyle::Bold, true),
            ReportLine::Heading(t) => (t, 14.0, FontStyle::Bold, false),
            ReportLine::Text(t) => (t, 12.0, FontStyle::Regular, false),
        };

        if y + CELL_HEIGHT_MM > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
            page += 1;
            y = MARGIN_MM;
        }

        let x_mm = if centred {
            ((PAGE_WIDTH_MM - estimated_width_mm(text, size_pt)) / 2.0).max(MARGIN_MM)
        } else {
            MARGIN_MM
        };
        // Vertically centre the glyphs in the cell.
        let baseline_mm = PAGE_HEIGHT_MM - (y + CELL_HEIGHT_MM / 2.0 + size_pt * PT_TO_MM * 0.35);

        placed.push(PlacedLine {
            page,
            x_mm,
            baseline_mm,
            size_pt,
            style,
            text: text.clone(),
        });
        y += CELL_HEIGHT_MM;
    }

    placed
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render report lines into PDF bytes.
pub fn render_pdf(lines: &[ReportLine]) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let regular: IndirectFontRef = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("Failed to load PDF font: {e:?}"))?;
    let bold: IndirectFontRef = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("Failed to load PDF font: {e:?}"))?;

    let mut current_page = 0;
    let mut layer = doc.get_page(first_page).get_layer(first_layer);

    for line in layout(lines) {
        while current_page < line.page {
            let (page, page_layer) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Layer {}", current_page + 2),
            );
            layer = doc.get_page(page).get_layer(page_layer);
            current_page += 1;
        }

        let font = match line.style {
            FontStyle::Regular => &regular,
            FontStyle::Bold => &bold,
        };
        layer.use_text(line.text, line.size_pt, Mm(line.x_mm), Mm(line.baseline_mm), font);
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow!("Failed to serialise PDF document: {e:?}"))
}

/// Render the report and write it to `path`, replacing any existing file.
pub fn write_report(path: &str, insights: &InsightSet, generated_at: &str) -> Result<()> {
    let lines = report_lines(insights, generated_at);
    let bytes = render_pdf(&lines)?;

    std::fs::write(path, &bytes).with_context(|| format!("Failed to write report to {path}"))?;

    info!(path, bytes = bytes.len(), "Report saved as '{path}'");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
