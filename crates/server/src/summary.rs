//! Summary image generation.
//!
//! Composes an SVG of the top economies by estimated GDP and rasterizes it
//! to PNG. Regeneration runs as a post-commit side effect of the refresh
//! pipeline; the handler serves whatever the last successful run wrote.

use atlas_core::config::SummaryConfig;
use atlas_metadata::models::{CountryFilter, CountryRow, SortOrder};
use atlas_metadata::{CountryStore, MetadataError};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::fs;

/// Number of countries shown in the summary.
const TOP_COUNT: usize = 10;

const IMAGE_WIDTH: u32 = 640;
const ROW_HEIGHT: u32 = 28;
const HEADER_HEIGHT: u32 = 96;

/// Summary generation errors.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("render error: {0}")]
    Render(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Regenerate the summary image from current store contents.
pub async fn regenerate(
    store: Arc<dyn CountryStore>,
    config: &SummaryConfig,
) -> Result<(), SummaryError> {
    let filter = CountryFilter {
        sort: SortOrder::GdpDesc,
        ..Default::default()
    };
    let rows = store.list(&filter).await?;
    let total = store.count().await?;
    let refreshed_at = store.get_refresh_timestamp().await?;

    let top = &rows[..rows.len().min(TOP_COUNT)];
    let svg = build_svg(top, total, refreshed_at);
    let png = render_png(&svg)?;
    write_atomic(&config.output_path, &png).await?;

    tracing::info!(
        path = %config.output_path.display(),
        countries = top.len(),
        "summary image regenerated"
    );
    Ok(())
}

/// Escape text for embedding in SVG.
fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn format_timestamp(at: Option<OffsetDateTime>) -> String {
    at.and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| "never".to_string())
}

/// Compose the summary SVG.
///
/// Bars are scaled to the largest estimated GDP in view; countries without
/// a figure sort out of the top rows by construction (NULLS LAST).
fn build_svg(top: &[CountryRow], total: i64, refreshed_at: Option<OffsetDateTime>) -> String {
    let height = HEADER_HEIGHT + ROW_HEIGHT * top.len().max(1) as u32 + 16;
    let max_gdp = top
        .iter()
        .filter_map(|row| row.estimated_gdp)
        .fold(0.0_f64, f64::max);

    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{IMAGE_WIDTH}" height="{height}" viewBox="0 0 {IMAGE_WIDTH} {height}">
<rect width="100%" height="100%" fill="#1b1f24"/>
<text x="24" y="36" font-family="sans-serif" font-size="20" fill="#e6edf3">Top economies by estimated GDP</text>
<text x="24" y="60" font-family="sans-serif" font-size="12" fill="#9198a1">{total} countries tracked</text>
<text x="24" y="78" font-family="sans-serif" font-size="12" fill="#9198a1">last refreshed: {refreshed}</text>
"##,
        refreshed = xml_escape(&format_timestamp(refreshed_at)),
    );

    for (index, row) in top.iter().enumerate() {
        let y = HEADER_HEIGHT + ROW_HEIGHT * index as u32;
        let gdp = row.estimated_gdp.unwrap_or(0.0);
        let bar_width = if max_gdp > 0.0 {
            ((gdp / max_gdp) * 360.0).max(2.0)
        } else {
            2.0
        };
        svg.push_str(&format!(
            r##"<text x="24" y="{text_y}" font-family="sans-serif" font-size="13" fill="#e6edf3">{name}</text>
<rect x="200" y="{bar_y}" width="{bar_width:.1}" height="14" fill="#4493f8"/>
<text x="{value_x:.1}" y="{text_y}" font-family="sans-serif" font-size="12" fill="#9198a1">{gdp:.0}</text>
"##,
            text_y = y + 14,
            bar_y = y + 3,
            value_x = 200.0 + bar_width + 8.0,
            name = xml_escape(&row.name),
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Rasterize the SVG to PNG bytes.
fn render_png(svg: &str) -> Result<Vec<u8>, SummaryError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| SummaryError::Render(format!("SVG parse failed: {e}")))?;

    let size = tree.size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width() as u32, size.height() as u32)
        .ok_or_else(|| SummaryError::Render("failed to create pixmap".to_string()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| SummaryError::Render(format!("PNG encoding failed: {e}")))
}

/// Write via temp file + rename so readers never see a partial image.
/// Refresh passes are serialized, so a fixed temp name cannot collide.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, bytes).await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}
