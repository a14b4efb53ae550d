//! # Summary Image
//!
//! Builds the top-five report from a snapshot and draws it as a PNG.
//!
//! ## Layout:
//! An 800×600 white canvas with black text drawn from the embedded `font8x8`
//! bitmap font at 2× scale: the total count, a heading, one line per top
//! country followed by a bar proportional to its GDP, and the refresh
//! timestamp. The file at the artifact path is overwritten on every render.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{ImageFormat, Rgb, RgbImage};

use crate::error::RenderError;
use crate::models::RenderSnapshot;

/// File name of the artifact inside the cache directory.
pub const SUMMARY_FILE_NAME: &str = "summary.png";

/// How many countries the summary lists.
pub const TOP_N: usize = 5;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const MARGIN: u32 = 40;
const SCALE: u32 = 2;
const GLYPH: u32 = 8 * SCALE;
const ENTRY_HEIGHT: u32 = 56;
const BAR_HEIGHT: u32 = 16;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const BAR: Rgb<u8> = Rgb([70, 130, 180]);

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Turns one snapshot into an artifact on disk.
///
/// Synchronous by contract; the worker calls it on the blocking pool.
pub trait SummaryRenderer: Send + Sync {
    /// Renders `snapshot` and returns the path written.
    fn render(&self, snapshot: &RenderSnapshot) -> Result<PathBuf, RenderError>;
}

/// # Summary Report
///
/// What the image shows, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub total_countries: usize,
    /// Name and GDP, highest first. Ties keep storage order.
    pub top: Vec<(String, f64)>,
    pub refreshed_at: DateTime<Utc>,
}

impl SummaryReport {
    pub fn from_snapshot(snapshot: &RenderSnapshot) -> Self {
        let mut ranked: Vec<_> = snapshot.countries().iter().collect();
        ranked.sort_by(|a, b| b.estimated_gdp.total_cmp(&a.estimated_gdp));

        Self {
            total_countries: snapshot.countries().len(),
            top: ranked
                .into_iter()
                .take(TOP_N)
                .map(|r| (r.name.clone(), r.estimated_gdp))
                .collect(),
            refreshed_at: snapshot.refreshed_at(),
        }
    }

    pub fn title_lines(&self) -> [String; 2] {
        [
            format!("Total Countries: {}", self.total_countries),
            "Top 5 Countries by Estimated GDP:".to_string(),
        ]
    }

    pub fn entry_lines(&self) -> Vec<String> {
        self.top
            .iter()
            .map(|(name, gdp)| format!("- {name}: {}", format_gdp(*gdp)))
            .collect()
    }

    pub fn footer_line(&self) -> String {
        format!(
            "Last Refreshed: {}",
            self.refreshed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// Two decimals with `,` thousands separators, e.g. `1,234,567.89`.
pub fn format_gdp(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}

/// # PNG Summary Renderer
///
/// Writes `<cache_dir>/summary.png`, creating the directory on first use.
#[derive(Debug, Clone)]
pub struct PngSummaryRenderer {
    path: PathBuf,
}

impl PngSummaryRenderer {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(SUMMARY_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Draws the report onto a fresh canvas.
    pub fn draw(report: &SummaryReport) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

        // 1. Header
        let [total, heading] = report.title_lines();
        draw_text(&mut canvas, MARGIN, MARGIN, &total);
        draw_text(&mut canvas, MARGIN, MARGIN + 2 * GLYPH + 8, &heading);

        // 2. Entries with bars scaled to the largest GDP
        let max_gdp = report
            .top
            .iter()
            .map(|(_, gdp)| *gdp)
            .fold(0.0_f64, f64::max);
        let bar_span = WIDTH - 2 * MARGIN;
        let mut y = MARGIN + 5 * GLYPH;
        for ((_, gdp), line) in report.top.iter().zip(report.entry_lines()) {
            draw_text(&mut canvas, MARGIN, y, &line);
            if max_gdp > 0.0 && *gdp > 0.0 {
                let width = ((gdp / max_gdp) * f64::from(bar_span)).round() as u32;
                fill_rect(&mut canvas, MARGIN, y + GLYPH + 6, width.max(1), BAR_HEIGHT, BAR);
            }
            y += ENTRY_HEIGHT;
        }

        // 3. Footer
        draw_text(&mut canvas, MARGIN, y + GLYPH, &report.footer_line());
        canvas
    }
}

impl SummaryRenderer for PngSummaryRenderer {
    fn render(&self, snapshot: &RenderSnapshot) -> Result<PathBuf, RenderError> {
        let report = SummaryReport::from_snapshot(snapshot);
        let canvas = Self::draw(&report);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        canvas.save_with_format(&self.path, ImageFormat::Png)?;
        Ok(self.path.clone())
    }
}

fn glyph_for(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Draws `text` with its top-left corner at (`x`, `y`). Pixels past the
/// canvas edge are dropped.
fn draw_text(canvas: &mut RgbImage, x: u32, y: u32, text: &str) {
    let mut pen_x = x;
    for ch in text.chars() {
        if pen_x >= canvas.width() {
            break;
        }
        for (row, bits) in glyph_for(ch).iter().enumerate() {
            for col in 0..8u32 {
                // Bit 0 is the leftmost pixel.
                if *bits & (1u8 << col) != 0 {
                    fill_rect(
                        canvas,
                        pen_x + col * SCALE,
                        y + row as u32 * SCALE,
                        SCALE,
                        SCALE,
                        INK,
                    );
                }
            }
        }
        pen_x += GLYPH;
    }
}

fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(w).min(canvas.width());
    let y_end = y.saturating_add(h).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}

/// Reads the rendered artifact.
///
/// `None` when the file is missing, unreadable or not (yet) a complete PNG
/// header; a concurrent render may be halfway through overwriting it.
pub async fn load_artifact(path: impl AsRef<Path>) -> Option<Vec<u8>> {
    let path = path.as_ref();
    match tokio::fs::read(path).await {
        Ok(bytes) if bytes.starts_with(&PNG_SIGNATURE) => Some(bytes),
        Ok(_) => {
            tracing::debug!(path = %path.display(), "summary artifact is not a PNG yet");
            None
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "summary artifact unavailable");
            None
        }
    }
}
