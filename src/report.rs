use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use plotters::{prelude::*, style::register_font};
use serde::Serialize;

use crate::{
    batch::BatchResult,
    error::{DegreeError, Result},
    stats::DegreeStats,
};

const CHART_SIZE: (u32, u32) = (1000, 600);
const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
/// three bars plus a gap per file
const SLOTS_PER_FILE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub chart: PathBuf,
}

impl OutputPaths {
    pub fn for_dataset(output_dir: &Path, dataset: &str) -> Self {
        Self {
            csv: output_dir.join(format!("degree_statistics_{dataset}.csv")),
            chart: output_dir.join(format!("degree_statistics_{dataset}.png")),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    filename: &'a str,
    max_degree: u64,
    min_degree: u64,
    avg_degree: f64,
}

/// Writes `filename,max_degree,min_degree,avg_degree`, one row per successful file.
pub fn write_csv(result: &BatchResult, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| DegreeError::report(path, e))?;
    writer
        .write_record(["filename", "max_degree", "min_degree", "avg_degree"])
        .map_err(|e| DegreeError::report(path, e))?;
    for (filename, stats) in &result.records {
        writer
            .serialize(CsvRow {
                filename,
                max_degree: stats.max_degree,
                min_degree: stats.min_degree,
                avg_degree: stats.avg_degree,
            })
            .map_err(|e| DegreeError::report(path, e))?;
    }
    writer.flush().map_err(|e| DegreeError::io(path, e))
}

/// Registers the bundled font under the family the chart asks for.
/// Text drawing fails with `FontUnavailable` until this has run.
fn ensure_font() -> std::result::Result<(), String> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
                .map_err(|_| "bundled chart font is not a valid font file".to_string())
        })
        .clone()
}

/// Grouped bar chart: one group per file with min, max and avg bars, saved as PNG.
pub fn render_chart(result: &BatchResult, title: &str, path: &Path) -> Result<()> {
    ensure_font().map_err(|e| DegreeError::report(path, e))?;
    draw_chart(result, title, path).map_err(|e| DegreeError::report(path, e))
}

fn draw_chart(
    result: &BatchResult,
    title: &str,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let names: Vec<&str> = result.records.keys().map(String::as_str).collect();
    let slots = (names.len() as u32 * SLOTS_PER_FILE).max(1);
    let y_max = result
        .records
        .values()
        .map(|s| s.max_degree as f64)
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..slots).into_segmented(), 0f64..y_max)?;

    let label_for = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(slot) if slot % SLOTS_PER_FILE == 1 => names
            .get((slot / SLOTS_PER_FILE) as usize)
            .map(|n| n.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots as usize + 1)
        .x_label_formatter(&label_for)
        .x_label_style((FONT_FAMILY, 12))
        .x_desc("File")
        .y_desc("Degree")
        .draw()?;

    let series: [(&str, RGBColor, fn(&DegreeStats) -> f64); 3] = [
        ("min_degree", BLUE, |s| s.min_degree as f64),
        ("max_degree", RED, |s| s.max_degree as f64),
        ("avg_degree", GREEN, |s| s.avg_degree),
    ];

    for (offset, (label, color, value)) in series.into_iter().enumerate() {
        let bars = result.records.values().enumerate().map(|(i, stats)| {
            let x = i as u32 * SLOTS_PER_FILE + offset as u32;
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), 0.0),
                    (SegmentValue::Exact(x + 1), value(stats)),
                ],
                color.filled(),
            )
        });
        chart
            .draw_series(bars)?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
