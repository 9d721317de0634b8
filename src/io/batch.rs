//! Batch drivers: each dataset or file is processed independently and failures are reported

use crate::correlation::{CorrelationCurve, correlate};
use crate::io::configuration::{
    CURVE_SUFFIX, CorrelationConfig, CorrelationManifest, DEFAULT_BIN_COUNT, DEFAULT_OUTPUT_DIR,
    IMAGE_EXTENSION, OVERLAY_SUFFIX, ReplotManifest, Strategy,
};
use crate::io::error::{AnalysisError, Result, WithDataset, file_system};
use crate::io::image::{load_grayscale, save_rgb};
use crate::io::overlay::render_overlay;
use crate::io::plot::{AxisRange, LineChart, Series, palette_color, parse_color};
use crate::io::progress::ProgressManager;
use crate::io::table::{PointTable, Table, oriented_points, read_curve, write_curve};
use crate::spatial::MaskFilter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

/// Outcome of a batch: produced files and per-item failures
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files written, in processing order
    pub written: Vec<PathBuf>,
    /// Items that were skipped, each wrapped with its label
    pub failures: Vec<AnalysisError>,
}

impl BatchReport {
    /// Whether every item succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit status: failure when any item was skipped
    pub fn exit_code(&self) -> ExitCode {
        if self.is_clean() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    fn record(&mut self, outcome: Result<PathBuf>, progress: &mut ProgressManager) {
        match outcome {
            Ok(path) => {
                info!(path = %path.display(), "saved");
                self.written.push(path);
                progress.complete_item();
            }
            Err(error) => {
                warn!("skipping: {error}");
                self.failures.push(error);
                progress.fail_item();
            }
        }
    }
}

/// A correlation curve tagged with its dataset
#[derive(Debug, Clone)]
pub struct LabeledCurve {
    /// Dataset label, `"<group> (Dataset <k>)"`
    pub label: String,
    /// Normalized curve
    pub curve: CorrelationCurve,
    /// Configured color, if any
    pub color: Option<String>,
}

/// Runs every dataset of a correlation manifest
pub struct CorrelationBatch {
    manifest: CorrelationManifest,
    bin_count: usize,
    output_dir: PathBuf,
    strategy: Strategy,
}

impl CorrelationBatch {
    /// Create a batch; explicit arguments override manifest values
    pub fn new(
        manifest: CorrelationManifest,
        bin_count: Option<usize>,
        output_dir: Option<PathBuf>,
        strategy: Strategy,
    ) -> Self {
        let bin_count = bin_count
            .or(manifest.bin_count)
            .unwrap_or(DEFAULT_BIN_COUNT);
        let output_dir = output_dir
            .or_else(|| manifest.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        Self {
            manifest,
            bin_count,
            output_dir,
            strategy,
        }
    }

    /// Number of datasets across all groups
    pub fn dataset_count(&self) -> usize {
        self.manifest.groups.iter().map(|g| g.datasets.len()).sum()
    }

    /// Directory receiving curve tables
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Process all datasets, continuing past failures
    ///
    /// Returns the report and the curves of successful datasets in manifest order.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directory cannot be created
    pub fn run(&self, progress: &mut ProgressManager) -> Result<(BatchReport, Vec<LabeledCurve>)> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| file_system(&self.output_dir, "create directory", e))?;

        let mut report = BatchReport::default();
        let mut curves = Vec::new();

        for group in &self.manifest.groups {
            for (idx, dataset) in group.datasets.iter().enumerate() {
                let label = format!("{} (Dataset {})", group.label, idx + 1);
                progress.start_item(&label);

                let config = CorrelationConfig {
                    bin_count: self.bin_count,
                    pixel_to_unit: dataset.scale,
                    strategy: self.strategy,
                };
                let output = self.output_dir.join(curve_file_name(&group.label, idx + 1));

                let outcome = Self::process_dataset(&dataset.file, &config, &output)
                    .for_dataset(&label)
                    .map(|curve| {
                        curves.push(LabeledCurve {
                            label: label.clone(),
                            curve,
                            color: dataset.color.clone(),
                        });
                        output
                    });
                report.record(outcome, progress);
            }
        }

        Ok((report, curves))
    }

    fn process_dataset(
        file: &Path,
        config: &CorrelationConfig,
        output: &Path,
    ) -> Result<CorrelationCurve> {
        let points = PointTable::read(file)?;
        debug!(file = %file.display(), points = points.len(), "loaded dataset");

        let curve = correlate(points.positions.view(), points.displacements.view(), config)?;
        write_curve(output, &curve)?;
        Ok(curve)
    }
}

/// File name of a curve table, `<label>_dataset_<k>_renormalised.csv`
///
/// Spaces become underscores and `%` becomes `pct`.
pub fn curve_file_name(label: &str, dataset_number: usize) -> String {
    let stem = label.replace(' ', "_").replace('%', "pct");
    format!("{stem}_dataset_{dataset_number}{CURVE_SUFFIX}.csv")
}

/// Chart of every curve from one batch, auto-fitted
///
/// # Errors
///
/// Returns `InvalidParameter` if a configured color cannot be parsed
pub fn combined_chart(curves: &[LabeledCurve]) -> Result<LineChart> {
    let series = curves
        .iter()
        .enumerate()
        .map(|(i, labeled)| {
            let color = labeled
                .color
                .as_deref()
                .map_or_else(|| Ok(palette_color(i)), parse_color)?;
            Ok(Series::from_curve(&labeled.curve, color))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LineChart::fitted(series))
}

/// CSV files in `dir`, sorted by name
///
/// # Errors
///
/// Returns `FileSystem` if the directory cannot be listed
pub fn collect_tables(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| file_system(dir, "list directory", e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| file_system(dir, "list directory", e))?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Path of the image paired with a table, `<image_dir>/<stem>.tif`
pub fn partner_image(table: &Path, image_dir: &Path) -> PathBuf {
    let stem = table.file_stem().unwrap_or_default().to_string_lossy();
    image_dir.join(format!("{stem}.{IMAGE_EXTENSION}"))
}

fn require_partner(table: &Path, image_dir: &Path) -> Result<PathBuf> {
    let image = partner_image(table, image_dir);
    if image.exists() {
        Ok(image)
    } else {
        Err(file_system(
            image,
            "locate partner image",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ))
    }
}

fn item_label(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Filter every table in `tables_dir` against its mask in `masks_dir`
///
/// # Errors
///
/// Returns an error only if `tables_dir` cannot be listed
pub fn mask_directory(
    tables_dir: &Path,
    masks_dir: &Path,
    output_dir: &Path,
    progress: &mut ProgressManager,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for table_path in collect_tables(tables_dir)? {
        let label = item_label(&table_path);
        progress.start_item(&label);

        let output = output_dir.join(table_path.file_name().unwrap_or_default());
        let outcome = mask_table(&table_path, masks_dir, &output)
            .for_dataset(&label)
            .map(|()| output);
        report.record(outcome, progress);
    }

    Ok(report)
}

fn mask_table(table_path: &Path, masks_dir: &Path, output: &Path) -> Result<()> {
    let mask_path = require_partner(table_path, masks_dir)?;
    let filter = MaskFilter::new(load_grayscale(&mask_path)?);

    let mut table = Table::read(table_path)?;
    let removed = filter.apply(&mut table)?;
    debug!(
        table = %table_path.display(),
        removed,
        kept = table.len(),
        "applied mask"
    );
    table.write(output)
}

/// Draw orientation vectors of every table over its background image
///
/// # Errors
///
/// Returns an error only if `tables_dir` cannot be listed
pub fn overlay_directory(
    tables_dir: &Path,
    images_dir: &Path,
    output_dir: &Path,
    progress: &mut ProgressManager,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for table_path in collect_tables(tables_dir)? {
        let label = item_label(&table_path);
        progress.start_item(&label);

        let stem = table_path.file_stem().unwrap_or_default().to_string_lossy();
        let output = output_dir.join(format!("{stem}{OVERLAY_SUFFIX}.png"));
        let outcome = overlay_table(&table_path, images_dir, &output)
            .for_dataset(&label)
            .map(|()| output);
        report.record(outcome, progress);
    }

    Ok(report)
}

fn overlay_table(table_path: &Path, images_dir: &Path, output: &Path) -> Result<()> {
    let image_path = require_partner(table_path, images_dir)?;
    let background = load_grayscale(&image_path)?;

    let points = oriented_points(&Table::read(table_path)?)?;
    let (canvas, drawn) = render_overlay(&background, &points);
    debug!(table = %table_path.display(), drawn, "rendered overlay");
    save_rgb(&canvas, output)
}

/// Global value range across every readable curve of a replot manifest
///
/// Unreadable files are skipped here and reported when their category is drawn.
pub fn global_value_range(manifest: &ReplotManifest) -> Option<AxisRange> {
    manifest
        .categories
        .iter()
        .flat_map(|c| c.files.iter())
        .filter_map(|f| read_curve(f).ok()?.value_range())
        .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
        .map(|(lo, hi)| AxisRange::new(lo, hi))
}

/// Render one chart per category with shared vertical limits
///
/// Each chart spans `[0, max bin center / 2]` horizontally.
///
/// # Errors
///
/// Returns an error only if `output_dir` cannot be created
pub fn replot(
    manifest: &ReplotManifest,
    output_dir: &Path,
    progress: &mut ProgressManager,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| file_system(output_dir, "create directory", e))?;

    let y_range = global_value_range(manifest);
    let mut report = BatchReport::default();

    for category in &manifest.categories {
        progress.start_item(&category.name);
        let output = output_dir.join(format!("{}.png", category.name));
        let outcome = replot_category(&category.files, &category.colors, y_range)
            .and_then(|chart| chart.save(&output))
            .for_dataset(&category.name)
            .map(|()| output);
        report.record(outcome, progress);
    }

    Ok(report)
}

fn replot_category(
    files: &[PathBuf],
    colors: &[String],
    y_range: Option<AxisRange>,
) -> Result<LineChart> {
    let mut series = Vec::with_capacity(files.len());
    let mut max_center: f64 = 0.0;

    for (i, file) in files.iter().enumerate() {
        let curve = read_curve(file)?;
        max_center = max_center.max(curve.max_bin_center().unwrap_or(0.0));
        let color = colors
            .get(i)
            .map_or_else(|| Ok(palette_color(i)), |c| parse_color(c))?;
        series.push(Series::from_curve(&curve, color));
    }

    let mut chart = LineChart::fitted(series);
    chart.x_range = AxisRange::new(0.0, max_center / 2.0);
    if let Some(range) = y_range {
        chart.y_range = range;
    }
    Ok(chart)
}
