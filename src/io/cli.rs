//! Command-line interface for correlation, masking, overlay, and replot batches

use crate::io::batch::{
    BatchReport, CorrelationBatch, combined_chart, mask_directory, overlay_directory, replot,
};
use crate::io::configuration::{CorrelationManifest, ReplotManifest, Strategy, load_manifest};
use crate::io::error::Result;
use crate::io::progress::ProgressManager;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "vectorcorr")]
#[command(
    author,
    version,
    about = "Distance-binned orientation correlation for microscopy vector fields"
)]
/// Command-line arguments for the analysis tool
pub struct Cli {
    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log per-dataset details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Batch operations
#[derive(Subcommand)]
pub enum Command {
    /// Compute normalized correlation curves for every dataset in a manifest
    Correlate {
        /// TOML manifest listing dataset groups
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Number of distance bins (overrides the manifest)
        #[arg(short, long)]
        bins: Option<usize>,

        /// Directory for curve tables (overrides the manifest)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also render all curves into one PNG chart
        #[arg(short, long, value_name = "PNG")]
        plot: Option<PathBuf>,

        /// Accumulate bins on the fly instead of storing all pairwise records
        #[arg(short, long)]
        streaming: bool,
    },

    /// Drop table rows lying on white mask pixels
    Mask {
        /// Directory of point tables
        tables: PathBuf,
        /// Directory of masks named after the tables
        masks: PathBuf,
        /// Directory for filtered tables
        output: PathBuf,
    },

    /// Draw orientation vectors over background images
    Overlay {
        /// Directory of tables with X, Y, Orientation columns
        tables: PathBuf,
        /// Directory of images named after the tables
        images: PathBuf,
        /// Directory for overlay images
        output: PathBuf,
    },

    /// Chart previously written curve tables, one image per category
    Replot {
        /// TOML manifest listing categories
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Directory for chart images
        output: PathBuf,
    },
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter for the chosen verbosity
    pub const fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Execute the selected command
    ///
    /// Failing items are logged and skipped; the report lists them.
    ///
    /// # Errors
    ///
    /// Returns an error if a manifest cannot be loaded or an input or output
    /// directory is unusable
    pub fn run(&self) -> Result<BatchReport> {
        let report = match &self.command {
            Command::Correlate {
                manifest,
                bins,
                output_dir,
                plot,
                streaming,
            } => {
                let manifest: CorrelationManifest = load_manifest(manifest)?;
                let strategy = if *streaming {
                    Strategy::Streaming
                } else {
                    Strategy::Materialized
                };
                let batch = CorrelationBatch::new(manifest, *bins, output_dir.clone(), strategy);

                let mut progress = self.progress("correlate", batch.dataset_count());
                let (mut report, curves) = batch.run(&mut progress)?;
                progress.finish();

                if let Some(plot_path) = plot {
                    combined_chart(&curves)?.save(plot_path)?;
                    info!(path = %plot_path.display(), "saved combined chart");
                    report.written.push(plot_path.clone());
                }
                report
            }
            Command::Mask {
                tables,
                masks,
                output,
            } => {
                let mut progress = self.progress("mask", count_tables(tables));
                let report = mask_directory(tables, masks, output, &mut progress)?;
                progress.finish();
                report
            }
            Command::Overlay {
                tables,
                images,
                output,
            } => {
                let mut progress = self.progress("overlay", count_tables(tables));
                let report = overlay_directory(tables, images, output, &mut progress)?;
                progress.finish();
                report
            }
            Command::Replot { manifest, output } => {
                let manifest: ReplotManifest = load_manifest(manifest)?;
                let mut progress = self.progress("replot", manifest.categories.len());
                let report = replot(&manifest, output, &mut progress)?;
                progress.finish();
                report
            }
        };

        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            "batch finished"
        );
        Ok(report)
    }

    fn progress(&self, prefix: &'static str, total: usize) -> ProgressManager {
        if self.should_show_progress() {
            ProgressManager::new(prefix, total)
        } else {
            ProgressManager::hidden(total)
        }
    }
}

fn count_tables(dir: &std::path::Path) -> usize {
    crate::io::batch::collect_tables(dir).map_or(0, |files| files.len())
}
