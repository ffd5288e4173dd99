//! Usage versus rainfall analysis.

use crate::{write_csv, AnalyzeArgs};
use anyhow::{anyhow, Context};
use dbr_chart::{scatter::generate_regression_svg, trend::generate_trend_svg};
use dbr_core::{occupancy::OccupancySample, rainfall::RainfallObservation};
use dbr_data::{
    merge::{left_join, rainfall_usage_pairs, MergedRecord},
    regression::{linear_regression, LinearFit},
    usage::daily_usage,
};
use dbr_utils::dates::format_datetime;
use log::{info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// File name of the daily usage line chart.
pub const TREND_SVG: &str = "usage_trend.svg";

/// File name of the rainfall scatter and regression chart.
pub const REGRESSION_SVG: &str = "rainfall_regression.svg";

/// Number of parsed samples echoed to the log before processing.
const PREVIEW_ROWS: usize = 5;

/// Everything an analysis run produced.
#[derive(Debug)]
pub struct AnalysisReport {
    pub records: Vec<MergedRecord>,
    pub fit: Option<LinearFit>,
    pub charts: Vec<PathBuf>,
}

/// Run the whole analysis once: load, derive, join, fit, draw, report.
///
/// Prints the correlation coefficient to stdout. Input problems abort the
/// run; a dataset too small to fit only skips the regression.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<AnalysisReport> {
    let samples = OccupancySample::from_path(&args.occupancy_csv)?;
    log_preview(&samples);
    let rainfall = RainfallObservation::from_path(&args.rainfall_csv)?;

    let summaries = daily_usage(&samples);
    let records = left_join(&summaries, &rainfall);

    if let Some(summary_csv) = &args.summary_csv {
        write_csv(summary_csv, &records)?;
    }

    let fit = fit_rainfall_usage(&records);
    match &fit {
        Some(fit) => {
            info!(
                "slope {:.4}, intercept {:.4}, r {:.4}, p {:.4}, std err {:.4} over {} dates",
                fit.slope, fit.intercept, fit.r_value, fit.p_value, fit.std_err, fit.n
            );
            println!("The linear coefficient is {}", fit.r_value);
        }
        None => println!("The linear coefficient is undefined"),
    }

    let charts = if records.is_empty() {
        warn!("No usage dates to chart");
        Vec::new()
    } else {
        write_charts(&args.output_dir, &records, fit.as_ref())?
    };

    Ok(AnalysisReport {
        records,
        fit,
        charts,
    })
}

/// Regress bikes taken on rainfall over the dates that have both.
fn fit_rainfall_usage(records: &[MergedRecord]) -> Option<LinearFit> {
    let (rain, taken) = rainfall_usage_pairs(records);
    if rain.len() < records.len() {
        warn!(
            "Regression uses {} of {} dates; the rest have no rainfall",
            rain.len(),
            records.len()
        );
    }
    match linear_regression(&rain, &taken) {
        Ok(fit) => Some(fit),
        Err(e) => {
            warn!("Skipping rainfall regression: {}", e);
            None
        }
    }
}

fn write_charts(
    output_dir: &Path,
    records: &[MergedRecord],
    fit: Option<&LinearFit>,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let trend_path = output_dir.join(TREND_SVG);
    let mut trend_svg = String::new();
    generate_trend_svg(records, &mut trend_svg)
        .map_err(|e| anyhow!("failed to draw the usage trend chart: {}", e))?;
    fs::write(&trend_path, trend_svg)
        .with_context(|| format!("failed to write {}", trend_path.display()))?;

    let regression_path = output_dir.join(REGRESSION_SVG);
    let mut regression_svg = String::new();
    generate_regression_svg(records, fit, &mut regression_svg)
        .map_err(|e| anyhow!("failed to draw the rainfall regression chart: {}", e))?;
    fs::write(&regression_path, regression_svg)
        .with_context(|| format!("failed to write {}", regression_path.display()))?;

    info!(
        "Charts written to {} and {}",
        trend_path.display(),
        regression_path.display()
    );
    Ok(vec![trend_path, regression_path])
}

fn log_preview(samples: &[OccupancySample]) {
    info!("{:>10}  {:<19}  {:>15}", "STATION ID", "TIME", "AVAILABLE BIKES");
    for sample in samples.iter().take(PREVIEW_ROWS) {
        info!(
            "{:>10}  {:<19}  {:>15}",
            sample.station_id,
            format_datetime(&sample.timestamp),
            sample.available_bikes
        );
    }
}
