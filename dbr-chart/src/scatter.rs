use crate::{axis_max, CHART_SIZE, FIT_COLOR, SERIES_COLOR};
use dbr_data::{
    merge::rainfall_usage_pairs,
    merge::MergedRecord,
    regression::{confidence_band, BandPoint, LinearFit},
};
use log::{info, warn};
use plotters::prelude::*;

pub const SCATTER_TITLE: &str = "Number of Bikes Taken vs Rainfall(mm)";
pub const SCATTER_X_LABEL: &str = "Rainfall(mm)";
pub const SCATTER_Y_LABEL: &str = "Number Taken";

/// Confidence level of the band drawn around the fitted line.
pub const BAND_LEVEL: f64 = 0.95;

/// Points the band outline is evaluated at across the x axis.
const BAND_STEPS: usize = 50;

/// Draw bikes taken against rainfall, with the fitted line and its 95%
/// confidence band when there is a fit.
///
/// Dates without a rainfall observation are left out of the plot.
pub fn generate_regression_svg<'a>(
    records: &[MergedRecord],
    fit: Option<&LinearFit>,
    svg_inner_string: &'a mut String,
) -> DrawResult<(), SVGBackend<'a>> {
    let (rain, taken) = rainfall_usage_pairs(records);
    let x_max = axis_max(rain.iter().copied());
    let fitted_line =
        fit.map(|fit| vec![(0.0, fit.predict(0.0)), (x_max, fit.predict(x_max))]);
    let band = fit.map(|fit| band_outline(fit, &rain, x_max)).unwrap_or_default();
    let fitted_values = fitted_line
        .iter()
        .flatten()
        .map(|&(_, y)| y)
        .chain(band.iter().flat_map(|p| [p.lower, p.upper]));
    let y_max = axis_max(taken.iter().copied().chain(fitted_values.clone()));
    let y_min = fitted_values.fold(0.0f64, f64::min);
    info!("Generating rainfall regression SVG for {} dates", rain.len());

    let backend = SVGBackend::with_string(svg_inner_string, CHART_SIZE);
    let backend_drawing_area = backend.into_drawing_area();
    backend_drawing_area.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&backend_drawing_area)
        .caption(SCATTER_TITLE, ("sans-serif", 24).into_font())
        .margin(20i32)
        .x_label_area_size(40u32)
        .y_label_area_size(60u32)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc(SCATTER_X_LABEL)
        .y_desc(SCATTER_Y_LABEL)
        .draw()?;
    if !band.is_empty() {
        let outline: Vec<(f64, f64)> = band
            .iter()
            .map(|p| (p.x, p.upper))
            .chain(band.iter().rev().map(|p| (p.x, p.lower)))
            .collect();
        chart
            .draw_series(std::iter::once(Polygon::new(
                outline,
                FIT_COLOR.mix(0.2).filled(),
            )))?
            .label(format!("{:.0}% confidence band", BAND_LEVEL * 100.0))
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], FIT_COLOR.mix(0.2).filled())
            });
    }
    chart
        .draw_series(
            rain.iter()
                .zip(taken.iter())
                .map(|(&x, &y)| Circle::new((x, y), 3, SERIES_COLOR.filled())),
        )?
        .label("Daily usage")
        .legend(|(x, y)| Circle::new((x + 10, y), 3, SERIES_COLOR.filled()));
    if let (Some(fit), Some(line)) = (fit, fitted_line) {
        let legend_title = format!(
            "y = {:.1} {:+.1}x (r = {:.3})",
            fit.intercept, fit.slope, fit.r_value
        );
        chart
            .draw_series(LineSeries::new(line, &FIT_COLOR))?
            .label(legend_title)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FIT_COLOR));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    backend_drawing_area.present()?;
    Ok(())
}

/// Band around `fit` sampled evenly over `0..=x_max`, empty when it cannot
/// be computed.
fn band_outline(fit: &LinearFit, rain: &[f64], x_max: f64) -> Vec<BandPoint> {
    let at: Vec<f64> = (0..=BAND_STEPS)
        .map(|step| x_max * step as f64 / BAND_STEPS as f64)
        .collect();
    confidence_band(fit, rain, BAND_LEVEL, &at).unwrap_or_else(|e| {
        warn!("Skipping confidence band: {}", e);
        Vec::new()
    })
}
