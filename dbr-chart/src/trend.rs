use crate::{axis_max, CHART_SIZE, SERIES_COLOR};
use chrono::{NaiveDate, TimeDelta};
use dbr_data::merge::MergedRecord;
use log::info;
use plotters::prelude::*;
use std::ops::Range;

pub const TREND_TITLE: &str = "Number of Bikes Used per Day";
pub const TREND_X_LABEL: &str = "Date";
pub const TREND_Y_LABEL: &str = "Number Used";

/// Date span of the records, widened to at least one day.
fn date_range(records: &[MergedRecord]) -> Range<NaiveDate> {
    let start = records.first().map(|r| r.date).unwrap_or_default();
    let last = records.last().map(|r| r.date).unwrap_or(start);
    let end = if last > start {
        last
    } else {
        start + TimeDelta::days(1)
    };
    Range { start, end }
}

/// Draw the daily usage line chart.
///
/// `records` must be in date order, as produced by `left_join`.
pub fn generate_trend_svg<'a>(
    records: &[MergedRecord],
    svg_inner_string: &'a mut String,
) -> DrawResult<(), SVGBackend<'a>> {
    let ranged_date: RangedDate<NaiveDate> = date_range(records).into();
    let y_max = axis_max(records.iter().map(|r| r.total_taken as f64));
    info!("Generating usage trend SVG for {} dates", records.len());

    let backend = SVGBackend::with_string(svg_inner_string, CHART_SIZE);
    let backend_drawing_area = backend.into_drawing_area();
    backend_drawing_area.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&backend_drawing_area)
        .caption(TREND_TITLE, ("sans-serif", 24).into_font())
        .margin(20i32)
        .x_label_area_size(40u32)
        .y_label_area_size(60u32)
        .build_cartesian_2d(ranged_date, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_labels(10_usize)
        .x_desc(TREND_X_LABEL)
        .y_desc(TREND_Y_LABEL)
        .x_label_formatter(&|date: &NaiveDate| date.format("%d %b").to_string())
        .draw()?;
    chart.draw_series(LineSeries::new(
        records
            .iter()
            .map(|record| (record.date, record.total_taken as f64))
            .collect::<Vec<_>>(),
        &SERIES_COLOR,
    ))?;
    backend_drawing_area.present()?;
    Ok(())
}
