//! SVG rendering of the merged usage and rainfall table.
//!
//! Each chart draws into a caller supplied `String`, so the command layer
//! decides where the SVG ends up.

use plotters::style::RGBColor;

pub mod scatter;
pub mod trend;

/// Width and height of every chart in pixels.
pub const CHART_SIZE: (u32, u32) = (1024, 640);

/// PuBuGn teal, used for the data series.
pub const SERIES_COLOR: RGBColor = RGBColor(2, 129, 138);

/// Orange, used for the fitted regression line.
pub const FIT_COLOR: RGBColor = RGBColor(204, 76, 2);

/// Upper bound for a value axis with some headroom above the largest value.
pub fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let largest = values.fold(0.0f64, f64::max);
    if largest > 0.0 {
        largest + largest / 5.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::axis_max;

    #[test]
    fn test_axis_max() {
        assert_eq!(axis_max([10.0, 50.0, 20.0].into_iter()), 60.0);
        assert_eq!(axis_max(std::iter::empty()), 1.0);
        assert_eq!(axis_max([0.0, 0.0].into_iter()), 1.0);
    }
}
