//! Chart arithmetic independent of any drawing backend

use merlive_core::Series;

/// One wedge of a pie chart
///
/// Angles are in degrees, counter-clockwise, starting at twelve o'clock
/// (90°). `end - start` is proportional to the slice's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    /// Index of the point in the series
    pub index: usize,
    /// Start angle in degrees
    pub start: f64,
    /// End angle in degrees
    pub end: f64,
    /// Fraction of the total, in `[0, 1]`
    pub share: f64,
}

impl PieSlice {
    /// Angle halfway through the slice
    #[inline]
    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Share formatted like `42.9%`
    #[must_use]
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.share * 100.0)
    }
}

/// Degrees where the first slice starts
pub const PIE_START_ANGLE: f64 = 90.0;

/// Split a series into pie slices
///
/// Zero-valued points keep their index but get an empty wedge. A series
/// whose total is zero has nothing to draw and yields no slices.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pie_slices(series: &Series) -> Vec<PieSlice> {
    // The u64 total saturates; shares need the real sum
    let total: f64 = series.values().map(|v| v as f64).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = PIE_START_ANGLE;
    series
        .values()
        .enumerate()
        .map(|(index, value)| {
            let share = value as f64 / total;
            let end = start + share * 360.0;
            let slice = PieSlice {
                index,
                start,
                end,
                share,
            };
            start = end;
            slice
        })
        .collect()
}

/// Upper bound for a bar chart's value axis
///
/// Leaves roughly ten percent headroom for the labels printed above bars.
/// Never returns zero so an all-zero series still has a drawable axis.
#[must_use]
pub fn value_axis_max(max_value: u64) -> u64 {
    max_value.saturating_add(max_value / 10).saturating_add(1)
}

/// Points approximating the arc of a wedge, in screen coordinates
///
/// Screen `y` grows downwards, so positive angles move up.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn wedge_polygon(center: (i32, i32), radius: f64, slice: &PieSlice) -> Vec<(i32, i32)> {
    let sweep = slice.end - slice.start;
    let steps = (sweep.abs().ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        #[allow(clippy::cast_precision_loss)]
        let angle = slice.start + sweep * step as f64 / steps as f64;
        points.push(polar(center, radius, angle));
    }
    points
}

/// Screen point at `angle` degrees and `radius` pixels from `center`
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    let rad = angle.to_radians();
    (
        center.0 + (radius * rad.cos()).round() as i32,
        center.1 - (radius * rad.sin()).round() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[u64]) -> Series {
        Series {
            title: "test".to_string(),
            points: values.iter().enumerate().map(|(i, v)| (format!("r{i}"), *v)).collect(),
        }
    }

    #[test]
    fn test_pie_slices_cover_full_circle() {
        let slices = pie_slices(&series(&[1, 1, 2]));
        assert_eq!(slices.len(), 3);
        assert!((slices[0].start - PIE_START_ANGLE).abs() < 1e-9);
        assert!((slices[2].end - (PIE_START_ANGLE + 360.0)).abs() < 1e-9);
        assert!((slices[2].share - 0.5).abs() < 1e-9);
        for pair in slices.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pie_slices_zero_total() {
        assert!(pie_slices(&series(&[0, 0])).is_empty());
        assert!(pie_slices(&series(&[])).is_empty());
    }

    #[test]
    fn test_percent_label() {
        let slices = pie_slices(&series(&[1, 2]));
        assert_eq!(slices[0].percent_label(), "33.3%");
        assert_eq!(slices[1].percent_label(), "66.7%");
    }

    #[test]
    fn test_value_axis_max() {
        assert_eq!(value_axis_max(0), 1);
        assert_eq!(value_axis_max(3), 4);
        assert_eq!(value_axis_max(10), 12);
        assert!(value_axis_max(250) > 250);
    }

    #[test]
    fn test_value_axis_max_saturates() {
        assert_eq!(value_axis_max(u64::MAX), u64::MAX);
        assert_eq!(value_axis_max(u64::MAX - 1), u64::MAX);
    }

    #[test]
    fn test_pie_slices_huge_counts() {
        let slices = pie_slices(&series(&[u64::MAX, u64::MAX]));
        assert_eq!(slices.len(), 2);
        assert!((slices[0].share - 0.5).abs() < 1e-9);
        assert!((slices[1].end - (PIE_START_ANGLE + 360.0)).abs() < 1e-9);
    }

    #[test]
    fn test_polar_screen_orientation() {
        assert_eq!(polar((100, 100), 10.0, 90.0), (100, 90));
        assert_eq!(polar((100, 100), 10.0, 0.0), (110, 100));
    }

    #[test]
    fn test_wedge_polygon_starts_at_center() {
        let slice = PieSlice {
            index: 0,
            start: 90.0,
            end: 180.0,
            share: 0.25,
        };
        let points = wedge_polygon((50, 50), 20.0, &slice);
        assert_eq!(points[0], (50, 50));
        assert_eq!(points[1], (50, 30));
        assert_eq!(*points.last().unwrap(), (30, 50));
    }
}
