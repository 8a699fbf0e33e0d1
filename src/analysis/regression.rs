// Ordinary least-squares line fit over (elapsed days, size) pairs.

/// Slope and goodness of fit of a fitted line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub r_squared: f64,
}

/// Fits `y = a + slope * x`. Returns `None` for fewer than two points, zero spread in `x`,
/// or any non-finite result.
///
/// Sums are taken around the means so that evenly spaced integer inputs produce an exact slope.
pub fn least_squares(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    if !slope.is_finite() {
        return None;
    }
    // A perfectly flat series is explained exactly by a horizontal line.
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        ((sxy * sxy) / (sxx * syy)).clamp(0.0, 1.0)
    };
    Some(LinearFit { slope, r_squared })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_has_exact_slope() {
        let pts: Vec<(f64, f64)> = (0..15).map(|i| (i as f64, 600.0 + 8.0 * i as f64)).collect();
        let fit = least_squares(&pts).unwrap();
        assert_eq!(fit.slope, 8.0);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn single_point_has_no_fit() {
        assert!(least_squares(&[(0.0, 10.0)]).is_none());
        assert!(least_squares(&[]).is_none());
    }

    #[test]
    fn same_x_has_no_fit() {
        assert!(least_squares(&[(3.0, 10.0), (3.0, 20.0)]).is_none());
    }

    #[test]
    fn noise_spike_is_dampened() {
        // Flat at 100 with one spike in the middle: slope stays near zero.
        let mut pts: Vec<(f64, f64)> = (0..11).map(|i| (i as f64, 100.0)).collect();
        pts[5].1 = 200.0;
        let fit = least_squares(&pts).unwrap();
        assert!(fit.slope.abs() < 1e-9);
        assert!(fit.r_squared < 0.01);
    }

    #[test]
    fn flat_series_fits_exactly() {
        let pts = [(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)];
        let fit = least_squares(&pts).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 1.0);
    }
}
