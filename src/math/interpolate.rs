/// Piecewise-linear interpolation of `values` over ascending `stations`.
///
/// Queries outside the station range are clamped to the end values.
/// Returns `None` if the tables are empty or of different length.
#[must_use]
pub fn linear(stations: &[f64], values: &[f64], x: f64) -> Option<f64> {
    if stations.is_empty() || stations.len() != values.len() {
        return None;
    }
    let last = stations.len() - 1;
    if x <= stations[0] {
        return Some(values[0]);
    }
    if x >= stations[last] {
        return Some(values[last]);
    }
    let i = panel_index(stations, x);
    let (x0, x1) = (stations[i], stations[i + 1]);
    let span = x1 - x0;
    if span.abs() < super::TOLERANCE {
        return Some(values[i]);
    }
    let f = (x - x0) / span;
    Some(values[i] + f * (values[i + 1] - values[i]))
}

/// Index `i` of the panel `[stations[i], stations[i + 1]]` containing `x`.
///
/// Values beyond the ends map to the first or last panel.
#[must_use]
pub fn panel_index(stations: &[f64], x: f64) -> usize {
    if stations.len() < 2 {
        return 0;
    }
    let last_panel = stations.len() - 2;
    stations
        .windows(2)
        .position(|w| x < w[1])
        .unwrap_or(last_panel)
        .min(last_panel)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(0.0, 4.0)]
    #[test_case(5.0, 3.0)]
    #[test_case(12.5, 1.75)]
    #[test_case(-1.0, 4.0 ; "clamped below")]
    #[test_case(30.0, 1.0 ; "clamped above")]
    fn interpolates(x: f64, expected: f64) {
        let stations = [0.0, 10.0, 20.0];
        let values = [4.0, 2.0, 1.0];
        assert_relative_eq!(linear(&stations, &values, x).unwrap(), expected);
    }

    #[test]
    fn mismatched_tables() {
        assert!(linear(&[0.0, 1.0], &[1.0], 0.5).is_none());
        assert!(linear(&[], &[], 0.5).is_none());
    }

    #[test]
    fn panel_lookup() {
        let s = [0.0, 1.0, 3.0];
        assert_eq!(panel_index(&s, 0.5), 0);
        assert_eq!(panel_index(&s, 1.5), 1);
        assert_eq!(panel_index(&s, 3.0), 1);
    }
}
