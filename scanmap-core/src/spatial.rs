use std::collections::HashMap;

use crate::record::{GeoPoint, Positioned};

/// Grid cell holding the most records, used to center a freshly loaded view.
///
/// Coordinates are rounded to the nearest multiple of `cell_deg`. Ties go to
/// the cell that reached the winning count first while walking `records` in
/// order.
pub fn densest_cell<T: Positioned>(records: &[T], cell_deg: f64) -> Option<GeoPoint> {
    if !(cell_deg.is_finite() && cell_deg > 0.0) {
        return None;
    }
    let mut counts: HashMap<(i64, i64), usize> = HashMap::new();
    let mut best: Option<((i64, i64), usize)> = None;
    for rec in records {
        let (lat, lon) = rec.position();
        let key = quantize(lat, lon, cell_deg);
        let count = counts.entry(key).or_insert(0);
        *count += 1;
        match best {
            Some((_, best_count)) if *count <= best_count => {}
            _ => best = Some((key, *count)),
        }
    }
    best.map(|((cy, cx), _)| GeoPoint {
        lat: cy as f64 * cell_deg,
        lon: cx as f64 * cell_deg,
    })
}

pub fn quantize(lat: f64, lon: f64, cell_deg: f64) -> (i64, i64) {
    (
        (lat / cell_deg).round() as i64,
        (lon / cell_deg).round() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_GRID_DEG: f64 = 0.01;
    const TEST_EPSILON: f64 = 1e-9;

    struct Pt(f64, f64);

    impl Positioned for Pt {
        fn position(&self) -> (f64, f64) {
            (self.0, self.1)
        }
    }

    #[test]
    fn picks_most_populated_cell() {
        let pts = vec![
            Pt(52.500, 13.500),
            Pt(52.001, 13.001),
            Pt(52.500, 13.500),
            Pt(52.001, 13.001),
            Pt(52.001, 13.001),
        ];
        let center = densest_cell(&pts, TEST_GRID_DEG).unwrap();
        assert!((center.lat - 52.00).abs() < TEST_EPSILON);
        assert!((center.lon - 13.00).abs() < TEST_EPSILON);
    }

    #[test]
    fn tie_goes_to_first_cell_to_reach_count() {
        let pts = vec![
            Pt(48.0, 2.0),
            Pt(40.0, -3.0),
            Pt(40.0, -3.0),
            Pt(48.0, 2.0),
        ];
        let center = densest_cell(&pts, TEST_GRID_DEG).unwrap();
        assert!((center.lat - 40.0).abs() < TEST_EPSILON);
        assert!((center.lon + 3.0).abs() < TEST_EPSILON);
    }

    #[test]
    fn rounding_not_truncation() {
        let pts = vec![Pt(52.006, 13.004)];
        let center = densest_cell(&pts, TEST_GRID_DEG).unwrap();
        assert!((center.lat - 52.01).abs() < TEST_EPSILON);
        assert!((center.lon - 13.00).abs() < TEST_EPSILON);
    }

    #[test]
    fn empty_or_bad_grid_is_none() {
        let none: Vec<Pt> = Vec::new();
        assert!(densest_cell(&none, TEST_GRID_DEG).is_none());
        assert!(densest_cell(&[Pt(1.0, 1.0)], 0.0).is_none());
    }
}
