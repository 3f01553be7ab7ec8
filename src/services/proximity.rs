//! Proximity classification of a position sample against a venue

use crate::domain::types::Coordinate;

/// Max per-axis distance (inclusive) for a sample to count as at a venue.
/// The window is a 5x5 square centred on the venue, not a radius.
pub const PROXIMITY_TOLERANCE: f64 = 2.0;

/// True if `sample` lies within the tolerance square around `venue`.
/// NaN on either axis never matches.
#[inline]
pub fn was_visit(sample: &Coordinate, venue: &Coordinate) -> bool {
    (sample.x - venue.x).abs() <= PROXIMITY_TOLERANCE
        && (sample.y - venue.y).abs() <= PROXIMITY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn test_same_position_is_visit() {
        for p in [c(0.0, 0.0), c(-5.5, 12.25), c(1e6, -1e6)] {
            assert!(was_visit(&p, &p));
        }
    }

    #[test]
    fn test_boundary_inclusive() {
        let venue = c(10.0, 10.0);
        assert!(was_visit(&c(12.0, 10.0), &venue));
        assert!(was_visit(&c(8.0, 10.0), &venue));
        assert!(was_visit(&c(10.0, 12.0), &venue));
        assert!(was_visit(&c(12.0, 8.0), &venue));
    }

    #[test]
    fn test_three_units_away_is_not_visit() {
        let venue = c(10.0, 10.0);
        assert!(!was_visit(&c(13.0, 10.0), &venue));
        assert!(!was_visit(&c(7.0, 10.0), &venue));
        assert!(!was_visit(&c(10.0, 13.0), &venue));
        assert!(!was_visit(&c(10.0, 7.0), &venue));
    }

    #[test]
    fn test_square_not_circle() {
        // Corner of the square is further than 2 units euclidean but still a visit
        assert!(was_visit(&c(2.0, 2.0), &c(0.0, 0.0)));
    }

    #[test]
    fn test_symmetry() {
        let points = [c(0.0, 0.0), c(2.0, -2.0), c(3.0, 1.0), c(-1.5, 0.5), c(100.0, 101.0)];
        for a in &points {
            for b in &points {
                assert_eq!(was_visit(a, b), was_visit(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_nan_never_visits() {
        assert!(!was_visit(&c(f64::NAN, 0.0), &c(0.0, 0.0)));
        assert!(!was_visit(&c(0.0, 0.0), &c(0.0, f64::NAN)));
    }
}
