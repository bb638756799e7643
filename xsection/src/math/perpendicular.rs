use geo::{Coord, CoordFloat};
use num_traits::FloatConst;

/// Returns the (left, right) points `width` away from `anchor`,
/// perpendicular to `bearing`.
///
/// The section direction is `bearing + π/2`; the right end lies along
/// it and the left end opposite, so `anchor` bisects them.
pub fn perpendicular<T>(anchor: Coord<T>, bearing: T, width: T) -> (Coord<T>, Coord<T>)
where
    T: CoordFloat + FloatConst,
{
    let (sin, cos) = (bearing + T::FRAC_PI_2()).sin_cos();
    let delta = Coord {
        x: width * sin,
        y: width * cos,
    };
    (anchor - delta, anchor + delta)
}

#[cfg(test)]
mod tests {
    use super::perpendicular;
    use crate::math::distance;
    use approx::assert_abs_diff_eq;
    use geo::coord;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_north_bearing() {
        let (left, right) = perpendicular(coord! { x: 0.0, y: 50.0 }, 0.0, 10.0);
        assert_abs_diff_eq!(left.x, -10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(left.y, 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(right.x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(right.y, 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_anchor_bisects() {
        let anchor = coord! { x: 3.0, y: -4.0 };
        let (left, right) = perpendicular(anchor, 0.3 + FRAC_PI_2, 7.5);
        assert_abs_diff_eq!(distance(anchor, left), 7.5, epsilon = 1e-12);
        assert_abs_diff_eq!(distance(anchor, right), 7.5, epsilon = 1e-12);
        let mid = (left + right) / 2.0;
        assert_abs_diff_eq!(mid.x, anchor.x, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.y, anchor.y, epsilon = 1e-12);
    }
}
