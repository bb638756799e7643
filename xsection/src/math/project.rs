use super::{bearing, distance};
use crate::SectionError;
use geo::{Coord, CoordFloat};
use num_traits::FloatConst;

/// A point expressed in a line's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint<T = f64> {
    /// Distance along the reference direction.
    pub chainage: T,

    /// Perpendicular distance from the reference line, positive to
    /// the right (clockwise) of the reference direction.
    pub offset: T,
}

/// Rotates `point` into the frame whose origin is `start` and whose
/// x-axis points from `start` toward `end`.
pub fn project<T>(
    start: Coord<T>,
    end: Coord<T>,
    point: Coord<T>,
) -> Result<ProjectedPoint<T>, SectionError>
where
    T: CoordFloat + FloatConst,
{
    let reference_bearing = bearing(start, end)?;
    let point_length = distance(start, point);
    if point_length == T::zero() {
        return Ok(ProjectedPoint {
            chainage: T::zero(),
            offset: T::zero(),
        });
    }
    let delta_bearing = bearing(start, point)? - reference_bearing;
    let (sin, cos) = delta_bearing.sin_cos();
    Ok(ProjectedPoint {
        chainage: point_length * cos,
        offset: point_length * sin,
    })
}
