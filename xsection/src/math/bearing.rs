use crate::SectionError;
use geo::{Coord, CoordFloat};
use num_traits::FloatConst;
use std::cmp::Ordering::{Equal as Zero, Greater as Pos, Less as Neg};

/// Returns the bearing (radians, clockwise from north, in `[0, 2π)`)
/// of the vector from `p0` to `p1`.
///
/// The result is a piecewise function of the signs of the easting
/// (ΔE) and northing (ΔN) deltas:
///
/// | ΔE  | ΔN  | bearing          |
/// |-----|-----|------------------|
/// | 0   | +   | 0                |
/// | +   | 0   | π/2              |
/// | 0   | −   | π                |
/// | −   | 0   | 3π/2             |
/// | any | −   | π + atan(ΔE/ΔN)  |
/// | −   | +   | 2π + atan(ΔE/ΔN) |
/// | +   | +   | atan(ΔE/ΔN)      |
///
/// Axis aligned deltas are exact. Coincident (or non-finite) points
/// have no bearing.
pub fn bearing<T>(p0: Coord<T>, p1: Coord<T>) -> Result<T, SectionError>
where
    T: CoordFloat + FloatConst,
{
    let Coord { x: de, y: dn } = p1 - p0;
    let sign = |v: T| v.partial_cmp(&T::zero());
    let two_pi = T::PI() + T::PI();

    let bearing = match (sign(de), sign(dn)) {
        (Some(Zero), Some(Pos)) => T::zero(),
        (Some(Pos), Some(Zero)) => T::FRAC_PI_2(),
        (Some(Zero), Some(Neg)) => T::PI(),
        (Some(Neg), Some(Zero)) => T::PI() + T::FRAC_PI_2(),
        (Some(_), Some(Neg)) => T::PI() + (de / dn).atan(),
        (Some(Neg), Some(Pos)) => two_pi + (de / dn).atan(),
        (Some(Pos), Some(Pos)) => (de / dn).atan(),
        (Some(Zero), Some(Zero)) | (None, _) | (_, None) => {
            return Err(SectionError::UndefinedBearing)
        }
    };

    // A vanishing westward ΔE rounds 2π + atan(ΔE/ΔN) up to 2π.
    if bearing >= two_pi {
        Ok(bearing - two_pi)
    } else {
        Ok(bearing)
    }
}
