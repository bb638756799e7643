use geo::{Coord, CoordFloat};

/// Returns the euclidean distance between `p0` and `p1`.
pub fn distance<T: CoordFloat>(p0: Coord<T>, p1: Coord<T>) -> T {
    let delta = p1 - p0;
    (delta.x.powi(2) + delta.y.powi(2)).sqrt()
}
