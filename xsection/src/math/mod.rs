//! Planar geometry on projected (easting, northing) coordinates.
//!
//! `x` is easting and `y` is northing throughout. Bearings are
//! measured clockwise from grid north, in radians.

mod bearing;
mod distance;
mod linspace;
mod perpendicular;
mod project;

pub use {
    bearing::bearing, distance::distance, perpendicular::perpendicular,
    project::{project, ProjectedPoint},
};
pub(crate) use linspace::linspace;
