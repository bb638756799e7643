//! # River cross-sections
//!
//! `xsection` cuts evenly spaced cross-sections perpendicular to a
//! river centerline and maps survey data onto them: elevation grids
//! ([profile]), point-cloud slices ([cloud]), and grid-wide volume
//! change ([volume]).
//!
//! Coordinates are projected (easting, northing) pairs in a linear
//! unit, typically meters.

mod centerline;
pub mod cloud;
mod error;
pub mod math;
pub mod profile;
mod section;
pub mod volume;

pub use {
    crate::{
        centerline::{Centerline, ChainageTable},
        error::SectionError,
        math::ProjectedPoint,
        profile::SectionProfile,
        section::{generate, CrossSection, SectionIter},
        volume::VolumeSummary,
    },
    dem, geo,
};
