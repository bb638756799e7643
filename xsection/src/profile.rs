//! Elevation profiles sampled from a DEM along a cross-section.

use crate::{
    math::{distance, linspace},
    CrossSection, SectionError,
};
use dem::Grid;
use geo::{Coord, CoordFloat};
use log::debug;
use num_traits::FromPrimitive;

/// Interior samples taken between a section's ends unless told
/// otherwise.
pub const DEFAULT_POINTS: usize = 250;

#[derive(Debug, Clone, PartialEq)]
pub struct SectionProfile<C: CoordFloat = f64> {
    /// Cross-section this profile was sampled along.
    pub section_id: String,

    /// Location of each sample, from the left end to the right end.
    pub points: Vec<Coord<C>>,

    /// Horizontal distance of each sample from the section's
    /// midpoint, negative toward the left end.
    pub offsets: Vec<C>,

    /// Elevation at each sample; `None` off the grid or on nodata.
    pub elevations: Vec<Option<f32>>,
}

impl<C> SectionProfile<C>
where
    C: CoordFloat,
{
    pub fn builder<'a>() -> SectionProfileBuilder<'a, C> {
        SectionProfileBuilder {
            section: None,
            points: DEFAULT_POINTS,
        }
    }

    /// Returns the (offset, elevation) pairs which hit valid data.
    pub fn valid(&self) -> impl Iterator<Item = (C, f32)> + '_ {
        self.offsets
            .iter()
            .zip(self.elevations.iter())
            .filter_map(|(offset, elev)| elev.map(|elev| (*offset, elev)))
    }
}

pub struct SectionProfileBuilder<'a, C: CoordFloat = f64> {
    /// Section to sample along (required).
    section: Option<&'a CrossSection<C>>,

    /// Number of samples between the two ends (defaults to
    /// [DEFAULT_POINTS]).
    points: usize,
}

impl<'a, C> SectionProfileBuilder<'a, C>
where
    C: CoordFloat + FromPrimitive,
    f64: From<C>,
{
    /// Section to sample along (required).
    #[must_use]
    pub fn section(mut self, section: &'a CrossSection<C>) -> Self {
        self.section = Some(section);
        self
    }

    /// Number of samples between the two ends (defaults to
    /// [DEFAULT_POINTS]).
    #[must_use]
    pub fn points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    pub fn build(&self, grid: &Grid) -> Result<SectionProfile<C>, SectionError> {
        let section = self.section.ok_or(SectionError::Builder("section"))?;
        let CrossSection { left, right, .. } = *section;
        let half_length = distance(left, right) / (C::one() + C::one());

        let now = std::time::Instant::now();
        let points: Vec<Coord<C>> = linspace(C::zero(), C::one(), self.points + 2)
            .map(|f| Coord {
                x: left.x + (right.x - left.x) * f,
                y: left.y + (right.y - left.y) * f,
            })
            .collect();
        let offsets = points
            .iter()
            .map(|p| distance(left, *p) - half_length)
            .collect();
        let elevations: Vec<Option<f32>> = points
            .iter()
            .map(|p| {
                grid.get(Coord {
                    x: p.x.into(),
                    y: p.y.into(),
                })
            })
            .collect();

        debug!(
            "profile {}; len: {}, missing: {}, exec: {:?}",
            section.section_id,
            points.len(),
            elevations.iter().filter(|e| e.is_none()).count(),
            now.elapsed()
        );

        Ok(SectionProfile {
            section_id: section.section_id.clone(),
            points,
            offsets,
            elevations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SectionProfile;
    use crate::{generate, SectionError};
    use approx::assert_abs_diff_eq;
    use dem::{Endian, Grid, Header};
    use geo::coord;

    /// 20x20 m grid of 1 m cells over [-10, 10] x [0, 20] whose
    /// elevation equals the cell's column index.
    fn ramp() -> Grid {
        let header = Header {
            ncols: 20,
            nrows: 20,
            ll_corner: coord! { x: -10.0, y: 0.0 },
            cell_size: 1.0,
            nodata: None,
            byte_order: Endian::Little,
        };
        let samples = (0..20)
            .flat_map(|_row| (0..20).map(|col| col as f32))
            .collect();
        Grid::from_samples(&header, samples).unwrap()
    }

    #[test]
    fn test_profile_across_ramp() {
        let sections = generate(
            &[coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 20.0 }],
            5.0,
            8.0,
        )
        .unwrap();
        let profile = SectionProfile::builder()
            .section(&sections[2])
            .points(7)
            .build(&ramp())
            .unwrap();

        assert_eq!(profile.section_id, "Chainage 10.0");
        assert_eq!(profile.points.len(), 9);
        assert_abs_diff_eq!(profile.offsets[0], -8.0, epsilon = 1e-9);
        assert_abs_diff_eq!(profile.offsets[4], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(profile.offsets[8], 8.0, epsilon = 1e-9);
        // Samples every 2 m from x = -8 to x = 8.
        let elevations: Vec<_> = profile.elevations.iter().map(|e| e.unwrap()).collect();
        assert_eq!(elevations, [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0]);
    }

    #[test]
    fn test_off_grid_samples_are_none() {
        let sections = generate(
            &[coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 20.0 }],
            10.0,
            15.0,
        )
        .unwrap();
        let profile = SectionProfile::builder()
            .section(&sections[1])
            .points(1)
            .build(&ramp())
            .unwrap();
        assert_eq!(profile.elevations, [None, Some(10.0), None]);
        assert_eq!(profile.valid().collect::<Vec<_>>().len(), 1);
    }

    #[test]
    fn test_missing_section() {
        let res = SectionProfile::<f64>::builder().build(&ramp());
        assert!(matches!(res, Err(SectionError::Builder("section"))));
    }
}
