use crate::{
    math::{bearing, perpendicular, project, ProjectedPoint},
    Centerline, SectionError,
};
use geo::{Coord, CoordFloat, LineString};
use log::debug;
use num_traits::{FloatConst, ToPrimitive};

/// A straight sampling line perpendicular to the centerline.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection<T: CoordFloat = f64> {
    /// Label derived from the chainage, e.g. `"Chainage 25.0"`.
    pub section_id: String,

    /// Distance along the centerline to `anchor`.
    pub chainage: T,

    /// End of the section `width` to the left of the centerline.
    pub left: Coord<T>,

    /// Point on the centerline this section crosses.
    pub anchor: Coord<T>,

    /// End of the section `width` to the right of the centerline.
    pub right: Coord<T>,
}

impl<T> CrossSection<T>
where
    T: CoordFloat + FloatConst,
{
    /// Returns `point` in this section's local frame: chainage from
    /// the anchor toward the right end, offset perpendicular to it.
    pub fn project(&self, point: Coord<T>) -> Result<ProjectedPoint<T>, SectionError> {
        project(self.anchor, self.right, point)
    }

    /// Returns the `[left, anchor, right]` path.
    pub fn line_string(&self) -> LineString<T> {
        LineString::new(vec![self.left, self.anchor, self.right])
    }
}

/// Generates cross-sections every `interval` along `vertices`, each
/// reaching `width` to either side.
pub fn generate<T>(
    vertices: &[Coord<T>],
    interval: T,
    width: T,
) -> Result<Vec<CrossSection<T>>, SectionError>
where
    T: CoordFloat + FloatConst,
{
    Centerline::new(vertices.to_vec())?.generate(interval, width)
}

impl<T> Centerline<T>
where
    T: CoordFloat + FloatConst,
{
    /// Returns a lazy iterator over cross-sections at chainages
    /// `0, interval, 2*interval, ...` up to the total length.
    pub fn sections(&self, interval: T, width: T) -> Result<SectionIter<'_, T>, SectionError> {
        if !(interval.is_finite() && interval > T::zero()) {
            return Err(SectionError::InvalidInput("interval must be positive"));
        }
        if !(width.is_finite() && width > T::zero()) {
            return Err(SectionError::InvalidInput("width must be positive"));
        }
        let steps = ((self.total_length() + self.tolerance()) / interval)
            .floor()
            .to_usize()
            .and_then(|n| n.checked_add(1))
            .ok_or(SectionError::InvalidInput("interval too small"))?;
        Ok(SectionIter {
            centerline: self,
            interval,
            width,
            current: 0,
            steps,
        })
    }

    /// Returns every cross-section in ascending chainage order.
    pub fn generate(&self, interval: T, width: T) -> Result<Vec<CrossSection<T>>, SectionError> {
        let now = std::time::Instant::now();
        let sections = self.sections(interval, width)?.collect::<Result<Vec<_>, _>>()?;
        debug!(
            "sections; vertices: {}, len: {}, exec: {:?}",
            self.vertices().len(),
            sections.len(),
            now.elapsed()
        );
        Ok(sections)
    }

    /// Returns the cross-section anchored at `chainage`.
    pub fn section_at(&self, chainage: T, width: T) -> Result<CrossSection<T>, SectionError> {
        let (anchor, i) = self
            .interpolate(chainage)
            .ok_or(SectionError::InvalidInput("chainage outside centerline"))?;
        let vertices = self.vertices();
        // The segment's own direction. An anchor within rounding noise
        // of `vertices[i + 1]` says nothing about the tangent.
        let tangent = bearing(vertices[i], vertices[i + 1])?;
        let (left, right) = perpendicular(anchor, tangent, width);
        Ok(CrossSection {
            section_id: format!("Chainage {chainage:?}"),
            chainage,
            left,
            anchor,
            right,
        })
    }
}

/// Iterator over a centerline's cross-sections.
///
/// A clone is an independent cursor at the same position; call
/// [`Centerline::sections`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct SectionIter<'a, T: CoordFloat = f64> {
    centerline: &'a Centerline<T>,
    interval: T,
    width: T,
    current: usize,
    steps: usize,
}

impl<'a, T> Iterator for SectionIter<'a, T>
where
    T: CoordFloat + FloatConst,
{
    type Item = Result<CrossSection<T>, SectionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current < self.steps {
            let chainage = (self.interval * T::from(self.current)?)
                .min(self.centerline.total_length());
            self.current += 1;
            Some(self.centerline.section_at(chainage, self.width))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps - self.current;
        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for SectionIter<'a, T> where T: CoordFloat + FloatConst {}

#[cfg(test)]
mod tests {
    use super::{generate, CrossSection};
    use crate::{math::distance, Centerline, SectionError};
    use approx::assert_abs_diff_eq;
    use geo::{coord, Coord};

    const EPS: f64 = 1e-9;

    fn straight_north() -> Vec<Coord> {
        vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 100.0 }]
    }

    fn meander() -> Vec<Coord> {
        vec![
            coord! { x: 1000.0, y: 5000.0 },
            coord! { x: 1030.0, y: 5040.0 },
            coord! { x: 1090.0, y: 5045.0 },
            coord! { x: 1120.0, y: 5010.0 },
            coord! { x: 1150.0, y: 4990.5 },
            coord! { x: 1210.7, y: 5022.0 },
        ]
    }

    #[test]
    fn test_straight_north() {
        let sections = generate(&straight_north(), 25.0, 10.0).unwrap();
        let chainages: Vec<f64> = sections.iter().map(|s| s.chainage).collect();
        assert_eq!(chainages, [0.0, 25.0, 50.0, 75.0, 100.0]);
        for section in &sections {
            let ch = section.chainage;
            assert_eq!(section.anchor, coord! { x: 0.0, y: ch });
            assert_abs_diff_eq!(section.left.x, -10.0, epsilon = EPS);
            assert_abs_diff_eq!(section.left.y, ch, epsilon = EPS);
            assert_abs_diff_eq!(section.right.x, 10.0, epsilon = EPS);
            assert_abs_diff_eq!(section.right.y, ch, epsilon = EPS);
        }
        assert_eq!(sections[1].section_id, "Chainage 25.0");
        assert_eq!(sections[4].section_id, "Chainage 100.0");
    }

    #[test]
    fn test_section_count() {
        let line = Centerline::new(meander()).unwrap();
        let total = line.total_length();
        for interval in [7.0, 13.3, 25.0, 60.0, total, total * 2.0] {
            let sections = line.generate(interval, 15.0).unwrap();
            assert_eq!(sections.len(), (total / interval).floor() as usize + 1);
            for (k, section) in sections.iter().enumerate() {
                assert_eq!(section.chainage, interval * k as f64);
                assert!(section.chainage <= total);
            }
        }
    }

    #[test]
    fn test_anchor_on_centerline() {
        let vertices = meander();
        let line = Centerline::new(vertices.clone()).unwrap();
        let table = line.chainages().as_slice();
        for section in line.generate(10.0, 15.0).unwrap() {
            let i = line
                .chainages()
                .locate(section.chainage, line.tolerance())
                .unwrap();
            let (v0, v1) = (vertices[i], vertices[i + 1]);
            // The anchor is on the segment, at the right distance from
            // its first vertex.
            let along = distance(v0, section.anchor) + distance(section.anchor, v1);
            assert_abs_diff_eq!(along, distance(v0, v1), epsilon = EPS);
            assert_abs_diff_eq!(
                distance(v0, section.anchor),
                section.chainage - table[i],
                epsilon = EPS
            );
        }
    }

    #[test]
    fn test_ends_bisected_by_anchor() {
        let width = 12.5;
        for section in generate(&meander(), 9.0, width).unwrap() {
            let CrossSection {
                left,
                anchor,
                right,
                ..
            } = section;
            assert_abs_diff_eq!(distance(left, anchor), width, epsilon = EPS);
            assert_abs_diff_eq!(distance(anchor, right), width, epsilon = EPS);
            assert_abs_diff_eq!(distance(left, right), 2.0 * width, epsilon = EPS);
        }
    }

    #[test]
    fn test_sections_are_perpendicular() {
        let vertices = meander();
        let line = Centerline::new(vertices.clone()).unwrap();
        for section in line.generate(11.0, 5.0).unwrap() {
            let i = line
                .chainages()
                .locate(section.chainage, line.tolerance())
                .unwrap();
            let tangent = vertices[i + 1] - vertices[i];
            let across = section.right - section.left;
            assert_abs_diff_eq!(
                tangent.x * across.x + tangent.y * across.y,
                0.0,
                epsilon = 1e-6
            );
        }
    }

    /// Cosine of the angle between a section and the segment it crosses.
    fn skew(vertices: &[Coord], line: &Centerline, section: &CrossSection) -> f64 {
        let i = line
            .chainages()
            .locate(section.chainage, line.tolerance())
            .unwrap();
        let tangent = vertices[i + 1] - vertices[i];
        let across = section.right - section.left;
        (tangent.x * across.x + tangent.y * across.y).abs()
            / (distance(vertices[i], vertices[i + 1]) * distance(section.left, section.right))
    }

    #[test]
    fn test_sections_near_vertices_stay_perpendicular() {
        // Steps of `total / div` often land a few ulps short of the end,
        // leaving the anchor a rounding error away from the last vertex.
        for a in [100.0, 250.0, 360.0, 500.0] {
            let vertices = vec![
                coord! { x: 0.0, y: 0.0 },
                coord! { x: 0.7 * a, y: 0.3 * a + 0.1 },
                coord! { x: 0.7 * a + 5.0, y: 0.3 * a + 40.0 },
            ];
            let line = Centerline::new(vertices.clone()).unwrap();
            for div in 1..=40u32 {
                let interval = line.total_length() / f64::from(div);
                let sections = line.generate(interval, 20.0).unwrap();
                assert_eq!(sections.len(), div as usize + 1);
                for section in &sections {
                    assert!(
                        skew(&vertices, &line, section) < 1e-9,
                        "a: {a}, div: {div}, {}",
                        section.section_id
                    );
                }
            }
        }
    }

    #[test]
    fn test_chainage_just_short_of_vertex() {
        let vertices = meander();
        let line = Centerline::new(vertices.clone()).unwrap();
        let table = line.chainages().as_slice();
        for i in 1..table.len() {
            let chainage = table[i] * (1.0 - f64::EPSILON);
            assert!(table[i] - chainage < line.tolerance());
            let section = line.section_at(chainage, 10.0).unwrap();
            assert_eq!(section.section_id, format!("Chainage {chainage:?}"));
            assert_eq!(section.chainage, chainage);
            assert!(skew(&vertices, &line, &section) < 1e-9);
        }
        let end = line.section_at(line.total_length(), 10.0).unwrap();
        assert_abs_diff_eq!(end.anchor.x, 1210.7, epsilon = EPS);
        assert_abs_diff_eq!(end.anchor.y, 5022.0, epsilon = EPS);
        assert!(skew(&vertices, &line, &end) < 1e-9);
    }

    #[test]
    fn test_vertex_chainage_uses_next_segment() {
        // Bend at chainage 10; the section there follows the eastward leg.
        let vertices = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 0.0, y: 10.0 },
            coord! { x: 10.0, y: 10.0 },
        ];
        let sections = generate(&vertices, 10.0, 2.0).unwrap();
        assert_eq!(sections.len(), 3);
        let bend = &sections[1];
        assert_eq!(bend.anchor, coord! { x: 0.0, y: 10.0 });
        assert_abs_diff_eq!(bend.left.x, 0.0, epsilon = EPS);
        assert_abs_diff_eq!(bend.left.y, 12.0, epsilon = EPS);
        assert_abs_diff_eq!(bend.right.y, 8.0, epsilon = EPS);
    }

    #[test]
    fn test_project_to_section() {
        let sections = generate(&straight_north(), 25.0, 10.0).unwrap();
        let section = &sections[2];
        // 4 m east of the anchor lies along the section toward the right end.
        let p = section.project(coord! { x: 4.0, y: 50.0 }).unwrap();
        assert_abs_diff_eq!(p.chainage, 4.0, epsilon = EPS);
        assert_abs_diff_eq!(p.offset, 0.0, epsilon = EPS);
        let p = section.project(coord! { x: -3.0, y: 52.0 }).unwrap();
        assert_abs_diff_eq!(p.chainage, -3.0, epsilon = EPS);
        assert_abs_diff_eq!(p.offset, -2.0, epsilon = EPS);
        let p = section.project(section.anchor).unwrap();
        assert_eq!((p.chainage, p.offset), (0.0, 0.0));
    }

    #[test]
    fn test_lazy_iter() {
        let line = Centerline::new(straight_north()).unwrap();
        let mut iter = line.sections(30.0, 5.0).unwrap();
        assert_eq!(iter.len(), 4);
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.chainage, 0.0);
        assert_eq!(iter.len(), 3);
        let rest: Vec<_> = iter.clone().map(Result::unwrap).collect();
        assert_eq!(rest.len(), 3);
        assert_eq!(iter.count(), 3);
        assert_eq!(first.line_string().0.len(), 3);
    }

    #[test]
    fn test_invalid_parameters() {
        let line = Centerline::new(straight_north()).unwrap();
        for (interval, width) in [(0.0, 1.0), (-5.0, 1.0), (f64::NAN, 1.0), (5.0, 0.0), (5.0, -1.0)] {
            assert!(matches!(
                line.sections(interval, width),
                Err(SectionError::InvalidInput(_))
            ));
        }
        assert!(matches!(
            generate(&[coord! { x: 0.0, y: 0.0 }], 1.0, 1.0),
            Err(SectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_duplicate_vertex_is_degenerate() {
        let vertices = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 5.0, y: 5.0 },
            coord! { x: 5.0, y: 5.0 },
            coord! { x: 9.0, y: 1.0 },
        ];
        assert!(matches!(
            generate(&vertices, 1.0, 1.0),
            Err(SectionError::DegenerateSegment { index: 1 })
        ));
    }

    #[test]
    fn test_f32_sections() {
        let vertices: Vec<Coord<f32>> =
            vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 40.0, y: 0.0 }];
        let sections = generate(&vertices, 20.0, 3.0).unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[2].section_id, "Chainage 40.0");
        assert_abs_diff_eq!(sections[2].left.y, 3.0, epsilon = 1e-5);
    }
}
