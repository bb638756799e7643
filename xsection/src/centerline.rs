use crate::{math::distance, SectionError};
use geo::{Coord, CoordFloat, LineString};

/// Cumulative along-line distance of every centerline vertex.
///
/// `table[0]` is always zero and the table is strictly ascending for a
/// valid [Centerline].
#[derive(Debug, Clone, PartialEq)]
pub struct ChainageTable<T = f64>(Vec<T>);

impl<T: CoordFloat> ChainageTable<T> {
    pub fn new(vertices: &[Coord<T>]) -> Self {
        let mut chainage = T::zero();
        let mut table = Vec::with_capacity(vertices.len());
        if let Some(first) = vertices.first() {
            table.push(chainage);
            let mut prev = *first;
            for &vertex in &vertices[1..] {
                chainage = chainage + distance(prev, vertex);
                table.push(chainage);
                prev = vertex;
            }
        }
        Self(table)
    }

    /// Returns the chainage of the last vertex.
    pub fn total_length(&self) -> T {
        self.0.last().copied().unwrap_or_else(T::zero)
    }

    /// Returns the index `i` of the segment `[table[i], table[i+1])`
    /// containing `chainage`.
    ///
    /// A chainage landing on an interior vertex belongs to the segment
    /// starting there. The final segment is closed and admits chainages
    /// up to `tolerance` past the end.
    pub fn locate(&self, chainage: T, tolerance: T) -> Option<usize> {
        if self.0.len() < 2
            || chainage.is_nan()
            || chainage < T::zero()
            || chainage > self.total_length() + tolerance
        {
            return None;
        }
        let upper = self.0.partition_point(|ch| *ch <= chainage);
        Some(upper.saturating_sub(1).min(self.0.len() - 2))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// A validated river centerline in projected coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline<T: CoordFloat = f64> {
    vertices: Vec<Coord<T>>,
    chainages: ChainageTable<T>,
}

impl<T: CoordFloat> Centerline<T> {
    /// Returns a centerline through `vertices`.
    ///
    /// Fails unless there are at least two finite vertices with no two
    /// consecutive vertices coinciding.
    pub fn new(vertices: Vec<Coord<T>>) -> Result<Self, SectionError> {
        if vertices.len() < 2 {
            return Err(SectionError::InvalidInput(
                "centerline needs at least two vertices",
            ));
        }
        if vertices.iter().any(|v| !(v.x.is_finite() && v.y.is_finite())) {
            return Err(SectionError::InvalidInput(
                "centerline vertices must be finite",
            ));
        }
        if let Some(index) = vertices.windows(2).position(|pair| pair[0] == pair[1]) {
            return Err(SectionError::DegenerateSegment { index });
        }

        let chainages = ChainageTable::new(&vertices);
        if let Some(index) = chainages
            .as_slice()
            .windows(2)
            .position(|pair| pair[1] <= pair[0])
        {
            // Vertices too close to register any length in `T`.
            return Err(SectionError::DegenerateSegment { index });
        }
        if chainages.total_length() <= T::zero() {
            return Err(SectionError::InvalidInput(
                "centerline has no length",
            ));
        }

        Ok(Self {
            vertices,
            chainages,
        })
    }

    pub fn vertices(&self) -> &[Coord<T>] {
        &self.vertices
    }

    pub fn chainages(&self) -> &ChainageTable<T> {
        &self.chainages
    }

    pub fn total_length(&self) -> T {
        self.chainages.total_length()
    }

    /// Slack allowed when deciding whether a chainage reaches the end
    /// of the line.
    pub fn tolerance(&self) -> T {
        let rel = T::from(1e-9).unwrap_or_else(T::epsilon);
        rel * self.total_length().max(T::one())
    }

    /// Returns the point at `chainage` and the index of the segment
    /// it was interpolated on.
    pub fn interpolate(&self, chainage: T) -> Option<(Coord<T>, usize)> {
        let i = self.chainages.locate(chainage, self.tolerance())?;
        let table = self.chainages.as_slice();
        let (v0, v1) = (self.vertices[i], self.vertices[i + 1]);
        let fraction = (chainage - table[i]) / (table[i + 1] - table[i]);
        let point = Coord {
            x: v0.x + (v1.x - v0.x) * fraction,
            y: v0.y + (v1.y - v0.y) * fraction,
        };
        Some((point, i))
    }
}

impl<T: CoordFloat> TryFrom<LineString<T>> for Centerline<T> {
    type Error = SectionError;

    fn try_from(line: LineString<T>) -> Result<Self, SectionError> {
        Self::new(line.0)
    }
}
