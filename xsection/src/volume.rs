//! Deposition and erosion summaries of elevation difference grids.

use crate::SectionError;
use dem::Grid;

/// Differences at or beyond this magnitude (m) are treated as
/// artefacts and left out of the summary.
pub const DEFAULT_THRESHOLD: f64 = 5.0;

/// Summary of a difference grid (later survey minus earlier survey).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSummary {
    /// Area of the cells considered (m²).
    pub total_area: f64,

    /// Net volume change (m³); positive is deposition.
    pub total_volume: f64,

    pub average_depth: f64,

    /// Population standard deviation of depth.
    pub sd_depth: f64,

    /// Lowest difference, i.e. the deepest erosion.
    pub max_erosion: f64,

    /// Highest difference, i.e. the thickest deposit.
    pub max_deposit: f64,

    /// Net volume per unit area.
    pub per_unit_deposit: f64,
}

impl VolumeSummary {
    /// Summarizes every valid sample of `grid` whose magnitude is below
    /// `threshold`.
    pub fn from_grid(grid: &Grid, threshold: f64) -> Result<Self, SectionError> {
        Self::from_samples(grid.samples().map(f64::from), grid.cell_size(), threshold)
    }

    /// Summarizes `depths` taken on square cells of side `cell_size`.
    pub fn from_samples<I>(depths: I, cell_size: f64, threshold: f64) -> Result<Self, SectionError>
    where
        I: IntoIterator<Item = f64>,
    {
        let masked: Vec<f64> = depths
            .into_iter()
            .filter(|d| d.abs() < threshold)
            .collect();
        if masked.is_empty() {
            return Err(SectionError::InvalidInput("no samples below threshold"));
        }

        let cell_area = cell_size * cell_size;
        #[allow(clippy::cast_precision_loss)]
        let n = masked.len() as f64;
        let sum: f64 = masked.iter().sum();
        let mean = sum / n;
        let variance = masked.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
        let (min, max) = masked
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(*d), hi.max(*d))
            });

        let total_area = n * cell_area;
        let total_volume = sum * cell_area;
        Ok(Self {
            total_area,
            total_volume,
            average_depth: mean,
            sd_depth: variance.sqrt(),
            max_erosion: min,
            max_deposit: max,
            per_unit_deposit: total_volume / total_area,
        })
    }
}
