//! Point-cloud slices (CloudCompare section exports) projected onto
//! cross-sections.

use crate::{CrossSection, SectionError};
use geo::Coord;
use log::{info, warn};
use serde::Deserialize;
use std::{
    io::Read,
    path::{Path, PathBuf},
};

/// File name prefix CloudCompare gives exported section slices.
pub const SECTION_CLOUD_PREFIX: &str = "Section cloud";

/// A surveyed point.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CloudPoint {
    #[serde(rename = "//X", alias = "X", alias = "x")]
    pub x: f64,
    #[serde(rename = "Y", alias = "y")]
    pub y: f64,
    #[serde(rename = "Z", alias = "z")]
    pub z: f64,
}

/// Reads `//X,Y,Z` points from CSV. Other columns are ignored.
pub fn read_cloud<R: Read>(rdr: R) -> Result<Vec<CloudPoint>, SectionError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let points = rdr.deserialize().collect::<Result<Vec<CloudPoint>, _>>()?;
    Ok(points)
}

/// A station on a cloud profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    /// Distance along the section from its anchor toward the right end.
    pub distance: f64,
    pub elevation: f64,
}

/// One survey's points projected onto one cross-section.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudProfile {
    pub section_id: String,

    /// Survey the points came from, e.g. the year.
    pub label: String,

    /// Unique rounded stations, ordered by distance then elevation.
    pub stations: Vec<Station>,
}

impl CloudProfile {
    /// Projects `points` onto `section`.
    ///
    /// Distances and elevations are rounded to 0.1 and duplicate
    /// stations collapsed.
    pub fn from_points(
        section: &CrossSection<f64>,
        label: impl Into<String>,
        points: &[CloudPoint],
    ) -> Result<Self, SectionError> {
        let mut stations = points
            .iter()
            .map(|p| {
                let projected = section.project(Coord { x: p.x, y: p.y })?;
                Ok(Station {
                    distance: round_tenth(projected.chainage),
                    elevation: round_tenth(p.z),
                })
            })
            .collect::<Result<Vec<Station>, SectionError>>()?;
        stations.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.elevation.total_cmp(&b.elevation))
        });
        stations.dedup();
        Ok(Self {
            section_id: section.section_id.clone(),
            label: label.into(),
            stations,
        })
    }

    /// Reads the cloud at `path` and projects it onto `section`.
    ///
    /// The label is the name of the directory holding `path`.
    pub fn from_file<P: AsRef<Path>>(
        section: &CrossSection<f64>,
        path: P,
    ) -> Result<Self, SectionError> {
        let path = path.as_ref();
        let points = read_cloud(std::fs::File::open(path)?)?;
        Self::from_points(section, survey_label(path), &points)
    }
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Returns the name of the directory holding `path`.
pub fn survey_label(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Returns the 1-based sequence number of a `Section cloud#<n>` file.
fn section_sequence(path: &Path) -> Option<usize> {
    let stem = path.file_stem()?.to_str()?;
    if !stem.starts_with(SECTION_CLOUD_PREFIX) {
        return None;
    }
    stem.rsplit_once('#')?.1.trim().parse().ok()
}

/// Renames every `Section cloud#<n>.<ext>` file under `dir` to
/// `<section_id>.csv`, using the n-th (1-based) section.
///
/// Returns the `(old, new)` paths.
pub fn match_section_files<P: AsRef<Path>>(
    dir: P,
    sections: &[CrossSection<f64>],
) -> Result<Vec<(PathBuf, PathBuf)>, SectionError> {
    let mut renamed = Vec::new();
    for path in files(dir.as_ref())? {
        let is_export = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| name.starts_with(SECTION_CLOUD_PREFIX));
        if !is_export {
            continue;
        }
        let section = section_sequence(&path)
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| sections.get(i))
            .ok_or_else(|| SectionError::UnmatchedFile(path.clone()))?;
        let new_path = path.with_file_name(format!("{}.csv", section.section_id));
        std::fs::rename(&path, &new_path)?;
        info!("{} renamed as {}", path.display(), new_path.display());
        renamed.push((path, new_path));
    }
    info!("{} files renamed", renamed.len());
    Ok(renamed)
}

/// Returns every file under `dir` whose stem is `section_id`.
pub fn section_files<P: AsRef<Path>>(dir: P, section_id: &str) -> Result<Vec<PathBuf>, SectionError> {
    Ok(files(dir.as_ref())?
        .into_iter()
        .filter(|path| path.file_stem().and_then(|s| s.to_str()) == Some(section_id))
        .collect())
}

/// Returns every file under `dir`, recursively, sorted.
fn files(dir: &Path) -> Result<Vec<PathBuf>, SectionError> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_owned()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() {
                found.push(entry.path());
            } else {
                warn!("skipping {}", entry.path().display());
            }
        }
    }
    found.sort();
    Ok(found)
}
