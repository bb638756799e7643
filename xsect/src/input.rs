//! Centerline files.

use crate::options::Layout;
use anyhow::{anyhow, bail, Context, Result};
use geo::Coord;
use geojson::{GeoJson, Value};
use log::info;
use serde::Deserialize;
use std::path::Path;
use xsection::{Centerline, CrossSection};

impl Layout {
    /// Reads the centerline and cuts its cross-sections, `default_width`
    /// to each side unless a width was given.
    pub fn sections(&self, default_width: f64) -> Result<Vec<CrossSection>> {
        let centerline = read_centerline(&self.centerline)?;
        let width = self.width.unwrap_or(default_width);
        let sections = centerline.generate(self.interval, width)?;
        info!(
            "{} cross-sections along {:.1} m of centerline",
            sections.len(),
            centerline.total_length()
        );
        Ok(sections)
    }
}

/// Reads a centerline from GeoJSON, or from CSV when `path` ends in
/// `.csv`.
pub fn read_centerline(path: &Path) -> Result<Centerline> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    let vertices = if is_csv {
        read_csv(path)
    } else {
        read_geojson(path)
    }
    .with_context(|| format!("reading centerline {}", path.display()))?;
    Ok(Centerline::new(vertices)?)
}

fn read_csv(path: &Path) -> Result<Vec<Coord>> {
    #[derive(Deserialize)]
    struct Vertex {
        #[serde(alias = "X", alias = "easting", alias = "E")]
        x: f64,
        #[serde(alias = "Y", alias = "northing", alias = "N")]
        y: f64,
    }

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let vertices = rdr
        .deserialize()
        .map(|vertex| vertex.map(|Vertex { x, y }| Coord { x, y }))
        .collect::<Result<Vec<Coord>, csv::Error>>()?;
    Ok(vertices)
}

/// Returns the first line of the first feature with a `LineString`
/// or `MultiLineString` geometry.
fn read_geojson(path: &Path) -> Result<Vec<Coord>> {
    let geojson: GeoJson = std::fs::read_to_string(path)?.parse()?;
    let mut geometries = match geojson {
        GeoJson::Geometry(geometry) => vec![geometry],
        GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|feature| feature.geometry)
            .collect(),
    }
    .into_iter();

    let positions = geometries
        .find_map(|geometry| match geometry.value {
            Value::LineString(line) => Some(line),
            Value::MultiLineString(lines) => lines.into_iter().next(),
            _ => None,
        })
        .ok_or_else(|| anyhow!("no LineString geometry"))?;

    positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => bail!("position with fewer than two coordinates"),
        })
        .collect()
}
