//! Single-band GeoTIFF rasters.
//!
//! Georeferencing comes from the `ModelTiepointTag` and
//! `ModelPixelScaleTag` tags, nodata from GDAL's `GDAL_NODATA` tag.
//! Rotated rasters (`ModelTransformationTag` only) are not supported.

use crate::{DemError, Endian, Header, C};
use geo::geometry::Coord;
use std::{fs::File, io::BufReader, path::Path};
use tiff::{
    decoder::{Decoder, DecodingResult},
    tags::Tag,
};

/// Returns true if `path` has a `.tif` or `.tiff` extension.
pub(crate) fn is_geotiff(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff")
        })
}

/// Reads the GeoTIFF at `path` into a header and row-major samples,
/// northernmost row first.
pub(crate) fn read(path: &Path) -> Result<(Header, Vec<f32>), DemError> {
    let mk_err = |reason| DemError::GeoTiff(path.to_owned(), reason);
    let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?;

    let (width, height) = decoder.dimensions()?;
    let ncols = usize::try_from(width).map_err(|_| mk_err("too wide"))?;
    let nrows = usize::try_from(height).map_err(|_| mk_err("too tall"))?;

    let scale = decoder
        .find_tag(Tag::ModelPixelScaleTag)?
        .ok_or_else(|| mk_err("no ModelPixelScaleTag"))?
        .into_f64_vec()?;
    let tiepoint = decoder
        .find_tag(Tag::ModelTiepointTag)?
        .ok_or_else(|| mk_err("no ModelTiepointTag"))?
        .into_f64_vec()?;
    let nodata = match decoder.find_tag(Tag::GdalNodata)? {
        Some(value) => Some(
            value
                .into_string()?
                .trim_matches(char::from(0))
                .trim()
                .parse::<f32>()
                .map_err(|_| mk_err("bad GDAL_NODATA"))?,
        ),
        None => None,
    };

    let (sx, sy) = match scale[..] {
        [sx, sy, ..] if sx > 0.0 && sy > 0.0 => (sx, sy),
        _ => return Err(mk_err("bad ModelPixelScaleTag")),
    };
    if (sx - sy).abs() > sx * 1e-9 {
        return Err(mk_err("non-square pixels"));
    }
    // Raster (i, j) maps to model (x, y).
    let (i, j, x, y) = match tiepoint[..] {
        [i, j, _, x, y, ..] => (i, j, x, y),
        _ => return Err(mk_err("bad ModelTiepointTag")),
    };
    #[allow(clippy::cast_precision_loss)]
    let ll_corner = Coord {
        x: x - i * sx,
        y: y + j * sy - nrows as C * sy,
    };

    let samples = to_f32(decoder.read_image()?).ok_or_else(|| mk_err("sample format"))?;
    if Some(samples.len()) != ncols.checked_mul(nrows) {
        return Err(mk_err("more than one band"));
    }

    let header = Header {
        ncols,
        nrows,
        ll_corner,
        cell_size: sx,
        nodata,
        byte_order: Endian::Little,
    };
    Ok((header, samples))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn to_f32(image: DecodingResult) -> Option<Vec<f32>> {
    let samples = match image {
        DecodingResult::F32(samples) => samples,
        DecodingResult::F64(samples) => samples.into_iter().map(|s| s as f32).collect(),
        DecodingResult::I16(samples) => samples.into_iter().map(f32::from).collect(),
        DecodingResult::U16(samples) => samples.into_iter().map(f32::from).collect(),
        DecodingResult::I32(samples) => samples.into_iter().map(|s| s as f32).collect(),
        DecodingResult::U32(samples) => samples.into_iter().map(|s| s as f32).collect(),
        DecodingResult::U8(samples) => samples.into_iter().map(f32::from).collect(),
        _ => return None,
    };
    Some(samples)
}
