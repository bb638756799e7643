use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("no header file for grid {0}")]
    MissingHeader(PathBuf),

    #[error("invalid or missing header field '{0}' in {1}")]
    Header(&'static str, PathBuf),

    #[error("invalid FLT file len {0} for {1}")]
    FltLen(u64, PathBuf),

    #[error("{found} in-memory samples do not fill a {ncols}x{nrows} grid")]
    SampleCount {
        ncols: usize,
        nrows: usize,
        found: usize,
    },

    #[error("unsupported GeoTIFF {0}: {1}")]
    GeoTiff(PathBuf, &'static str),

    #[error("{0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("no flt or GeoTIFF grids in {0}")]
    NoGrids(PathBuf),
}
