//! Elevation rasters: ESRI float grids (`.flt` + `.hdr`) and
//! single-band GeoTIFFs.
//!
//! A float grid is a pair of files sharing a stem: a plain-text `.hdr`
//! header describing the layout and georeferencing, and a `.flt`
//! file of raw `f32` samples stored row-major with the northernmost
//! row first.

mod error;
mod geotiff;
mod header;

pub use crate::{
    error::DemError,
    header::{Endian, Header},
};
use byteorder::{BigEndian as BE, ByteOrder, LittleEndian as LE, ReadBytesExt};
use geo::geometry::Coord;
use log::debug;
use memmap2::Mmap;
use std::{
    fs::File,
    io::BufReader,
    mem::size_of,
    path::{Path, PathBuf},
};

/// Base floating point type used for all map coordinates.
pub type C = f64;

pub struct Grid {
    /// Outer northwest corner of the grid.
    nw_corner: Coord<C>,

    /// Cell width and height in map units.
    cell_size: C,

    /// Number of (columns, rows) in this grid.
    dimensions: (usize, usize),

    /// Sentinel for missing samples.
    nodata: Option<f32>,

    /// Elevation samples.
    samples: SampleStore,
}

enum SampleStore {
    InMem(Box<[f32]>),
    MemMap(Mmap, Endian),
}

impl SampleStore {
    fn get_unchecked(&self, index: usize) -> f32 {
        match self {
            Self::InMem(samples) => samples[index],
            Self::MemMap(raw, endian) => {
                let start = index * size_of::<f32>();
                let end = start + size_of::<f32>();
                let bytes = &raw.as_ref()[start..end];
                match endian {
                    Endian::Little => LE::read_f32(bytes),
                    Endian::Big => BE::read_f32(bytes),
                }
            }
        }
    }
}

/// How to load grid samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridMode {
    /// Parse samples and load into memory.
    #[default]
    InMem,

    /// Memory map file contents.
    MemMap,
}

impl Grid {
    /// Returns a Grid loaded with `mode` from the `.flt` file at `path`.
    pub fn open<P: AsRef<Path>>(path: P, mode: GridMode) -> Result<Self, DemError> {
        match mode {
            GridMode::InMem => Self::load(path),
            GridMode::MemMap => Self::memmap(path),
        }
    }

    /// Returns a Grid read into memory from the `.flt` or GeoTIFF
    /// file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        if geotiff::is_geotiff(path.as_ref()) {
            return Self::load_geotiff(path);
        }
        let (header, len) = read_header(&path)?;

        let mut file = BufReader::new(File::open(&path)?);
        let samples = {
            let mut sample_store = Vec::with_capacity(len);
            for _ in 0..len {
                let sample = match header.byte_order {
                    Endian::Little => file.read_f32::<LE>()?,
                    Endian::Big => file.read_f32::<BE>()?,
                };
                sample_store.push(sample);
            }
            SampleStore::InMem(sample_store.into_boxed_slice())
        };

        debug!(
            "loaded grid {:?}; dimensions: {}x{}",
            path.as_ref(),
            header.ncols,
            header.nrows
        );

        Ok(Self::from_parts(&header, samples))
    }

    /// Returns a Grid using the memory-mapped `.flt` file as storage.
    ///
    /// GeoTIFFs are read into memory instead.
    pub fn memmap<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        if geotiff::is_geotiff(path.as_ref()) {
            debug!("{:?} is a GeoTIFF, reading into memory", path.as_ref());
            return Self::load_geotiff(path);
        }
        let (header, _) = read_header(&path)?;
        let samples = {
            let file = File::open(&path)?;
            let mmap = unsafe { Mmap::map(&file)? };
            SampleStore::MemMap(mmap, header.byte_order)
        };
        Ok(Self::from_parts(&header, samples))
    }

    /// Returns a Grid built from in-memory samples.
    ///
    /// `samples` are row-major, northernmost row first, and must
    /// contain exactly `ncols * nrows` values.
    pub fn from_samples(header: &Header, samples: Vec<f32>) -> Result<Self, DemError> {
        if header.sample_count() == Some(samples.len()) {
            Ok(Self::from_parts(
                header,
                SampleStore::InMem(samples.into_boxed_slice()),
            ))
        } else {
            Err(DemError::SampleCount {
                ncols: header.ncols,
                nrows: header.nrows,
                found: samples.len(),
            })
        }
    }

    /// Returns the number of samples in this grid.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        let (x, y) = self.dimensions;
        x * y
    }

    /// Returns (columns, rows).
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns this grid's cell size in map units.
    pub fn cell_size(&self) -> C {
        self.cell_size
    }

    /// Returns the (column, row) containing `coord`, if any.
    ///
    /// Row 0 is the northernmost row.
    pub fn coord_to_index(&self, coord: Coord<C>) -> Option<(usize, usize)> {
        if !(coord.x.is_finite() && coord.y.is_finite()) {
            return None;
        }
        let (col, row) = self.coord_to_xy(coord);
        #[allow(clippy::cast_possible_wrap)]
        if 0 <= col
            && col < self.dimensions.0 as isize
            && 0 <= row
            && row < self.dimensions.1 as isize
        {
            #[allow(clippy::cast_sign_loss)]
            Some((col as usize, row as usize))
        } else {
            None
        }
    }

    /// Returns the sample at the given map coordinates.
    ///
    /// Returns `None` outside the grid and for nodata samples.
    pub fn get(&self, coord: Coord<C>) -> Option<f32> {
        let xy = self.coord_to_index(coord)?;
        self.valid(self.samples.get_unchecked(self.xy_to_linear_index(xy)))
    }

    /// Returns an iterator over `self`'s cells.
    pub fn iter(&self) -> impl Iterator<Item = Sample<'_>> + '_ {
        (0..self.len()).map(|index| Sample { grid: self, index })
    }

    /// Returns an iterator over every sample which isn't nodata.
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.iter().filter_map(|sample| sample.elevation())
    }
}

/// Private API
impl Grid {
    fn load_geotiff<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let (header, samples) = geotiff::read(path.as_ref())?;
        debug!(
            "loaded GeoTIFF {:?}; dimensions: {}x{}",
            path.as_ref(),
            header.ncols,
            header.nrows
        );
        Self::from_samples(&header, samples)
    }

    fn from_parts(header: &Header, samples: SampleStore) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let nw_corner = Coord {
            x: header.ll_corner.x,
            y: header.ll_corner.y + header.nrows as C * header.cell_size,
        };
        Self {
            nw_corner,
            cell_size: header.cell_size,
            dimensions: (header.ncols, header.nrows),
            nodata: header.nodata,
            samples,
        }
    }

    fn valid(&self, sample: f32) -> Option<f32> {
        if sample.is_nan() || Some(sample) == self.nodata {
            None
        } else {
            Some(sample)
        }
    }

    fn coord_to_xy(&self, coord: Coord<C>) -> (isize, isize) {
        #[allow(clippy::cast_possible_truncation)]
        let x = ((coord.x - self.nw_corner.x) / self.cell_size).floor() as isize;
        #[allow(clippy::cast_possible_truncation)]
        let y = ((self.nw_corner.y - coord.y) / self.cell_size).floor() as isize;
        (x, y)
    }

    fn linear_index_to_xy(&self, idx: usize) -> (usize, usize) {
        (idx % self.dimensions.0, idx / self.dimensions.0)
    }

    fn xy_to_linear_index(&self, (x, y): (usize, usize)) -> usize {
        self.dimensions.0 * y + x
    }

    fn xy_to_center(&self, (x, y): (usize, usize)) -> Coord<C> {
        #[allow(clippy::cast_precision_loss)]
        Coord {
            x: self.nw_corner.x + (x as C + 0.5) * self.cell_size,
            y: self.nw_corner.y - (y as C + 0.5) * self.cell_size,
        }
    }
}

/// A grid cell.
pub struct Sample<'a> {
    /// The parent [Grid] this cell belongs to.
    grid: &'a Grid,
    /// Index into parent's elevation data corresponding to this cell.
    index: usize,
}

impl<'a> Sample<'a> {
    /// Returns this cell's elevation, or `None` for nodata.
    pub fn elevation(&self) -> Option<f32> {
        self.grid
            .valid(self.grid.samples.get_unchecked(self.index))
    }

    /// Returns the map coordinates of this cell's center.
    pub fn center(&self) -> Coord<C> {
        self.grid
            .xy_to_center(self.grid.linear_index_to_xy(self.index))
    }
}

/// Returns every `.flt` and GeoTIFF grid in `dir`, sorted by file
/// name.
pub fn grid_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, DemError> {
    let mut grids = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let path = entry?.path();
        let is_flt = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("flt"));
        if is_flt || geotiff::is_geotiff(&path) {
            grids.push(path);
        }
    }
    if grids.is_empty() {
        return Err(DemError::NoGrids(dir.as_ref().to_owned()));
    }
    grids.sort();
    Ok(grids)
}

/// Reads the `.hdr` sidecar of `path` and checks the sample file
/// length against it.
///
/// Returns the header and its sample count.
fn read_header<P: AsRef<Path>>(path: P) -> Result<(Header, usize), DemError> {
    let path = path.as_ref();
    let hdr_path = path.with_extension("hdr");
    let header = Header::read(&hdr_path)?;
    let count = header
        .sample_count()
        .filter(|n| n.checked_mul(size_of::<f32>()).is_some())
        .ok_or(DemError::Header("ncols", hdr_path))?;
    let expected = (count * size_of::<f32>()) as u64;
    match path.metadata().map(|m| m.len())? {
        len if len == expected => Ok((header, count)),
        invalid_len => Err(DemError::FltLen(invalid_len, path.to_owned())),
    }
}
