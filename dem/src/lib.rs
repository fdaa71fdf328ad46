//! Axis-aligned digital elevation grids.
//!
//! An [ElevationGrid] is a row-major array of elevation samples plus
//! the georeferencing needed to locate each sample: the coordinate of
//! post (0, 0) and a signed spacing per axis. Rotated or skewed
//! rasters are not representable.
//!
//! Grids can be built from in-memory samples or loaded from NASADEM /
//! SRTM `.hgt` tiles.
//!
//! # References
//!
//! 1. [HGT file layout](https://www.researchgate.net/profile/Pierre-Boulanger-4/publication/228924813/figure/fig8/AS:300852653903880@1448740270695/Description-of-a-HGT-file-structure-The-name-file-in-this-case-is-N20W100HGT.png)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

mod axis;
mod error;

pub use crate::{axis::Axis, error::DemError};
use byteorder::{BigEndian as BE, ByteOrder, ReadBytesExt};
use geo::geometry::Coord;
use memmap2::Mmap;
use std::{fs::File, io::BufReader, mem::size_of, path::Path};

/// Base floating point type used for all coordinates.
pub type C = f64;

const ARCSEC_PER_DEG: C = 3600.0;

/// Sample value HGT files use to mark voids.
pub const HGT_VOID: i16 = i16::MIN;

pub struct ElevationGrid {
    /// Latitude of each row.
    rows: Axis,

    /// Longitude of each column.
    cols: Axis,

    /// Samples equal to this value carry no elevation.
    nodata: Option<f32>,

    /// Elevation samples, row-major.
    samples: SampleStore,
}

enum SampleStore {
    InMem(Box<[f32]>),
    /// Raw big-endian `i16` HGT data.
    MemMap(Mmap),
}

impl SampleStore {
    fn len(&self) -> usize {
        match self {
            Self::InMem(samples) => samples.len(),
            Self::MemMap(raw) => raw.len() / size_of::<i16>(),
        }
    }

    fn get_unchecked(&self, index: usize) -> f32 {
        match self {
            Self::InMem(samples) => samples[index],
            Self::MemMap(raw) => {
                let start = index * size_of::<i16>();
                let end = start + size_of::<i16>();
                f32::from(BE::read_i16(&raw[start..end]))
            }
        }
    }
}

impl ElevationGrid {
    /// Returns a grid over `samples`.
    ///
    /// - `origin`: coordinate of post (0, 0) (`x` is longitude, `y` is
    ///   latitude)
    /// - `spacing`: signed degrees between adjacent columns (`x`) and
    ///   rows (`y`)
    /// - `dimensions`: number of (rows, columns)
    /// - `samples`: row-major elevations in meters
    pub fn new(
        origin: Coord<C>,
        spacing: Coord<C>,
        dimensions: (usize, usize),
        samples: Vec<f32>,
    ) -> Result<Self, DemError> {
        let (rows, cols) = dimensions;
        let rows = Axis::new("latitude", origin.y, spacing.y, rows)?;
        let cols = Axis::new("longitude", origin.x, spacing.x, cols)?;
        Self::with_store(rows, cols, SampleStore::InMem(samples.into_boxed_slice()))
    }

    /// Marks `value` as the no-data sentinel.
    #[must_use]
    pub fn with_nodata(mut self, value: f32) -> Self {
        self.nodata = Some(value);
        self
    }

    /// Returns a grid read into memory from the `.hgt` file at `path`.
    pub fn load_hgt<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let (rows, cols) = hgt_axes(&path)?;
        let mut file = BufReader::new(File::open(path)?);
        let samples = {
            let mut samples = Vec::with_capacity(rows.len() * cols.len());
            for _ in 0..(rows.len() * cols.len()) {
                samples.push(f32::from(file.read_i16::<BE>()?));
            }
            samples.into_boxed_slice()
        };
        let grid = Self::with_store(rows, cols, SampleStore::InMem(samples))?;
        Ok(grid.with_nodata(HGT_VOID.into()))
    }

    /// Returns a grid using the memory-mapped `.hgt` file as storage.
    pub fn memmap_hgt<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let (rows, cols) = hgt_axes(&path)?;
        let samples = {
            let file = File::open(path)?;
            // SAFETY: the mapping is read-only and private to this
            // grid. Modifying the file while mapped is undefined
            // behavior.
            let mmap = unsafe { Mmap::map(&file)? };
            SampleStore::MemMap(mmap)
        };
        let grid = Self::with_store(rows, cols, samples)?;
        Ok(grid.with_nodata(HGT_VOID.into()))
    }

    /// Latitude axis.
    pub fn rows(&self) -> &Axis {
        &self.rows
    }

    /// Longitude axis.
    pub fn cols(&self) -> &Axis {
        &self.cols
    }

    /// Returns the number of (rows, columns) in this grid.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    /// Returns the number of samples in this grid.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    pub fn nodata(&self) -> Option<f32> {
        self.nodata
    }

    /// Returns true if `coord` falls within this grid's coverage.
    pub fn contains(&self, coord: Coord<C>) -> bool {
        self.rows.contains(coord.y) && self.cols.contains(coord.x)
    }

    /// Returns the location of the post at (`row`, `col`).
    pub fn post(&self, row: usize, col: usize) -> Coord<C> {
        Coord {
            x: self.cols.coordinate(col),
            y: self.rows.coordinate(row),
        }
    }

    /// Returns the elevation stored at (`row`, `col`).
    ///
    /// Returns `None` for indices outside the grid and for no-data
    /// samples.
    #[allow(clippy::float_cmp)]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows.len() || col >= self.cols.len() {
            return None;
        }
        let sample = self.samples.get_unchecked(row * self.cols.len() + col);
        match self.nodata {
            Some(nodata) if sample == nodata => None,
            _ if sample.is_nan() => None,
            _ => Some(f64::from(sample)),
        }
    }

    /// Returns the lowest and highest elevation in this grid, ignoring
    /// no-data samples.
    pub fn elevation_range(&self) -> Option<(f64, f64)> {
        let (rows, cols) = self.dimensions();
        (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .filter_map(|(row, col)| self.get(row, col))
            .fold(None, |acc, elev| match acc {
                None => Some((elev, elev)),
                Some((min, max)) => Some((min.min(elev), max.max(elev))),
            })
    }
}

/// Private API
impl ElevationGrid {
    fn with_store(rows: Axis, cols: Axis, samples: SampleStore) -> Result<Self, DemError> {
        let expected = rows.len() * cols.len();
        let actual = samples.len();
        if expected != actual {
            return Err(DemError::Dimensions { expected, actual });
        }
        Ok(Self {
            rows,
            cols,
            nodata: None,
            samples,
        })
    }
}

/// Returns the (latitude, longitude) axes of the `.hgt` file at `path`.
///
/// Row 0 is the northern edge of the tile, so latitude spacing is
/// negative.
fn hgt_axes<P: AsRef<Path>>(path: P) -> Result<(Axis, Axis), DemError> {
    let (resolution, (rows, cols)) = extract_resolution(&path)?;
    let sw_corner = parse_sw_corner(&path)?;
    let spacing = C::from(resolution) / ARCSEC_PER_DEG;
    let rows = Axis::new("latitude", C::from(sw_corner.y) + 1.0, -spacing, rows)?;
    let cols = Axis::new("longitude", C::from(sw_corner.x), spacing, cols)?;
    Ok((rows, cols))
}

fn extract_resolution<P: AsRef<Path>>(path: P) -> Result<(u8, (usize, usize)), DemError> {
    const RES_1_ARCSECONDS_FILE_LEN: u64 = 3601 * 3601 * size_of::<u16>() as u64;
    const RES_3_ARCSECONDS_FILE_LEN: u64 = 1201 * 1201 * size_of::<u16>() as u64;
    match path.as_ref().metadata().map(|m| m.len())? {
        RES_1_ARCSECONDS_FILE_LEN => Ok((1, (3601, 3601))),
        RES_3_ARCSECONDS_FILE_LEN => Ok((3, (1201, 1201))),
        invalid_len => Err(DemError::HgtLen(invalid_len, path.as_ref().to_owned())),
    }
}

fn parse_sw_corner<P: AsRef<Path>>(path: P) -> Result<Coord<i16>, DemError> {
    let mk_err = || DemError::HgtName(path.as_ref().to_owned());
    let name = path
        .as_ref()
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(mk_err)?;
    if name.len() != 7 || !name.is_ascii() {
        return Err(mk_err());
    }
    let lat_sign = match &name[0..1] {
        "N" | "n" => 1,
        "S" | "s" => -1,
        _ => return Err(mk_err()),
    };
    let lat = lat_sign * name[1..3].parse::<i16>().map_err(|_| mk_err())?;
    let lon_sign = match &name[3..4] {
        "E" | "e" => 1,
        "W" | "w" => -1,
        _ => return Err(mk_err()),
    };
    let lon = lon_sign * name[4..7].parse::<i16>().map_err(|_| mk_err())?;
    Ok(Coord { x: lon, y: lat })
}
