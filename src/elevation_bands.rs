use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Route colors, lowest band first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum BandColor {
    Green,
    Yellow,
    Orange,
    Red,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ElevationBand {
    pub low: f64,
    pub high: f64,
    pub color: BandColor,
    /// only the topmost band contains its upper bound
    pub includes_high: bool,
}

impl ElevationBand {
    pub fn contains(&self, elevation: f64) -> bool {
        self.low <= elevation
            && (elevation < self.high || (self.includes_high && elevation == self.high))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElevationBands {
    boundaries: Vec<f64>,
    bands: Vec<ElevationBand>,
}

impl ElevationBands {
    pub const DEFAULT_BOUNDARY_COUNT: usize = 5;

    /// `boundary_count` evenly spaced boundaries from `min` to `max`
    /// (inclusive), giving `boundary_count - 1` bands.
    pub fn linspace(min: f64, max: f64, boundary_count: usize) -> Self {
        let boundary_count = boundary_count.max(2);
        let step = (max - min) / (boundary_count - 1) as f64;
        let mut boundaries: Vec<f64> = (0..boundary_count)
            .map(|i| min + step * i as f64)
            .collect();
        // avoid accumulated rounding on the top boundary
        boundaries[boundary_count - 1] = max;

        let palette: Vec<BandColor> = BandColor::iter().collect();
        let band_count = boundary_count - 1;
        let bands = boundaries
            .windows(2)
            .enumerate()
            .map(|(i, pair)| ElevationBand {
                low: pair[0],
                high: pair[1],
                color: palette[(i * palette.len() / band_count).min(palette.len() - 1)],
                includes_high: i == band_count - 1,
            })
            .collect();
        Self { boundaries, bands }
    }

    pub fn for_range(min: f64, max: f64) -> Self {
        Self::linspace(min, max, Self::DEFAULT_BOUNDARY_COUNT)
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn bands(&self) -> &[ElevationBand] {
        &self.bands
    }

    /// Index of the band holding `elevation`. With a flat range every band
    /// but the last is empty, so everything lands in the last one.
    pub fn band_of(&self, elevation: f64) -> Option<usize> {
        self.bands.iter().position(|band| band.contains(elevation))
    }
}
