use anyhow::Result;
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq)]
pub struct GeoSample {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub timestamp: DateTime<Utc>,
}

impl GeoSample {
    pub fn position(&self) -> Position {
        Position {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self.elevation,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl Position {
    pub fn lat_lng(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Chronologically ordered positions of one job. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionSequence {
    positions: Vec<Position>,
}

impl PositionSequence {
    pub fn new(positions: Vec<Position>) -> Option<Self> {
        if positions.is_empty() {
            None
        } else {
            Some(Self { positions })
        }
    }

    pub fn first(&self) -> &Position {
        // non-empty by construction
        &self.positions[0]
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.positions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }
}

/// Half-open UTC interval `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            bail!("invalid time window: end {end} is not after start {start}");
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, time: &DateTime<Utc>) -> bool {
        self.start <= *time && *time < self.end
    }
}
