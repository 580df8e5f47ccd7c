#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Error {
    #[error("Latitude '{latitude}' is out of range (valid: -90.0..=90.0)")]
    LatitudeOutOfRange { latitude: f64 },

    #[error("Longitude '{longitude}' is not a finite number")]
    LongitudeOutOfRange { longitude: f64 },

    #[error("Depth '{depth}' is out of range (valid: {min}..={max})")]
    DepthOutOfRange { depth: f64, min: f64, max: f64 },

    #[error("Time '{time}' is out of range (valid: {min}..={max})")]
    TimeOutOfRange { time: f64, min: f64, max: f64 },

    #[error("Limits '[{min}, {max}]' are invalid (required: finite, min < max)")]
    InvalidLimits { min: f64, max: f64 },

    #[error("Sequence space of cell '{cell:#010x}' is exhausted")]
    IdExhausted { cell: u32 },

    #[error("Sequential id space is exhausted")]
    IdPoolExhausted,
}
