//! Marker detections and dictionary identifiers.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Predefined marker dictionaries understood by the detector backends.
///
/// Only the dictionary the benchmark uses is listed; backends map it to their
/// own enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerDictionary {
    /// 7x7 inner bits, 50 markers.
    #[default]
    #[serde(rename = "DICT_7X7_50")]
    Dict7x7_50,
}

impl MarkerDictionary {
    pub fn name(self) -> &'static str {
        match self {
            Self::Dict7x7_50 => "DICT_7X7_50",
        }
    }

    /// Side length in inner bits.
    pub fn marker_size(self) -> usize {
        match self {
            Self::Dict7x7_50 => 7,
        }
    }

    /// Number of marker ids in the dictionary.
    pub fn marker_count(self) -> usize {
        match self {
            Self::Dict7x7_50 => 50,
        }
    }
}

/// One detected marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Dictionary id.
    pub id: i32,
    /// Image-space corners in detector order (TL, TR, BR, BL of the marker).
    pub corners: [Point2<f32>; 4],
}

impl Marker {
    pub fn new(id: i32, corners: [Point2<f32>; 4]) -> Self {
        Self { id, corners }
    }

    /// Mean of the four corners.
    pub fn center(&self) -> Point2<f32> {
        let (sx, sy) = self
            .corners
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2::new(sx / 4.0, sy / 4.0)
    }
}
