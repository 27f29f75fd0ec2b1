use crate::{MarkerDictionary, Preset};
use serde::{Deserialize, Serialize};

/// Corner refinement strategy applied after marker identification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CornerRefineMethod {
    None,
    #[default]
    SubPixel,
    Contour,
    AprilTag,
}

/// Backend-neutral marker detector configuration.
///
/// Field names follow what the knob does rather than any one library's
/// binding names; each backend maps them onto its own parameter object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorParams {
    pub dictionary: MarkerDictionary,
    pub adaptive_thresh_constant: f64,
    pub corner_refinement_method: CornerRefineMethod,
    pub corner_refinement_max_iterations: i32,
    /// Window half-size in pixels for sub-pixel refinement.
    pub corner_refinement_win_size: i32,
    pub corner_refinement_min_accuracy: f64,
    /// Min marker perimeter relative to the largest image dimension.
    pub min_marker_perimeter_rate: f64,
    pub max_marker_perimeter_rate: f64,
    /// Polygon approximation tolerance relative to the contour perimeter.
    pub polygonal_approx_accuracy_rate: f64,
    pub min_corner_distance_rate: f64,
    /// Fraction of the dictionary's correction capacity that may be used.
    pub error_correction_rate: f64,
    /// Also look for white-on-black markers.
    pub detect_inverted_marker: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            dictionary: MarkerDictionary::Dict7x7_50,
            adaptive_thresh_constant: 7.0,
            corner_refinement_method: CornerRefineMethod::SubPixel,
            corner_refinement_max_iterations: 30,
            corner_refinement_win_size: 5,
            corner_refinement_min_accuracy: 0.01,
            min_marker_perimeter_rate: 0.01,
            max_marker_perimeter_rate: 4.0,
            polygonal_approx_accuracy_rate: 0.03,
            min_corner_distance_rate: 0.03,
            error_correction_rate: 0.6,
            detect_inverted_marker: true,
        }
    }
}

impl DetectorParams {
    /// Fixed benchmark defaults with the preset's threshold constant and
    /// refinement iteration cap applied on top.
    pub fn for_preset(preset: &Preset) -> Self {
        Self {
            adaptive_thresh_constant: preset.adaptive_thresh_constant,
            corner_refinement_max_iterations: preset.corner_refinement_max_iterations,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PresetTable;
    use approx::assert_relative_eq;

    #[test]
    fn fixed_fields_do_not_depend_on_preset() {
        for preset in &PresetTable::builtin() {
            let p = DetectorParams::for_preset(preset);
            assert_eq!(p.dictionary, MarkerDictionary::Dict7x7_50);
            assert_eq!(p.corner_refinement_method, CornerRefineMethod::SubPixel);
            assert_relative_eq!(p.min_marker_perimeter_rate, 0.01);
            assert_relative_eq!(p.max_marker_perimeter_rate, 4.0);
            assert_relative_eq!(p.polygonal_approx_accuracy_rate, 0.03);
            assert_relative_eq!(p.min_corner_distance_rate, 0.03);
            assert_eq!(p.corner_refinement_win_size, 5);
            assert_relative_eq!(p.corner_refinement_min_accuracy, 0.01);
            assert_relative_eq!(p.error_correction_rate, 0.6);
            assert!(p.detect_inverted_marker);
        }
    }

    #[test]
    fn preset_fields_override_defaults() {
        let table = PresetTable::builtin();
        let p = DetectorParams::for_preset(table.get("optimized").expect("preset"));
        assert_relative_eq!(p.adaptive_thresh_constant, 5.0);
        assert_eq!(p.corner_refinement_max_iterations, 60);

        let p = DetectorParams::for_preset(table.get("maximum").expect("preset"));
        assert_eq!(p.corner_refinement_max_iterations, 80);
    }

    #[test]
    fn serializes_dictionary_by_library_name() {
        let json = serde_json::to_value(DetectorParams::default()).expect("serialize");
        assert_eq!(json["dictionary"], "DICT_7X7_50");
        assert_eq!(json["corner_refinement_method"], "SubPixel");
    }
}
