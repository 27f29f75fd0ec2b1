//! Detection presets and the immutable table they are looked up in.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

/// A named bundle of preprocessing switches and detector tuning knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    /// Run CLAHE before detection.
    #[serde(default)]
    pub use_clahe: bool,
    /// Run an edge-preserving bilateral filter after CLAHE.
    #[serde(default)]
    pub use_bilateral: bool,
    /// Run a second detection pass on the Otsu binarization and merge by id.
    #[serde(default)]
    pub use_multi_threshold: bool,
    /// Constant subtracted from the local mean in the detector's adaptive threshold.
    pub adaptive_thresh_constant: f64,
    /// Iteration cap for sub-pixel corner refinement.
    pub corner_refinement_max_iterations: i32,
}

impl Preset {
    /// Baseline: plain detector, no preprocessing.
    pub fn original() -> Self {
        Self {
            name: "original".to_string(),
            use_clahe: false,
            use_bilateral: false,
            use_multi_threshold: false,
            adaptive_thresh_constant: 7.0,
            corner_refinement_max_iterations: 30,
        }
    }

    /// CLAHE plus adaptive/Otsu merge.
    pub fn optimized() -> Self {
        Self {
            name: "optimized".to_string(),
            use_clahe: true,
            use_bilateral: false,
            use_multi_threshold: true,
            adaptive_thresh_constant: 5.0,
            corner_refinement_max_iterations: 60,
        }
    }

    /// Everything on, for low light and motion blur.
    pub fn maximum() -> Self {
        Self {
            name: "maximum".to_string(),
            use_clahe: true,
            use_bilateral: true,
            use_multi_threshold: true,
            adaptive_thresh_constant: 5.0,
            corner_refinement_max_iterations: 80,
        }
    }

    /// `(key, value)` pairs in declaration order, for configuration dumps.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("use_clahe", self.use_clahe.to_string()),
            ("use_bilateral", self.use_bilateral.to_string()),
            ("use_multi_threshold", self.use_multi_threshold.to_string()),
            (
                "adaptive_thresh_constant",
                self.adaptive_thresh_constant.to_string(),
            ),
            (
                "corner_refinement_max_iterations",
                self.corner_refinement_max_iterations.to_string(),
            ),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct PresetFile {
    #[serde(rename = "preset")]
    presets: Vec<Preset>,
}

/// Ordered, immutable mapping from preset name to [`Preset`].
///
/// The first entry is the baseline other presets are compared against.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetTable {
    presets: Vec<Preset>,
}

impl PresetTable {
    /// Build a table, rejecting empty input and duplicate names.
    pub fn new(presets: Vec<Preset>) -> Result<Self, ConfigError> {
        if presets.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        let mut seen = HashSet::new();
        for p in &presets {
            if !seen.insert(p.name.as_str()) {
                return Err(ConfigError::DuplicatePreset(p.name.clone()));
            }
        }
        Ok(Self { presets })
    }

    /// `original`, `optimized`, `maximum`, in that order.
    pub fn builtin() -> Self {
        Self {
            presets: vec![Preset::original(), Preset::optimized(), Preset::maximum()],
        }
    }

    /// Parse a table from TOML `[[preset]]` entries.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: PresetFile = toml::from_str(raw)?;
        Self::new(file.presets)
    }

    /// Load a TOML preset file from disk.
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn get(&self, name: &str) -> Result<&Preset, ConfigError> {
        self.presets
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownPreset {
                name: name.to_string(),
                available: self.names().collect::<Vec<_>>().join(", "),
            })
    }

    pub fn baseline(&self) -> &Preset {
        &self.presets[0]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Preset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Always `false`: construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl<'a> IntoIterator for &'a PresetTable {
    type Item = &'a Preset;
    type IntoIter = std::slice::Iter<'a, Preset>;

    fn into_iter(self) -> Self::IntoIter {
        self.presets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_and_baseline() {
        let table = PresetTable::builtin();
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, ["original", "optimized", "maximum"]);
        assert_eq!(table.baseline().name, "original");
    }

    #[test]
    fn builtin_values() {
        let table = PresetTable::builtin();
        let max = table.get("maximum").expect("maximum preset");
        assert!(max.use_clahe && max.use_bilateral && max.use_multi_threshold);
        assert_eq!(max.adaptive_thresh_constant, 5.0);
        assert_eq!(max.corner_refinement_max_iterations, 80);

        let orig = table.get("original").expect("original preset");
        assert!(!orig.use_clahe && !orig.use_bilateral && !orig.use_multi_threshold);
        assert_eq!(orig.adaptive_thresh_constant, 7.0);
        assert_eq!(orig.corner_refinement_max_iterations, 30);
    }

    #[test]
    fn unknown_preset_lists_available_names() {
        let table = PresetTable::builtin();
        let err = table.get("turbo").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("turbo"));
        assert!(msg.contains("original, optimized, maximum"));
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        assert!(matches!(
            PresetTable::new(vec![]),
            Err(ConfigError::EmptyTable)
        ));
        assert!(matches!(
            PresetTable::new(vec![Preset::original(), Preset::original()]),
            Err(ConfigError::DuplicatePreset(name)) if name == "original"
        ));
    }

    #[test]
    fn parses_toml_with_default_flags() {
        let raw = r#"
            [[preset]]
            name = "plain"
            adaptive_thresh_constant = 9
            corner_refinement_max_iterations = 10

            [[preset]]
            name = "clahe"
            use_clahe = true
            adaptive_thresh_constant = 4.5
            corner_refinement_max_iterations = 40
        "#;
        let table = PresetTable::from_toml_str(raw).expect("valid toml");
        assert_eq!(table.len(), 2);
        assert_eq!(table.baseline().name, "plain");
        assert!(!table.baseline().use_clahe);
        assert_eq!(table.baseline().adaptive_thresh_constant, 9.0);
        assert!(table.get("clahe").expect("clahe").use_clahe);
    }

    #[test]
    fn loads_table_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("presets.toml");
        std::fs::write(
            &path,
            "[[preset]]\nname = \"only\"\nadaptive_thresh_constant = 6\ncorner_refinement_max_iterations = 20\n",
        )
        .expect("write");
        let table = PresetTable::load_toml(&path).expect("load");
        assert_eq!(table.names().collect::<Vec<_>>(), ["only"]);

        let missing = PresetTable::load_toml(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
