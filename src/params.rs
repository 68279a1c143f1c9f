use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::error::PrepError;
use crate::perturb::{GaussianNoise, Occlusion};

/// Settings of a preparation run. Missing JSON fields take the defaults:
/// no perturbation, entropy seeded randomness, nothing written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrepParams {
    /// Standard deviation of the gaussian noise, if any.
    pub noise_std: Option<f32>,
    /// Fraction of vertices removed by occlusion, if any.
    pub occlusion_ratio: Option<f64>,
    /// Seed of the random source. Runs with the same seed are reproducible.
    pub seed: Option<u64>,
    /// Write the resulting points next to the input file.
    pub write_points: bool,
}

impl PrepParams {
    pub fn with_noise(mut self, std: Option<f32>) -> Self {
        self.noise_std = std;
        self
    }

    pub fn with_occlusion(mut self, ratio: Option<f64>) -> Self {
        self.occlusion_ratio = ratio;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_write_points(mut self, value: bool) -> Self {
        self.write_points = value;
        self
    }

    /// Loads and validates parameters from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(filepath: P) -> Result<Self, PrepError> {
        let content = std::fs::read_to_string(filepath)?;
        let params: Self = serde_json::from_str(&content)?;
        params.validate()?;
        Ok(params)
    }

    /// Checks the value ranges accepted by the perturbation operators.
    pub fn validate(&self) -> Result<(), PrepError> {
        if let Some(std) = self.noise_std {
            if !std.is_finite() || std < 0.0 {
                return Err(PrepError::invalid_parameter(format!(
                    "noise_std must be finite and >= 0, got {std}"
                )));
            }
        }
        if let Some(ratio) = self.occlusion_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(PrepError::invalid_parameter(format!(
                    "occlusion_ratio must be within [0, 1], got {ratio}"
                )));
            }
        }
        Ok(())
    }

    pub fn noise(&self) -> Option<GaussianNoise> {
        self.noise_std.map(GaussianNoise::new)
    }

    pub fn occlusion(&self) -> Option<Occlusion> {
        self.occlusion_ratio.map(Occlusion::new)
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::PrepParams;
    use crate::error::PrepError;
    use crate::unit_test::write_text_file;

    #[test]
    fn should_load_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_text_file(dir.path(), "params.json", r#"{"noise_std": 0.01, "seed": 42}"#);
        let params = PrepParams::from_json_file(path).unwrap();
        assert_eq!(
            params,
            PrepParams::default()
                .with_noise(Some(0.01))
                .with_seed(Some(42))
        );
    }

    #[rstest]
    #[case(r#"{"noise_std": -1.0}"#)]
    #[case(r#"{"occlusion_ratio": 1.5}"#)]
    fn should_reject_out_of_range(#[case] content: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_text_file(dir.path(), "params.json", content);
        assert!(matches!(
            PrepParams::from_json_file(path),
            Err(PrepError::InvalidParameter(_))
        ));
    }

    #[test]
    fn should_reject_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_text_file(dir.path(), "params.json", r#"{"noise": 0.1}"#);
        assert!(matches!(
            PrepParams::from_json_file(path),
            Err(PrepError::Config(_))
        ));
    }
}
