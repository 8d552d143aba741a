use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Frame samples per curve used by the plug-in this crate models.
pub const DEFAULT_REFINEMENT: usize = 10;

/// Which plank survives where two planks of different directions cross at
/// the same layer and bundle position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Planks are only cut by planks of a lower direction index.
    #[default]
    LowerDirectionWins,
    /// Planks are only cut by planks of a higher direction index.
    HigherDirectionWins,
    /// Both planks cut each other and neither survives at the crossing.
    Mutual,
}

impl TieBreak {
    /// Returns `true` if a plank of direction `target` may be cut by a plank
    /// of direction `cutter`.
    #[must_use]
    pub fn cuts(self, target: u32, cutter: u32) -> bool {
        match self {
            Self::LowerDirectionWins => cutter < target,
            Self::HigherDirectionWins => cutter > target,
            Self::Mutual => cutter != target,
        }
    }
}

/// Parameters of a plank network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Frame samples per curve; curves are sampled at `refinement + 1` points.
    #[serde(default = "default_refinement")]
    pub refinement: usize,
    /// Plank thickness.
    pub thickness: f64,
    /// Plank width.
    pub width: f64,
    /// Number of stacked layers.
    #[serde(default = "default_layers")]
    pub layers: u32,
    /// Extra clearance added around cutters.
    #[serde(default)]
    pub gap: f64,
    #[serde(default)]
    pub tie_break: TieBreak,
}

fn default_refinement() -> usize {
    DEFAULT_REFINEMENT
}

fn default_layers() -> u32 {
    1
}

impl NetworkParams {
    /// Creates parameters with one layer, no gap and the default refinement.
    #[must_use]
    pub fn new(thickness: f64, width: f64) -> Self {
        Self {
            refinement: DEFAULT_REFINEMENT,
            thickness,
            width,
            layers: 1,
            gap: 0.0,
            tie_break: TieBreak::default(),
        }
    }

    #[must_use]
    pub fn with_refinement(mut self, refinement: usize) -> Self {
        self.refinement = refinement;
        self
    }

    #[must_use]
    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }

    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Parses and validates parameters from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Config`] if the JSON is malformed, or any
    /// error from [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| ValidationError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Checks that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a thickness or width that is not a
    /// positive finite number, a zero refinement or layer count, or a gap
    /// that is negative or infinite.
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [("thickness", self.thickness), ("width", self.width)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::NonPositive { parameter, value }.into());
            }
        }
        if self.refinement == 0 {
            return Err(ValidationError::TooFew {
                parameter: "refinement",
                value: 0,
                min: 1,
            }
            .into());
        }
        if self.layers == 0 {
            return Err(ValidationError::TooFew {
                parameter: "layers",
                value: 0,
                min: 1,
            }
            .into());
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(ValidationError::NegativeGap(self.gap).into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlankError;

    #[test]
    fn json_defaults() {
        let params = NetworkParams::from_json_str(r#"{"thickness": 0.02, "width": 0.1}"#).unwrap();
        assert_eq!(params, NetworkParams::new(0.02, 0.1));
        assert_eq!(params.refinement, 10);
        assert_eq!(params.tie_break, TieBreak::LowerDirectionWins);
    }

    #[test]
    fn json_overrides() {
        let params = NetworkParams::from_json_str(
            r#"{"thickness": 0.02, "width": 0.1, "refinement": 4, "layers": 2,
                "gap": 0.001, "tie_break": "mutual"}"#,
        )
        .unwrap();
        assert_eq!(params.refinement, 4);
        assert_eq!(params.layers, 2);
        assert_eq!(params.tie_break, TieBreak::Mutual);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = NetworkParams::from_json_str(r#"{"width": 0.1}"#).unwrap_err();
        assert!(matches!(
            err,
            PlankError::Validation(ValidationError::Config(_))
        ));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(NetworkParams::new(0.0, 0.1).validate().is_err());
        assert!(NetworkParams::new(0.02, -1.0).validate().is_err());
        assert!(NetworkParams::new(0.02, 0.1).with_refinement(0).validate().is_err());
        assert!(NetworkParams::new(0.02, 0.1).with_layers(0).validate().is_err());
        assert!(NetworkParams::new(0.02, 0.1).with_gap(-0.1).validate().is_err());
        assert!(NetworkParams::new(0.0, 0.1).validate().unwrap_err().is_validation());
        assert!(NetworkParams::new(0.02, 0.1).with_gap(0.0).validate().is_ok());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(NetworkParams::new(f64::INFINITY, 0.1).validate().is_err());
        assert!(NetworkParams::new(0.02, f64::INFINITY).validate().is_err());
        assert!(NetworkParams::new(0.02, f64::NAN).validate().is_err());
        let err = NetworkParams::new(0.02, 0.1)
            .with_gap(f64::INFINITY)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            PlankError::Validation(ValidationError::NegativeGap(_))
        ));
    }

    #[test]
    fn tie_break_rules() {
        assert!(TieBreak::LowerDirectionWins.cuts(1, 0));
        assert!(!TieBreak::LowerDirectionWins.cuts(0, 1));
        assert!(TieBreak::HigherDirectionWins.cuts(0, 1));
        assert!(TieBreak::Mutual.cuts(0, 1) && TieBreak::Mutual.cuts(1, 0));
        assert!(!TieBreak::Mutual.cuts(2, 2));
    }
}
