use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    #[error("Core diameter must be positive and finite, got {0}")]
    InvalidCoreDiameter(f64),
    #[error("Well diameter {well} must be finite and larger than the core diameter {core}")]
    WellTooNarrow { core: f64, well: f64 },
    #[error("Well depth must be finite, got {0}")]
    InvalidEpsilon(f64),
    #[error("Bond energy must be non-negative for a reactive well, got {0}")]
    NegativeBondEnergy(f64),
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Reads and deserializes a TOML file.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ParamLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct HardSphereParams {
    pub core_diameter: f64,
    #[serde(default)]
    pub ignore_overlap: bool,
}

impl HardSphereParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        validate_core(self.core_diameter)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct WellParams {
    pub core_diameter: f64,
    /// Outer diameter `λσ` of the well.
    pub well_diameter: f64,
    /// Well depth `ε`. Negative values describe a repulsive shoulder.
    pub epsilon: f64,
    #[serde(default)]
    pub ignore_overlap: bool,
}

impl WellParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        validate_core(self.core_diameter)?;
        if !(self.well_diameter.is_finite() && self.well_diameter > self.core_diameter) {
            return Err(ParamError::WellTooNarrow {
                core: self.core_diameter,
                well: self.well_diameter,
            });
        }
        if !self.epsilon.is_finite() {
            return Err(ParamError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }

    /// Like [`validate`](Self::validate), additionally requiring `ε >= 0`.
    pub fn validate_reactive(&self) -> Result<(), ParamError> {
        self.validate()?;
        if self.epsilon < 0.0 {
            return Err(ParamError::NegativeBondEnergy(self.epsilon));
        }
        Ok(())
    }
}

/// Parameters of one species-pair interaction, tagged by potential type.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PotentialParams {
    HardSphere(HardSphereParams),
    SquareWell(WellParams),
    SquareWellBonded(WellParams),
}

impl PotentialParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        match self {
            Self::HardSphere(p) => p.validate(),
            Self::SquareWell(p) => p.validate(),
            Self::SquareWellBonded(p) => p.validate_reactive(),
        }
    }

    pub fn is_reactive(&self) -> bool {
        matches!(self, Self::SquareWellBonded(_))
    }

    pub fn core_diameter(&self) -> f64 {
        match self {
            Self::HardSphere(p) => p.core_diameter,
            Self::SquareWell(p) | Self::SquareWellBonded(p) => p.core_diameter,
        }
    }

    /// Outer interaction range: the well diameter, or the core for hard spheres.
    pub fn range(&self) -> f64 {
        match self {
            Self::HardSphere(p) => p.core_diameter,
            Self::SquareWell(p) | Self::SquareWellBonded(p) => p.well_diameter,
        }
    }
}

fn validate_core(core_diameter: f64) -> Result<(), ParamError> {
    if core_diameter.is_finite() && core_diameter > 0.0 {
        Ok(())
    } else {
        Err(ParamError::InvalidCoreDiameter(core_diameter))
    }
}
