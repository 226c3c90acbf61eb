use super::impulse::{self, Nudge};
use super::params::{HardSphereParams, ParamError};
use super::{Collision, PairPotential, core_contact_time, elastic_virial};
use crate::core::boundary::Boundary;
use crate::core::error::KernelError;
use crate::core::kinematics::PairState;
use crate::core::models::pair::{Pair, PairMut};
use tracing::warn;

/// Impenetrable spheres of diameter `σ` colliding elastically.
#[derive(Debug, Clone, PartialEq)]
pub struct HardSphere {
    core_diameter: f64,
    core_diameter_sq: f64,
    ignore_overlap: bool,
}

impl HardSphere {
    pub fn new(core_diameter: f64) -> Result<Self, ParamError> {
        Self::from_params(&HardSphereParams {
            core_diameter,
            ignore_overlap: false,
        })
    }

    pub fn from_params(params: &HardSphereParams) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            core_diameter: params.core_diameter,
            core_diameter_sq: params.core_diameter * params.core_diameter,
            ignore_overlap: params.ignore_overlap,
        })
    }

    /// Overlapping approaching pairs collide immediately instead of failing.
    pub fn with_ignore_overlap(mut self, ignore_overlap: bool) -> Self {
        self.ignore_overlap = ignore_overlap;
        self
    }

    pub fn core_diameter(&self) -> f64 {
        self.core_diameter
    }
}

impl PairPotential for HardSphere {
    fn name(&self) -> &'static str {
        "hard-sphere"
    }

    fn collision_time(
        &self,
        pair: Pair<'_>,
        boundary: &dyn Boundary,
        false_time: f64,
    ) -> Result<f64, KernelError> {
        let state = PairState::compute(pair.first, pair.second, false_time, boundary);
        if self.ignore_overlap && state.r2 < self.core_diameter_sq && state.bij() < 0.0 {
            warn!(
                a = ?pair.ids[0],
                b = ?pair.ids[1],
                r2 = state.r2,
                "Tolerating hard-sphere overlap; colliding now."
            );
        }
        let time = core_contact_time(
            pair,
            &state,
            self.core_diameter_sq,
            self.ignore_overlap,
            false_time,
        )?;
        Ok(time.unwrap_or(f64::INFINITY))
    }

    fn bump(
        &mut self,
        mut pair: PairMut<'_>,
        boundary: &dyn Boundary,
        false_time: f64,
    ) -> Result<Collision, KernelError> {
        let state = PairState::compute(pair.first, pair.second, false_time, boundary);
        let Some(mu) = impulse::reduced_mass(&pair) else {
            return Ok(Collision::new(&state, 0.0));
        };
        let virial = elastic_virial(&state, mu);
        impulse::apply(&mut pair, &state, virial, false_time, Nudge::None);
        Ok(Collision::new(&state, virial))
    }

    fn energy(&self, pair: Pair<'_>, boundary: &dyn Boundary) -> f64 {
        let state = PairState::compute(pair.first, pair.second, 0.0, boundary);
        if state.r2 < self.core_diameter_sq {
            f64::INFINITY
        } else {
            0.0
        }
    }
}
