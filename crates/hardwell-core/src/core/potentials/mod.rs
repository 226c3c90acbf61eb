//! # Pair Potentials Module
//!
//! Hard-core pair potentials for event-driven dynamics. Every potential is a
//! step function of pair separation, so between events particles fly freely
//! and all the physics happens at discrete discontinuity crossings.
//!
//! ## Overview
//!
//! A [`PairPotential`] answers two questions for a pair:
//!
//! - **When** does the pair next cross a discontinuity? ([`PairPotential::collision_time`])
//! - **What** happens when it does? ([`PairPotential::bump`])
//!
//! All potentials funnel their collision through the same momentum-conserving
//! update in [`impulse`]; they differ only in how they derive the impulse
//! magnitude and whether they touch the bond ledger.
//!
//! ## Key Components
//!
//! - [`hard_sphere`] - Elastic hard spheres
//! - [`square_well`] - Attractive (or repulsive shoulder) square well
//! - [`bonded`] - Square well with saturable reactive bonds
//! - [`impulse`] - The shared velocity and position update
//! - [`params`] - Serializable, validated potential parameters

use super::boundary::Boundary;
use super::bonding::BondLedger;
use super::error::KernelError;
use super::kinematics::PairState;
use super::models::ids::ParticleId;
use super::models::pair::{Pair, PairMut};
use nalgebra::Matrix3;
use nalgebra::Vector3;
use std::fmt::Debug;

pub mod bonded;
pub mod hard_sphere;
pub mod impulse;
pub mod params;
pub mod square_well;

/// Change of bonding state produced by a single collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BondTransition {
    #[default]
    Unchanged,
    Bonded,
    Unbonded,
}

/// Outcome of resolving one collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Impulse magnitude `J` along the line of centers, for pressure accumulation.
    pub virial: f64,
    /// Contact displacement from the first particle to the second.
    pub dr: Vector3<f64>,
    /// Squared contact distance.
    pub r2: f64,
    /// Change in pair potential energy; kinetic energy changes by the negative.
    pub energy_change: f64,
    pub transition: BondTransition,
}

impl Collision {
    pub(crate) fn new(state: &PairState, virial: f64) -> Self {
        Self {
            virial,
            dr: state.dr,
            r2: state.r2,
            energy_change: 0.0,
            transition: BondTransition::Unchanged,
        }
    }

    pub(crate) fn with_energy_change(mut self, energy_change: f64) -> Self {
        self.energy_change = energy_change;
        self
    }

    pub(crate) fn with_transition(mut self, transition: BondTransition) -> Self {
        self.transition = transition;
        self
    }

    /// Contribution `(J / r2) dr ⊗ dr` to the pressure tensor.
    pub fn virial_tensor(&self) -> Matrix3<f64> {
        if self.r2 > 0.0 {
            self.dr * self.dr.transpose() * (self.virial / self.r2)
        } else {
            Matrix3::zeros()
        }
    }
}

/// A hard-core pair potential driven by an event scheduler.
///
/// Callers must invalidate every prediction involving a particle once that
/// particle has been passed to [`bump`](Self::bump). After a collision whose
/// [`transition`](Collision::transition) is not `Unchanged`, predictions
/// involving the current bond partners of either particle are stale as well.
pub trait PairPotential: Debug + Send {
    fn name(&self) -> &'static str;

    /// Time until the pair next crosses a discontinuity of this potential.
    ///
    /// The returned time is absolute with respect to the current positions,
    /// so it is never smaller than `false_time`. A pair that never collides
    /// returns `f64::INFINITY`.
    fn collision_time(
        &self,
        pair: Pair<'_>,
        boundary: &dyn Boundary,
        false_time: f64,
    ) -> Result<f64, KernelError>;

    /// Resolves the collision predicted for `pair`, `false_time` after the
    /// moment the particle positions refer to.
    fn bump(
        &mut self,
        pair: PairMut<'_>,
        boundary: &dyn Boundary,
        false_time: f64,
    ) -> Result<Collision, KernelError>;

    /// Potential energy of the pair at its current separation.
    fn energy(&self, pair: Pair<'_>, boundary: &dyn Boundary) -> f64;

    fn is_bonded(&self, _a: ParticleId, _b: ParticleId) -> bool {
        false
    }

    /// The bond ledger maintained by this potential, if it is reactive.
    fn bond_ledger(&self) -> Option<&BondLedger> {
        None
    }
}

/// Hard-sphere impulse used by every elastic branch: `J = μ·bij`.
#[inline]
pub(crate) fn elastic_virial(state: &PairState, reduced_mass: f64) -> f64 {
    reduced_mass * state.bij()
}

/// Predicts first contact at `diameter_sq`, rejecting overlapping pairs
/// unless `ignore_overlap` is set.
pub(crate) fn core_contact_time(
    pair: Pair<'_>,
    state: &PairState,
    diameter_sq: f64,
    ignore_overlap: bool,
    false_time: f64,
) -> Result<Option<f64>, KernelError> {
    if state.bij() >= 0.0 {
        return Ok(None);
    }
    if ignore_overlap && state.r2 < diameter_sq {
        return Ok(Some(false_time));
    }
    match state.contact_time(diameter_sq) {
        Some(time) if time < 0.0 => Err(KernelError::NegativeCollisionTime {
            a: pair.ids[0],
            b: pair.ids[1],
            time,
        }),
        Some(time) => Ok(Some(time + false_time)),
        None => Ok(None),
    }
}
