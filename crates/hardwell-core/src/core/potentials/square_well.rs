use super::impulse::{self, Nudge};
use super::params::{ParamError, WellParams};
use super::{Collision, PairPotential, core_contact_time, elastic_virial};
use crate::core::boundary::Boundary;
use crate::core::error::KernelError;
use crate::core::kinematics::PairState;
use crate::core::models::pair::{Pair, PairMut};

/// Hard core of diameter `σ` surrounded by a well of diameter `λσ` and depth `ε`.
///
/// A negative `ε` turns the well into a repulsive shoulder. Whether a pair is
/// inside the well is read off its separation; the nudge applied after every
/// well-edge event keeps that reading unambiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareWell {
    core_diameter_sq: f64,
    well_diameter_sq: f64,
    epsilon: f64,
    ignore_overlap: bool,
}

impl SquareWell {
    pub fn new(core_diameter: f64, well_diameter: f64, epsilon: f64) -> Result<Self, ParamError> {
        Self::from_params(&WellParams {
            core_diameter,
            well_diameter,
            epsilon,
            ignore_overlap: false,
        })
    }

    pub fn from_params(params: &WellParams) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            core_diameter_sq: params.core_diameter * params.core_diameter,
            well_diameter_sq: params.well_diameter * params.well_diameter,
            epsilon: params.epsilon,
            ignore_overlap: params.ignore_overlap,
        })
    }

    pub fn with_ignore_overlap(mut self, ignore_overlap: bool) -> Self {
        self.ignore_overlap = ignore_overlap;
        self
    }

    pub fn core_diameter_sq(&self) -> f64 {
        self.core_diameter_sq
    }

    pub fn well_diameter_sq(&self) -> f64 {
        self.well_diameter_sq
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn ignore_overlap(&self) -> bool {
        self.ignore_overlap
    }

    /// Heuristic core test: the contact is nearer the core than the well edge.
    #[inline]
    pub(crate) fn is_core_contact(&self, state: &PairState) -> bool {
        2.0 * state.r2 < self.core_diameter_sq + self.well_diameter_sq
    }

    /// Next event for a pair inside the well: core contact if the pair will
    /// reach it, otherwise the crossing of the well edge on the way out.
    pub(crate) fn time_inside_well(
        &self,
        pair: Pair<'_>,
        state: &PairState,
        false_time: f64,
    ) -> Result<Option<f64>, KernelError> {
        if let Some(time) = core_contact_time(
            pair,
            state,
            self.core_diameter_sq,
            self.ignore_overlap,
            false_time,
        )? {
            return Ok(Some(time));
        }
        Ok(state
            .exit_time(self.well_diameter_sq)
            .map(|time| time + false_time))
    }

    /// Virial for crossing the well edge outward, paying `ε` if the pair can
    /// afford it. Returns `None` if the pair reflects back inward.
    pub(crate) fn escape_virial(&self, state: &PairState, mu: f64) -> Option<f64> {
        let ke = impulse::normal_kinetic_energy(state, mu);
        if ke < self.epsilon {
            return None;
        }
        Some(0.5 * mu * state.bij() - (mu * state.r2 * (ke - self.epsilon)).sqrt())
    }

    /// Virial for crossing the well edge inward, releasing `ε` into the pair's
    /// relative motion. Returns `None` if a shoulder turns the pair back.
    pub(crate) fn capture_virial(&self, state: &PairState, mu: f64) -> Option<f64> {
        let bij = state.bij();
        let discriminant = bij * bij + 4.0 * state.r2 * self.epsilon / mu;
        if discriminant <= 0.0 {
            return None;
        }
        Some(0.5 * mu * (bij + discriminant.sqrt()))
    }
}

impl PairPotential for SquareWell {
    fn name(&self) -> &'static str {
        "square-well"
    }

    fn collision_time(
        &self,
        pair: Pair<'_>,
        boundary: &dyn Boundary,
        false_time: f64,
    ) -> Result<f64, KernelError> {
        let state = PairState::compute(pair.first, pair.second, false_time, boundary);
        let time = if state.r2 < self.well_diameter_sq {
            self.time_inside_well(pair, &state, false_time)?
        } else {
            state
                .contact_time(self.well_diameter_sq)
                .map(|time| time + false_time)
        };
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

        let (virial, nudge, energy_change) = if self.is_core_contact(&state) {
            (elastic_virial(&state, mu), Nudge::None, 0.0)
        } else if state.bij() > 0.0 {
            match self.escape_virial(&state, mu) {
                Some(virial) => (virial, Nudge::Outward, self.epsilon),
                None => (elastic_virial(&state, mu), Nudge::Inward, 0.0),
            }
        } else {
            match self.capture_virial(&state, mu) {
                Some(virial) => (virial, Nudge::Inward, -self.epsilon),
                None => (elastic_virial(&state, mu), Nudge::Outward, 0.0),
            }
        };

        impulse::apply(&mut pair, &state, virial, false_time, nudge);
        Ok(Collision::new(&state, virial).with_energy_change(energy_change))
    }

    fn energy(&self, pair: Pair<'_>, boundary: &dyn Boundary) -> f64 {
        let state = PairState::compute(pair.first, pair.second, 0.0, boundary);
        if state.r2 < self.core_diameter_sq {
            f64::INFINITY
        } else if state.r2 < self.well_diameter_sq {
            -self.epsilon
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::boundary::OpenBoundary;
    use crate::core::models::particle::Particle;
    use crate::core::potentials::test_support::*;

    fn well() -> SquareWell {
        SquareWell::new(1.0, 1.5, 1.0).unwrap()
    }

    fn time(potential: &SquareWell, a: &Particle, b: &Particle) -> f64 {
        potential
            .collision_time(Pair::new([pid(0), pid(1)], a, b), &OpenBoundary, 0.0)
            .unwrap()
    }

    fn collide(potential: &mut SquareWell, a: &mut Particle, b: &mut Particle) -> Collision {
        potential
            .bump(PairMut::new([pid(0), pid(1)], a, b), &OpenBoundary, 0.0)
            .unwrap()
    }

    #[test]
    fn outside_pair_next_meets_well_edge() {
        let a = particle([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
        let b = particle([3.0, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
        assert!((time(&well(), &a, &b) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn inside_pair_approaching_meets_core_first() {
        let a = particle([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
        let b = particle([1.4, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
        assert!((time(&well(), &a, &b) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn inside_pair_missing_core_meets_well_edge_on_way_out() {
        // Offset 1.2 along y clears the unit core but stays inside the well.
        let a = particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
        let b = particle([0.5, 1.2, 0.0], [-1.0, 0.0, 0.0], 1.0);
        let t = time(&well(), &a, &b);
        // Exits when x = -0.9, since 0.81 + 1.44 = 2.25.
        assert!((t - 1.4).abs() < 1e-12);
    }

    #[test]
    fn inside_pair_separating_meets_well_edge() {
        let a = particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
        let b = particle([1.2, 0.0, 0.0], [0.3, 0.0, 0.0], 1.0);
        assert!((time(&well(), &a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn entering_the_well_releases_epsilon() {
        let mut potential = well();
        let mut a = particle([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
        let mut b = particle([1.5, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
        let ke0 = kinetic_energy(&a, &b);
        let p0 = momentum(&a, &b);

        let collision = collide(&mut potential, &mut a, &mut b);

        assert!((kinetic_energy(&a, &b) - ke0 - 1.0).abs() < 1e-12);
        assert!((momentum(&a, &b) - p0).norm() < 1e-12);
        assert_eq!(collision.energy_change, -1.0);
        assert!((b.position - a.position).norm_squared() < 2.25);
    }

    #[test]
    fn escaping_the_well_costs_epsilon() {
        let mut potential = well();
        let mut a = particle([0.0, 0.0, 0.0], [-1.5, 0.0, 0.0], 1.0);
        let mut b = particle([1.5, 0.0, 0.0], [1.5, 0.0, 0.0], 1.0);
        let ke0 = kinetic_energy(&a, &b);

        let collision = collide(&mut potential, &mut a, &mut b);

        assert!((kinetic_energy(&a, &b) - (ke0 - 1.0)).abs() < 1e-12);
        assert!(b.velocity.x > a.velocity.x);
        assert_eq!(collision.energy_change, 1.0);
        assert!((b.position - a.position).norm_squared() > 2.25);
    }

    #[test]
    fn slow_pair_reflects_off_inner_edge() {
        let mut potential = well();
        let mut a = particle([0.0, 0.0, 0.0], [-0.1, 0.0, 0.0], 1.0);
        let mut b = particle([1.5, 0.0, 0.0], [0.1, 0.0, 0.0], 1.0);
        let ke0 = kinetic_energy(&a, &b);

        collide(&mut potential, &mut a, &mut b);

        assert!((kinetic_energy(&a, &b) - ke0).abs() < 1e-12);
        assert!((a.velocity.x - 0.1).abs() < 1e-12);
        assert!((b.velocity.x + 0.1).abs() < 1e-12);
        assert!((b.position - a.position).norm_squared() < 2.25);
    }

    #[test]
    fn shoulder_turns_back_slow_pair_and_admits_fast_one() {
        let mut shoulder = SquareWell::new(1.0, 1.5, -1.0).unwrap();
        let mut a = particle([0.0, 0.0, 0.0], [0.2, 0.0, 0.0], 1.0);
        let mut b = particle([1.5, 0.0, 0.0], [-0.2, 0.0, 0.0], 1.0);
        let collision = collide(&mut shoulder, &mut a, &mut b);
        assert_eq!(collision.energy_change, 0.0);
        assert!((a.velocity.x + 0.2).abs() < 1e-12);

        let mut a = particle([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], 1.0);
        let mut b = particle([1.5, 0.0, 0.0], [-2.0, 0.0, 0.0], 1.0);
        let ke0 = kinetic_energy(&a, &b);
        let collision = collide(&mut shoulder, &mut a, &mut b);
        assert_eq!(collision.energy_change, 1.0);
        assert!((kinetic_energy(&a, &b) - (ke0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn core_contact_inside_well_is_elastic() {
        let mut potential = well();
        let mut a = particle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0);
        let mut b = particle([1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], 1.0);
        let ke0 = kinetic_energy(&a, &b);
        let collision = collide(&mut potential, &mut a, &mut b);
        assert!((kinetic_energy(&a, &b) - ke0).abs() < 1e-12);
        assert!((a.velocity.x + 1.0).abs() < 1e-12);
        assert_eq!(collision.energy_change, 0.0);
    }

    #[test]
    fn energy_is_stepwise_in_separation() {
        let potential = well();
        let a = particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
        let at = |x: f64| particle([x, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
        let energy =
            |b: &Particle| potential.energy(Pair::new([pid(0), pid(1)], &a, b), &OpenBoundary);
        assert!(energy(&at(0.5)).is_infinite());
        assert_eq!(energy(&at(1.2)), -1.0);
        assert_eq!(energy(&at(2.0)), 0.0);
    }
}
