use super::impulse::{self, Nudge};
use super::params::{ParamError, WellParams};
use super::square_well::SquareWell;
use super::{BondTransition, Collision, PairPotential, elastic_virial};
use crate::core::boundary::Boundary;
use crate::core::bonding::BondLedger;
use crate::core::error::KernelError;
use crate::core::kinematics::PairState;
use crate::core::models::ids::ParticleId;
use crate::core::models::pair::{Pair, PairMut};
use tracing::trace;

/// Square well whose attraction forms saturable bonds.
///
/// Wraps a [`SquareWell`] for the geometry and a [`BondLedger`] for the
/// bonding state. A pair only feels the well while it is bonded; an unbonded
/// pair entering the well is either captured (if both particles have a free
/// valence slot) or repelled at the well edge as if by a hard wall.
#[derive(Debug, Clone)]
pub struct ReactiveSquareWell {
    well: SquareWell,
    ledger: BondLedger,
}

impl ReactiveSquareWell {
    pub fn new(well: SquareWell, ledger: BondLedger) -> Result<Self, ParamError> {
        if well.epsilon() < 0.0 {
            return Err(ParamError::NegativeBondEnergy(well.epsilon()));
        }
        Ok(Self { well, ledger })
    }

    pub fn from_params(params: &WellParams, ledger: BondLedger) -> Result<Self, ParamError> {
        params.validate_reactive()?;
        Self::new(SquareWell::from_params(params)?, ledger)
    }

    pub fn well(&self) -> &SquareWell {
        &self.well
    }

    pub fn ledger(&self) -> &BondLedger {
        &self.ledger
    }

    pub fn into_ledger(self) -> BondLedger {
        self.ledger
    }

    fn bonded_time(
        &self,
        pair: Pair<'_>,
        state: &PairState,
        false_time: f64,
    ) -> Result<f64, KernelError> {
        let well_sq = self.well.well_diameter_sq();
        let outside = state.r2 >= well_sq;
        // Stretched past the edge and still separating: test escape now.
        if outside && state.bij() >= 0.0 {
            return Ok(false_time);
        }
        match self.well.time_inside_well(pair, state, false_time)? {
            Some(time) => Ok(time),
            None if outside => Ok(false_time),
            None => Ok(f64::INFINITY),
        }
    }

    fn unbonded_time(&self, state: &PairState, false_time: f64) -> f64 {
        let well_sq = self.well.well_diameter_sq();
        if state.r2 < well_sq {
            return if state.bij() < 0.0 {
                false_time
            } else {
                f64::INFINITY
            };
        }
        state
            .contact_time(well_sq)
            .map_or(f64::INFINITY, |time| time + false_time)
    }
}

impl PairPotential for ReactiveSquareWell {
    fn name(&self) -> &'static str {
        "square-well-bonded"
    }

    fn collision_time(
        &self,
        pair: Pair<'_>,
        boundary: &dyn Boundary,
        false_time: f64,
    ) -> Result<f64, KernelError> {
        let state = PairState::compute(pair.first, pair.second, false_time, boundary);
        let [a, b] = pair.ids;
        if self.ledger.are_bonded(a, b) {
            self.bonded_time(pair, &state, false_time)
        } else {
            Ok(self.unbonded_time(&state, false_time))
        }
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
        let [a, b] = pair.ids;
        let epsilon = self.well.epsilon();

        // Ledger mutations happen before the impulse so a fatal ledger error
        // leaves the particles untouched.
        let (virial, nudge, energy_change, transition) = if self.ledger.are_bonded(a, b) {
            if self.well.is_core_contact(&state) {
                (elastic_virial(&state, mu), Nudge::None, 0.0, BondTransition::Unchanged)
            } else if let Some(virial) = self.well.escape_virial(&state, mu) {
                self.ledger.unbond(a, b)?;
                trace!(?a, ?b, "Bond broken.");
                (virial, Nudge::Outward, epsilon, BondTransition::Unbonded)
            } else {
                (elastic_virial(&state, mu), Nudge::Inward, 0.0, BondTransition::Unchanged)
            }
        } else if self.ledger.full(a) || self.ledger.full(b) {
            (elastic_virial(&state, mu), Nudge::Outward, 0.0, BondTransition::Unchanged)
        } else {
            match self.well.capture_virial(&state, mu) {
                Some(virial) => {
                    self.ledger.bond(a, b)?;
                    trace!(?a, ?b, "Bond formed.");
                    (virial, Nudge::Inward, -epsilon, BondTransition::Bonded)
                }
                None => (
                    elastic_virial(&state, mu),
                    Nudge::Outward,
                    0.0,
                    BondTransition::Unchanged,
                ),
            }
        };

        impulse::apply(&mut pair, &state, virial, false_time, nudge);
        Ok(Collision::new(&state, virial)
            .with_energy_change(energy_change)
            .with_transition(transition))
    }

    fn energy(&self, pair: Pair<'_>, boundary: &dyn Boundary) -> f64 {
        let state = PairState::compute(pair.first, pair.second, 0.0, boundary);
        if state.r2 < self.well.core_diameter_sq() {
            f64::INFINITY
        } else if self.ledger.are_bonded(pair.ids[0], pair.ids[1]) {
            -self.well.epsilon()
        } else {
            0.0
        }
    }

    fn is_bonded(&self, a: ParticleId, b: ParticleId) -> bool {
        self.ledger.are_bonded(a, b)
    }

    fn bond_ledger(&self) -> Option<&BondLedger> {
        Some(&self.ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::boundary::OpenBoundary;
    use crate::core::models::particle::Particle;
    use crate::core::potentials::test_support::*;

    const A: usize = 0;
    const B: usize = 1;

    fn ids() -> [ParticleId; 2] {
        [pid(0), pid(1)]
    }

    fn reactive(valences: [usize; 2], bonded: bool) -> ReactiveSquareWell {
        let mut ledger = BondLedger::new();
        ledger.register(ids()[A], valences[A]);
        ledger.register(ids()[B], valences[B]);
        if bonded {
            ledger.bond(ids()[A], ids()[B]).unwrap();
        }
        ReactiveSquareWell::new(SquareWell::new(1.0, 1.5, 1.0).unwrap(), ledger).unwrap()
    }

    fn time(potential: &ReactiveSquareWell, a: &Particle, b: &Particle, ft: f64) -> f64 {
        potential
            .collision_time(Pair::new(ids(), a, b), &OpenBoundary, ft)
            .unwrap()
    }

    fn collide(
        potential: &mut ReactiveSquareWell,
        a: &mut Particle,
        b: &mut Particle,
    ) -> Collision {
        potential
            .bump(PairMut::new(ids(), a, b), &OpenBoundary, 0.0)
            .unwrap()
    }

    #[test]
    fn capture_at_well_edge_bonds_pair_and_releases_epsilon() {
        let mut potential = reactive([1, 1], false);
        let mut a = particle([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
        let mut b = particle([1.5, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
        let ke0 = kinetic_energy(&a, &b);
        let p0 = momentum(&a, &b);

        let collision = collide(&mut potential, &mut a, &mut b);

        assert_eq!(collision.transition, BondTransition::Bonded);
        assert!(potential.is_bonded(ids()[A], ids()[B]));
        assert!(potential.is_bonded(ids()[B], ids()[A]));
        assert!((kinetic_energy(&a, &b) - (ke0 + 1.0)).abs() < 1e-12);
        assert!((momentum(&a, &b) - p0).norm() < 1e-12);
        assert!((b.position - a.position).norm_squared() < 2.25);
    }

    #[test]
    fn bonded_pair_with_insufficient_energy_reflects_and_stays_bonded() {
        let mut potential = reactive([1, 1], true);
        // Normal KE = bij² μ / (4 r2) = (1.5·√2)² / 9 = 0.5 < ε.
        let half = std::f64::consts::SQRT_2 / 2.0;
        let mut a = particle([0.0, 0.0, 0.0], [-half, 0.0, 0.0], 1.0);
        let mut b = particle([1.5, 0.0, 0.0], [half, 0.0, 0.0], 1.0);
        let ke0 = kinetic_energy(&a, &b);
        let p0 = momentum(&a, &b);

        let collision = collide(&mut potential, &mut a, &mut b);

        assert_eq!(collision.transition, BondTransition::Unchanged);
        assert_eq!(collision.energy_change, 0.0);
        assert!(potential.is_bonded(ids()[A], ids()[B]));
        assert!((kinetic_energy(&a, &b) - ke0).abs() < 1e-12);
        assert!((momentum(&a, &b) - p0).norm() < 1e-12);
        assert!(b.velocity.x < a.velocity.x);
        assert!((b.position - a.position).norm_squared() < 2.25);
    }

    #[test]
    fn bonded_pair_with_enough_energy_escapes_and_pays_epsilon() {
        let mut potential = reactive([1, 1], true);
        let mut a = particle([0.0, 0.0, 0.0], [-1.5, 0.0, 0.0], 1.0);
        let mut b = particle([1.5, 0.0, 0.0], [1.5, 0.0, 0.0], 1.0);
        let ke0 = kinetic_energy(&a, &b);
        let p0 = momentum(&a, &b);

        let collision = collide(&mut potential, &mut a, &mut b);

        assert_eq!(collision.transition, BondTransition::Unbonded);
        assert_eq!(collision.energy_change, 1.0);
        assert!(!potential.is_bonded(ids()[A], ids()[B]));
        assert!(!potential.is_bonded(ids()[B], ids()[A]));
        assert!((kinetic_energy(&a, &b) - (ke0 - 1.0)).abs() < 1e-12);
        assert!((momentum(&a, &b) - p0).norm() < 1e-12);
        assert!((b.position - a.position).norm_squared() > 2.25);
    }

    #[test]
    fn bonded_core_contact_bounces_elastically() {
        let mut potential = reactive([1, 1], true);
        let mut a = particle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0);
        let mut b = particle([1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], 1.0);
        let ke0 = kinetic_energy(&a, &b);
        let p0 = momentum(&a, &b);

        let collision = collide(&mut potential, &mut a, &mut b);

        assert_eq!(collision.transition, BondTransition::Unchanged);
        assert!(potential.is_bonded(ids()[A], ids()[B]));
        assert!((kinetic_energy(&a, &b) - ke0).abs() < 1e-12);
        assert!((momentum(&a, &b) - p0).norm() < 1e-12);
        assert!((a.velocity.x + 1.0).abs() < 1e-12);
    }

    #[test]
    fn saturated_particle_repels_at_well_edge() {
        let mut potential = reactive([0, 1], false);
        let mut a = particle([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
        let mut b = particle([1.5, 0.0, 0.0], [-0.5, 0.0, 0.0], 0.5);
        let ke0 = kinetic_energy(&a, &b);
        let p0 = momentum(&a, &b);

        let collision = collide(&mut potential, &mut a, &mut b);

        assert_eq!(collision.transition, BondTransition::Unchanged);
        assert!(!potential.is_bonded(ids()[A], ids()[B]));
        assert!((kinetic_energy(&a, &b) - ke0).abs() < 1e-12);
        assert!((momentum(&a, &b) - p0).norm() < 1e-12);
        assert!(a.velocity.x < 0.0);
        assert!(b.velocity.x > a.velocity.x);
        assert!((b.position - a.position).norm_squared() > 2.25);
        assert_eq!(potential.ledger().total_bonds(), 0);
    }

    #[test]
    fn capture_with_false_time_lands_on_nudged_contact_after_drift() {
        let mut potential = reactive([1, 1], false);
        // The pair reaches the well edge 0.5 after the particles' own time.
        let mut a = particle([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
        let mut b = particle([2.0, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
        let ke0 = kinetic_energy(&a, &b);
        let p0 = momentum(&a, &b);

        let collision = potential
            .bump(PairMut::new(ids(), &mut a, &mut b), &OpenBoundary, 0.5)
            .unwrap();
        a.drift(0.5);
        b.drift(0.5);

        assert_eq!(collision.transition, BondTransition::Bonded);
        assert!((kinetic_energy(&a, &b) - (ke0 + 1.0)).abs() < 1e-12);
        assert!((momentum(&a, &b) - p0).norm() < 1e-12);
        let separation = b.position.x - a.position.x;
        assert!(separation < 1.5);
        assert!((1.5 - separation - 3.0 * impulse::NUDGE).abs() < 1e-13);
    }

    #[test]
    fn unbonded_pair_inside_well_collides_immediately_when_approaching() {
        let potential = reactive([1, 1], false);
        let a = particle([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
        let b = particle([1.3, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
        assert_eq!(time(&potential, &a, &b, 0.0), 0.0);

        let b = particle([1.3, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
        assert_eq!(time(&potential, &a, &b, 0.0), f64::INFINITY);
    }

    #[test]
    fn unbonded_pair_outside_well_meets_edge() {
        let potential = reactive([1, 1], false);
        let a = particle([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
        let b = particle([3.0, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
        assert!((time(&potential, &a, &b, 0.0) - 1.5).abs() < 1e-12);
        assert!((time(&potential, &a, &b, 0.5) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn bonded_pair_predicts_core_when_approaching_and_edge_when_separating() {
        let potential = reactive([1, 1], true);
        let a = particle([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
        let b = particle([1.4, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
        assert!((time(&potential, &a, &b, 0.0) - 0.4).abs() < 1e-12);

        let a = particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
        let b = particle([1.2, 0.0, 0.0], [0.3, 0.0, 0.0], 1.0);
        assert!((time(&potential, &a, &b, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bonded_pair_missing_core_predicts_escape_root() {
        let potential = reactive([1, 1], true);
        let a = particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
        let b = particle([0.5, 1.2, 0.0], [-1.0, 0.0, 0.0], 1.0);
        assert!((time(&potential, &a, &b, 0.0) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn stretched_bond_separating_is_resolved_now() {
        let potential = reactive([1, 1], true);
        let a = particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
        let b = particle([1.6, 0.0, 0.0], [0.1, 0.0, 0.0], 1.0);
        assert_eq!(time(&potential, &a, &b, 0.25), 0.25);
    }

    #[test]
    fn tangent_approach_to_well_is_a_miss() {
        let potential = reactive([1, 1], false);
        let a = particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
        let b = particle([4.0, 1.5, 0.0], [-1.0, 0.0, 0.0], 1.0);
        assert_eq!(time(&potential, &a, &b, 0.0), f64::INFINITY);
    }

    #[test]
    fn energy_reflects_bond_state_not_separation() {
        let bonded = reactive([1, 1], true);
        let unbonded = reactive([1, 1], false);
        let a = particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
        let b = particle([1.2, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
        assert_eq!(bonded.energy(Pair::new(ids(), &a, &b), &OpenBoundary), -1.0);
        assert_eq!(unbonded.energy(Pair::new(ids(), &a, &b), &OpenBoundary), 0.0);
    }

    #[test]
    fn negative_bond_energy_is_rejected() {
        let well = SquareWell::new(1.0, 1.5, -1.0).unwrap();
        assert_eq!(
            ReactiveSquareWell::new(well, BondLedger::new()).unwrap_err(),
            ParamError::NegativeBondEnergy(-1.0)
        );
    }

    #[test]
    fn repeated_captures_never_exceed_valence() {
        let mut ledger = BondLedger::new();
        let hub = pid(0);
        let spokes: Vec<_> = (1..=4).map(pid).collect();
        ledger.register(hub, 2);
        for &spoke in &spokes {
            ledger.register(spoke, 1);
        }
        let mut potential =
            ReactiveSquareWell::new(SquareWell::new(1.0, 1.5, 1.0).unwrap(), ledger).unwrap();

        let mut transitions = Vec::new();
        for &spoke in &spokes {
            let mut a = particle([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
            let mut b = particle([1.5, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
            let collision = potential
                .bump(PairMut::new([hub, spoke], &mut a, &mut b), &OpenBoundary, 0.0)
                .unwrap();
            transitions.push(collision.transition);
            assert!(potential.ledger().bond_count(hub) <= 2);
        }

        assert_eq!(
            transitions,
            vec![
                BondTransition::Bonded,
                BondTransition::Bonded,
                BondTransition::Unchanged,
                BondTransition::Unchanged
            ]
        );
        assert!(potential.ledger().check_symmetry().is_ok());
    }
}
