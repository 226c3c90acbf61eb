use crate::core::kinematics::PairState;
use crate::core::models::pair::PairMut;

/// Magnitude of the positional nudge applied after a well-edge event.
pub const NUDGE: f64 = 1e-10;

/// Direction of the post-collision separation nudge along the line of centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    None,
    /// Pulls the pair together, e.g. after capture or an inner-edge reflection.
    Inward,
    /// Pushes the pair apart, e.g. after escape or an outer-edge reflection.
    Outward,
}

impl Nudge {
    fn signed(self) -> f64 {
        match self {
            Nudge::None => 0.0,
            Nudge::Inward => -NUDGE,
            Nudge::Outward => NUDGE,
        }
    }
}

/// Reduced mass `2 / (1/m1 + 1/m2)`, or `None` when both masses are infinite.
#[inline]
pub fn reduced_mass(pair: &PairMut<'_>) -> Option<f64> {
    let rm_sum = pair.first.inverse_mass + pair.second.inverse_mass;
    (rm_sum > 0.0).then(|| 2.0 / rm_sum)
}

/// Normal kinetic energy `bij² μ / (4 r2)` of the relative motion along `dr`.
#[inline]
pub fn normal_kinetic_energy(state: &PairState, reduced_mass: f64) -> f64 {
    let bij = state.bij();
    bij * bij * reduced_mass / (4.0 * state.r2)
}

/// Applies an impulse of virial `virial` along the line of centers.
///
/// Velocities change by `±rm·(virial/r2)·dr`; positions are pulled back by
/// the same term scaled by `false_time`, so that after the caller advances
/// the pair by `false_time` it sits where an exactly timed collision would
/// have left it. Immovable particles (`rm == 0`) never move.
pub fn apply(
    pair: &mut PairMut<'_>,
    state: &PairState,
    virial: f64,
    false_time: f64,
    nudge: Nudge,
) {
    let rm1 = pair.first.inverse_mass;
    let rm2 = pair.second.inverse_mass;
    let imp = state.dr * (virial / state.r2);

    pair.first.velocity += imp * rm1;
    pair.second.velocity -= imp * rm2;
    pair.first.position -= imp * (false_time * rm1);
    pair.second.position += imp * (false_time * rm2);

    let nudge = nudge.signed();
    if nudge != 0.0 {
        if rm1 > 0.0 {
            pair.first.position -= state.dr * nudge;
        }
        if rm2 > 0.0 {
            pair.second.position += state.dr * nudge;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::boundary::OpenBoundary;
    use crate::core::models::ids::{ParticleId, SpeciesId};
    use crate::core::models::particle::Particle;
    use nalgebra::{Point3, Vector3};

    fn particle(x: f64, v: f64, rm: f64) -> Particle {
        Particle::new(SpeciesId::default(), Point3::new(x, 0.0, 0.0), rm)
            .with_velocity(Vector3::new(v, 0.0, 0.0))
    }

    fn ids() -> [ParticleId; 2] {
        [ParticleId::default(); 2]
    }

    #[test]
    fn reduced_mass_matches_two_body_formula() {
        let mut a = particle(0.0, 0.0, 1.0);
        let mut b = particle(1.0, 0.0, 0.5);
        let pair = PairMut::new(ids(), &mut a, &mut b);
        assert!((reduced_mass(&pair).unwrap() - 2.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn reduced_mass_is_undefined_for_two_immovable_particles() {
        let mut a = particle(0.0, 0.0, 0.0);
        let mut b = particle(1.0, 0.0, 0.0);
        let pair = PairMut::new(ids(), &mut a, &mut b);
        assert_eq!(reduced_mass(&pair), None);
    }

    #[test]
    fn impulse_conserves_momentum_for_unequal_masses() {
        let mut a = particle(0.0, 1.0, 1.0);
        let mut b = particle(1.0, -0.5, 0.25);
        let before = a.momentum() + b.momentum();
        let state = PairState::compute(&a, &b, 0.0, &OpenBoundary);
        let mut pair = PairMut::new(ids(), &mut a, &mut b);
        apply(&mut pair, &state, -0.7, 0.0, Nudge::None);
        let after = a.momentum() + b.momentum();
        assert!((after - before).norm() < 1e-12);
    }

    #[test]
    fn false_time_correction_pulls_positions_back_along_impulse() {
        let mut a = particle(0.0, 1.0, 1.0);
        let mut b = particle(2.0, -1.0, 1.0);
        let state = PairState::compute(&a, &b, 0.5, &OpenBoundary);
        let mut pair = PairMut::new(ids(), &mut a, &mut b);
        // dr = (1, 0, 0), J = -2: imp = (-2, 0, 0)
        apply(&mut pair, &state, -2.0, 0.5, Nudge::None);
        assert!((a.position.x - 1.0).abs() < 1e-12);
        assert!((b.position.x - 1.0).abs() < 1e-12);
        a.drift(0.5);
        b.drift(0.5);
        assert!((b.position.x - a.position.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nudge_moves_only_movable_particles() {
        let mut a = particle(0.0, 0.0, 0.0);
        let mut b = particle(1.5, 0.0, 1.0);
        let state = PairState::compute(&a, &b, 0.0, &OpenBoundary);
        let mut pair = PairMut::new(ids(), &mut a, &mut b);
        apply(&mut pair, &state, 0.0, 0.0, Nudge::Inward);
        assert_eq!(a.position.x, 0.0);
        assert!(b.position.x < 1.5);
        assert!((1.5 - b.position.x - 1.5 * NUDGE).abs() < 1e-15);
    }
}
