use super::ids::ParticleId;
use super::particle::Particle;

/// Read-only handle on an unordered particle pair, as seen by collision-time prediction.
///
/// The order of `first` and `second` fixes the sign convention of the pair
/// kinematics: displacements and relative velocities point from `first` to
/// `second`.
#[derive(Debug, Clone, Copy)]
pub struct Pair<'a> {
    pub ids: [ParticleId; 2],
    pub first: &'a Particle,
    pub second: &'a Particle,
}

impl<'a> Pair<'a> {
    pub fn new(ids: [ParticleId; 2], first: &'a Particle, second: &'a Particle) -> Self {
        Self { ids, first, second }
    }
}

/// Mutable handle on a particle pair, handed to collision resolution.
#[derive(Debug)]
pub struct PairMut<'a> {
    pub ids: [ParticleId; 2],
    pub first: &'a mut Particle,
    pub second: &'a mut Particle,
}

impl<'a> PairMut<'a> {
    pub fn new(ids: [ParticleId; 2], first: &'a mut Particle, second: &'a mut Particle) -> Self {
        Self { ids, first, second }
    }

    /// Reborrows the pair immutably.
    pub fn as_pair(&self) -> Pair<'_> {
        Pair {
            ids: self.ids,
            first: self.first,
            second: self.second,
        }
    }

    /// Total kinetic energy of the two particles.
    pub fn kinetic_energy(&self) -> f64 {
        self.first.kinetic_energy() + self.second.kinetic_energy()
    }
}
