use super::ids::SpeciesId;
use nalgebra::{Point3, Vector3};

/// A kinetic particle taking part in event-driven dynamics.
///
/// Particles carry only the state the collision kernel needs: where they are,
/// how fast they move, how hard they are to push, and which species they
/// belong to. All interaction parameters live on the potential for a species
/// pair, not on the particle itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// The species this particle belongs to.
    pub species: SpeciesId,
    /// Center position in simulation length units.
    pub position: Point3<f64>,
    /// Velocity in simulation length per time units.
    pub velocity: Vector3<f64>,
    /// Inverse mass. Zero marks an immovable (infinitely heavy) particle.
    pub inverse_mass: f64,
}

impl Particle {
    /// Creates a particle at rest with the given inverse mass.
    ///
    /// # Arguments
    ///
    /// * `species` - The species this particle belongs to.
    /// * `position` - The initial center position.
    /// * `inverse_mass` - `1 / m`, or `0.0` for an infinitely heavy particle.
    pub fn new(species: SpeciesId, position: Point3<f64>, inverse_mass: f64) -> Self {
        Self {
            species,
            position,
            velocity: Vector3::zeros(),
            inverse_mass,
        }
    }

    /// Returns a copy of this particle with the given velocity.
    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Mass of the particle, `f64::INFINITY` when the inverse mass is zero.
    #[inline]
    pub fn mass(&self) -> f64 {
        if self.inverse_mass > 0.0 {
            1.0 / self.inverse_mass
        } else {
            f64::INFINITY
        }
    }

    /// Kinetic energy `½ m |v|²`; zero for immovable particles.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        if self.inverse_mass > 0.0 {
            0.5 * self.velocity.norm_squared() / self.inverse_mass
        } else {
            0.0
        }
    }

    /// Linear momentum `m v`; zero for immovable particles.
    #[inline]
    pub fn momentum(&self) -> Vector3<f64> {
        if self.inverse_mass > 0.0 {
            self.velocity / self.inverse_mass
        } else {
            Vector3::zeros()
        }
    }

    /// Moves the particle along its current velocity for `dt`.
    #[inline]
    pub fn drift(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species() -> SpeciesId {
        SpeciesId::default()
    }

    #[test]
    fn new_particle_starts_at_rest() {
        let p = Particle::new(species(), Point3::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(p.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(p.velocity, Vector3::zeros());
        assert_eq!(p.inverse_mass, 0.5);
    }

    #[test]
    fn mass_is_reciprocal_of_inverse_mass() {
        let p = Particle::new(species(), Point3::origin(), 0.25);
        assert_eq!(p.mass(), 4.0);
    }

    #[test]
    fn zero_inverse_mass_means_infinite_mass() {
        let p = Particle::new(species(), Point3::origin(), 0.0)
            .with_velocity(Vector3::new(1.0, 0.0, 0.0));
        assert!(p.mass().is_infinite());
        assert_eq!(p.kinetic_energy(), 0.0);
        assert_eq!(p.momentum(), Vector3::zeros());
    }

    #[test]
    fn kinetic_energy_and_momentum_follow_mass() {
        // m = 2, v = (3, 4, 0): KE = 0.5 * 2 * 25, p = (6, 8, 0)
        let p = Particle::new(species(), Point3::origin(), 0.5)
            .with_velocity(Vector3::new(3.0, 4.0, 0.0));
        assert!((p.kinetic_energy() - 25.0).abs() < 1e-12);
        assert_eq!(p.momentum(), Vector3::new(6.0, 8.0, 0.0));
    }

    #[test]
    fn drift_moves_along_velocity() {
        let mut p = Particle::new(species(), Point3::new(1.0, 0.0, 0.0), 1.0)
            .with_velocity(Vector3::new(-2.0, 1.0, 0.0));
        p.drift(0.5);
        assert_eq!(p.position, Point3::new(0.0, 0.5, 0.0));
    }
}
