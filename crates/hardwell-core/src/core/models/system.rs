use super::ids::{ParticleId, SpeciesId};
use super::pair::{Pair, PairMut};
use super::particle::Particle;
use super::species::Species;
use nalgebra::{Point3, Vector3};
use slotmap::SlotMap;
use std::collections::HashMap;

/// The particle store consumed by the collision kernel.
///
/// Particles and species live in dense slot-map arenas keyed by typed ids, so
/// handles stay valid and cheap to copy for the whole run. The system never
/// interprets interactions; it only hands out particles and pairs.
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    /// Primary storage for particles.
    particles: SlotMap<ParticleId, Particle>,
    /// Primary storage for species.
    species: SlotMap<SpeciesId, Species>,
    /// Lookup map for finding species by name.
    species_name_map: HashMap<String, SpeciesId>,
}

impl ParticleSystem {
    /// Creates a new, empty particle system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a species or returns the id of an existing species with the same name.
    ///
    /// This method is idempotent with respect to the name: registering a name
    /// twice keeps the first definition.
    ///
    /// # Arguments
    ///
    /// * `species` - The species definition to register.
    ///
    /// # Return
    ///
    /// The ID of the species (new or existing).
    pub fn add_species(&mut self, species: Species) -> SpeciesId {
        if let Some(&id) = self.species_name_map.get(&species.name) {
            return id;
        }
        let name = species.name.clone();
        let id = self.species.insert(species);
        self.species_name_map.insert(name, id);
        id
    }

    /// Retrieves a species by its ID.
    pub fn species(&self, id: SpeciesId) -> Option<&Species> {
        self.species.get(id)
    }

    /// Finds a species ID by its name.
    pub fn find_species_by_name(&self, name: &str) -> Option<SpeciesId> {
        self.species_name_map.get(name).copied()
    }

    /// Returns an iterator over all species in the system.
    pub fn species_iter(&self) -> impl Iterator<Item = (SpeciesId, &Species)> {
        self.species.iter()
    }

    /// Adds a particle of the given species.
    ///
    /// The particle's inverse mass is taken from its species.
    ///
    /// # Arguments
    ///
    /// * `species_id` - The species of the new particle.
    /// * `position` - Initial center position.
    /// * `velocity` - Initial velocity.
    ///
    /// # Return
    ///
    /// Returns `Some(ParticleId)` if successful, otherwise `None` (the species doesn't exist).
    pub fn add_particle(
        &mut self,
        species_id: SpeciesId,
        position: Point3<f64>,
        velocity: Vector3<f64>,
    ) -> Option<ParticleId> {
        let inverse_mass = self.species.get(species_id)?.inverse_mass();
        let particle = Particle::new(species_id, position, inverse_mass).with_velocity(velocity);
        Some(self.particles.insert(particle))
    }

    /// Retrieves an immutable reference to a particle by its ID.
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    /// Retrieves a mutable reference to a particle by its ID.
    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.get_mut(id)
    }

    /// Returns an iterator over all particles in the system.
    pub fn particles_iter(&self) -> impl Iterator<Item = (ParticleId, &Particle)> {
        self.particles.iter()
    }

    /// Returns a mutable iterator over all particles in the system.
    pub fn particles_iter_mut(&mut self) -> impl Iterator<Item = (ParticleId, &mut Particle)> {
        self.particles.iter_mut()
    }

    /// Returns the IDs of all particles in storage order.
    pub fn particle_ids(&self) -> Vec<ParticleId> {
        self.particles.keys().collect()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Returns a read-only pair handle, or `None` if either particle is missing
    /// or both ids are the same.
    pub fn pair(&self, a: ParticleId, b: ParticleId) -> Option<Pair<'_>> {
        if a == b {
            return None;
        }
        let first = self.particles.get(a)?;
        let second = self.particles.get(b)?;
        Some(Pair::new([a, b], first, second))
    }

    /// Returns a mutable pair handle, or `None` if either particle is missing
    /// or both ids are the same.
    pub fn pair_mut(&mut self, a: ParticleId, b: ParticleId) -> Option<PairMut<'_>> {
        let [first, second] = self.particles.get_disjoint_mut([a, b])?;
        Some(PairMut::new([a, b], first, second))
    }

    /// Total kinetic energy of all particles.
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.values().map(Particle::kinetic_energy).sum()
    }

    /// Total linear momentum of all movable particles.
    pub fn total_momentum(&self) -> Vector3<f64> {
        self.particles
            .values()
            .fold(Vector3::zeros(), |acc, p| acc + p.momentum())
    }

    /// Number of particles with finite mass, i.e. those carrying kinetic degrees of freedom.
    pub fn movable_count(&self) -> usize {
        self.particles
            .values()
            .filter(|p| p.inverse_mass > 0.0)
            .count()
    }

    /// Drifts every particle along its velocity for `dt`.
    pub fn drift_all(&mut self, dt: f64) {
        for particle in self.particles.values_mut() {
            particle.drift(dt);
        }
    }
}
