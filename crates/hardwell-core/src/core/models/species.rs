/// A particle type shared by many particles.
///
/// Species carry the type-level properties that do not depend on the partner
/// of an interaction: the mass of every member and the maximum number of
/// simultaneous reactive bonds a member may hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    /// Unique name used to refer to the species in configuration files.
    pub name: String,
    /// Mass of every particle of this species. `f64::INFINITY` makes members immovable.
    pub mass: f64,
    /// Maximum number of reactive bonds a member may hold at once.
    pub valence: usize,
}

impl Species {
    pub fn new(name: &str, mass: f64, valence: usize) -> Self {
        Self {
            name: name.to_string(),
            mass,
            valence,
        }
    }

    /// Inverse mass handed to particles of this species.
    #[inline]
    pub fn inverse_mass(&self) -> f64 {
        if self.mass.is_infinite() {
            0.0
        } else {
            1.0 / self.mass
        }
    }
}
