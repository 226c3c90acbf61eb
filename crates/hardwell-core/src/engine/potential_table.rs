use super::config::{ConfigError, SimulationConfig};
use crate::core::bonding::BondLedger;
use crate::core::models::ids::SpeciesId;
use crate::core::models::system::ParticleSystem;
use crate::core::potentials::PairPotential;
use crate::core::potentials::bonded::ReactiveSquareWell;
use crate::core::potentials::hard_sphere::HardSphere;
use crate::core::potentials::params::PotentialParams;
use crate::core::potentials::square_well::SquareWell;
use std::collections::HashMap;

/// Maps unordered species pairs to the potential acting between them.
///
/// Species pairs without an entry do not interact.
#[derive(Debug, Default)]
pub struct PotentialTable {
    potentials: Vec<Box<dyn PairPotential>>,
    lookup: HashMap<(SpeciesId, SpeciesId), usize>,
}

impl PotentialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every configured interaction. A reactive well gets a ledger
    /// registering all particles of `system` at their species' valence.
    pub fn from_config(
        config: &SimulationConfig,
        system: &ParticleSystem,
    ) -> Result<Self, ConfigError> {
        let mut table = Self::new();
        for interaction in &config.interactions {
            let [a, b] = &interaction.species;
            let lookup = |name: &String| {
                system
                    .find_species_by_name(name)
                    .ok_or_else(|| ConfigError::UnknownSpecies(name.clone()))
            };
            let (id_a, id_b) = (lookup(a)?, lookup(b)?);
            let invalid = |source| ConfigError::Potential {
                a: a.clone(),
                b: b.clone(),
                source,
            };
            let potential: Box<dyn PairPotential> = match &interaction.params {
                PotentialParams::HardSphere(p) => {
                    Box::new(HardSphere::from_params(p).map_err(invalid)?)
                }
                PotentialParams::SquareWell(p) => {
                    Box::new(SquareWell::from_params(p).map_err(invalid)?)
                }
                PotentialParams::SquareWellBonded(p) => Box::new(
                    ReactiveSquareWell::from_params(p, BondLedger::for_system(system))
                        .map_err(invalid)?,
                ),
            };
            table.insert(id_a, id_b, potential);
        }
        Ok(table)
    }

    /// Registers `potential` for the pair `{a, b}`, replacing any earlier entry.
    pub fn insert(&mut self, a: SpeciesId, b: SpeciesId, potential: Box<dyn PairPotential>) -> usize {
        let index = self.potentials.len();
        self.potentials.push(potential);
        self.lookup.insert((a, b), index);
        self.lookup.insert((b, a), index);
        index
    }

    pub fn index(&self, a: SpeciesId, b: SpeciesId) -> Option<usize> {
        self.lookup.get(&(a, b)).copied()
    }

    pub fn get(&self, a: SpeciesId, b: SpeciesId) -> Option<&dyn PairPotential> {
        self.index(a, b).and_then(|index| self.potential(index))
    }

    pub fn potential(&self, index: usize) -> Option<&dyn PairPotential> {
        self.potentials.get(index).map(|p| p.as_ref())
    }

    pub fn potential_mut(&mut self, index: usize) -> Option<&mut (dyn PairPotential + 'static)> {
        self.potentials.get_mut(index).map(|p| p.as_mut())
    }

    /// The ledger of the reactive potential, if one is installed.
    pub fn bond_ledger(&self) -> Option<&BondLedger> {
        self.potentials.iter().find_map(|p| p.bond_ledger())
    }

    pub fn len(&self) -> usize {
        self.potentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.potentials.is_empty()
    }
}
