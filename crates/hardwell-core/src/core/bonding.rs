use super::error::{KernelError, LedgerSide};
use super::models::ids::ParticleId;
use super::models::system::ParticleSystem;
use slotmap::SecondaryMap;

/// Reactive bond bookkeeping for square-well association.
///
/// Each registered particle owns a fixed number of partner slots equal to its
/// valence; an empty slot is `None`. Every mutation writes or clears both
/// sides of a bond together, so after any successful call the ledger is
/// symmetric: if `a` lists `b`, then `b` lists `a`.
#[derive(Debug, Clone, Default)]
pub struct BondLedger {
    slots: SecondaryMap<ParticleId, Box<[Option<ParticleId>]>>,
}

impl BondLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger with every particle registered at its species' valence.
    pub fn for_system(system: &ParticleSystem) -> Self {
        let mut ledger = Self::new();
        for (id, particle) in system.particles_iter() {
            let valence = system
                .species(particle.species)
                .map_or(0, |species| species.valence);
            ledger.register(id, valence);
        }
        ledger
    }

    /// Gives `id` `valence` empty slots.
    ///
    /// Returns `false` and leaves the existing slots untouched if `id` is
    /// already registered.
    pub fn register(&mut self, id: ParticleId, valence: usize) -> bool {
        if self.slots.contains_key(id) {
            return false;
        }
        self.slots.insert(id, vec![None; valence].into_boxed_slice());
        true
    }

    pub fn is_registered(&self, id: ParticleId) -> bool {
        self.slots.contains_key(id)
    }

    /// Maximum number of bonds `id` may hold; zero if unregistered.
    pub fn valence(&self, id: ParticleId) -> usize {
        self.slots.get(id).map_or(0, |slots| slots.len())
    }

    /// True iff every slot of `a` is occupied. Unregistered particles have no
    /// slots and are therefore always full.
    pub fn full(&self, a: ParticleId) -> bool {
        self.slots
            .get(a)
            .is_none_or(|slots| slots.iter().all(Option::is_some))
    }

    /// Index of the first free slot of `a`, or its valence when none is free.
    pub fn lowest(&self, a: ParticleId) -> usize {
        match self.slots.get(a) {
            Some(slots) => slots
                .iter()
                .position(Option::is_none)
                .unwrap_or(slots.len()),
            None => 0,
        }
    }

    /// True iff `b` occupies one of `a`'s slots.
    pub fn are_bonded(&self, a: ParticleId, b: ParticleId) -> bool {
        self.slots
            .get(a)
            .is_some_and(|slots| slots.contains(&Some(b)))
    }

    /// Current partners of `a`.
    pub fn partners(&self, a: ParticleId) -> impl Iterator<Item = ParticleId> + '_ {
        self.slots
            .get(a)
            .into_iter()
            .flat_map(|slots| slots.iter().flatten().copied())
    }

    pub fn bond_count(&self, a: ParticleId) -> usize {
        self.partners(a).count()
    }

    /// Number of distinct bonds in the ledger.
    pub fn total_bonds(&self) -> usize {
        self.slots
            .values()
            .map(|slots| slots.iter().flatten().count())
            .sum::<usize>()
            / 2
    }

    /// Bonds `a` and `b` by writing each into the other's lowest free slot.
    ///
    /// Bonding an already bonded pair is a no-op. Both sides are checked
    /// before either is written.
    ///
    /// # Errors
    ///
    /// * [`KernelError::UnknownParticle`] if either side is unregistered.
    /// * [`KernelError::ValenceOverflow`] if either side is already full.
    pub fn bond(&mut self, a: ParticleId, b: ParticleId) -> Result<(), KernelError> {
        debug_assert_ne!(a, b, "a particle cannot bond to itself");
        self.ensure_registered(a)?;
        self.ensure_registered(b)?;
        if self.are_bonded(a, b) {
            return Ok(());
        }
        let i = self.free_slot(a)?;
        let j = self.free_slot(b)?;
        self.slots[a][i] = Some(b);
        self.slots[b][j] = Some(a);
        Ok(())
    }

    /// Removes the bond between `a` and `b` from both sides.
    ///
    /// Both entries are located before either is cleared, so a failing call
    /// leaves the ledger exactly as it was.
    ///
    /// # Errors
    ///
    /// * [`KernelError::UnknownParticle`] if either side is unregistered.
    /// * [`KernelError::NotBonded`] if neither side lists the other.
    /// * [`KernelError::AsymmetricBond`] if only one side lists the other;
    ///   `side` names the one missing its entry.
    pub fn unbond(&mut self, a: ParticleId, b: ParticleId) -> Result<(), KernelError> {
        self.ensure_registered(a)?;
        self.ensure_registered(b)?;
        match (self.slot_of(a, b), self.slot_of(b, a)) {
            (Some(i), Some(j)) => {
                self.slots[a][i] = None;
                self.slots[b][j] = None;
                Ok(())
            }
            (Some(_), None) => Err(KernelError::AsymmetricBond {
                a,
                b,
                side: LedgerSide::Second,
            }),
            (None, Some(_)) => Err(KernelError::AsymmetricBond {
                a,
                b,
                side: LedgerSide::First,
            }),
            (None, None) => Err(KernelError::NotBonded { a, b }),
        }
    }

    /// Audits the whole ledger for one-sided entries and dangling partners.
    pub fn check_symmetry(&self) -> Result<(), KernelError> {
        for (a, slots) in self.slots.iter() {
            for &b in slots.iter().flatten() {
                if !self.is_registered(b) {
                    return Err(KernelError::UnknownParticle(b));
                }
                if !self.are_bonded(b, a) {
                    return Err(KernelError::AsymmetricBond {
                        a,
                        b,
                        side: LedgerSide::Second,
                    });
                }
            }
        }
        Ok(())
    }

    fn ensure_registered(&self, id: ParticleId) -> Result<(), KernelError> {
        if self.is_registered(id) {
            Ok(())
        } else {
            Err(KernelError::UnknownParticle(id))
        }
    }

    fn free_slot(&self, id: ParticleId) -> Result<usize, KernelError> {
        let index = self.lowest(id);
        let valence = self.valence(id);
        if index < valence {
            Ok(index)
        } else {
            Err(KernelError::ValenceOverflow {
                particle: id,
                valence,
            })
        }
    }

    fn slot_of(&self, owner: ParticleId, partner: ParticleId) -> Option<usize> {
        self.slots
            .get(owner)?
            .iter()
            .position(|slot| *slot == Some(partner))
    }
}
