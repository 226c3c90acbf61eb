use super::calendar::EventCalendar;
use super::config::{ConfigError, SimulationConfig};
use super::error::{EngineError, ParticleSnapshot};
use super::event::{CollisionEvent, EventRecord};
use super::observables::Observables;
use super::potential_table::PotentialTable;
use super::progress::{Progress, ProgressReporter};
use crate::core::bonding::BondLedger;
use crate::core::boundary::Boundary;
use crate::core::error::KernelError;
use crate::core::models::ids::{ParticleId, SpeciesId};
use crate::core::models::pair::Pair;
use crate::core::models::system::ParticleSystem;
use crate::core::potentials::BondTransition;
use slotmap::SecondaryMap;
use tracing::{debug, error, info, trace, warn};

/// Reference event-driven scheduler for hard-core potentials.
///
/// Every pair with an interaction is predicted once up front. After each
/// collision, the two particles (and, when a bond formed or broke, their
/// current bond partners) get a fresh collision count and are re-predicted
/// against every other particle. Calendar entries carrying an outdated
/// count are discarded when popped.
///
/// All particles are drifted to the time of each event before it is
/// resolved, so collisions are always resolved with a false time of zero.
#[derive(Debug)]
pub struct HardIntegrator {
    system: ParticleSystem,
    boundary: Box<dyn Boundary>,
    potentials: PotentialTable,
    calendar: EventCalendar,
    collision_counts: SecondaryMap<ParticleId, u64>,
    time: f64,
    time_step: f64,
    observables: Observables,
}

impl HardIntegrator {
    pub fn new(
        system: ParticleSystem,
        boundary: Box<dyn Boundary>,
        potentials: PotentialTable,
        time_step: f64,
    ) -> Result<Self, EngineError> {
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "time_step",
                reason: format!("must be positive and finite, got {}", time_step),
            }
            .into());
        }
        let mut collision_counts = SecondaryMap::new();
        for id in system.particle_ids() {
            collision_counts.insert(id, 0);
        }
        let mut integrator = Self {
            system,
            boundary,
            potentials,
            calendar: EventCalendar::new(),
            collision_counts,
            time: 0.0,
            time_step,
            observables: Observables::new(),
        };
        for [a, b] in integrator.overlapping_pairs() {
            warn!(?a, ?b, "Initial configuration has overlapping hard cores.");
        }
        integrator.rebuild_calendar()?;
        debug!(
            particles = integrator.system.particle_count(),
            events = integrator.calendar.len(),
            "Initial collision calendar built."
        );
        Ok(integrator)
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, EngineError> {
        let system = config.build_system()?;
        let boundary = config.boundary.build()?;
        let potentials = PotentialTable::from_config(config, &system)?;
        Self::new(system, boundary, potentials, config.integrator.time_step)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn boundary(&self) -> &dyn Boundary {
        self.boundary.as_ref()
    }

    pub fn potentials(&self) -> &PotentialTable {
        &self.potentials
    }

    pub fn observables(&self) -> &Observables {
        &self.observables
    }

    pub fn reset_observables(&mut self) {
        self.observables = Observables::new();
    }

    pub fn bond_ledger(&self) -> Option<&BondLedger> {
        self.potentials.bond_ledger()
    }

    pub fn pending_events(&self) -> usize {
        self.calendar.len()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.system.kinetic_energy()
    }

    /// Sum of pair energies; infinite if any hard cores overlap.
    pub fn potential_energy(&self) -> f64 {
        self.interacting_pairs()
            .filter_map(|[a, b]| self.pair_energy(a, b))
            .sum()
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.potential_energy()
    }

    pub fn pressure(&self) -> Option<f64> {
        self.observables
            .pressure(self.kinetic_energy(), self.boundary.volume())
    }

    pub fn temperature(&self) -> Option<f64> {
        Observables::temperature(self.kinetic_energy(), self.system.movable_count())
    }

    /// Pairs whose hard cores currently overlap.
    pub fn overlapping_pairs(&self) -> Vec<[ParticleId; 2]> {
        self.interacting_pairs()
            .filter(|&[a, b]| self.pair_energy(a, b).is_some_and(f64::is_infinite))
            .collect()
    }

    /// Discards every pending prediction and predicts all pairs afresh.
    pub fn rebuild_calendar(&mut self) -> Result<(), EngineError> {
        self.calendar.clear();
        let events = self
            .interacting_pairs()
            .map(|[a, b]| self.predict(a, b))
            .collect::<Result<Vec<_>, _>>()?;
        for event in events.into_iter().flatten() {
            self.calendar.push(event);
        }
        Ok(())
    }

    /// Advances by one time step.
    pub fn step(&mut self) -> Result<usize, EngineError> {
        self.step_with(&mut |_: &EventRecord| {})
    }

    pub fn step_with(&mut self, sink: &mut dyn FnMut(&EventRecord)) -> Result<usize, EngineError> {
        let target = self.time + self.time_step;
        self.advance_to(target, sink)
    }

    /// Processes every collision up to absolute time `target` and drifts all
    /// particles there. Returns the number of collisions resolved.
    pub fn advance_to(
        &mut self,
        target: f64,
        sink: &mut dyn FnMut(&EventRecord),
    ) -> Result<usize, EngineError> {
        if !target.is_finite() || target < self.time {
            return Err(EngineError::InvalidTarget {
                target,
                current: self.time,
            });
        }
        let mut processed = 0;
        while let Some(event) = self.calendar.pop_due(target) {
            let [a, b] = event.pair;
            if !event.is_valid([self.count(a), self.count(b)]) {
                continue;
            }
            self.drift_to(event.time_f64());
            self.resolve(event, sink)?;
            processed += 1;
        }
        self.drift_to(target);
        Ok(processed)
    }

    /// Runs `steps` time steps, reporting progress after each.
    pub fn run(
        &mut self,
        steps: usize,
        reporter: &ProgressReporter,
        sink: &mut dyn FnMut(&EventRecord),
    ) -> Result<(), EngineError> {
        reporter.report(Progress::PhaseStart {
            name: "Event-Driven Dynamics",
        });
        reporter.report(Progress::TaskStart {
            total_steps: steps as u64,
        });
        for _ in 0..steps {
            self.step_with(sink)?;
            reporter.report(Progress::StepFinished {
                time: self.time,
                collisions: self.observables.collisions,
            });
        }
        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);

        info!(
            time = self.time,
            collisions = self.observables.collisions,
            bonds_formed = self.observables.bonds_formed,
            bonds_broken = self.observables.bonds_broken,
            kinetic_energy = self.kinetic_energy(),
            "Run finished."
        );
        Ok(())
    }

    fn resolve(
        &mut self,
        event: CollisionEvent,
        sink: &mut dyn FnMut(&EventRecord),
    ) -> Result<(), EngineError> {
        let [a, b] = event.pair;
        let species_a = self.particle_species(a)?;
        let species_b = self.particle_species(b)?;
        let Some(index) = self.potentials.index(species_a, species_b) else {
            return Ok(());
        };

        let result = {
            let Some(potential) = self.potentials.potential_mut(index) else {
                return Ok(());
            };
            let pair = self
                .system
                .pair_mut(a, b)
                .ok_or(EngineError::UnknownParticle(a))?;
            let name = potential.name();
            potential
                .bump(pair, self.boundary.as_ref(), 0.0)
                .map(|collision| (collision, name))
        };
        let (collision, potential_name) = result.map_err(|source| self.fatal(source))?;

        self.observables.record(&collision);
        self.increment_count(a);
        self.increment_count(b);
        sink(&EventRecord {
            time: self.time,
            pair: event.pair,
            potential: potential_name,
            virial: collision.virial,
            energy_change: collision.energy_change,
            transition: collision.transition,
        });
        trace!(
            time = self.time,
            ?a,
            ?b,
            potential = potential_name,
            virial = collision.virial,
            "Collision resolved."
        );

        let mut affected = vec![a, b];
        if collision.transition != BondTransition::Unchanged {
            debug!(
                time = self.time,
                ?a,
                ?b,
                transition = ?collision.transition,
                "Bond state changed."
            );
            if let Some(ledger) = self.potentials.potential(index).and_then(|p| p.bond_ledger()) {
                for id in [a, b] {
                    for partner in ledger.partners(id) {
                        if !affected.contains(&partner) {
                            affected.push(partner);
                        }
                    }
                }
            }
            for &id in &affected[2..] {
                self.increment_count(id);
            }
            if cfg!(debug_assertions) {
                if let Some(Err(source)) = self.bond_ledger().map(BondLedger::check_symmetry) {
                    return Err(self.fatal(source));
                }
            }
        }
        for id in affected {
            self.reschedule(id)?;
        }
        Ok(())
    }

    fn reschedule(&mut self, id: ParticleId) -> Result<(), EngineError> {
        let events = self
            .system
            .particles_iter()
            .filter(|&(other, _)| other != id)
            .map(|(other, _)| self.predict(id, other))
            .collect::<Result<Vec<_>, _>>()?;
        for event in events.into_iter().flatten() {
            self.calendar.push(event);
        }
        Ok(())
    }

    fn predict(&self, a: ParticleId, b: ParticleId) -> Result<Option<CollisionEvent>, EngineError> {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        let first = self.system.particle(a).ok_or(EngineError::UnknownParticle(a))?;
        let second = self.system.particle(b).ok_or(EngineError::UnknownParticle(b))?;
        let Some(potential) = self.potentials.get(first.species, second.species) else {
            return Ok(None);
        };
        let dt = potential
            .collision_time(Pair::new([a, b], first, second), self.boundary.as_ref(), 0.0)
            .map_err(|source| self.fatal(source))?;
        Ok(CollisionEvent::new(
            self.time + dt,
            [a, b],
            [self.count(a), self.count(b)],
        ))
    }

    fn drift_to(&mut self, time: f64) {
        let dt = time - self.time;
        if dt > 0.0 {
            self.system.drift_all(dt);
            for (_, particle) in self.system.particles_iter_mut() {
                particle.position = self.boundary.wrap(particle.position);
            }
            self.observables.advance(dt);
            self.time = time;
        }
    }

    fn fatal(&self, source: KernelError) -> EngineError {
        let mut ids = source.particles();
        ids.dedup();
        let ledger = self.potentials.bond_ledger();
        let snapshot: Vec<_> = ids
            .into_iter()
            .filter_map(|id| {
                let particle = self.system.particle(id)?;
                Some(ParticleSnapshot {
                    id,
                    position: particle.position,
                    velocity: particle.velocity,
                    partners: ledger
                        .map(|l| l.partners(id).collect())
                        .unwrap_or_default(),
                })
            })
            .collect();
        error!(time = self.time, error = %source, "Fatal collision-kernel violation; stopping.");
        for particle in &snapshot {
            error!("  {}", particle);
        }
        EngineError::Fatal {
            time: self.time,
            snapshot,
            source,
        }
    }

    fn interacting_pairs(&self) -> impl Iterator<Item = [ParticleId; 2]> + '_ {
        let ids = self.system.particle_ids();
        (0..ids.len()).flat_map(move |i| {
            let ids = ids.clone();
            (i + 1..ids.len()).map(move |j| [ids[i], ids[j]])
        })
    }

    fn pair_energy(&self, a: ParticleId, b: ParticleId) -> Option<f64> {
        let pair = self.system.pair(a, b)?;
        let potential = self
            .potentials
            .get(pair.first.species, pair.second.species)?;
        Some(potential.energy(pair, self.boundary.as_ref()))
    }

    fn particle_species(&self, id: ParticleId) -> Result<SpeciesId, EngineError> {
        self.system
            .particle(id)
            .map(|p| p.species)
            .ok_or(EngineError::UnknownParticle(id))
    }

    #[inline]
    fn count(&self, id: ParticleId) -> u64 {
        self.collision_counts.get(id).copied().unwrap_or(0)
    }

    fn increment_count(&mut self, id: ParticleId) {
        if let Some(count) = self.collision_counts.get_mut(id) {
            *count += 1;
        }
    }
}
