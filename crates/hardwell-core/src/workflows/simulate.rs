use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::event::EventRecord;
use crate::engine::integrator::HardIntegrator;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub time: f64,
    pub particles: usize,
    pub collisions: u64,
    /// Collisions per unit time; `None` if no time has elapsed.
    pub collision_rate: Option<f64>,
    pub bonds_formed: u64,
    pub bonds_broken: u64,
    /// Bonds present at the end of the run.
    pub bonds: usize,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
}

impl SimulationReport {
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }

    fn from_integrator(integrator: &HardIntegrator) -> Self {
        let observables = integrator.observables();
        Self {
            time: integrator.time(),
            particles: integrator.system().particle_count(),
            collisions: observables.collisions,
            collision_rate: observables.collision_rate(),
            bonds_formed: observables.bonds_formed,
            bonds_broken: observables.bonds_broken,
            bonds: integrator.bond_ledger().map_or(0, |l| l.total_bonds()),
            kinetic_energy: integrator.kinetic_energy(),
            potential_energy: integrator.potential_energy(),
            pressure: integrator.pressure(),
            temperature: integrator.temperature(),
        }
    }
}

/// Builds the system described by `config` and integrates it for the
/// configured number of steps. Every resolved collision is handed to `sink`.
#[instrument(skip_all, name = "simulation_workflow")]
pub fn run(
    config: &SimulationConfig,
    reporter: &ProgressReporter,
    sink: &mut dyn FnMut(&EventRecord),
) -> Result<SimulationReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let mut integrator = HardIntegrator::from_config(config)?;
    info!(
        particles = integrator.system().particle_count(),
        interactions = integrator.potentials().len(),
        events = integrator.pending_events(),
        "System prepared."
    );
    reporter.report(Progress::PhaseFinish);

    integrator.run(config.integrator.steps, reporter, sink)?;

    let report = SimulationReport::from_integrator(&integrator);
    info!(
        time = report.time,
        collisions = report.collisions,
        total_energy = report.total_energy(),
        "Workflow complete."
    );
    Ok(report)
}
