use crate::cli::RunArgs;
use crate::config::PartialSimulationConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use hardwell::core::models::ids::ParticleId;
use hardwell::core::potentials::BondTransition;
use hardwell::engine::config::SimulationConfig;
use hardwell::engine::event::EventRecord;
use hardwell::engine::progress::ProgressReporter;
use hardwell::workflows::{self, simulate::SimulationReport};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Serialize, PartialEq)]
struct EventRow {
    time: f64,
    first: usize,
    second: usize,
    potential: &'static str,
    virial: f64,
    energy_change: f64,
    transition: &'static str,
}

/// CSV writer for resolved collisions. Particles are numbered in the order
/// they appear in the configuration file.
struct EventLog {
    writer: csv::Writer<File>,
    indices: HashMap<ParticleId, usize>,
    error: Option<csv::Error>,
}

impl EventLog {
    fn create(path: &Path, config: &SimulationConfig) -> Result<Self> {
        let system = config.build_system().map_err(|e| CliError::Config(e.to_string()))?;
        let indices = system
            .particle_ids()
            .into_iter()
            .enumerate()
            .map(|(index, id)| (id, index))
            .collect();
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
            indices,
            error: None,
        })
    }

    fn row(&self, record: &EventRecord) -> EventRow {
        let index = |id: ParticleId| self.indices.get(&id).copied().unwrap_or(usize::MAX);
        EventRow {
            time: record.time,
            first: index(record.pair[0]),
            second: index(record.pair[1]),
            potential: record.potential,
            virial: record.virial,
            energy_change: record.energy_change,
            transition: match record.transition {
                BondTransition::Unchanged => "none",
                BondTransition::Bonded => "bonded",
                BondTransition::Unbonded => "unbonded",
            },
        }
    }

    /// Keeps the first write error and stops writing after it.
    fn record(&mut self, record: &EventRecord) {
        if self.error.is_some() {
            return;
        }
        let row = self.row(record);
        if let Err(e) = self.writer.serialize(row) {
            warn!("Event log write failed; further events are dropped: {}", e);
            self.error = Some(e);
        }
    }

    fn finish(mut self) -> Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e.into());
        }
        self.writer.flush()?;
        Ok(())
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let partial_config = PartialSimulationConfig::from_file(&args.config.config)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.config)?;

    let mut event_log = match &args.events {
        Some(path) => {
            info!("Writing collision events to {:?}", path);
            Some(EventLog::create(path, &config)?)
        }
        None => None,
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Integrating {} particle(s) for {} step(s) of {}...",
        config.particles.len(),
        config.integrator.steps,
        config.integrator.time_step
    );
    info!("Invoking the core simulation workflow...");

    let mut sink = |record: &EventRecord| {
        if let Some(log) = event_log.as_mut() {
            log.record(record);
        }
    };
    let report = workflows::simulate::run(&config, &reporter, &mut sink)?;

    if let Some(log) = event_log {
        log.finish()?;
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!("Simulation finished at t = {:.6}", report.time);
    println!("  Collisions:      {}", report.collisions);
    if let Some(rate) = report.collision_rate {
        println!("  Collision rate:  {:.6} per unit time", rate);
    }
    println!(
        "  Bonds:           {} present ({} formed, {} broken)",
        report.bonds, report.bonds_formed, report.bonds_broken
    );
    println!("  Kinetic energy:  {:.6}", report.kinetic_energy);
    println!("  Potential energy: {:.6}", report.potential_energy);
    println!("  Total energy:    {:.6}", report.total_energy());
    match report.temperature {
        Some(t) => println!("  Temperature:     {:.6}", t),
        None => println!("  Temperature:     n/a (no movable particles)"),
    }
    match report.pressure {
        Some(p) => println!("  Pressure:        {:.6}", p),
        None => println!("  Pressure:        n/a (open boundary)"),
    }
}
