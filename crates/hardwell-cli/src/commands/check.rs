use crate::cli::CheckArgs;
use crate::config::PartialSimulationConfig;
use crate::error::{CliError, Result};
use hardwell::core::potentials::params::PotentialParams;
use hardwell::engine::config::SimulationConfig;
use hardwell::engine::integrator::HardIntegrator;
use nalgebra::Vector3;
use std::collections::HashMap;
use tracing::{info, warn};

/// Pair contacts present in the initial configuration, by particle index.
#[derive(Debug, Default, PartialEq)]
pub struct ContactSummary {
    pub overlaps: Vec<(usize, usize)>,
    pub inside_well: Vec<(usize, usize)>,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let partial_config = PartialSimulationConfig::from_file(&args.config.config)?;
    let config = partial_config.merge_with_cli(&args.config)?;
    println!("✓ Configuration is valid.");

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for particle in &config.particles {
        *counts.entry(particle.species.as_str()).or_default() += 1;
    }
    println!("  Particles: {}", config.particles.len());
    for species in &config.species {
        println!(
            "    {:<12} {:>6} (mass {}, valence {})",
            species.name,
            counts.get(species.name.as_str()).copied().unwrap_or(0),
            species.mass,
            species.valence
        );
    }
    println!("  Interactions: {}", config.interactions.len());

    let contacts = find_contacts(&config)?;
    for &(a, b) in &contacts.overlaps {
        warn!("Particles {} and {} overlap in the initial configuration.", a, b);
    }
    println!("  Overlapping pairs: {}", contacts.overlaps.len());
    println!("  Pairs inside a well: {}", contacts.inside_well.len());

    info!("Building the collision calendar...");
    let integrator = HardIntegrator::from_config(&config)?;
    println!("  Predicted collisions: {}", integrator.pending_events());
    println!("  Kinetic energy: {:.6}", integrator.kinetic_energy());
    println!("  Potential energy: {:.6}", integrator.potential_energy());
    if let Some(t) = integrator.temperature() {
        println!("  Temperature: {:.6}", t);
    }
    Ok(())
}

/// Classifies every interacting pair by its initial separation.
pub fn find_contacts(config: &SimulationConfig) -> Result<ContactSummary> {
    let boundary = config.boundary.build().map_err(|e| CliError::Config(e.to_string()))?;
    let params: HashMap<(&str, &str), &PotentialParams> = config
        .interactions
        .iter()
        .flat_map(|i| {
            let [a, b] = &i.species;
            [((a.as_str(), b.as_str()), &i.params), ((b.as_str(), a.as_str()), &i.params)]
        })
        .collect();

    let mut summary = ContactSummary::default();
    for (i, first) in config.particles.iter().enumerate() {
        for (j, second) in config.particles.iter().enumerate().skip(i + 1) {
            let Some(p) = params.get(&(first.species.as_str(), second.species.as_str())) else {
                continue;
            };
            let dr: Vector3<f64> = boundary.nearest_image(first.position - second.position);
            let distance = dr.norm();
            if distance < p.core_diameter() {
                summary.overlaps.push((i, j));
            } else if distance < p.range() {
                summary.inside_well.push((i, j));
            }
        }
    }
    Ok(summary)
}
