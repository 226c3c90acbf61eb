use crate::core::boundary::{Boundary, OpenBoundary, PeriodicBox};
use crate::core::models::species::Species;
use crate::core::models::system::ParticleSystem;
use crate::core::potentials::params::{ParamError, PotentialParams};
use nalgebra::{Point3, Vector3};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Species '{0}' is defined more than once")]
    DuplicateSpecies(String),
    #[error("Unknown species '{0}'")]
    UnknownSpecies(String),
    #[error("Interaction between '{0}' and '{1}' is defined more than once")]
    DuplicateInteraction(String, String),
    #[error("At most one reactive square-well interaction is supported, found {0}")]
    MultipleReactiveInteractions(usize),
    #[error("Invalid potential parameters for '{a}'-'{b}': {source}")]
    Potential {
        a: String,
        b: String,
        source: ParamError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryConfig {
    Open,
    Periodic { dimensions: Vector3<f64> },
}

impl BoundaryConfig {
    pub fn build(&self) -> Result<Box<dyn Boundary>, ConfigError> {
        match *self {
            BoundaryConfig::Open => Ok(Box::new(OpenBoundary)),
            BoundaryConfig::Periodic { dimensions } => PeriodicBox::new(dimensions)
                .map(|b| Box::new(b) as Box<dyn Boundary>)
                .ok_or_else(|| ConfigError::InvalidParameter {
                    name: "boundary.dimensions",
                    reason: format!(
                        "every edge must be positive and finite, got {:?}",
                        dimensions.as_slice()
                    ),
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesConfig {
    pub name: String,
    /// Particle mass; `f64::INFINITY` makes the species immovable.
    pub mass: f64,
    pub valence: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    pub species: [String; 2],
    pub params: PotentialParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleConfig {
    pub species: String,
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorConfig {
    pub time_step: f64,
    pub steps: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub boundary: BoundaryConfig,
    pub integrator: IntegratorConfig,
    pub species: Vec<SpeciesConfig>,
    pub interactions: Vec<InteractionConfig>,
    pub particles: Vec<ParticleConfig>,
}

impl SimulationConfig {
    /// Creates the particle system described by this configuration.
    ///
    /// Species are registered in declaration order, then particles, whose
    /// positions are wrapped into the primary cell of the boundary.
    pub fn build_system(&self) -> Result<ParticleSystem, ConfigError> {
        let boundary = self.boundary.build()?;
        let mut system = ParticleSystem::new();
        for species in &self.species {
            system.add_species(Species::new(&species.name, species.mass, species.valence));
        }
        for particle in &self.particles {
            let species_id = system
                .find_species_by_name(&particle.species)
                .ok_or_else(|| ConfigError::UnknownSpecies(particle.species.clone()))?;
            system
                .add_particle(species_id, boundary.wrap(particle.position), particle.velocity)
                .ok_or_else(|| ConfigError::UnknownSpecies(particle.species.clone()))?;
        }
        Ok(system)
    }
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    boundary: Option<BoundaryConfig>,
    time_step: Option<f64>,
    steps: Option<usize>,
    species: Vec<SpeciesConfig>,
    interactions: Vec<InteractionConfig>,
    particles: Vec<ParticleConfig>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boundary(mut self, boundary: BoundaryConfig) -> Self {
        self.boundary = Some(boundary);
        self
    }
    pub fn time_step(mut self, time_step: f64) -> Self {
        self.time_step = Some(time_step);
        self
    }
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }
    pub fn species(mut self, name: &str, mass: f64, valence: usize) -> Self {
        self.species.push(SpeciesConfig {
            name: name.to_string(),
            mass,
            valence,
        });
        self
    }
    pub fn interaction(mut self, a: &str, b: &str, params: PotentialParams) -> Self {
        self.interactions.push(InteractionConfig {
            species: [a.to_string(), b.to_string()],
            params,
        });
        self
    }
    pub fn particle(mut self, species: &str, position: Point3<f64>, velocity: Vector3<f64>) -> Self {
        self.particles.push(ParticleConfig {
            species: species.to_string(),
            position,
            velocity,
        });
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let integrator = IntegratorConfig {
            time_step: self
                .time_step
                .ok_or(ConfigError::MissingParameter("time_step"))?,
            steps: self.steps.ok_or(ConfigError::MissingParameter("steps"))?,
        };
        if !(integrator.time_step.is_finite() && integrator.time_step > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "time_step",
                reason: format!("must be positive and finite, got {}", integrator.time_step),
            });
        }

        let boundary = self
            .boundary
            .ok_or(ConfigError::MissingParameter("boundary"))?;
        boundary.build()?;

        if self.species.is_empty() {
            return Err(ConfigError::MissingParameter("species"));
        }
        let mut names = HashSet::new();
        for species in &self.species {
            if !names.insert(species.name.as_str()) {
                return Err(ConfigError::DuplicateSpecies(species.name.clone()));
            }
            if species.mass.is_nan() || species.mass <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "species.mass",
                    reason: format!(
                        "mass of '{}' must be positive, got {}",
                        species.name, species.mass
                    ),
                });
            }
        }

        let mut pairs = HashSet::new();
        for interaction in &self.interactions {
            let [a, b] = &interaction.species;
            for name in [a, b] {
                if !names.contains(name.as_str()) {
                    return Err(ConfigError::UnknownSpecies(name.clone()));
                }
            }
            let key = if a <= b { (a, b) } else { (b, a) };
            if !pairs.insert(key) {
                return Err(ConfigError::DuplicateInteraction(a.clone(), b.clone()));
            }
            interaction
                .params
                .validate()
                .map_err(|source| ConfigError::Potential {
                    a: a.clone(),
                    b: b.clone(),
                    source,
                })?;
        }
        let reactive = self
            .interactions
            .iter()
            .filter(|i| i.params.is_reactive())
            .count();
        if reactive > 1 {
            return Err(ConfigError::MultipleReactiveInteractions(reactive));
        }
        if let BoundaryConfig::Periodic { dimensions } = &boundary {
            // Below twice the range a pair can interact through more than one image.
            let range = self
                .interactions
                .iter()
                .map(|i| i.params.range())
                .fold(0.0, f64::max);
            let edge = dimensions.min();
            if edge < 2.0 * range {
                return Err(ConfigError::InvalidParameter {
                    name: "boundary.dimensions",
                    reason: format!(
                        "shortest box edge {} is less than twice the interaction range {}",
                        edge, range
                    ),
                });
            }
        }

        if self.particles.is_empty() {
            return Err(ConfigError::MissingParameter("particles"));
        }
        for particle in &self.particles {
            if !names.contains(particle.species.as_str()) {
                return Err(ConfigError::UnknownSpecies(particle.species.clone()));
            }
            let finite = particle.position.iter().all(|x| x.is_finite())
                && particle.velocity.iter().all(|v| v.is_finite());
            if !finite {
                return Err(ConfigError::InvalidParameter {
                    name: "particles",
                    reason: format!(
                        "non-finite position or velocity for a '{}' particle",
                        particle.species
                    ),
                });
            }
        }

        Ok(SimulationConfig {
            boundary,
            integrator,
            species: self.species,
            interactions: self.interactions,
            particles: self.particles,
        })
    }
}
