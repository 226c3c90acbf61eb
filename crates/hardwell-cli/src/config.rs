use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use hardwell::core::potentials::params::{PotentialParams, load_toml};
use hardwell::engine::config::{self as core_config, BoundaryConfig, SimulationConfigBuilder};
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const DEFAULT_STEPS: usize = 100;

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "kebab-case", tag = "type", deny_unknown_fields)]
enum PartialBoundary {
    Open,
    Periodic { dimensions: [f64; 3] },
}

impl From<PartialBoundary> for BoundaryConfig {
    fn from(p: PartialBoundary) -> Self {
        match p {
            PartialBoundary::Open => BoundaryConfig::Open,
            PartialBoundary::Periodic { dimensions } => BoundaryConfig::Periodic {
                dimensions: Vector3::from(dimensions),
            },
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialIntegratorConfig {
    time_step: Option<f64>,
    steps: Option<usize>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct FileSpecies {
    name: String,
    mass: f64,
    #[serde(default)]
    valence: usize,
}

#[derive(Deserialize, Debug, Clone)]
struct FileInteraction {
    species: [String; 2],
    #[serde(flatten)]
    params: PotentialParams,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct FileParticle {
    species: String,
    position: [f64; 3],
    #[serde(default)]
    velocity: [f64; 3],
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialSimulationConfig {
    boundary: Option<PartialBoundary>,
    integrator: Option<PartialIntegratorConfig>,
    #[serde(default)]
    species: Vec<FileSpecies>,
    #[serde(default)]
    interactions: Vec<FileInteraction>,
    #[serde(default)]
    particles: Vec<FileParticle>,
}

impl PartialSimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        load_toml(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &ConfigArgs) -> Result<core_config::SimulationConfig> {
        self.apply_set_values(&args.set_values)?;

        let integrator = self.integrator.take().unwrap_or_default();
        let time_step = args.time_step.or(integrator.time_step).ok_or_else(|| {
            CliError::Config(
                "`integrator.time-step` is required either in the config file or via --time-step."
                    .to_string(),
            )
        })?;
        let steps = args
            .steps
            .or(integrator.steps)
            .unwrap_or(DEFAULT_STEPS);
        let boundary = self.boundary.map(Into::into).unwrap_or_else(|| {
            debug!("No boundary section given; using open boundaries.");
            BoundaryConfig::Open
        });

        let mut builder = SimulationConfigBuilder::new()
            .boundary(boundary)
            .time_step(time_step)
            .steps(steps);
        for species in &self.species {
            builder = builder.species(&species.name, species.mass, species.valence);
        }
        for interaction in &self.interactions {
            let [a, b] = &interaction.species;
            builder = builder.interaction(a, b, interaction.params);
        }
        for particle in &self.particles {
            builder = builder.particle(
                &particle.species,
                Point3::from(particle.position),
                Vector3::from(particle.velocity),
            );
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) =
                parser::parse_set_value(kv_pair).map_err(|e| CliError::Argument(e.to_string()))?;

            match key {
                "integrator.time-step" => {
                    self.integrator
                        .get_or_insert_with(Default::default)
                        .time_step = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                    })?);
                }
                "integrator.steps" => {
                    self.integrator.get_or_insert_with(Default::default).steps =
                        Some(value_str.parse().map_err(|_| {
                            CliError::Config(format!(
                                "Invalid integer value for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                "boundary.dimensions" => {
                    let dimensions = parser::parse_vector3(value_str)
                        .map_err(|e| CliError::Argument(e.to_string()))?;
                    self.boundary = Some(PartialBoundary::Periodic { dimensions });
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
