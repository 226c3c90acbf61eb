use super::config::ConfigError;
use crate::core::error::KernelError;
use crate::core::models::ids::ParticleId;
use nalgebra::{Point3, Vector3};
use std::fmt;
use thiserror::Error;

/// State of one particle captured when a run is aborted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSnapshot {
    pub id: ParticleId,
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
    pub partners: Vec<ParticleId>,
}

impl fmt::Display for ParticleSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: x = ({:.12}, {:.12}, {:.12}), v = ({:.12}, {:.12}, {:.12}), bonded to {:?}",
            self.id,
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
            self.partners
        )
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    /// A kernel invariant broke. The run stops here and nothing is repaired.
    #[error("Fatal collision-kernel violation at t = {time}: {source}")]
    Fatal {
        time: f64,
        snapshot: Vec<ParticleSnapshot>,
        source: KernelError,
    },

    #[error("Cannot advance to t = {target}: the simulation is already at t = {current}")]
    InvalidTarget { target: f64, current: f64 },

    #[error("Particle {0:?} is not part of the system")]
    UnknownParticle(ParticleId),
}
