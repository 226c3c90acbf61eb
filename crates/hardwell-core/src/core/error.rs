use super::models::ids::ParticleId;
use thiserror::Error;

/// Which side of a pair lacked the expected ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerSide {
    First,
    Second,
}

/// Fatal invariant violations raised by the collision kernel.
///
/// None of these are recoverable: they indicate a caller that broke the
/// scheduling contract or a ledger that lost its symmetry. The kernel never
/// repairs state after reporting one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    #[error(
        "Negative collision time {time:e} predicted for pair ({a:?}, {b:?}); the pair overlaps and overlap tolerance is off"
    )]
    NegativeCollisionTime {
        a: ParticleId,
        b: ParticleId,
        time: f64,
    },

    #[error("Bond ledger is asymmetric for pair ({a:?}, {b:?}): the {side:?} side has no matching entry")]
    AsymmetricBond {
        a: ParticleId,
        b: ParticleId,
        side: LedgerSide,
    },

    #[error("Cannot unbond ({a:?}, {b:?}): the pair is not bonded")]
    NotBonded { a: ParticleId, b: ParticleId },

    #[error("Particle {particle:?} already holds {valence} bond(s), the maximum for its species")]
    ValenceOverflow {
        particle: ParticleId,
        valence: usize,
    },

    #[error("Particle {0:?} is not registered with the bond ledger")]
    UnknownParticle(ParticleId),
}

impl KernelError {
    /// The particles named by this violation.
    pub fn particles(&self) -> Vec<ParticleId> {
        match *self {
            Self::NegativeCollisionTime { a, b, .. }
            | Self::AsymmetricBond { a, b, .. }
            | Self::NotBonded { a, b } => vec![a, b],
            Self::ValenceOverflow { particle, .. } => vec![particle],
            Self::UnknownParticle(id) => vec![id],
        }
    }
}
