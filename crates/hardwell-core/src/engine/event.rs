use crate::core::models::ids::ParticleId;
use crate::core::potentials::BondTransition;
use ordered_float::NotNan;

/// A predicted pair collision waiting in the calendar.
///
/// Ordering is by time first; ties fall back to the particle ids and then the
/// collision-count snapshots so that runs are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollisionEvent {
    pub time: NotNan<f64>,
    pub pair: [ParticleId; 2],
    /// Collision counts of both particles when the event was predicted.
    pub counts: [u64; 2],
}

impl CollisionEvent {
    /// Returns `None` for times that are not finite, i.e. for pairs that never meet.
    pub fn new(time: f64, pair: [ParticleId; 2], counts: [u64; 2]) -> Option<Self> {
        if !time.is_finite() {
            return None;
        }
        let time = NotNan::new(time).ok()?;
        Some(Self { time, pair, counts })
    }

    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    /// An event stays valid while neither particle has collided since it was predicted.
    #[inline]
    pub fn is_valid(&self, counts_now: [u64; 2]) -> bool {
        self.counts == counts_now
    }
}

/// A processed collision, as handed to event sinks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRecord {
    pub time: f64,
    pub pair: [ParticleId; 2],
    pub potential: &'static str,
    pub virial: f64,
    pub energy_change: f64,
    pub transition: BondTransition,
}
