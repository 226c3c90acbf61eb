use crate::core::potentials::{BondTransition, Collision};
use nalgebra::Matrix3;

/// Running collision statistics of a simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Observables {
    pub collisions: u64,
    pub bonds_formed: u64,
    pub bonds_broken: u64,
    /// Sum of collision virials `ΣJ`.
    pub virial_sum: f64,
    /// Sum of `(J / r2) dr ⊗ dr` over all collisions.
    pub virial_tensor: Matrix3<f64>,
    /// Sum of potential-energy changes across all collisions.
    pub potential_energy_change: f64,
    /// Simulated time covered by the accumulated statistics.
    pub elapsed: f64,
}

impl Default for Observables {
    fn default() -> Self {
        Self {
            collisions: 0,
            bonds_formed: 0,
            bonds_broken: 0,
            virial_sum: 0.0,
            virial_tensor: Matrix3::zeros(),
            potential_energy_change: 0.0,
            elapsed: 0.0,
        }
    }
}

impl Observables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, collision: &Collision) {
        self.collisions += 1;
        self.virial_sum += collision.virial;
        self.virial_tensor += collision.virial_tensor();
        self.potential_energy_change += collision.energy_change;
        match collision.transition {
            BondTransition::Bonded => self.bonds_formed += 1,
            BondTransition::Unbonded => self.bonds_broken += 1,
            BondTransition::Unchanged => {}
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.elapsed += dt;
    }

    /// Virial pressure `(2 KE / 3 - ΣJ / (3 t)) / V`.
    ///
    /// `None` for an unbounded volume or before any time has elapsed.
    pub fn pressure(&self, kinetic_energy: f64, volume: Option<f64>) -> Option<f64> {
        let volume = volume?;
        if self.elapsed <= 0.0 {
            return None;
        }
        Some((2.0 * kinetic_energy / 3.0 - self.virial_sum / (3.0 * self.elapsed)) / volume)
    }

    /// Kinetic temperature `2 KE / (3 N)` in units where `k_B = 1`.
    pub fn temperature(kinetic_energy: f64, movable: usize) -> Option<f64> {
        (movable > 0).then(|| 2.0 * kinetic_energy / (3.0 * movable as f64))
    }

    /// Mean collision rate per unit time.
    pub fn collision_rate(&self) -> Option<f64> {
        (self.elapsed > 0.0).then(|| self.collisions as f64 / self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn collision(virial: f64, energy_change: f64, transition: BondTransition) -> Collision {
        Collision {
            virial,
            dr: Vector3::new(1.0, 0.0, 0.0),
            r2: 1.0,
            energy_change,
            transition,
        }
    }

    #[test]
    fn record_accumulates_counts_and_virial() {
        let mut obs = Observables::new();
        obs.record(&collision(-2.0, 0.0, BondTransition::Unchanged));
        obs.record(&collision(-1.0, -1.0, BondTransition::Bonded));
        obs.record(&collision(0.5, 1.0, BondTransition::Unbonded));
        assert_eq!(obs.collisions, 3);
        assert_eq!(obs.bonds_formed, 1);
        assert_eq!(obs.bonds_broken, 1);
        assert!((obs.virial_sum + 2.5).abs() < 1e-12);
        assert!((obs.virial_tensor.trace() + 2.5).abs() < 1e-12);
        assert_eq!(obs.potential_energy_change, 0.0);
    }

    #[test]
    fn ideal_gas_pressure_is_two_thirds_kinetic_energy_density() {
        let mut obs = Observables::new();
        obs.advance(1.0);
        let p = obs.pressure(3.0, Some(2.0)).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn repulsive_collisions_raise_pressure() {
        let mut obs = Observables::new();
        obs.record(&collision(-3.0, 0.0, BondTransition::Unchanged));
        obs.advance(1.0);
        let p = obs.pressure(0.0, Some(1.0)).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pressure_needs_volume_and_elapsed_time() {
        let mut obs = Observables::new();
        assert_eq!(obs.pressure(1.0, Some(1.0)), None);
        obs.advance(1.0);
        assert_eq!(obs.pressure(1.0, None), None);
    }

    #[test]
    fn collision_rate_is_collisions_per_elapsed_time() {
        let mut obs = Observables::new();
        obs.record(&collision(-1.0, 0.0, BondTransition::Unchanged));
        assert_eq!(obs.collision_rate(), None);
        obs.record(&collision(-1.0, 0.0, BondTransition::Unchanged));
        obs.record(&collision(-1.0, 0.0, BondTransition::Unchanged));
        obs.advance(1.5);
        assert!((obs.collision_rate().unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn temperature_follows_equipartition() {
        assert_eq!(Observables::temperature(3.0, 2), Some(1.0));
        assert_eq!(Observables::temperature(3.0, 0), None);
    }
}
