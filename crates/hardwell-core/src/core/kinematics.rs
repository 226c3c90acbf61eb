use super::boundary::Boundary;
use super::models::particle::Particle;
use nalgebra::Vector3;

/// Relative kinematic state of a particle pair at a given false time.
///
/// `dr` always points from the first particle to the second and is the
/// minimum image under the active boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairState {
    pub dr: Vector3<f64>,
    pub dv: Vector3<f64>,
    pub r2: f64,
}

impl PairState {
    /// Computes the pair state, projecting the separation forward by `false_time`.
    ///
    /// `dv = v2 - v1`, `dr = nearest_image((x2 - x1) + false_time * dv)`.
    #[inline]
    pub fn compute(
        first: &Particle,
        second: &Particle,
        false_time: f64,
        boundary: &dyn Boundary,
    ) -> Self {
        let dv = second.velocity - first.velocity;
        let dr = boundary.nearest_image((second.position - first.position) + dv * false_time);
        Self {
            dr,
            dv,
            r2: dr.norm_squared(),
        }
    }

    /// `dr · dv`: negative while the pair approaches.
    #[inline]
    pub fn bij(&self) -> f64 {
        self.dr.dot(&self.dv)
    }

    /// `dv · dv`.
    #[inline]
    pub fn v2(&self) -> f64 {
        self.dv.norm_squared()
    }

    /// Time until an approaching pair first reaches separation `√diameter_sq`.
    ///
    /// `None` when the pair is separating or moving tangentially, or when the
    /// discriminant is not strictly positive (a miss or a grazing touch).
    #[inline]
    pub fn contact_time(&self, diameter_sq: f64) -> Option<f64> {
        let bij = self.bij();
        if bij >= 0.0 {
            return None;
        }
        let v2 = self.v2();
        let discriminant = bij * bij - v2 * (self.r2 - diameter_sq);
        (discriminant > 0.0).then(|| (-bij - discriminant.sqrt()) / v2)
    }

    /// Time until the pair leaves the sphere of diameter `√diameter_sq` it is
    /// currently inside of, whatever the sign of `bij`.
    #[inline]
    pub fn exit_time(&self, diameter_sq: f64) -> Option<f64> {
        let v2 = self.v2();
        if v2 == 0.0 {
            return None;
        }
        let bij = self.bij();
        let discriminant = bij * bij - v2 * (self.r2 - diameter_sq);
        (discriminant > 0.0).then(|| (-bij + discriminant.sqrt()) / v2)
    }
}
