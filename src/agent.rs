//! Read-only kinematic and geometric view of one vehicle agent.
//!
//! The surrounding simulation decodes its agent state into an
//! [`AgentSnapshot`] once per cycle; the collision code only ever reads it.

use glam::DVec2;

use crate::error::{CollisionError, CollisionResult};

/// Vehicle parameters the collision code needs from the vehicle catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleModelParameters {
    /// Vehicle mass [kg].
    pub mass: f64,
    /// Longitudinal position of the front axle in the vehicle frame [m].
    pub front_axle_x: f64,
    /// Longitudinal position of the rear axle in the vehicle frame [m].
    pub rear_axle_x: f64,
}

impl VehicleModelParameters {
    #[inline]
    pub fn wheelbase(&self) -> f64 {
        self.front_axle_x - self.rear_axle_x
    }
}

/// Snapshot of an agent at the current scheduling time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    /// Position of the reference point (rear axle) in the global frame [m].
    pub position: DVec2,
    /// Yaw angle [rad].
    pub yaw: f64,
    /// Yaw rate [rad/s].
    pub yaw_rate: f64,
    /// Yaw acceleration [rad/s²].
    pub yaw_acceleration: f64,
    /// Overall length [m].
    pub length: f64,
    /// Overall width [m].
    pub width: f64,
    /// Distance from the reference point to the front bumper [m].
    pub distance_reference_point_to_leading_edge: f64,
    /// Velocity vector in the global frame [m/s].
    pub velocity: DVec2,
    pub vehicle: VehicleModelParameters,
}

impl AgentSnapshot {
    /// Agent at rest with its reference point centered in the footprint and
    /// a zero wheelbase, so that `position` is also the geometric center.
    pub fn centered(position: DVec2, yaw: f64, length: f64, width: f64, mass: f64) -> Self {
        Self {
            position,
            yaw,
            yaw_rate: 0.0,
            yaw_acceleration: 0.0,
            length,
            width,
            distance_reference_point_to_leading_edge: 0.5 * length,
            velocity: DVec2::ZERO,
            vehicle: VehicleModelParameters {
                mass,
                front_axle_x: 0.0,
                rear_axle_x: 0.0,
            },
        }
    }

    /// Builder-style setter for the velocity vector.
    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder-style setter for the speed along the current heading.
    pub fn with_speed(self, speed: f64) -> Self {
        let heading = DVec2::new(self.yaw.cos(), self.yaw.sin());
        self.with_velocity(heading * speed)
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.vehicle.mass
    }

    #[inline]
    pub fn wheelbase(&self) -> f64 {
        self.vehicle.wheelbase()
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Yaw moment of inertia [kg·m²], treating the vehicle as a homogeneous
    /// rectangular plate.
    #[inline]
    pub fn moment_of_inertia_yaw(&self) -> f64 {
        moment_of_inertia_yaw(self.mass(), self.length, self.width)
    }

    /// Check that mass and footprint are usable for the momentum solve.
    pub fn validate(&self) -> CollisionResult<()> {
        if !(self.mass() > 0.0) {
            return Err(CollisionError::InvalidAgent(format!(
                "mass must be positive, got {}",
                self.mass()
            )));
        }
        if !(self.length > 0.0 && self.width > 0.0) {
            return Err(CollisionError::InvalidAgent(format!(
                "footprint must be positive, got {} x {}",
                self.length, self.width
            )));
        }
        Ok(())
    }
}

/// Yaw moment of inertia of a homogeneous `length` x `width` plate.
#[inline]
pub fn moment_of_inertia_yaw(mass: f64, length: f64, width: f64) -> f64 {
    mass * (length * length + width * width) / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moment_of_inertia() {
        let i = moment_of_inertia_yaw(1200.0, 4.0, 2.0);
        assert!((i - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_with_speed_follows_heading() {
        let agent = AgentSnapshot::centered(DVec2::ZERO, std::f64::consts::FRAC_PI_2, 4.5, 1.8, 1500.0)
            .with_speed(10.0);
        assert!(agent.velocity.x.abs() < 1e-12);
        assert!((agent.velocity.y - 10.0).abs() < 1e-12);
        assert!((agent.speed() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate() {
        let agent = AgentSnapshot::centered(DVec2::ZERO, 0.0, 4.5, 1.8, 1500.0);
        assert!(agent.validate().is_ok());

        let massless = AgentSnapshot::centered(DVec2::ZERO, 0.0, 4.5, 1.8, 0.0);
        assert!(matches!(
            massless.validate(),
            Err(CollisionError::InvalidAgent(_))
        ));

        let flat = AgentSnapshot::centered(DVec2::ZERO, 0.0, 4.5, f64::NAN, 1500.0);
        assert!(flat.validate().is_err());
    }
}
