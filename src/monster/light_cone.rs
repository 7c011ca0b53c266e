use bevy::math::Vec3;

/// Read-only snapshot of the player's flashlight for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashlightState {
    pub on: bool,
    pub origin: Vec3,
    pub forward: Vec3,
    /// Half of the spot angle, in radians.
    pub half_angle: f32,
    pub range: f32,
}

impl FlashlightState {
    /// Angle between the beam axis and the direction to `point`, and the distance to it.
    pub fn exposure_geometry(&self, point: Vec3) -> (f32, f32) {
        let to_point = point - self.origin;
        let distance = to_point.length();
        if distance <= f32::EPSILON || self.forward.length_squared() <= f32::EPSILON {
            return (0.0, distance);
        }
        (self.forward.angle_between(to_point), distance)
    }

    pub fn illuminates(&self, point: Vec3, max_distance: f32) -> bool {
        if !self.on {
            return false;
        }
        let (angle, distance) = self.exposure_geometry(point);
        angle < self.half_angle && distance <= max_distance.min(self.range)
    }
}
